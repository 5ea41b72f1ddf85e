use std::sync::Arc;

use tracing::{debug, error, info};

use crate::document::Document;
use crate::gateway::DataGateway;
use crate::router::PathRouter;
use crate::view;

const LOAD_ERROR: &str = "Failed to load data. Please try again later.";
const SEARCH_ERROR: &str = "Search failed. Please try again.";
const SUBSCRIBE_OK: &str = "Thank you for subscribing!";
const SUBSCRIBE_ERROR: &str = "Subscription failed. Please try again.";
const TEXT_ERROR: &str = "Failed to load text. Please try again later.";

/// Composition root: owns the router, wires event entry points to gateway
/// calls, and lands rendered fragments in the document.
pub struct AppController {
    gateway: Arc<DataGateway>,
    document: Arc<Document>,
    router: PathRouter,
}

impl AppController {
    pub fn new(gateway: Arc<DataGateway>, document: Arc<Document>) -> Self {
        let mut controller = AppController {
            gateway,
            document,
            router: PathRouter::new(),
        };
        controller.register_routes();
        controller
    }

    /// Specific templates before general ones; first match wins.
    fn register_routes(&mut self) {
        let gateway = self.gateway.clone();
        let document = self.document.clone();
        self.router.add_route(
            "/text/:id",
            Box::new(move |params| {
                let Some(id) = params.get("id") else {
                    return;
                };
                let gateway = gateway.clone();
                let document = document.clone();
                let id = id.clone();
                // Fire-and-forget, like the page it models: navigation does
                // not wait on the fetch.
                tokio::spawn(async move {
                    match gateway.fetch_text_by_id(&id).await {
                        Ok(text) => document.set_region("text-detail", view::text_detail(&text)),
                        Err(e) => {
                            error!(error = %e, id, "failed to load text");
                            document.notify_error(TEXT_ERROR);
                        }
                    }
                });
            }),
        );

        self.router.add_route(
            "/search",
            Box::new(|_params| {
                debug!("search route dispatched");
            }),
        );

        self.router.add_route(
            "/",
            Box::new(|_params| {
                debug!("home route dispatched");
            }),
        );
    }

    /// Startup sequence: languages first, featured texts only after the
    /// languages fetch succeeded. The first failure aborts the chain and
    /// produces exactly one user-visible notification.
    pub async fn load_initial_data(&self) {
        self.document.show_loader();

        match self.gateway.fetch_languages().await {
            Ok(languages) => {
                info!(count = languages.len(), "loaded languages");
                self.document
                    .set_region("languages-grid", view::render_languages(&languages));
            }
            Err(e) => {
                error!(error = %e, "error loading initial data");
                self.document.notify_error(LOAD_ERROR);
                self.document.hide_loader();
                return;
            }
        }

        match self.gateway.fetch_featured_texts().await {
            Ok(texts) => {
                info!(count = texts.len(), "loaded featured texts");
                self.document
                    .set_region("featured-texts-grid", view::render_featured_texts(&texts));
            }
            Err(e) => {
                error!(error = %e, "error loading initial data");
                self.document.notify_error(LOAD_ERROR);
            }
        }

        self.document.hide_loader();
    }

    /// Search form submit. Navigation to the query-bearing path happens
    /// first and is observable whether or not the search call succeeds.
    pub async fn on_search_submit(&mut self, raw_query: &str) {
        let query = raw_query.trim();
        if query.is_empty() {
            return;
        }

        self.router
            .navigate_to(&format!("/search?q={}", urlencoding::encode(query)));

        match self.gateway.search(query).await {
            Ok(results) => {
                info!(count = results.len(), query, "search completed");
                self.document
                    .append_region("main-content", &view::render_search_results(&results));
            }
            Err(e) => {
                error!(error = %e, query, "search error");
                self.document.notify_error(SEARCH_ERROR);
            }
        }
    }

    /// Newsletter form submit. Returns whether the host should reset the
    /// form (only after a successful subscription).
    pub async fn on_newsletter_submit(&mut self, raw_email: &str) -> bool {
        let email = raw_email.trim();
        if email.is_empty() {
            return false;
        }

        match self.gateway.subscribe(email).await {
            Ok(ack) => {
                info!(status = %ack.status, "newsletter subscription accepted");
                self.document.notify_success(SUBSCRIBE_OK);
                true
            }
            Err(e) => {
                error!(error = %e, "subscription error");
                self.document.notify_error(SUBSCRIBE_ERROR);
                false
            }
        }
    }

    pub fn on_menu_toggle(&self) {
        self.document.toggle_menu();
    }

    pub fn on_dropdown_click(&self, id: &str) {
        self.document.toggle_dropdown(id);
    }

    pub fn navigate(&mut self, path: &str) -> bool {
        // A navigation means a link was followed; the mobile menu closes.
        self.document.close_menu();
        self.router.navigate_to(path)
    }

    pub fn router(&self) -> &PathRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut PathRouter {
        &mut self.router
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }
}
