use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config;
use crate::error::RequestFailed;

/// Thin client for the hosted table API (PostgREST dialect) the standalone
/// page scripts read from. Credentials are injected through config or the
/// environment.
pub struct Supabase {
    url: String,
    anon_key: String,
    client: Client,
}

impl Supabase {
    pub fn new(cfg: &config::Supabase) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("grantha/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Supabase {
            url: cfg.url.trim_end_matches('/').to_string(),
            anon_key: cfg.anon_key.clone(),
            client,
        }
    }

    /// `SELECT *` over the whole table.
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
    ) -> Result<Vec<T>, RequestFailed> {
        let url = self.table_url(table, "select=*");
        self.run(table, url).await
    }

    /// `SELECT *` filtered by equality on one column, ordered by another.
    pub async fn select_where_ordered<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        order_column: &str,
        descending: bool,
    ) -> Result<Vec<T>, RequestFailed> {
        let direction = if descending { "desc" } else { "asc" };
        let query = format!(
            "select=*&{}=eq.{}&order={}.{}",
            column,
            urlencoding::encode(value),
            order_column,
            direction
        );
        let url = self.table_url(table, &query);
        self.run(table, url).await
    }

    fn table_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.url, table, query)
    }

    async fn run<T: DeserializeOwned>(
        &self,
        table: &str,
        url: String,
    ) -> Result<Vec<T>, RequestFailed> {
        debug!(table, %url, "querying table");
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await
            .map_err(|e| RequestFailed::transport(table, e))?;

        if !response.status().is_success() {
            return Err(RequestFailed::http(table, response.status().as_u16()));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| RequestFailed::transport(table, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentAffairRecord, StateRecord};
    use axum::{Json, Router, routing::get};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn client(url: &str) -> Supabase {
        Supabase::new(&config::Supabase {
            url: url.to_string(),
            anon_key: "anon-key".to_string(),
        })
    }

    #[test]
    fn builds_filtered_ordered_url() {
        let sb = client("https://proj.supabase.co/");
        assert_eq!(
            sb.table_url("states", "select=*"),
            "https://proj.supabase.co/rest/v1/states?select=*"
        );
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn select_all_sends_credentials_and_decodes() {
        let seen = Arc::new(Mutex::new(None::<(Option<String>, Option<String>)>));
        let sink = seen.clone();
        let app = Router::new().route(
            "/rest/v1/states",
            get(
                move |headers: axum::http::HeaderMap,
                      axum::extract::RawQuery(query): axum::extract::RawQuery| {
                    let sink = sink.clone();
                    async move {
                        let apikey = headers
                            .get("apikey")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from);
                        *sink.lock().unwrap() = Some((apikey, query));
                        Json(json!([
                            { "name": "Kerala", "description": "Spice coast" },
                            { "name": "Goa", "description": null }
                        ]))
                    }
                },
            ),
        );

        let sb = client(&serve(app).await);
        let states: Vec<StateRecord> = sb.select_all("states").await.unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(states[0].name, "Kerala");
        assert_eq!(states[1].description, None);

        let (apikey, query) = seen.lock().unwrap().take().unwrap();
        assert_eq!(apikey.as_deref(), Some("anon-key"));
        assert_eq!(query.as_deref(), Some("select=*"));
    }

    #[tokio::test]
    async fn filtered_query_encodes_state_and_orders_descending() {
        let seen = Arc::new(Mutex::new(None::<String>));
        let sink = seen.clone();
        let app = Router::new().route(
            "/rest/v1/current_affairs",
            get(
                move |axum::extract::RawQuery(query): axum::extract::RawQuery| {
                    let sink = sink.clone();
                    async move {
                        *sink.lock().unwrap() = query;
                        Json(json!([{
                            "state": "Tamil Nadu",
                            "title": "Harvest festival",
                            "summary": "Pongal preparations",
                            "date": "2026-01-14"
                        }]))
                    }
                },
            ),
        );

        let sb = client(&serve(app).await);
        let affairs: Vec<CurrentAffairRecord> = sb
            .select_where_ordered("current_affairs", "state", "Tamil Nadu", "date", true)
            .await
            .unwrap();

        assert_eq!(affairs[0].title, "Harvest festival");
        assert_eq!(
            seen.lock().unwrap().take().as_deref(),
            Some("select=*&state=eq.Tamil%20Nadu&order=date.desc")
        );
    }

    #[tokio::test]
    async fn table_error_carries_status() {
        let app = Router::new().route(
            "/rest/v1/states",
            get(|| async { axum::http::StatusCode::UNAUTHORIZED }),
        );

        let sb = client(&serve(app).await);
        let err = sb.select_all::<StateRecord>("states").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
    }
}
