use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use grantha::config::{Cli, Config, default_config_path};
use grantha::controller::AppController;
use grantha::document::Document;
use grantha::gateway::DataGateway;
use tracing;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let config_path = match args.config_path {
        Some(path) => PathBuf::from(path),
        None => default_config_path(),
    };

    tracing_subscriber::fmt().json().init();
    tracing::info!("grantha starting");

    let cfg = Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });

    let gateway = Arc::new(DataGateway::new(cfg.app.api_base_url()));
    let document = Arc::new(Document::new());
    let mut controller = AppController::new(gateway, document.clone());

    controller.load_initial_data().await;

    if let Some(path) = args.open {
        controller.navigate(&path);
        // Route handlers spawn their fetches fire-and-forget; give an
        // opened text detail a beat to land before the page is read.
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    if let Some(query) = args.search {
        controller.on_search_submit(&query).await;
    }

    let page = document.render_page();
    match args.out {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, page) {
                tracing::error!(error = %e, path, "failed to write page");
                std::process::exit(1);
            }
            tracing::info!(path, "page written");
        }
        None => println!("{}", page),
    }
}
