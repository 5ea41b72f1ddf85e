use anyhow::Result;
use clap::Parser;
use grantha::config;
use grantha::model::StateRecord;
use grantha::supabase::Supabase;
use grantha::view;

#[derive(Parser)]
#[command(name = "states")]
#[command(about = "Renders the states page from the hosted table")]
struct Cli {
    /// Write the page here instead of stdout.
    #[arg(short = 'o', long = "out")]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().json().init();
    let args = Cli::parse();

    let creds = config::Supabase::from_env()?;
    let supabase = Supabase::new(&creds);

    let body = match supabase.select_all::<StateRecord>("states").await {
        Ok(states) => {
            tracing::info!(count = states.len(), "fetched states");
            view::render_states(&states)
        }
        Err(e) => {
            tracing::error!(error = %e, "error fetching states");
            "<p>Error loading data</p>\n".to_string()
        }
    };

    emit(page(&body), args.out)
}

fn page(body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>States</title>
</head>
<body>
  <div id="states-list">
{}  </div>
</body>
</html>
"#,
        body
    )
}

fn emit(page: String, out: Option<String>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(&path, page)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path, e)),
        None => {
            println!("{}", page);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_wraps_body_in_states_list() {
        let html = page("<div class=\"state-card\"><h2>Kerala</h2></div>\n");
        assert!(html.contains("id=\"states-list\""));
        assert!(html.contains("Kerala"));
    }
}
