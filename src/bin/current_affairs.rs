use anyhow::{Context, Result};
use clap::Parser;
use grantha::config;
use grantha::model::CurrentAffairRecord;
use grantha::supabase::Supabase;
use grantha::view;

#[derive(Parser)]
#[command(name = "current-affairs")]
#[command(about = "Renders the current affairs page for the state named in a page url")]
struct Cli {
    /// Page url carrying the state name, e.g.
    /// https://example.com/current-affairs?state=Kerala
    #[arg(long = "url")]
    url: String,

    /// Write the page here instead of stdout.
    #[arg(short = 'o', long = "out")]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().json().init();
    let args = Cli::parse();

    let state = state_from_url(&args.url)
        .with_context(|| format!("no state name in url {}", args.url))?;

    let creds = config::Supabase::from_env()?;
    let supabase = Supabase::new(&creds);

    let body = match supabase
        .select_where_ordered::<CurrentAffairRecord>("current_affairs", "state", &state, "date", true)
        .await
    {
        Ok(affairs) => {
            tracing::info!(count = affairs.len(), state, "fetched current affairs");
            view::render_affairs(&affairs)
        }
        Err(e) => {
            tracing::error!(error = %e, state, "error fetching current affairs");
            "<p>Error loading data</p>\n".to_string()
        }
    };

    emit(page(&state, &body), args.out)
}

/// Pulls the `state` query parameter out of a page url.
fn state_from_url(url: &str) -> Option<String> {
    let url = url.split_once('#').map(|(before, _)| before).unwrap_or(url);
    let (_, query) = url.split_once('?')?;
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == "state" && !value.is_empty() {
                return urlencoding::decode(value).ok().map(|v| v.into_owned());
            }
        }
    }
    None
}

fn page(state: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Current Affairs &mdash; {state}</title>
</head>
<body>
  <h1>Current Affairs: {state}</h1>
  <div id="affairs-list">
{body}  </div>
</body>
</html>
"#,
        state = view::escape(state),
        body = body
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
