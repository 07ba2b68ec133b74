use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use searchlight::api::create_router;
use searchlight::client::HttpSearchClient;
use searchlight::config::CONFIG;
use searchlight::controller::{SearchController, SubmitOutcome};
use searchlight::data_models::RenderedResult;
use searchlight::snippet::escape_controls;
use searchlight::store::DocumentStore;

const HIGHLIGHT_OPEN: &str = "\x1b[1;33m";
const HIGHLIGHT_CLOSE: &str = "\x1b[0m";

#[derive(Parser)]
#[command(
    name = "searchlight",
    about = "Search a document endpoint and show highlighted excerpts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single search and print the results
    Search {
        /// Overrides SEARCH_ENDPOINT
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Read queries from stdin, one per line
    Interactive {
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Serve a JSON corpus at GET /search
    Serve {
        /// Overrides SEARCH_CORPUS
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Overrides SEARCH_BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Search { endpoint, query } => {
            let controller = build_controller(endpoint)?;
            controller.set_query(query.join(" ")).await;
            run_query(&controller).await;
        }
        Command::Interactive { endpoint } => {
            let controller = build_controller(endpoint)?;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                controller.set_query(line).await;
                run_query(&controller).await;
            }
        }
        Command::Serve { corpus, bind } => {
            let store = match corpus {
                Some(path) => DocumentStore::load(path)?,
                None => DocumentStore::from_config()?,
            };
            if store.is_empty() {
                log::warn!("corpus is empty, every search will return no results");
            }
            let bind = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let router = create_router(Arc::new(store), CONFIG.max_hits);
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {bind}"))?;
            log::info!("listening on {bind}");
            axum::serve(listener, router).await?;
        }
    }
    Ok(())
}

fn build_controller(endpoint: Option<String>) -> Result<SearchController> {
    let client = match endpoint {
        Some(endpoint) => HttpSearchClient::new(
            &endpoint,
            Duration::from_secs(CONFIG.request_timeout_secs),
        ),
        None => HttpSearchClient::from_config(),
    }
    .context("Failed to create search client")?;
    Ok(SearchController::new(Arc::new(client)))
}

async fn run_query(controller: &SearchController) {
    match controller.submit().await {
        SubmitOutcome::Skipped => return,
        SubmitOutcome::Failed(e) => {
            println!("search failed: {e}");
        }
        SubmitOutcome::Updated(_) | SubmitOutcome::Stale => {}
    }
    print_results(&controller.rendered().await);
}

fn print_results(results: &[RenderedResult]) {
    if results.is_empty() {
        println!("no results");
        return;
    }
    for result in results {
        println!("{}", format_result(result));
    }
}

/// Remote text goes through `escape_controls` so a document can't drive
/// the terminal; only our highlight markers are emitted raw.
fn format_result(result: &RenderedResult) -> String {
    format!(
        "{} - {}\n  {}\n  {}\n",
        escape_controls(&result.title),
        escape_controls(&result.date),
        escape_controls(&result.url),
        result.snippet.render_with(HIGHLIGHT_OPEN, HIGHLIGHT_CLOSE)
    )
}

#[test]
fn test_format_result_neutralizes_escape_sequences() {
    let result = RenderedResult {
        url: "https://example.com/\x1b]8;;evil\x07".into(),
        title: "\x1b[2JCleared".into(),
        date: "2023-06-12".into(),
        snippet: searchlight::snippet::extract("before \x1b[2J clear screen", "clear"),
    };
    let out = format_result(&result);
    // The only ESC bytes left are the two from our own highlight markers.
    assert_eq!(out.matches('\x1b').count(), 2);
    assert!(out.starts_with("\\u{1b}[2JCleared - 2023-06-12\n"));
    assert!(out.contains(&format!("{HIGHLIGHT_OPEN}clear{HIGHLIGHT_CLOSE}")));
}
