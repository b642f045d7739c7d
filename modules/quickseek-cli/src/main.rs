use std::fmt::Write as _;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quickseek_common::Config;
use quickseek_search::{SearchOutcome, SearchService, SearchStore, SearchView};

/// Run one search against the QuickSeek backend and print the results.
#[derive(Parser, Debug)]
#[command(name = "quickseek", version)]
struct Args {
    /// Search query. Multiple words are joined with spaces.
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Print the final search state as JSON instead of a listing.
    #[arg(long)]
    json: bool,

    /// Bearer token sent with the search request.
    #[arg(long, env = "QUICKSEEK_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("quickseek=info".parse()?)
                .add_directive("api_client=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.log_summary();

    let mut service = SearchService::from_config(&config)?;
    if let Some(token) = args.token {
        service = service.with_token(token);
    }
    let store = SearchStore::new(service);

    let query = args.query.join(" ");
    store.set_query(query.as_str());
    let outcome = store.run_search(&query).await;
    info!(outcome = ?outcome, "Search finished");

    let state = store.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render(&state.view()));
    }

    Ok(match outcome {
        SearchOutcome::Succeeded(_) => ExitCode::SUCCESS,
        SearchOutcome::Skipped => {
            eprintln!("Nothing to search for.");
            ExitCode::from(2)
        }
        SearchOutcome::Failed(_) | SearchOutcome::Superseded => ExitCode::FAILURE,
    })
}

/// Plain-text rendering of a search view.
fn render(view: &SearchView<'_>) -> String {
    let mut out = String::new();
    match view {
        SearchView::NoQuery => out.push_str("Type something to search.\n"),
        SearchView::Loading => out.push_str("Searching...\n"),
        SearchView::NoResults => out.push_str("No results.\n"),
        SearchView::Failed { message, stale } => {
            let _ = writeln!(out, "Search failed: {message}");
            if !stale.is_empty() {
                let _ = writeln!(out, "Showing {} earlier result(s):", stale.len());
                render_results(&mut out, stale);
            }
        }
        SearchView::Results(results) => render_results(&mut out, results),
    }
    out
}

fn render_results(out: &mut String, results: &[quickseek_common::SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {} [{:.1}]", i + 1, result.title, result.score);
        if let Some(ref link) = result.link {
            let _ = writeln!(out, "    {link}");
        }
        if let Some(ref thumb) = result.thumbnail_link {
            let _ = writeln!(out, "    thumbnail: {thumb}");
        }
        if !result.content.is_empty() {
            let _ = writeln!(out, "    {}", result.content);
        }
        if !result.date.is_empty() {
            let _ = writeln!(out, "    {}", result.date);
        }
    }
}
