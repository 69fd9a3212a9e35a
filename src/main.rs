use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use postfeed::api::{normalize_subreddit, FeedClient, ScrapeRequest, SearchParams};
use postfeed::config::Config;
use postfeed::feed::{FeedSettings, Intersection, LoadOutcome, PostFeedController, TriggerTarget, ViewMode};

/// Get the config directory path (~/.config/postfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("postfeed"))
}

#[derive(Parser, Debug)]
#[command(name = "postfeed", about = "Fetch a paginated post feed and render it as HTML")]
struct Args {
    /// Search terms
    #[arg(short, long, default_value = "")]
    query: String,

    /// Restrict to one subreddit (with or without the r/ prefix)
    #[arg(short, long, default_value = "")]
    subreddit: String,

    /// Maximum number of pages to load by simulated scrolling
    #[arg(short, long, default_value_t = 1)]
    pages: u32,

    /// Layout to render (grid or list); overrides the viewport default
    #[arg(long, value_name = "MODE")]
    view: Option<ViewMode>,

    /// Viewport width in pixels, used to pick the default layout
    #[arg(long, value_name = "PX")]
    width: Option<u32>,

    /// Ask the backend to scrape the subreddit before searching
    #[arg(long)]
    scrape: bool,

    /// Listing pages to scrape with --scrape
    #[arg(long, default_value_t = 5)]
    scrape_pages: u32,

    /// Write HTML here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.config/postfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let mode = match (args.view, args.width) {
        (Some(mode), _) => mode,
        (None, Some(width)) => {
            ViewMode::for_viewport_width(width, config.narrow_viewport_width, config.default_view)
        }
        (None, None) => config.default_view,
    };

    let base_url = config.effective_base_url();
    let client = FeedClient::new(&base_url, config.request_timeout())
        .with_context(|| format!("Invalid backend URL: {}", base_url))?;
    client.check_connectivity().await;

    let mut controller = PostFeedController::new(client, FeedSettings::from(&config), mode);
    let params = SearchParams::new(args.query.trim(), args.subreddit.trim());

    if args.scrape {
        if params.subreddit.is_empty() {
            anyhow::bail!("--scrape requires --subreddit");
        }
        let request = ScrapeRequest {
            subreddit: normalize_subreddit(&params.subreddit).to_string(),
            max_pages: args.scrape_pages,
        };
        controller
            .scrape_and_refresh(&request, params)
            .await
            .context("Scrape request failed")?;
    } else {
        controller.search(params);
    }
    controller.settle().await;

    // Simulate the reader scrolling the sentinel into view until enough
    // pages are on screen or the feed runs out.
    let mut pages_loaded = 1;
    while pages_loaded < args.pages && controller.state().has_more() {
        let target = controller
            .trigger()
            .target()
            .cloned()
            .unwrap_or(TriggerTarget::Sentinel);
        if !controller.report_visibility(&[Intersection::new(target, 1.0)]) {
            tracing::warn!(pages_loaded, "Scroll trigger did not fire, stopping");
            break;
        }

        while let Some(event) = controller.next_event().await {
            if let Some(outcome) = controller.handle_event(event) {
                if let LoadOutcome::Failed { message } = &outcome {
                    eprintln!("{}", message);
                }
                break;
            }
        }
        pages_loaded += 1;
    }

    if let Some(message) = controller.view().error_message() {
        tracing::warn!(error = %message, "Feed finished with an error");
    }
    tracing::info!(
        posts = controller.cache().len(),
        has_more = controller.state().has_more(),
        "Feed rendered"
    );

    let html = controller.render_html();
    match &args.output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} posts to {}", controller.cache().len(), path.display());
        }
        None => println!("{}", html),
    }
    Ok(())
}
