use std::path::PathBuf;
use std::process::ExitCode;

use news_core::{NewsError, NewsItem, NewsPipeline, PipelineConfig, Provenance};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const SNAPSHOT_LEN: usize = 5;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "news daemon failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), NewsError> {
    let config = PipelineConfig::load_or_default(config_path()?)?;
    let pipeline = NewsPipeline::from_config(&config)?;

    let batch = pipeline.cache().fetch_items().await;
    info!(
        count = batch.items.len(),
        badge = badge(batch.provenance),
        "initial news batch"
    );

    for item in pipeline.queue().snapshot(Some(SNAPSHOT_LEN)) {
        log_item("snapshot", &item);
    }

    let subscription = pipeline
        .queue()
        .subscribe(|item: &NewsItem| log_item("live", item));
    info!(
        min_secs = config.queue.min_interval_seconds,
        max_secs = config.queue.max_interval_seconds,
        "listening for live news, press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C");
    }

    subscription.unsubscribe();
    let dropped = pipeline.queue().archive();
    info!(dropped, "shutting down");
    pipeline.shutdown().await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn config_path() -> Result<PathBuf, NewsError> {
    match std::env::var_os("NEWS_FEED_CONFIG") {
        Some(path) => Ok(PathBuf::from(path)),
        None => PipelineConfig::config_file_path(),
    }
}

fn badge(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Fresh => "Live",
        Provenance::Cached => "Cached",
        Provenance::Fallback => "Demo",
    }
}

fn log_item(channel: &str, item: &NewsItem) {
    info!(
        channel,
        id = %item.id,
        impact = %item.impact,
        published_at = %item.published_at.to_rfc3339(),
        "{}",
        item.title
    );
}
