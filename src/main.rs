use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use iiif_sampler::cli::Cli;
use iiif_sampler::source::http_source::HttpSource;
use iiif_sampler::{FetchOutcome, FetchSummary, Pipeline, Sampler};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.fetch_config();
    let source = Arc::new(HttpSource::new(&config)?);
    let sampler = match cli.seed {
        Some(seed) => Sampler::seeded(seed),
        None => Sampler::new(),
    };
    let pipeline = Pipeline::new(source, sampler, &config);

    let cancel = pipeline.fetcher().cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling remaining downloads");
            cancel.cancel();
        }
    });

    let mut outcomes = pipeline
        .start(&cli.manifest, cli.number, &cli.directory)
        .await
        .context("could not read manifest")?;

    let mut summary = FetchSummary::default();
    while let Some(outcome) = outcomes.next().await {
        if let FetchOutcome::Saved { path, .. } = &outcome {
            println!("Saved {}", path.display());
        }
        summary.record(&outcome);
    }

    let stats = pipeline.fetcher().stats().snapshot();
    info!("done: {} at {} B/s", summary, stats.download_bps);
    for (image, reason) in &summary.skipped {
        warn!("not saved: {} ({})", image.filename, reason);
    }
    Ok(())
}
