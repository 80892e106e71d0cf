//! Run one batch against a live status server.
//!
//! Connects to `AIRFIELD_FEED_ADDR` (default `localhost:8000`), generates a
//! 10/10/10 unit mix and prints the batch report as JSON.

use std::time::Duration;

use airfield_scheduler::builders::AirfieldBuilder;
use airfield_scheduler::config::AirfieldConfig;
use airfield_scheduler::core::AppResult;
use airfield_scheduler::infra::{connect_tcp, Arrivals, UnitGenerator};
use airfield_scheduler::util::init_tracing;
use anyhow::Context;

const DEFAULT_FEED_ADDR: &str = "localhost:8000";

fn main() -> AppResult<()> {
    init_tracing();

    let config = AirfieldConfig::from_env().map_err(anyhow::Error::msg)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get().max(2))
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(run(config))
}

async fn run(config: AirfieldConfig) -> AppResult<()> {
    let addr = std::env::var("AIRFIELD_FEED_ADDR").unwrap_or_else(|_| DEFAULT_FEED_ADDR.into());
    let airfield = AirfieldBuilder::new(config).build()?;

    let feed = connect_tcp(&addr).await?;
    let feed_done = airfield.start_feed(feed);

    // Give the server a moment to push the opening status.
    tokio::time::sleep(Duration::from_secs(2)).await;
    tracing::info!(status = airfield.status().get(), "starting batch");

    let mut generator = UnitGenerator::new();
    let units = generator.mix(10, 10, 10);
    let gaps = generator.gaps(Arrivals::between_ms(3_000, 5_000), units.len());
    let report = airfield.run_batch(units, &gaps).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Err(err) = report.ensure_complete() {
        tracing::warn!(error = %err, unprocessed = report.unprocessed, "batch incomplete");
    }
    if !airfield.drain(Duration::from_secs(5)).await {
        tracing::warn!(active = airfield.active_attempts(), "attempts still running at exit");
    }
    drop(feed_done);
    Ok(())
}
