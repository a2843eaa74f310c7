use anyhow::{Context, Result};
use log::{error, info, warn};
use std::env;
use tokio::sync::{mpsc, watch};

use wpt_client::{
    select_medians, Client, ClientConfig, StatusUpdate, Step, TestConfiguration, TestResult,
    DEFAULT_METRIC,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();
    dotenv::dotenv().ok();

    info!("🚀 WebPageTest client starting...");

    let config = ClientConfig::from_env()?;
    info!("📡 Using WebPageTest instance at {}", config.host);

    let settings = load_settings()?;
    let metric = env::var("WPT_MEDIAN_METRIC").unwrap_or_else(|_| DEFAULT_METRIC.to_string());
    let client = Client::new(config)?;

    // Progress events are drained by a separate task so the poll loop never
    // waits on logging.
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<StatusUpdate>();
    let progress_logger = tokio::spawn(async move {
        while let Some(update) = progress_rx.recv().await {
            info!(
                "⏳ {}: {} ({}s elapsed)",
                update.test_id, update.status_text, update.elapsed
            );
        }
    });

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 Interrupt received, abandoning wait");
            let _ = stop_tx.send(true);
        }
    });

    info!("🧪 Starting test of {}", settings.url);
    let outcome = client
        .run_test_and_wait(&settings, Some(&progress_tx), Some(stop_rx))
        .await;
    drop(progress_tx);
    let _ = progress_logger.await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("❌ Test failed: {}", e);
            return Err(e.into());
        }
    };

    report(&result, &metric);
    Ok(())
}

/// Test configuration from a JSON file (first argument or `WPT_TEST_FILE`),
/// or a URL-only test from `WPT_TEST_URL`.
fn load_settings() -> Result<TestConfiguration> {
    let path = env::args().nth(1).or_else(|| env::var("WPT_TEST_FILE").ok());
    if let Some(path) = path {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read test file {}", path))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse test file {}", path));
    }

    let url = env::var("WPT_TEST_URL")
        .context("provide a test file argument, WPT_TEST_FILE or WPT_TEST_URL")?;
    Ok(TestConfiguration::new(url))
}

fn report(result: &TestResult, metric: &str) {
    info!(
        "✅ Test {} of {} completed: {} runs from {}",
        result.id,
        result.url,
        result.runs.len(),
        result.location
    );
    info!("🌐 Connectivity: {}", result.connectivity);
    if let Some(completed) = result.completed_at() {
        info!("🕒 Completed at {}", completed.to_rfc3339());
    }

    match select_medians(result, 1, metric) {
        Ok(medians) => {
            info!("📊 First view median ({}): run {}", metric, medians.first_view.run_number);
            if let Some(step) = medians.first_view.run.first_view.first_step() {
                log_step(step);
            }
            if let Some(repeat) = medians.repeat_view {
                info!("📊 Repeat view median ({}): run {}", metric, repeat.run_number);
                if let Some(step) = repeat.run.repeat_view.as_ref().and_then(|v| v.first_step()) {
                    log_step(step);
                }
            }
        }
        Err(e) => warn!("⚠️ Could not select a median run: {}", e),
    }
}

fn log_step(step: &Step) {
    for name in ["TTFB", "render", "SpeedIndex", "loadTime", "fullyLoaded", "bytesIn", "domElements"] {
        match step.metric(name) {
            Some(value) if value.is_not_applicable() => info!("   {:<12} n/a", name),
            Some(value) => info!("   {:<12} {}", name, value),
            None => {}
        }
    }
}
