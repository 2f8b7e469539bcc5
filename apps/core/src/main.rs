// FeedRank Entry Point
// Reads items as JSON lines on stdin, scores the unjudged ones, prints the ranked page.

use anyhow::Context;
use feedrank_core::ranking::{rank, refresh_scores};
use feedrank_core::training::TrainingSet;
use feedrank_core::{Item, Scorer, ScorerConfig};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

const ENV_TRAINING_DATA_DIR: &str = "FEEDRANK_TRAINING_DATA_DIR";
const ENV_LOG_FORMAT: &str = "FEEDRANK_LOG_FORMAT";

/// Logs go to stderr so stdout carries only the ranked page.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn read_items() -> anyhow::Result<Vec<Item>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut items = Vec::new();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let item: Item = serde_json::from_str(&line)
            .with_context(|| format!("Parsing item on line {}", line_no))?;
        if let Err(e) = item.validate() {
            warn!("Skipping invalid item on line {}: {}", line_no, e);
            continue;
        }
        items.push(item);
    }
    Ok(items)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    init_tracing();

    let config = ScorerConfig::from_env().context("Loading configuration")?;
    let mut items = read_items().await?;
    info!(items = items.len(), backend = ?config.backend, "Loaded items");

    if let Ok(dir) = std::env::var(ENV_TRAINING_DATA_DIR) {
        let training = TrainingSet::from_items(&items);
        training
            .write_to_dir(&PathBuf::from(dir))
            .await
            .context("Writing training data")?;
    }

    let scorer = Scorer::start(&config, &items)
        .await
        .context("Starting scorer")?;
    info!(backend = ?scorer.kind(), "Scorer ready");

    let failures = refresh_scores(&scorer, &mut items).await;
    if failures > 0 {
        warn!(failures, "Some items could not be scored");
    }

    if let Err(e) = scorer.stop().await {
        error!("Stopping scorer: {}", e);
    }

    let page = rank(items, config.max_items);
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
