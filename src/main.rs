use anyhow::Context;
use omen::types::{CandleSeries, SignalReport};
use omen::{EngineConfig, SessionStats, SignalBook, SignalEngine};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: omen <candles.json>")?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let markets: BTreeMap<String, CandleSeries> =
        serde_json::from_str(&raw).with_context(|| format!("invalid candle file {}", path))?;

    let config = EngineConfig::from_env();
    let engine = Arc::new(SignalEngine::new(config).context("invalid engine configuration")?);
    let stats = SessionStats::new();
    let book = SignalBook::new();

    info!("Evaluating {} symbols from {}", markets.len(), path);

    let handles: Vec<_> = markets
        .into_iter()
        .map(|(symbol, series)| {
            let engine = engine.clone();
            let stats = stats.clone();
            let book = book.clone();
            tokio::spawn(async move {
                let result = engine.evaluate(&symbol, &series, &stats);
                if let Ok(report) = &result {
                    book.record(report.signal.clone());
                }
                (symbol, result)
            })
        })
        .collect();

    let mut reports: Vec<SignalReport> = Vec::new();
    for handle in handles {
        let (symbol, result) = handle.await.context("evaluation task panicked")?;
        match result {
            Ok(report) => reports.push(report),
            Err(e) => error!("Skipping {}: {}", symbol, e),
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);

    let session = stats.snapshot();
    info!(
        "Session: {} signals ({} strong, {} weak), win rate {:.1}%, avg confidence {:.1}",
        session.total_signals,
        session.strong_signals,
        session.weak_signals,
        session.win_rate().unwrap_or(0.0) * 100.0,
        session.average_confidence().unwrap_or(0.0)
    );
    if let Some(best) = book.strongest() {
        info!(
            "Strongest: {} at {} ({})",
            best.symbol(),
            best.score(),
            best.category()
        );
    }

    Ok(())
}
