//! End-to-end tests for the signal engine
//!
//! Covers:
//! - Trend/pattern scenarios on constructed series
//! - Session win-rate feedback
//! - Risk/reward and advisory output
//! - Concurrent evaluations sharing one session

use omen::error::{EngineError, IndicatorError};
use omen::services::signals::stars_for_score;
use omen::types::*;
use omen::{EngineConfig, SessionStats, SignalBook, SignalEngine};
use std::sync::Arc;

mod common {
    use omen::types::{Candle, CandleSeries};

    /// Candles opening at the previous close, with a 0.2 wick either side.
    pub fn from_closes(closes: &[f64], volume: f64) -> CandleSeries {
        let candles = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Candle::new(
                    1_700_000_000_000 + i as i64 * 60_000,
                    open,
                    open.max(close) + 0.2,
                    open.min(close) - 0.2,
                    close,
                    volume,
                )
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }

    /// 30 closes climbing +1.0 / -0.75 from 100.
    pub fn rising_closes() -> Vec<f64> {
        let mut closes = vec![100.0];
        for i in 1..30 {
            let last = closes[i - 1];
            closes.push(if i % 2 == 1 { last + 1.0 } else { last - 0.75 });
        }
        closes
    }

    /// Mirror image of `rising_closes` around 100.
    pub fn falling_closes() -> Vec<f64> {
        rising_closes().iter().map(|c| 200.0 - c).collect()
    }

    pub fn flat(count: usize) -> CandleSeries {
        from_closes(&vec![100.0; count], 1000.0)
    }
}

fn engine() -> SignalEngine {
    SignalEngine::new(EngineConfig::default()).unwrap()
}

#[test]
fn test_rising_series_confirms_bullish_trend() {
    let stats = SessionStats::new();
    let series = common::from_closes(&common::rising_closes(), 1000.0);
    let report = engine().evaluate("BTC", &series, &stats).unwrap();
    let signal = &report.signal;

    let trend = signal
        .detections()
        .iter()
        .find_map(|d| d.as_trend())
        .expect("trend should be confirmed");
    assert_eq!(trend.direction, Bias::Bullish);
    assert!(trend.rsi > 50.0 && trend.rsi < 68.0, "rsi {}", trend.rsi);
    assert!(signal.indicators().ema_fast > signal.indicators().ema_slow);
    assert!((signal.indicators().slope - 0.125).abs() < 1e-9);

    // Last candle opens at the prior close and swallows the prior red body
    let pattern = signal
        .detections()
        .iter()
        .find_map(|d| d.as_pattern())
        .expect("pattern should be recognised");
    assert_eq!(pattern.name, CandlePattern::BullishEngulfing);
    assert_eq!(pattern.stars, 5);

    assert!(signal.detections().iter().all(|d| d.as_volatility().is_none()));
    assert!(signal.detections().iter().all(|d| d.as_volume().is_none()));
    assert!(signal.detections().iter().all(|d| d.as_move().is_none()));
}

#[test]
fn test_rising_series_score_arithmetic() {
    let stats = SessionStats::new();
    let series = common::from_closes(&common::rising_closes(), 1000.0);
    let report = engine().evaluate("BTC", &series, &stats).unwrap();
    let breakdown = report.signal.breakdown();

    // 35 (5 stars) - 5 (no volatility spike) + 15 (trend)
    assert_eq!(breakdown.base, 45.0);
    assert_eq!(breakdown.scaled, 45.0);
    // Empty session: no win-rate adjustment
    assert_eq!(breakdown.win_rate_tuned, 45.0);
    // +3 bullish trend with bullish 5 star pattern, +5 five stars
    assert_eq!(breakdown.context_boosted, 53.0);
    assert_eq!(breakdown.reinforced, 53.0);

    assert_eq!(report.signal.score(), 53);
    assert_eq!(report.signal.stars(), 2);
    assert_eq!(report.signal.category(), Category::Caution);
    assert_eq!(report.signal.confidence(), 53.0);
}

#[test]
fn test_falling_series_mirrors_rising() {
    let stats = SessionStats::new();
    let series = common::from_closes(&common::falling_closes(), 1000.0);
    let report = engine().evaluate("ETH", &series, &stats).unwrap();
    let signal = &report.signal;

    let trend = signal.detections().iter().find_map(|d| d.as_trend()).unwrap();
    assert_eq!(trend.direction, Bias::Bearish);
    assert!(trend.rsi > 32.0 && trend.rsi < 50.0, "rsi {}", trend.rsi);

    let pattern = signal.detections().iter().find_map(|d| d.as_pattern()).unwrap();
    assert_eq!(pattern.name, CandlePattern::BearishEngulfing);

    // 96.5 -> 95.5 is just over a 1% drop
    let alert = signal.detections().iter().find_map(|d| d.as_move()).unwrap();
    assert_eq!(alert.kind, MoveKind::Early);
    assert_eq!(alert.direction, Bias::Bearish);

    // 45 base, no bullish pairing, +5 five stars
    assert_eq!(signal.score(), 50);
    assert_eq!(signal.category(), Category::Caution);

    let rr = signal.risk_reward().unwrap();
    assert_eq!(rr.side, Side::Short);
    assert!(rr.target < rr.entry_price && rr.entry_price < rr.stop_loss);
}

#[test]
fn test_ultra_volume_adds_context_boost() {
    let stats = SessionStats::new();
    let closes = common::rising_closes();
    let mut candles: Vec<Candle> = common::from_closes(&closes, 1000.0).into();
    if let Some(last) = candles.last_mut() {
        last.volume = 4000.0;
    }
    let series = CandleSeries::new(candles).unwrap();

    let report = engine().evaluate("BTC", &series, &stats).unwrap();
    let volume = report
        .signal
        .detections()
        .iter()
        .find_map(|d| d.as_volume())
        .unwrap();
    assert!(volume.ultra);
    assert_eq!(volume.volume_pct, 400.0);
    assert_eq!(report.signal.score(), 57);
}

#[test]
fn test_win_rate_feeds_back_into_score() {
    let series = common::from_closes(&common::rising_closes(), 1000.0);

    let winning = SessionStats::new();
    for i in 0..10 {
        winning.apply(StatsDelta {
            strong: i < 8,
            confidence: 75.0,
        });
    }
    let report = engine().evaluate("BTC", &series, &winning).unwrap();
    assert_eq!(report.signal.breakdown().win_rate_tuned, 50.0);
    assert_eq!(report.signal.score(), 58);

    let losing = SessionStats::new();
    for i in 0..10 {
        losing.apply(StatsDelta {
            strong: i < 2,
            confidence: 40.0,
        });
    }
    let report = engine().evaluate("BTC", &series, &losing).unwrap();
    assert_eq!(report.signal.breakdown().win_rate_tuned, 38.0);
    assert_eq!(report.signal.score(), 46);
    assert_eq!(report.signal.category(), Category::HighRisk);
}

#[test]
fn test_static_scale_applies_before_feedback() {
    let config = EngineConfig {
        static_confidence_scale: Some(2.0),
        ..EngineConfig::default()
    };
    let engine = SignalEngine::new(config).unwrap();
    let stats = SessionStats::new();
    let series = common::from_closes(&common::rising_closes(), 1000.0);

    let report = engine.evaluate("BTC", &series, &stats).unwrap();
    let breakdown = report.signal.breakdown();
    assert_eq!(breakdown.base, 45.0);
    assert_eq!(breakdown.scaled, 90.0);
    // 90 + 8 context = 98, then +5 reinforcement clamps at 100
    assert_eq!(breakdown.context_boosted, 98.0);
    assert_eq!(breakdown.reinforced, 100.0);
    assert_eq!(report.signal.category(), Category::GodTier);
    assert_eq!(report.signal.stars(), 5);
    assert!(report.delta.strong);
}

#[test]
fn test_long_risk_reward_and_advisory() {
    let stats = SessionStats::new();
    let series = common::from_closes(&common::rising_closes(), 1000.0);
    let report = engine().evaluate("BTC", &series, &stats).unwrap();

    let rr = report.signal.risk_reward().unwrap();
    assert_eq!(rr.side, Side::Long);
    assert_eq!(rr.entry_price, 104.5);
    assert!((rr.target - 104.5 * 1.015).abs() < 1e-9);
    assert!(rr.stop_loss < rr.entry_price && rr.entry_price < rr.target);
    assert!((rr.ratio - rr.reward / rr.risk).abs() < 1e-6);

    // ATR 1.275 on a 104.5 close
    assert_eq!(report.advisory.level, RiskLevel::Moderate);
    assert!((report.advisory.atr_percent - 1.275 / 104.5 * 100.0).abs() < 1e-9);
    assert_eq!(report.advisory.reward_risk, Some(rr.ratio));
    assert_eq!(report.advisory.favorable, rr.ratio >= 1.0);
}

#[test]
fn test_quiet_market_has_no_risk_reward() {
    let stats = SessionStats::new();
    let report = engine().evaluate("BTC", &common::flat(40), &stats).unwrap();

    assert!(report.signal.risk_reward().is_none());
    assert_eq!(report.advisory.reward_risk, None);
    assert!(!report.advisory.favorable);
    assert_eq!(report.signal.category(), Category::Reject);
    assert_eq!(report.signal.stars(), 1);
}

#[test]
fn test_stats_increment_per_evaluation() {
    let stats = SessionStats::new();
    let engine = engine();
    let series = common::from_closes(&common::rising_closes(), 1000.0);

    for _ in 0..3 {
        engine.evaluate("BTC", &series, &stats).unwrap();
    }

    let snap = stats.snapshot();
    assert_eq!(snap.total_signals, 3);
    assert_eq!(snap.strong_signals, 0);
    assert_eq!(snap.weak_signals, 3);
    assert!((snap.total_confidence - 3.0 * 53.0).abs() < 1e-9);
}

#[test]
fn test_data_unavailable_propagates() {
    let stats = SessionStats::new();
    let err = engine()
        .evaluate("BTC", &common::flat(10), &stats)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::DataUnavailable(IndicatorError::InsufficientData {
            required: 21,
            available: 10,
        })
    );
    assert_eq!(stats.snapshot().total_signals, 0);
}

#[test]
fn test_batch_preserves_order_and_isolates_failures() {
    let stats = SessionStats::new();
    let inputs = vec![
        (
            "BTC".to_string(),
            common::from_closes(&common::rising_closes(), 1000.0),
        ),
        ("SHORT".to_string(), common::flat(3)),
        (
            "ETH".to_string(),
            common::from_closes(&common::falling_closes(), 1000.0),
        ),
    ];

    let results = engine().evaluate_batch(&inputs, &stats);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().signal.symbol(), "BTC");
    assert!(matches!(results[1], Err(EngineError::DataUnavailable(_))));
    assert_eq!(results[2].as_ref().unwrap().signal.symbol(), "ETH");
    assert_eq!(stats.snapshot().total_signals, 2);
}

#[test]
fn test_stars_follow_score() {
    let stats = SessionStats::new();
    let engine = engine();
    for series in [
        common::from_closes(&common::rising_closes(), 1000.0),
        common::from_closes(&common::falling_closes(), 1000.0),
        common::flat(25),
    ] {
        let signal = engine.evaluate("X", &series, &stats).unwrap().signal;
        assert_eq!(signal.stars(), stars_for_score(signal.score()));
        assert_eq!(signal.category(), Category::from_score(signal.score()));
    }
}

#[test]
fn test_report_serializes_camel_case() {
    let stats = SessionStats::new();
    let series = common::from_closes(&common::rising_closes(), 1000.0);
    let report = engine().evaluate("BTC", &series, &stats).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["signal"]["symbol"], "BTC");
    assert_eq!(json["signal"]["score"], 53);
    assert_eq!(json["signal"]["category"], "caution");
    assert_eq!(json["signal"]["riskReward"]["side"], "long");
    assert_eq!(json["signal"]["detections"][0]["detector"], "trend");
    assert_eq!(json["advisory"]["level"], "moderate");
    assert_eq!(json["delta"]["strong"], false);
}

#[test]
fn test_report_with_move_alert_round_trips() {
    let stats = SessionStats::new();
    let series = common::from_closes(&common::falling_closes(), 1000.0);
    let report = engine().evaluate("ETH", &series, &stats).unwrap();

    let text = serde_json::to_string(&report).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let detectors: Vec<&str> = json["signal"]["detections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["detector"].as_str().unwrap())
        .collect();
    assert_eq!(detectors, vec!["trend", "move", "pattern"]);

    let alert = json["signal"]["detections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["detector"] == "move")
        .unwrap();
    assert_eq!(alert["kind"], "early");
    assert_eq!(alert["direction"], "bearish");

    let detections: Vec<DetectionResult> =
        serde_json::from_value(json["signal"]["detections"].clone()).unwrap();
    assert_eq!(detections, report.signal.detections());
}

#[tokio::test]
async fn test_concurrent_evaluations_share_session() {
    let engine = Arc::new(engine());
    let stats = SessionStats::new();
    let book = SignalBook::new();
    let rising = common::from_closes(&common::rising_closes(), 1000.0);

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = engine.clone();
            let stats = stats.clone();
            let book = book.clone();
            let series = rising.clone();
            tokio::spawn(async move {
                let symbol = format!("SYM{}", i);
                let report = engine.evaluate(&symbol, &series, &stats).unwrap();
                book.record(report.signal);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(stats.snapshot().total_signals, 16);
    assert_eq!(book.len(), 16);
    assert_eq!(book.strongest().unwrap().score(), 53);
}

#[test]
fn test_session_reset_between_runs() {
    let engine = engine();
    let stats = SessionStats::new();
    let series = common::from_closes(&common::rising_closes(), 1000.0);

    engine.evaluate("BTC", &series, &stats).unwrap();
    assert_eq!(stats.snapshot().total_signals, 1);

    stats.reset();
    assert_eq!(stats.snapshot().total_signals, 0);
    assert_eq!(stats.snapshot().win_rate(), None);
}
