//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Score and stars stay in range for any valid series
//! 2. Stars and category are re-derivable from the score
//! 3. RSI is bounded
//! 4. Risk/reward orientation and ratio
//! 5. Classifier bands cover every score exactly once

use omen::services::signals::confidence::win_rate_adjustment;
use omen::services::signals::indicators::Rsi;
use omen::services::signals::stars_for_score;
use omen::services::{RiskRewardEstimator, SessionSnapshot};
use omen::types::{Candle, CandleSeries, Category, CompositeSignal, Side, StatsDelta};
use omen::{EngineConfig, SessionStats, SignalEngine};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// One bar: close-to-close step (%), upper wick (%), lower wick (%), volume.
fn arb_bar() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-6.0..6.0_f64, 0.0..2.0_f64, 0.0..2.0_f64, 0.0..10_000.0_f64)
}

fn build_series(start: f64, bars: &[(f64, f64, f64, f64)]) -> CandleSeries {
    let mut candles = Vec::with_capacity(bars.len());
    let mut prev_close = start;
    for (i, &(step, upper, lower, volume)) in bars.iter().enumerate() {
        let open = prev_close;
        let close = (open * (1.0 + step / 100.0)).max(0.01);
        let high = open.max(close) * (1.0 + upper / 100.0);
        let low = open.min(close) * (1.0 - lower / 100.0);
        candles.push(Candle::new(i as i64 * 60_000, open, high, low, close, volume));
        prev_close = close;
    }
    CandleSeries::new(candles).unwrap()
}

fn arb_series() -> impl Strategy<Value = CandleSeries> {
    (1.0..1000.0_f64, prop::collection::vec(arb_bar(), 21..80))
        .prop_map(|(start, bars)| build_series(start, &bars))
}

fn arb_session() -> impl Strategy<Value = (u64, u64)> {
    (0..200u64).prop_flat_map(|total| (Just(total), 0..=total))
}

// ── 1-2. Score bounds and derivation ─────────────────────────────────

proptest! {
    #[test]
    fn score_and_stars_in_range(series in arb_series(), (total, strong) in arb_session()) {
        let engine = SignalEngine::new(EngineConfig::default()).unwrap();
        let stats = SessionStats::new();
        for i in 0..total {
            stats.apply(StatsDelta { strong: i < strong, confidence: 50.0 });
        }

        let report = engine.evaluate("PROP", &series, &stats).unwrap();
        let signal = &report.signal;

        prop_assert!(u32::from(signal.score()) <= 100);
        prop_assert!((1..=5).contains(&signal.stars()));
        prop_assert!((0.0..=100.0).contains(&signal.confidence()));

        let b = signal.breakdown();
        for value in [b.base, b.scaled, b.win_rate_tuned, b.context_boosted, b.reinforced] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn stars_and_category_derive_from_score(series in arb_series()) {
        let engine = SignalEngine::new(EngineConfig::default()).unwrap();
        let stats = SessionStats::new();
        let signal = engine.evaluate("PROP", &series, &stats).unwrap().signal;

        prop_assert_eq!(signal.stars(), stars_for_score(signal.score()));
        prop_assert_eq!(signal.category(), Category::from_score(signal.score()));
        prop_assert_eq!(report_strong(&signal), stats.snapshot().strong_signals == 1);
    }

    /// Same snapshot in, same adjustment out.
    #[test]
    fn win_rate_tuning_is_idempotent((total, strong) in arb_session()) {
        let snap = SessionSnapshot::with_counts(total, strong);
        let first = win_rate_adjustment(&snap);
        prop_assert_eq!(win_rate_adjustment(&snap), first);
        prop_assert!(first == 0.0 || first == 5.0 || first == -7.0);
    }
}

fn report_strong(signal: &CompositeSignal) -> bool {
    signal.stars() >= 4 && signal.confidence() >= 70.0
}

// ── 3. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(
        closes in prop::collection::vec(1.0..500.0_f64, 2..120),
        period in 2..30usize,
    ) {
        let rsi = Rsi::new(period).calculate(&closes).unwrap();
        prop_assert!((0.0..=100.0).contains(&rsi));
    }

    #[test]
    fn rsi_extremes(
        start in 10.0..500.0_f64,
        steps in prop::collection::vec(0.01..5.0_f64, 1..60),
    ) {
        let mut up = vec![start];
        let mut down = vec![start + steps.iter().sum::<f64>()];
        for step in &steps {
            up.push(up.last().unwrap() + step);
            down.push(down.last().unwrap() - step);
        }
        prop_assert_eq!(Rsi::default().calculate(&up), Some(100.0));
        prop_assert!(Rsi::default().calculate(&down).unwrap() < 1e-9);
    }
}

// ── 4. Risk/reward orientation ───────────────────────────────────────

proptest! {
    #[test]
    fn risk_reward_orientation(series in arb_series(), window in 1..40usize) {
        let estimator = RiskRewardEstimator::new(window);

        if let Some(long) = estimator.estimate(&series, Side::Long) {
            prop_assert!(long.stop_loss < long.entry_price);
            prop_assert!(long.entry_price < long.target);
            prop_assert!((long.ratio - long.reward / long.risk).abs() < 1e-6);
        }
        if let Some(short) = estimator.estimate(&series, Side::Short) {
            prop_assert!(short.target < short.entry_price);
            prop_assert!(short.entry_price < short.stop_loss);
            prop_assert!((short.ratio - short.reward / short.risk).abs() < 1e-6);
        }
    }
}

// ── 5. Classifier coverage ───────────────────────────────────────────

#[test]
fn classifier_bands_exhaustive_and_disjoint() {
    let ladder = [
        Category::GodTier,
        Category::Ultra,
        Category::Top,
        Category::High,
        Category::Moderate,
        Category::Caution,
        Category::HighRisk,
        Category::Unfavorable,
        Category::Reject,
    ];
    for score in 0..=100u8 {
        // Bands are [min_score, next band's min_score)
        let matching: Vec<Category> = ladder
            .iter()
            .enumerate()
            .filter(|(i, c)| {
                let upper = if *i == 0 { 101 } else { ladder[i - 1].min_score() as u16 };
                (score as u16) >= c.min_score() as u16 && (score as u16) < upper
            })
            .map(|(_, c)| *c)
            .collect();
        assert_eq!(matching.len(), 1, "score {}", score);
        assert_eq!(matching[0], Category::from_score(score));
    }
}
