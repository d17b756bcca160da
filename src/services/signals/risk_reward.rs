//! Stop/target sanity bounds from recent price extremes.

use crate::types::{CandleSeries, RiskRewardEstimate, Side};

/// Stop sits this fraction beyond the recent extreme.
const STOP_BUFFER: f64 = 0.005;
/// Target sits this fraction away from entry.
const TARGET_OFFSET: f64 = 0.015;

/// Deterministic risk/reward estimator over the last `window` candles.
pub struct RiskRewardEstimator {
    window: usize,
}

impl Default for RiskRewardEstimator {
    fn default() -> Self {
        Self { window: 20 }
    }
}

impl RiskRewardEstimator {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// Estimate stop, target and ratio for entering at the last close.
    ///
    /// Returns `None` when the series is empty or the risk is zero.
    pub fn estimate(&self, series: &CandleSeries, side: Side) -> Option<RiskRewardEstimate> {
        let window = series.tail(self.window);
        let entry_price = window.last()?.close;

        let recent_high = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let recent_low = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);

        let (stop_loss, target) = match side {
            Side::Long => (
                recent_low * (1.0 - STOP_BUFFER),
                entry_price * (1.0 + TARGET_OFFSET),
            ),
            Side::Short => (
                recent_high * (1.0 + STOP_BUFFER),
                entry_price * (1.0 - TARGET_OFFSET),
            ),
        };

        let stop_on_wrong_side = match side {
            Side::Long => stop_loss >= entry_price,
            Side::Short => stop_loss <= entry_price,
        };
        if stop_on_wrong_side {
            return None;
        }

        let risk = (entry_price - stop_loss).abs();
        let reward = (target - entry_price).abs();
        if risk == 0.0 {
            return None;
        }

        Some(RiskRewardEstimate {
            side,
            entry_price,
            stop_loss,
            target,
            risk,
            reward,
            ratio: reward / risk,
        })
    }
}
