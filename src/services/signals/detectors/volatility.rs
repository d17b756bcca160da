//! Close-to-close volatility spike detection.

use super::{pct_change, Detector};
use crate::config::EngineConfig;
use crate::types::{CandleSeries, DetectionResult, IndicatorSnapshot, VolatilitySpike};

/// Fires when the latest close-to-close move exceeds the average absolute
/// move of the preceding `window` candles by `multiplier`.
pub struct VolatilityDetector {
    window: usize,
    multiplier: f64,
}

impl VolatilityDetector {
    pub fn new(window: usize, multiplier: f64) -> Self {
        Self {
            window: window.max(1),
            multiplier,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.volatility_window, config.volatility_threshold_multiplier)
    }
}

impl Detector for VolatilityDetector {
    fn id(&self) -> &str {
        "volatility_spike"
    }

    fn detect(
        &self,
        series: &CandleSeries,
        indicators: &IndicatorSnapshot,
    ) -> Option<DetectionResult> {
        let moves: Vec<f64> = series
            .candles()
            .windows(2)
            .map(|w| pct_change(w[0].close, w[1].close))
            .collect();

        let (current, history) = moves.split_last()?;
        let lookback = &history[history.len().saturating_sub(self.window)..];
        if lookback.is_empty() {
            return None;
        }

        let average = lookback.iter().map(|m| m.abs()).sum::<f64>() / lookback.len() as f64;
        if average == 0.0 {
            return None;
        }

        if current.abs() > average * self.multiplier {
            Some(DetectionResult::VolatilitySpike(VolatilitySpike {
                current_move_pct: *current,
                average_move_pct: average,
                atr: indicators.atr,
            }))
        } else {
            None
        }
    }
}
