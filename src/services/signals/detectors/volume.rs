//! Volume spike detection.

use super::Detector;
use crate::config::EngineConfig;
use crate::types::{CandleSeries, DetectionResult, IndicatorSnapshot, VolumeSpike};

/// Fires when the latest volume reaches `multiplier` times the average of the
/// preceding `window` volumes. Volume at `ultra_multiplier` or more is ultra.
pub struct VolumeDetector {
    window: usize,
    multiplier: f64,
    ultra_multiplier: f64,
}

impl VolumeDetector {
    pub fn new(window: usize, multiplier: f64, ultra_multiplier: f64) -> Self {
        Self {
            window: window.max(1),
            multiplier,
            ultra_multiplier,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.volume_window,
            config.volume_spike_multiplier,
            config.volume_ultra_multiplier,
        )
    }
}

impl Detector for VolumeDetector {
    fn id(&self) -> &str {
        "volume_spike"
    }

    fn detect(
        &self,
        series: &CandleSeries,
        _indicators: &IndicatorSnapshot,
    ) -> Option<DetectionResult> {
        let (current, history) = series.candles().split_last()?;
        let lookback = &history[history.len().saturating_sub(self.window)..];
        if lookback.is_empty() {
            return None;
        }

        let average = lookback.iter().map(|c| c.volume).sum::<f64>() / lookback.len() as f64;
        if average == 0.0 {
            return None;
        }

        if current.volume >= average * self.multiplier {
            Some(DetectionResult::VolumeSpike(VolumeSpike {
                current_volume: current.volume,
                average_volume: average,
                volume_pct: current.volume / average * 100.0,
                ultra: current.volume >= average * self.ultra_multiplier,
            }))
        } else {
            None
        }
    }
}
