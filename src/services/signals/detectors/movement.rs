//! Intrabar move alerts.

use super::{pct_change, Detector};
use crate::config::{EngineConfig, MoveThresholds};
use crate::types::{Bias, CandleSeries, DetectionResult, IndicatorSnapshot, MoveAlert, MoveKind};

/// Flags large open-to-close moves on the latest candle.
pub struct MoveDetector {
    thresholds: MoveThresholds,
}

impl MoveDetector {
    pub fn new(thresholds: MoveThresholds) -> Self {
        Self { thresholds }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.move_thresholds)
    }

    /// Tier for a move, if it clears the early threshold.
    pub fn classify(&self, move_pct: f64) -> Option<MoveKind> {
        let magnitude = move_pct.abs();
        if magnitude >= self.thresholds.full {
            Some(MoveKind::Full)
        } else if magnitude >= self.thresholds.early {
            Some(MoveKind::Early)
        } else {
            None
        }
    }
}

impl Detector for MoveDetector {
    fn id(&self) -> &str {
        "move"
    }

    fn detect(
        &self,
        series: &CandleSeries,
        _indicators: &IndicatorSnapshot,
    ) -> Option<DetectionResult> {
        let last = series.last()?;
        let move_pct = pct_change(last.open, last.close);
        let kind = self.classify(move_pct)?;
        let direction = Bias::from_sign(move_pct)?;

        Some(DetectionResult::Move(MoveAlert {
            kind,
            move_pct,
            direction,
        }))
    }
}
