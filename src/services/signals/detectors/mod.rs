//! Detector layer.
//!
//! Every detector is a pure function of the candle series and the indicator
//! snapshot. `None` means "no detection this cycle" and is never an error.

pub mod movement;
pub mod pattern;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use movement::MoveDetector;
pub use pattern::PatternDetector;
pub use trend::TrendDetector;
pub use volatility::VolatilityDetector;
pub use volume::VolumeDetector;

use crate::config::EngineConfig;
use crate::types::{CandleSeries, DetectionResult, IndicatorSnapshot};

/// Trait for implementing detectors.
pub trait Detector: Send + Sync {
    /// Unique identifier for this detector.
    fn id(&self) -> &str;

    /// Inspect the latest state of the series.
    fn detect(
        &self,
        series: &CandleSeries,
        indicators: &IndicatorSnapshot,
    ) -> Option<DetectionResult>;
}

/// Get all detectors, configured from `config`.
pub fn all_detectors(config: &EngineConfig) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(TrendDetector),
        Box::new(VolatilityDetector::from_config(config)),
        Box::new(VolumeDetector::from_config(config)),
        Box::new(MoveDetector::from_config(config)),
        Box::new(PatternDetector::from_config(config)),
    ]
}

/// Percentage change between two prices.
pub(crate) fn pct_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}
