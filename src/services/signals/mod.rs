//! Signal synthesis service module.
//!
//! Provides the indicator and detector layers, confidence synthesis,
//! classification and the session statistics that feed back into scoring.

pub mod book;
pub mod classifier;
pub mod confidence;
pub mod detectors;
pub mod engine;
pub mod indicators;
pub mod risk_reward;
pub mod session;

pub use book::SignalBook;
pub use classifier::{classify, stars_for_score};
pub use confidence::ConfidenceSynthesizer;
pub use detectors::{all_detectors, Detector};
pub use engine::SignalEngine;
pub use risk_reward::RiskRewardEstimator;
pub use session::{SessionSnapshot, SessionStats};

/// Clamp a score to the 0-100 range.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
