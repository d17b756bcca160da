pub mod signals;

pub use signals::{
    ConfidenceSynthesizer, RiskRewardEstimator, SessionSnapshot, SessionStats, SignalBook,
    SignalEngine,
};
