//! Omen - signal synthesis and confidence scoring over OHLCV candles

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use services::{SessionStats, SignalBook, SignalEngine};
