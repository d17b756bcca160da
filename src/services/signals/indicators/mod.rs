//! Technical indicator implementations.

pub mod atr;
pub mod ema;
pub mod rsi;
pub mod slope;

pub use atr::Atr;
pub use ema::Ema;
pub use rsi::Rsi;
pub use slope::Slope;

use crate::config::EngineConfig;
use crate::error::IndicatorError;
use crate::types::{CandleSeries, IndicatorSnapshot};

/// Compute every indicator the detectors consume.
///
/// Fails with `InsufficientData` before any computation when the series is
/// shorter than `config.min_candles()`.
pub fn snapshot(
    series: &CandleSeries,
    config: &EngineConfig,
) -> Result<IndicatorSnapshot, IndicatorError> {
    let required = config.min_candles();
    let insufficient = IndicatorError::InsufficientData {
        required,
        available: series.len(),
    };
    if series.len() < required {
        return Err(insufficient);
    }

    let closes = series.closes();
    let last_close = *closes.last().ok_or(insufficient)?;

    let rsi = Rsi::new(config.rsi_period)
        .calculate(&closes)
        .ok_or(insufficient)?;
    let ema_fast = Ema::new(config.ema_fast)
        .calculate(&closes)
        .ok_or(insufficient)?;
    let ema_slow = Ema::new(config.ema_slow)
        .calculate(&closes)
        .ok_or(insufficient)?;
    let atr = Atr::new(config.atr_period)
        .calculate(series.candles())
        .ok_or(insufficient)?;
    let atr_percent = Atr::percent_of(atr, last_close)?;
    let slope = Slope::new(config.slope_window)
        .calculate(&closes)
        .ok_or(insufficient)?;

    Ok(IndicatorSnapshot {
        rsi,
        ema_fast,
        ema_slow,
        atr,
        atr_percent,
        slope,
        last_close,
    })
}
