//! Average True Range (ATR) indicator.

use crate::error::IndicatorError;
use crate::types::Candle;

/// ATR (Average True Range) indicator.
///
/// Measures market volatility by averaging true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// Uses a plain rolling mean over the last `period` true ranges with a
/// minimum of one period, so short series still produce a value.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    /// Calculate True Range. The first candle has no previous close.
    pub fn true_range(current: &Candle, previous: Option<&Candle>) -> f64 {
        let hl = current.high - current.low;
        match previous {
            Some(prev) => {
                let hc = (current.high - prev.close).abs();
                let lc = (current.low - prev.close).abs();
                hl.max(hc).max(lc)
            }
            None => hl,
        }
    }

    /// True range for every candle in the slice.
    pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
        candles
            .iter()
            .enumerate()
            .map(|(i, c)| Self::true_range(c, i.checked_sub(1).map(|p| &candles[p])))
            .collect()
    }

    /// Latest ATR value.
    pub fn calculate(&self, candles: &[Candle]) -> Option<f64> {
        let ranges = Self::true_ranges(candles);
        let window = &ranges[ranges.len().saturating_sub(self.period)..];
        if window.is_empty() {
            return None;
        }
        Some(window.iter().sum::<f64>() / window.len() as f64)
    }

    /// ATR as a percentage of the last close.
    pub fn percent_of(atr: f64, last_close: f64) -> Result<f64, IndicatorError> {
        if last_close == 0.0 {
            return Err(IndicatorError::ZeroPrice);
        }
        Ok(atr / last_close * 100.0)
    }
}
