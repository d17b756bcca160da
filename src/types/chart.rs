use crate::error::SeriesError;
use serde::{Deserialize, Serialize};

/// OHLCV candle. `timestamp` is Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Absolute size of the candle body.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// High-low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Check the candle's own invariants, returning the first violation.
    fn check(&self) -> Option<String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Some(format!("{} must be positive and finite, got {}", name, value));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Some(format!("volume must be non-negative, got {}", self.volume));
        }
        if self.low > self.open.min(self.close) || self.high < self.open.max(self.close) {
            return Some(format!(
                "high/low ({}/{}) do not bound open/close ({}/{})",
                self.high, self.low, self.open, self.close
            ));
        }
        None
    }
}

/// Time-ordered, append-only candle series.
///
/// Every candle is validated on the way in, so consumers can rely on positive
/// prices, non-negative volume and strictly increasing timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candle>", into = "Vec<Candle>")]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series, validating each candle and the ordering.
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        let mut series = Self {
            candles: Vec::with_capacity(candles.len()),
        };
        for candle in candles {
            series.push(candle)?;
        }
        Ok(series)
    }

    /// Append a candle newer than the current last one.
    pub fn push(&mut self, candle: Candle) -> Result<(), SeriesError> {
        let index = self.candles.len();
        if let Some(reason) = candle.check() {
            return Err(SeriesError::InvalidCandle { index, reason });
        }
        if let Some(last) = self.candles.last() {
            if candle.timestamp <= last.timestamp {
                return Err(SeriesError::OutOfOrder { index });
            }
        }
        self.candles.push(candle);
        Ok(())
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// The last `n` candles (or all of them when shorter).
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = SeriesError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

impl From<CandleSeries> for Vec<Candle> {
    fn from(series: CandleSeries) -> Self {
        series.candles
    }
}
