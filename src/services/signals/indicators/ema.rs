//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) indicator.
///
/// Seeded with the first value, then `ema = (x - ema) * k + ema` with
/// `k = 2/(period+1)`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Smoothing multiplier.
    pub fn multiplier(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// Latest EMA value of the series.
    pub fn calculate(&self, values: &[f64]) -> Option<f64> {
        let (first, rest) = values.split_first()?;
        let multiplier = self.multiplier();

        let mut ema = *first;
        for value in rest {
            ema = (value - ema) * multiplier + ema;
        }

        Some(ema)
    }
}
