//! Relative Strength Index (RSI) indicator.

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Gains and losses are smoothed Wilder-style (`alpha = 1/period`), seeded with
/// the first close delta. Values range from 0-100 and saturate to 100 when no
/// losses remain in the average.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Calculate RSI from a close series. Needs at least two closes.
    pub fn calculate(&self, closes: &[f64]) -> Option<f64> {
        if closes.len() < 2 {
            return None;
        }

        let alpha = 1.0 / self.period as f64;
        let mut deltas = closes.windows(2).map(|w| w[1] - w[0]);

        let first = deltas.next()?;
        let mut avg_gain = first.max(0.0);
        let mut avg_loss = (-first).max(0.0);

        for change in deltas {
            avg_gain += alpha * (change.max(0.0) - avg_gain);
            avg_loss += alpha * ((-change).max(0.0) - avg_loss);
        }

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}
