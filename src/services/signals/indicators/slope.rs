//! Least-squares slope of recent closes.

/// Slope of a linear fit of the last `window` values against their index.
pub struct Slope {
    window: usize,
}

impl Default for Slope {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl Slope {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// First coefficient of the fit. A single point has zero slope.
    pub fn calculate(&self, values: &[f64]) -> Option<f64> {
        let window = &values[values.len().saturating_sub(self.window)..];
        if window.is_empty() {
            return None;
        }

        let n = window.len() as f64;
        let mean_x = (n - 1.0) / 2.0;
        let mean_y = window.iter().sum::<f64>() / n;

        let (cov, var) = window
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(cov, var), (i, y)| {
                let dx = i as f64 - mean_x;
                (cov + dx * (y - mean_y), var + dx * dx)
            });

        if var == 0.0 {
            return Some(0.0);
        }
        Some(cov / var)
    }
}
