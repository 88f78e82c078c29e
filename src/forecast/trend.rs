//! Linear trend fitting.

/// Least-squares line `y = intercept + slope * x`.
///
/// `x` is measured in fractional days since the series origin so the slope
/// reads directly as stars per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearTrend {
    /// Fit by ordinary least squares. Requires at least two observations;
    /// with a degenerate x-spread (all observations at one instant) the
    /// slope is zero and the intercept is the mean.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        if sxx == 0.0 {
            return Self {
                intercept: mean_y,
                slope: 0.0,
            };
        }

        let sxy: f64 = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();
        let slope = sxy / sxx;
        Self {
            intercept: mean_y - slope * mean_x,
            slope,
        }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
