//! Residual-based uncertainty intervals.

/// Z-score for the interval width requested at model construction.
/// Only the levels the CLI exposes are tabulated; anything else falls back
/// to 95%.
pub fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        x if x >= 0.99 => 2.576,
        x if x >= 0.95 => 1.96,
        x if x >= 0.90 => 1.645,
        x if x >= 0.80 => 1.282,
        _ => 1.96,
    }
}

/// Standard deviation of in-sample residuals, the base interval half-width.
pub fn residual_sigma(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Interval half-width `steps_ahead` days past the last observation.
///
/// In-sample points (`steps_ahead = 0`) get the flat residual band; future
/// points widen with the square root of the horizon.
pub fn half_width(sigma: f64, z: f64, steps_ahead: u32) -> f64 {
    if steps_ahead == 0 {
        z * sigma
    } else {
        z * sigma * (steps_ahead as f64).sqrt()
    }
}
