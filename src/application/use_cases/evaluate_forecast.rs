use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{AccuracyReport, ForecastResult, TimeSeries};

/// Score a forecast against held-out actuals.
///
/// Inner join on timestamp; rows present on only one side are dropped. An
/// empty join yields a zeroed report with `sample_count = 0` rather than an
/// error, and callers must check the count before trusting the metrics.
/// Metrics are computed at full precision; rounding happens only via
/// [`AccuracyReport::rounded`].
pub fn evaluate(forecast: &ForecastResult, actual: &TimeSeries) -> AccuracyReport {
    let predicted: HashMap<DateTime<Utc>, f64> = forecast
        .points()
        .iter()
        .map(|p| (p.timestamp, p.predicted))
        .collect();

    let joined: Vec<(f64, f64)> = actual
        .points()
        .iter()
        .filter_map(|p| predicted.get(&p.timestamp).map(|yhat| (p.value, *yhat)))
        .collect();

    if joined.is_empty() {
        return AccuracyReport::empty();
    }

    let n = joined.len() as f64;
    let mae = joined.iter().map(|(y, yhat)| (y - yhat).abs()).sum::<f64>() / n;
    let rmse = (joined.iter().map(|(y, yhat)| (y - yhat).powi(2)).sum::<f64>() / n).sqrt();

    let mean_y = joined.iter().map(|(y, _)| y).sum::<f64>() / n;
    let ss_res: f64 = joined.iter().map(|(y, yhat)| (y - yhat).powi(2)).sum();
    let ss_tot: f64 = joined.iter().map(|(y, _)| (y - mean_y).powi(2)).sum();
    // Constant actual series: R² is 0 by convention, never NaN.
    let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    AccuracyReport {
        mae,
        rmse,
        r2,
        sample_count: joined.len(),
    }
}
