use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One forecasted observation with its uncertainty interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Point forecasts spanning the training range plus a forward horizon.
///
/// Produced by one `predict` call and replaced wholesale by the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    horizon_days: u32,
}

impl ForecastResult {
    pub fn new(points: Vec<ForecastPoint>, horizon_days: u32) -> Self {
        Self {
            points,
            horizon_days,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    /// Predicted value at an exact timestamp, if the timeline contains it.
    pub fn predicted_at(&self, timestamp: DateTime<Utc>) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.timestamp == timestamp)
            .map(|p| p.predicted)
    }
}

/// Forecast accuracy over the joined set of predicted and actual rows.
///
/// Metrics are held at full precision; [`AccuracyReport::rounded`] applies
/// the reporting convention (2 decimals for MAE/RMSE, 4 for R²). A
/// `sample_count` of zero means the join was empty and the metrics carry no
/// information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub sample_count: usize,
}

impl AccuracyReport {
    pub fn empty() -> Self {
        Self {
            mae: 0.0,
            rmse: 0.0,
            r2: 0.0,
            sample_count: 0,
        }
    }

    pub fn rounded(&self) -> Self {
        Self {
            mae: round_to(self.mae, 2),
            rmse: round_to(self.rmse, 2),
            r2: round_to(self.r2, 4),
            sample_count: self.sample_count,
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn predicted_at_requires_exact_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let result = ForecastResult::new(
            vec![ForecastPoint {
                timestamp: t0,
                predicted: 42.0,
                lower: 40.0,
                upper: 44.0,
            }],
            30,
        );
        assert_eq!(result.predicted_at(t0), Some(42.0));
        assert_eq!(result.predicted_at(t0 + chrono::Duration::hours(1)), None);
    }

    #[test]
    fn rounded_applies_reporting_precision() {
        let report = AccuracyReport {
            mae: 1.23456,
            rmse: 9.87654,
            r2: 0.987654,
            sample_count: 12,
        };
        let rounded = report.rounded();
        assert_eq!(rounded.mae, 1.23);
        assert_eq!(rounded.rmse, 9.88);
        assert_eq!(rounded.r2, 0.9877);
        assert_eq!(rounded.sample_count, 12);
    }
}
