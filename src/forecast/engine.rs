use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::domain::{DomainError, ForecastPoint, ForecastResult, TimeSeries};
use crate::forecast::confidence::{half_width, residual_sigma, z_score};
use crate::forecast::seasonality::{SeasonalComponent, SeasonalPeriod, SeasonalityMode};
use crate::forecast::trend::LinearTrend;

/// Knobs for the additive model. Daily seasonality is deliberately absent:
/// the sampling granularity is per star event, so daily cycles carry no
/// signal.
#[derive(Debug, Clone, Copy)]
pub struct ForecastConfig {
    pub weekly: SeasonalityMode,
    pub yearly: SeasonalityMode,
    /// Width of the uncertainty interval, e.g. 0.95.
    pub confidence_level: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            weekly: SeasonalityMode::Auto,
            yearly: SeasonalityMode::Auto,
            confidence_level: 0.95,
        }
    }
}

/// Trend and seasonal parameters produced by one training pass.
#[derive(Debug, Clone)]
struct FittedModel {
    origin: DateTime<Utc>,
    last_observed: DateTime<Utc>,
    observed: Vec<DateTime<Utc>>,
    trend: LinearTrend,
    weekly: Option<SeasonalComponent>,
    yearly: Option<SeasonalComponent>,
    sigma: f64,
    z: f64,
}

impl FittedModel {
    fn days_since_origin(&self, timestamp: DateTime<Utc>) -> f64 {
        (timestamp - self.origin).num_seconds() as f64 / 86_400.0
    }

    fn expected_value(&self, timestamp: DateTime<Utc>) -> f64 {
        let mut value = self.trend.value_at(self.days_since_origin(timestamp));
        if let Some(weekly) = &self.weekly {
            value += weekly.value_at(timestamp);
        }
        if let Some(yearly) = &self.yearly {
            value += yearly.value_at(timestamp);
        }
        value
    }

    /// Whole days past the last training observation; 0 for in-sample points.
    fn steps_ahead(&self, timestamp: DateTime<Utc>) -> u32 {
        if timestamp <= self.last_observed {
            return 0;
        }
        let days = (timestamp - self.last_observed).num_seconds() as f64 / 86_400.0;
        (days.ceil() as u32).max(1)
    }

    fn point_at(&self, timestamp: DateTime<Utc>) -> ForecastPoint {
        let predicted = self.expected_value(timestamp);
        let width = half_width(self.sigma, self.z, self.steps_ahead(timestamp));
        ForecastPoint {
            timestamp,
            predicted,
            lower: predicted - width,
            upper: predicted + width,
        }
    }
}

/// Decomposable trend + seasonality forecaster for cumulative star counts.
///
/// State machine: Untrained → Trained → Forecasted. `train` is valid only
/// once per instance; `predict` is repeatable and each call replaces the
/// stored [`ForecastResult`].
pub struct GrowthForecaster {
    config: ForecastConfig,
    model: Option<FittedModel>,
    forecast: Option<ForecastResult>,
}

impl GrowthForecaster {
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            config,
            model: None,
            forecast: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// The result of the most recent `predict` call, if any.
    pub fn last_forecast(&self) -> Option<&ForecastResult> {
        self.forecast.as_ref()
    }

    /// Fit trend and seasonal components to the series.
    ///
    /// Fails with `InsufficientData` when the series is too short for the
    /// components requested (fewer than two full seasonal cycles for an
    /// `Enabled` component, or fewer than two points overall).
    pub fn train(&mut self, series: &TimeSeries) -> Result<(), DomainError> {
        if self.model.is_some() {
            return Err(DomainError::invalid_input(
                "model already trained; use a fresh forecaster to refit",
            ));
        }
        if series.len() < 2 {
            return Err(DomainError::insufficient_data(format!(
                "need at least 2 observations to fit a trend, got {}",
                series.len()
            )));
        }

        let span = series.span_days();
        let fit_weekly = resolve_mode(self.config.weekly, SeasonalPeriod::Weekly, span)?;
        let fit_yearly = resolve_mode(self.config.yearly, SeasonalPeriod::Yearly, span)?;

        let origin = series.first().map(|p| p.timestamp).ok_or_else(|| {
            DomainError::insufficient_data("cannot train on an empty series")
        })?;
        let timestamps: Vec<DateTime<Utc>> =
            series.points().iter().map(|p| p.timestamp).collect();
        let xs: Vec<f64> = timestamps
            .iter()
            .map(|ts| (*ts - origin).num_seconds() as f64 / 86_400.0)
            .collect();
        let ys: Vec<f64> = series.points().iter().map(|p| p.value).collect();

        let trend = LinearTrend::fit(&xs, &ys);
        let mut residuals: Vec<f64> = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| y - trend.value_at(*x))
            .collect();

        let weekly = fit_weekly.then(|| {
            let component = SeasonalComponent::fit(SeasonalPeriod::Weekly, &timestamps, &residuals);
            for (r, ts) in residuals.iter_mut().zip(timestamps.iter()) {
                *r -= component.value_at(*ts);
            }
            component
        });
        let yearly = fit_yearly.then(|| {
            let component = SeasonalComponent::fit(SeasonalPeriod::Yearly, &timestamps, &residuals);
            for (r, ts) in residuals.iter_mut().zip(timestamps.iter()) {
                *r -= component.value_at(*ts);
            }
            component
        });

        let sigma = residual_sigma(&residuals);
        debug!(
            "fit over {:.1} days: slope {:.4}/day, weekly={}, yearly={}, sigma={:.3}",
            span,
            trend.slope,
            weekly.is_some(),
            yearly.is_some(),
            sigma
        );

        self.model = Some(FittedModel {
            origin,
            last_observed: timestamps[timestamps.len() - 1],
            observed: timestamps,
            trend,
            weekly,
            yearly,
            sigma,
            z: z_score(self.config.confidence_level),
        });
        info!("Model trained on {} observations", series.len());
        Ok(())
    }

    /// Forecast over the training timeline plus `horizon_days` daily steps
    /// beyond the last observation.
    ///
    /// Deterministic for a fixed trained model and horizon. Each call
    /// recomputes and replaces the previously stored result.
    pub fn predict(&mut self, horizon_days: u32) -> Result<ForecastResult, DomainError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| DomainError::not_trained("call train before predict"))?;

        let mut timeline = model.observed.clone();
        for day in 1..=horizon_days {
            timeline.push(model.last_observed + Duration::days(day as i64));
        }

        let points: Vec<ForecastPoint> =
            timeline.into_iter().map(|ts| model.point_at(ts)).collect();
        let result = ForecastResult::new(points, horizon_days);
        self.forecast = Some(result.clone());
        Ok(result)
    }

    /// Point forecasts at arbitrary timestamps from the fitted model.
    ///
    /// Used to score held-out actuals whose event timestamps do not fall on
    /// the daily steps `predict` emits.
    pub fn project(
        &self,
        timestamps: &[DateTime<Utc>],
    ) -> Result<Vec<ForecastPoint>, DomainError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| DomainError::not_trained("call train before project"))?;
        Ok(timestamps.iter().map(|ts| model.point_at(*ts)).collect())
    }
}

impl Default for GrowthForecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

fn resolve_mode(
    mode: SeasonalityMode,
    period: SeasonalPeriod,
    span_days: f64,
) -> Result<bool, DomainError> {
    match mode {
        SeasonalityMode::Disabled => Ok(false),
        SeasonalityMode::Auto => Ok(span_days >= period.min_span_days()),
        SeasonalityMode::Enabled => {
            if span_days >= period.min_span_days() {
                Ok(true)
            } else {
                Err(DomainError::insufficient_data(format!(
                    "{:?} seasonality needs {:.0} days of history, series spans {:.1}",
                    period,
                    period.min_span_days(),
                    span_days
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimePoint;
    use chrono::TimeZone;

    /// `days` daily points at day indices 1..=days with `y = intercept + slope * day`.
    fn linear_series(days: u64, intercept: f64, slope: f64) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::new(
            (1..=days)
                .map(|d| TimePoint {
                    timestamp: start + Duration::days(d as i64),
                    value: intercept + slope * d as f64,
                })
                .collect(),
        )
    }

    #[test]
    fn linear_growth_is_extrapolated() {
        let series = linear_series(120, 100.0, 2.0);
        let mut forecaster = GrowthForecaster::default();
        forecaster.train(&series).unwrap();

        let result = forecaster.predict(30).unwrap();
        assert_eq!(result.len(), 150);

        // Day index 150 from the first observation: 100 + 2 * 150 = 400.
        let last = result.last().unwrap();
        assert!(
            (last.predicted - 400.0).abs() < 1.0,
            "expected ~400, got {}",
            last.predicted
        );
        assert!(last.lower <= last.predicted && last.predicted <= last.upper);
    }

    #[test]
    fn predict_before_train_fails() {
        let mut forecaster = GrowthForecaster::default();
        let err = forecaster.predict(30).unwrap_err();
        assert!(matches!(err, DomainError::NotTrained(_)));
        assert!(forecaster.project(&[]).is_err());
    }

    #[test]
    fn train_twice_is_rejected() {
        let series = linear_series(30, 0.0, 1.0);
        let mut forecaster = GrowthForecaster::default();
        forecaster.train(&series).unwrap();
        assert!(forecaster.train(&series).is_err());
    }

    #[test]
    fn too_few_points_is_insufficient_data() {
        let mut forecaster = GrowthForecaster::default();
        let err = forecaster.train(&linear_series(1, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientData(_)));
    }

    #[test]
    fn forced_weekly_seasonality_needs_two_cycles() {
        let mut forecaster = GrowthForecaster::new(ForecastConfig {
            weekly: SeasonalityMode::Enabled,
            yearly: SeasonalityMode::Disabled,
            confidence_level: 0.95,
        });
        let err = forecaster.train(&linear_series(5, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientData(_)));
    }

    #[test]
    fn short_series_auto_disables_seasonality_and_still_trains() {
        let mut forecaster = GrowthForecaster::default();
        forecaster.train(&linear_series(5, 10.0, 1.0)).unwrap();
        let result = forecaster.predict(5).unwrap();
        // Last training point is day 5 (y = 15); five days out is day 10.
        assert!((result.last().unwrap().predicted - 20.0).abs() < 1e-6);
    }

    #[test]
    fn predict_is_repeatable_and_replaces_prior_result() {
        let series = linear_series(60, 0.0, 3.0);
        let mut forecaster = GrowthForecaster::default();
        forecaster.train(&series).unwrap();

        let first = forecaster.predict(10).unwrap();
        let second = forecaster.predict(10).unwrap();
        assert_eq!(first, second);

        let longer = forecaster.predict(20).unwrap();
        assert_eq!(longer.len(), 80);
        assert_eq!(forecaster.last_forecast().unwrap(), &longer);
    }

    #[test]
    fn intervals_widen_past_the_last_observation() {
        // Add noise so sigma is non-zero.
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let series = TimeSeries::new(
            (0..60)
                .map(|d| TimePoint {
                    timestamp: start + Duration::days(d),
                    value: d as f64 + if d % 2 == 0 { 0.8 } else { -0.8 },
                })
                .collect(),
        );
        let mut forecaster = GrowthForecaster::new(ForecastConfig {
            weekly: SeasonalityMode::Disabled,
            yearly: SeasonalityMode::Disabled,
            confidence_level: 0.95,
        });
        forecaster.train(&series).unwrap();
        let result = forecaster.predict(9).unwrap();

        let points = result.points();
        let width = |p: &ForecastPoint| p.upper - p.lower;
        let first_future = &points[60];
        let last_future = &points[68];
        assert!(width(last_future) > width(first_future));
        assert!((width(last_future) / width(first_future) - 3.0).abs() < 1e-6);
    }
}
