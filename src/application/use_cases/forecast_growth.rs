use std::sync::Arc;

use tracing::info;

use crate::application::use_cases::evaluate;
use crate::application::DatasetStore;
use crate::domain::{AccuracyReport, DomainError, ForecastResult, RepoIdentity};
use crate::forecast::{ForecastConfig, GrowthForecaster};

/// What the forecasting command reports back to the caller.
#[derive(Debug)]
pub struct ForecastSummary {
    pub identity: RepoIdentity,
    pub observations: usize,
    pub current_stars: f64,
    pub predicted_stars: f64,
    pub forecast: ForecastResult,
    /// Present only when a holdout window was requested.
    pub accuracy: Option<AccuracyReport>,
}

impl ForecastSummary {
    pub fn expected_growth(&self) -> f64 {
        self.predicted_stars - self.current_stars
    }
}

/// Load the latest dataset, fit the growth model, and forecast forward.
///
/// With a holdout window the model trains on the series minus the trailing
/// `holdout_days` and the held-out rows are scored against the model's
/// projection at their timestamps.
pub struct ForecastGrowthUseCase {
    store: Arc<dyn DatasetStore>,
    config: ForecastConfig,
}

impl ForecastGrowthUseCase {
    pub fn new(store: Arc<dyn DatasetStore>) -> Self {
        Self {
            store,
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ForecastConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn execute(
        &self,
        identity: &RepoIdentity,
        horizon_days: u32,
        holdout_days: Option<i64>,
    ) -> Result<ForecastSummary, DomainError> {
        let dataset = self.store.load_latest(identity).await?;
        let series = dataset.to_model_frame()?;
        info!("Loaded {} data points for {}", series.len(), identity);

        let (training, holdout) = match holdout_days {
            Some(days) => {
                let (head, tail) = series.split_holdout(days);
                (head, Some(tail))
            }
            None => (series.clone(), None),
        };

        let mut forecaster = GrowthForecaster::new(self.config);
        forecaster.train(&training)?;

        let accuracy = match &holdout {
            Some(tail) => {
                let timestamps: Vec<_> = tail.points().iter().map(|p| p.timestamp).collect();
                let projected = ForecastResult::new(forecaster.project(&timestamps)?, 0);
                Some(evaluate(&projected, tail))
            }
            None => None,
        };

        let forecast = forecaster.predict(horizon_days)?;
        let current_stars = series.last().map(|p| p.value).unwrap_or(0.0);
        let predicted_stars = forecast.last().map(|p| p.predicted).unwrap_or(0.0);

        Ok(ForecastSummary {
            identity: identity.clone(),
            observations: series.len(),
            current_stars,
            predicted_stars,
            forecast,
            accuracy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::JsonDatasetStore;
    use crate::domain::{CollectedDataset, StarEvent, StatSnapshot, TimeSeries};
    use chrono::{TimeZone, Utc};

    async fn seeded_store(identity: &RepoIdentity, days: u64) -> (tempfile::TempDir, Arc<JsonDatasetStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonDatasetStore::new(dir.path()).unwrap());

        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let events: Vec<StarEvent> = (0..days)
            .map(|d| StarEvent::new(start + chrono::Duration::days(d as i64), d + 1))
            .collect();
        let series = TimeSeries::from_events(&events);
        let now = Utc::now();
        let snapshot = StatSnapshot {
            full_name: identity.full_name(),
            stars: days,
            forks: 0,
            watchers: days,
            open_issues: 0,
            language: Some("Rust".to_string()),
            description: None,
            created_at: start,
            updated_at: now,
            collected_at: now,
        };
        let dataset = CollectedDataset::build(identity.clone(), snapshot, &series);
        store.persist(&dataset).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn forecasts_growth_from_the_latest_dataset() {
        let identity = RepoIdentity::new("octo", "steady");
        let (_dir, store) = seeded_store(&identity, 60).await;

        let use_case = ForecastGrowthUseCase::new(store);
        let summary = use_case.execute(&identity, 30, None).await.unwrap();

        assert_eq!(summary.observations, 60);
        assert_eq!(summary.current_stars, 60.0);
        // One star per day; 30 days out lands near 90.
        assert!((summary.predicted_stars - 90.0).abs() < 2.0);
        assert!(summary.expected_growth() > 25.0);
        assert!(summary.accuracy.is_none());
    }

    #[tokio::test]
    async fn holdout_window_produces_an_accuracy_report() {
        let identity = RepoIdentity::new("octo", "scored");
        let (_dir, store) = seeded_store(&identity, 90).await;

        let use_case = ForecastGrowthUseCase::new(store);
        let summary = use_case.execute(&identity, 30, Some(14)).await.unwrap();

        let report = summary.accuracy.unwrap();
        assert_eq!(report.sample_count, 14);
        // Perfectly linear history: holdout errors stay tiny.
        assert!(report.mae < 1.0);
        assert!(report.r2 > 0.9);
    }

    #[tokio::test]
    async fn missing_dataset_is_not_found() {
        let identity = RepoIdentity::new("octo", "absent");
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonDatasetStore::new(dir.path()).unwrap());

        let use_case = ForecastGrowthUseCase::new(store);
        let err = use_case.execute(&identity, 30, None).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
