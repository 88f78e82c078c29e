use std::sync::Arc;

use futures_util::TryStreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::application::StarSource;
use crate::domain::{DomainError, RepoIdentity, TimeSeries};

/// Default cap on how many star events one collection run consumes.
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Extracts a bounded, ordered sample of star events as a cumulative series.
///
/// The adapter stream is consumed lazily and stops as soon as `sample_size`
/// events arrive, which bounds memory and latency on repositories with
/// millions of stargazers.
pub struct HistorySampler {
    source: Arc<dyn StarSource>,
}

impl HistorySampler {
    pub fn new(source: Arc<dyn StarSource>) -> Self {
        Self { source }
    }

    /// Sample up to `sample_size` events into a cumulative time series.
    ///
    /// Zero upstream events is a legitimate state (new or unstarred
    /// repository) and yields an empty series, not an error; callers must
    /// check emptiness before modeling.
    pub async fn sample(
        &self,
        identity: &RepoIdentity,
        sample_size: usize,
    ) -> Result<TimeSeries, DomainError> {
        debug!("Sampling up to {} star events for {}", sample_size, identity);

        let progress_bar = ProgressBar::new(sample_size as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} stars")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let mut events = Vec::new();
        let mut stream = self.source.star_events(identity, sample_size);
        while let Some(event) = stream.try_next().await? {
            progress_bar.inc(1);
            events.push(event);
        }
        progress_bar.finish_and_clear();

        if events.is_empty() {
            info!("No star events found for {}", identity);
        } else {
            debug!("Sampled {} events for {}", events.len(), identity);
        }
        Ok(TimeSeries::from_events(&events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockStarSource;
    use chrono::{TimeZone, Utc};

    fn hourly_timestamps(n: usize) -> Vec<chrono::DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::hours(i as i64))
            .collect()
    }

    #[tokio::test]
    async fn series_values_are_one_based_cumulative_counts() {
        let identity = RepoIdentity::new("octo", "repo");
        let source = Arc::new(MockStarSource::new(&identity, hourly_timestamps(6)));
        let sampler = HistorySampler::new(source);

        let series = sampler.sample(&identity, 100).await.unwrap();
        assert_eq!(series.len(), 6);
        for (i, p) in series.points().iter().enumerate() {
            assert_eq!(p.value, (i + 1) as f64);
        }
        for window in series.points().windows(2) {
            assert!(window[0].timestamp <= window[1].timestamp);
        }
    }

    #[tokio::test]
    async fn sampling_stops_at_the_cap() {
        let identity = RepoIdentity::new("octo", "popular");
        let source = Arc::new(MockStarSource::new(&identity, hourly_timestamps(50)));
        let sampler = HistorySampler::new(source.clone());

        let series = sampler.sample(&identity, 10).await.unwrap();
        assert_eq!(series.len(), 10);
        assert_eq!(source.events_served(), 10);
    }

    #[tokio::test]
    async fn short_upstream_yields_all_events() {
        let identity = RepoIdentity::new("octo", "small");
        let source = Arc::new(MockStarSource::new(&identity, hourly_timestamps(3)));
        let sampler = HistorySampler::new(source);

        let series = sampler.sample(&identity, 10).await.unwrap();
        assert_eq!(series.len(), 3);
    }

    #[tokio::test]
    async fn zero_events_is_an_empty_series_not_an_error() {
        let identity = RepoIdentity::new("octo", "unstarred");
        let source = Arc::new(MockStarSource::new(&identity, Vec::new()));
        let sampler = HistorySampler::new(source);

        let series = sampler.sample(&identity, 10).await.unwrap();
        assert!(series.is_empty());
    }
}
