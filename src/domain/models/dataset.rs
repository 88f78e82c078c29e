use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, RepoIdentity, StatSnapshot, TimePoint, TimeSeries};

/// One row of the persisted star history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub date: DateTime<Utc>,
    pub cumulative_stars: u64,
}

/// The unit of persistence: identity + snapshot + sampled star history.
///
/// Interchange document written once per collection run and never updated in
/// place; later runs produce new documents distinguished by collection date.
/// `star_history` may legitimately be empty (new or unstarred repository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedDataset {
    pub repository: RepoIdentity,
    pub stats: StatSnapshot,
    pub star_history: Vec<StarRecord>,
}

impl CollectedDataset {
    /// Pure combination of the two halves of a collection run. No I/O.
    pub fn build(identity: RepoIdentity, stats: StatSnapshot, series: &TimeSeries) -> Self {
        let star_history = series
            .points()
            .iter()
            .map(|p| StarRecord {
                date: p.timestamp,
                cumulative_stars: p.value as u64,
            })
            .collect();
        Self {
            repository: identity,
            stats,
            star_history,
        }
    }

    /// Canonical series for model fitting.
    ///
    /// An empty history is a legal dataset but cannot be modeled, so it is
    /// rejected here rather than silently accepted downstream.
    pub fn to_model_frame(&self) -> Result<TimeSeries, DomainError> {
        if self.star_history.is_empty() {
            return Err(DomainError::empty_history(format!(
                "no star history collected for {}",
                self.repository
            )));
        }
        Ok(TimeSeries::new(
            self.star_history
                .iter()
                .map(|r| TimePoint {
                    timestamp: r.date,
                    value: r.cumulative_stars as f64,
                })
                .collect(),
        ))
    }
}
