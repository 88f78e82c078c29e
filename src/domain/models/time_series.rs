use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The Nth star observed on a repository, in chronological order.
///
/// `sequence_index` is 1-based and strictly increasing; timestamps are
/// non-decreasing as delivered by the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarEvent {
    pub timestamp: DateTime<Utc>,
    pub sequence_index: u64,
}

impl StarEvent {
    pub fn new(timestamp: DateTime<Utc>, sequence_index: u64) -> Self {
        Self {
            timestamp,
            sequence_index,
        }
    }
}

/// One observation in a cumulative time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Ordered `(timestamp, value)` observations.
///
/// Built from star events by taking `value = sequence_index`, so the series
/// models cumulative count against time. Rows are kept in arrival order and
/// duplicate timestamps are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn new(points: Vec<TimePoint>) -> Self {
        Self { points }
    }

    pub fn from_events(events: &[StarEvent]) -> Self {
        Self {
            points: events
                .iter()
                .map(|e| TimePoint {
                    timestamp: e.timestamp,
                    value: e.sequence_index as f64,
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    /// Elapsed days between the first and last observation (fractional).
    pub fn span_days(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => (b.timestamp - a.timestamp).num_seconds() as f64 / 86_400.0,
            _ => 0.0,
        }
    }

    /// Split off the observations within the trailing `days` window.
    ///
    /// Returns `(head, tail)` where `tail` holds every point strictly newer
    /// than `last - days`. Used to hold out recent actuals for evaluation.
    pub fn split_holdout(&self, days: i64) -> (TimeSeries, TimeSeries) {
        let Some(last) = self.last() else {
            return (TimeSeries::default(), TimeSeries::default());
        };
        let cutoff = last.timestamp - chrono::Duration::days(days);
        let split = self.points.partition_point(|p| p.timestamp <= cutoff);
        (
            TimeSeries::new(self.points[..split].to_vec()),
            TimeSeries::new(self.points[split..].to_vec()),
        )
    }
}
