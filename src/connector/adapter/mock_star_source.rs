use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::StreamExt;

use crate::application::{StarEventStream, StarSource};
use crate::domain::{DomainError, RepoIdentity, StarEvent, StatSnapshot};

/// Which adapter-level fault a mock should raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    NotFound,
    RateLimited,
    Network,
}

impl MockFailure {
    fn to_error(self, identity: &RepoIdentity) -> DomainError {
        match self {
            MockFailure::NotFound => DomainError::not_found(identity.full_name()),
            MockFailure::RateLimited => {
                DomainError::rate_limited(format!("quota exhausted for {identity}"))
            }
            MockFailure::Network => DomainError::network(format!("unreachable for {identity}")),
        }
    }
}

/// In-memory [`StarSource`] with a fixed event sequence.
///
/// `events_served` counts how many events consumers actually pulled, which
/// lets tests assert the sampler stops at its cap instead of draining the
/// upstream.
pub struct MockStarSource {
    snapshot: StatSnapshot,
    timestamps: Vec<DateTime<Utc>>,
    failure: Option<MockFailure>,
    served: Arc<AtomicUsize>,
}

impl MockStarSource {
    pub fn new(identity: &RepoIdentity, timestamps: Vec<DateTime<Utc>>) -> Self {
        let collected_at = Utc::now();
        let snapshot = StatSnapshot {
            full_name: identity.full_name(),
            stars: timestamps.len() as u64,
            forks: 1,
            watchers: timestamps.len() as u64,
            open_issues: 0,
            language: Some("Rust".to_string()),
            description: Some("mock repository".to_string()),
            created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            updated_at: collected_at,
            collected_at,
        };
        Self {
            snapshot,
            timestamps,
            failure: None,
            served: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source where every call raises the given fault.
    pub fn failing(identity: &RepoIdentity, failure: MockFailure) -> Self {
        let mut source = Self::new(identity, Vec::new());
        source.failure = Some(failure);
        source
    }

    pub fn events_served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StarSource for MockStarSource {
    async fn fetch_snapshot(&self, identity: &RepoIdentity) -> Result<StatSnapshot, DomainError> {
        if let Some(failure) = self.failure {
            return Err(failure.to_error(identity));
        }
        Ok(self.snapshot.clone())
    }

    fn star_events(&self, identity: &RepoIdentity, max_count: usize) -> StarEventStream<'_> {
        if let Some(failure) = self.failure {
            let err = failure.to_error(identity);
            return futures_util::stream::once(async move { Err(err) }).boxed();
        }

        let served = self.served.clone();
        let events: Vec<Result<StarEvent, DomainError>> = self
            .timestamps
            .iter()
            .take(max_count)
            .enumerate()
            .map(|(i, ts)| Ok(StarEvent::new(*ts, (i + 1) as u64)))
            .collect();
        futures_util::stream::iter(events)
            .inspect(move |_| {
                served.fetch_add(1, Ordering::SeqCst);
            })
            .boxed()
    }
}

/// Dispatches to a different mock per identity; unknown identities are
/// NotFound. Lets batch tests mix healthy and failing repositories.
#[derive(Default)]
pub struct RoutedStarSource {
    routes: HashMap<RepoIdentity, MockStarSource>,
}

impl RoutedStarSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identity: RepoIdentity, source: MockStarSource) -> Self {
        self.routes.insert(identity, source);
        self
    }
}

#[async_trait]
impl StarSource for RoutedStarSource {
    async fn fetch_snapshot(&self, identity: &RepoIdentity) -> Result<StatSnapshot, DomainError> {
        match self.routes.get(identity) {
            Some(source) => source.fetch_snapshot(identity).await,
            None => Err(DomainError::not_found(identity.full_name())),
        }
    }

    fn star_events(&self, identity: &RepoIdentity, max_count: usize) -> StarEventStream<'_> {
        match self.routes.get(identity) {
            Some(source) => source.star_events(identity, max_count),
            None => {
                let err = DomainError::not_found(identity.full_name());
                futures_util::stream::once(async move { Err(err) }).boxed()
            }
        }
    }
}
