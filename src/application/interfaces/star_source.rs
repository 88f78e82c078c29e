use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::{DomainError, RepoIdentity, StarEvent, StatSnapshot};

/// Lazy, finite, non-restartable sequence of star events.
pub type StarEventStream<'a> = BoxStream<'a, Result<StarEvent, DomainError>>;

/// Read-only access to the remote hosting service.
///
/// Implementations surface `RateLimited` to the caller instead of retrying
/// internally; backoff policy stays with the call site.
#[async_trait]
pub trait StarSource: Send + Sync {
    /// Current repository statistics. One or more network calls, no local
    /// state mutation.
    async fn fetch_snapshot(&self, identity: &RepoIdentity) -> Result<StatSnapshot, DomainError>;

    /// Chronological star events with 1-based sequence indices, fetched page
    /// by page on demand and capped at `max_count` even if more exist
    /// upstream.
    fn star_events(&self, identity: &RepoIdentity, max_count: usize) -> StarEventStream<'_>;
}
