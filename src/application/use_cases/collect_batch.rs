use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::application::use_cases::CollectRepositoryUseCase;
use crate::application::{DatasetStore, StarSource};
use crate::domain::{DomainError, RepoIdentity};

/// Pause between successive repositories, a courtesy toward the remote
/// rate ceiling rather than real scheduling.
pub const DEFAULT_COLLECTION_DELAY: Duration = Duration::from_secs(2);

/// Outcome of one repository within a batch run.
pub struct CollectOutcome {
    pub identity: RepoIdentity,
    pub result: Result<PathBuf, DomainError>,
}

/// Sequential best-effort collection across several repositories.
///
/// A failing repository is recorded and skipped; datasets already persisted
/// stay valid and independently loadable.
pub struct CollectBatchUseCase {
    collect: CollectRepositoryUseCase,
    delay: Duration,
}

impl CollectBatchUseCase {
    pub fn new(source: Arc<dyn StarSource>, store: Arc<dyn DatasetStore>) -> Self {
        Self {
            collect: CollectRepositoryUseCase::new(source, store),
            delay: DEFAULT_COLLECTION_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn execute(
        &self,
        identities: &[RepoIdentity],
        sample_size: usize,
    ) -> Vec<CollectOutcome> {
        let mut outcomes = Vec::with_capacity(identities.len());

        for (i, identity) in identities.iter().enumerate() {
            let result = self
                .collect
                .execute(identity, sample_size)
                .await
                .map(|(_, path)| path);
            if let Err(e) = &result {
                warn!("Collection failed for {}: {}", identity, e);
            }
            outcomes.push(CollectOutcome {
                identity: identity.clone(),
                result,
            });

            if i + 1 < identities.len() {
                tokio::time::sleep(self.delay).await;
            }
        }

        outcomes
    }
}
