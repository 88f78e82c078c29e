use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::application::use_cases::HistorySampler;
use crate::application::{DatasetStore, StarSource};
use crate::domain::{CollectedDataset, DomainError, RepoIdentity};

/// One logical "collect" operation: snapshot + star history + persist.
///
/// The two remote calls are sequenced inside this use case so a dataset is
/// only ever persisted with its own snapshot; if either half fails the whole
/// operation fails and nothing is written.
pub struct CollectRepositoryUseCase {
    source: Arc<dyn StarSource>,
    store: Arc<dyn DatasetStore>,
}

impl CollectRepositoryUseCase {
    pub fn new(source: Arc<dyn StarSource>, store: Arc<dyn DatasetStore>) -> Self {
        Self { source, store }
    }

    pub async fn execute(
        &self,
        identity: &RepoIdentity,
        sample_size: usize,
    ) -> Result<(CollectedDataset, PathBuf), DomainError> {
        info!("Collecting data for {}", identity);

        let snapshot = self.source.fetch_snapshot(identity).await?;
        info!("  {}", snapshot.summary());

        info!("  Fetching star history...");
        let sampler = HistorySampler::new(self.source.clone());
        let series = sampler.sample(identity, sample_size).await?;

        let dataset = CollectedDataset::build(identity.clone(), snapshot, &series);
        let path = self.store.persist(&dataset).await?;
        info!("Saved {} rows to {}", dataset.star_history.len(), path.display());

        Ok((dataset, path))
    }
}
