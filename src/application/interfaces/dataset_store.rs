use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{CollectedDataset, DomainError, RepoIdentity};

/// Persistence for collection-run documents.
///
/// Each run writes a new document; existing documents are never overwritten
/// in place, so every persisted dataset stays independently loadable.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Write the dataset and return where it landed.
    async fn persist(&self, dataset: &CollectedDataset) -> Result<PathBuf, DomainError>;

    /// The freshest persisted dataset for the identity, selected by the
    /// `collected_at` field embedded in the document.
    async fn load_latest(&self, identity: &RepoIdentity) -> Result<CollectedDataset, DomainError>;
}
