use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::DatasetStore;
use crate::domain::{CollectedDataset, DomainError, RepoIdentity};

/// One JSON document per collection run under a single data directory.
///
/// File names follow `{owner}_{name}_{YYYYMMDD}.json`; a second run on the
/// same day gets a numeric suffix instead of overwriting. "Latest wins" is
/// resolved by the `collected_at` field inside each document rather than
/// filesystem modification time, which does not survive copies or restores.
pub struct JsonDatasetStore {
    data_dir: PathBuf,
}

impl JsonDatasetStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// First free path for the dataset: date-stamped name, then `_2`, `_3`…
    fn allocate_path(&self, dataset: &CollectedDataset) -> PathBuf {
        let stem = format!(
            "{}_{}",
            dataset.repository.slug(),
            dataset.stats.collected_at.format("%Y%m%d")
        );
        let mut path = self.data_dir.join(format!("{stem}.json"));
        let mut attempt = 2u32;
        while path.exists() {
            path = self.data_dir.join(format!("{stem}_{attempt}.json"));
            attempt += 1;
        }
        path
    }

    fn matches_identity(file_name: &str, identity: &RepoIdentity) -> bool {
        file_name.starts_with(&format!("{}_", identity.slug())) && file_name.ends_with(".json")
    }
}

#[async_trait]
impl DatasetStore for JsonDatasetStore {
    async fn persist(&self, dataset: &CollectedDataset) -> Result<PathBuf, DomainError> {
        let path = self.allocate_path(dataset);
        let json = serde_json::to_vec_pretty(dataset)
            .map_err(|e| DomainError::storage(format!("failed to serialize dataset: {e}")))?;
        tokio::fs::write(&path, json).await?;
        debug!("Persisted dataset to {}", path.display());
        Ok(path)
    }

    async fn load_latest(&self, identity: &RepoIdentity) -> Result<CollectedDataset, DomainError> {
        let mut latest: Option<CollectedDataset> = None;

        let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !Self::matches_identity(&file_name, identity) {
                continue;
            }

            let bytes = tokio::fs::read(entry.path()).await?;
            let dataset: CollectedDataset = match serde_json::from_slice(&bytes) {
                Ok(d) => d,
                Err(e) => {
                    warn!("Skipping unreadable dataset {}: {}", file_name, e);
                    continue;
                }
            };
            if dataset.repository != *identity {
                // Slug prefixes can collide across identities; the document
                // itself is authoritative.
                continue;
            }

            let newer = latest
                .as_ref()
                .map(|cur| dataset.stats.collected_at > cur.stats.collected_at)
                .unwrap_or(true);
            if newer {
                latest = Some(dataset);
            }
        }

        latest.ok_or_else(|| {
            DomainError::not_found(format!(
                "no collected dataset for {} under {}",
                identity,
                self.data_dir.display()
            ))
        })
    }
}
