use std::sync::Arc;
use tracing::{debug, info, instrument};

use shared_types::{Document, VersionListing};

use crate::error::{Result, StorageError};
use crate::BlobStore;

/// Pseudo-version naming the alias blob that tracks the most recent publish.
pub const LATEST: &str = "latest";

/// Metadata field on the latest alias naming the version it points at.
const LATEST_VERSION_FIELD: &str = "version";

#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    /// Document field that must carry the version on publish.
    pub version_field: String,
    /// Display extension assumed when an identifier carries none.
    pub default_extension: String,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            version_field: "version".to_string(),
            default_extension: "json".to_string(),
        }
    }
}

/// The core of the store: maps (base, version) pairs to blob keys, enforces
/// append-only version semantics, and maintains the latest alias.
pub struct ConfigRepository {
    store: Arc<dyn BlobStore>,
    options: RepositoryOptions,
}

fn blob_key(base: &str, version: &str) -> String {
    format!("{base}@{version}")
}

impl ConfigRepository {
    pub fn new(store: Arc<dyn BlobStore>, options: RepositoryOptions) -> Self {
        Self { store, options }
    }

    pub fn version_field(&self) -> &str {
        &self.options.version_field
    }

    pub fn default_extension(&self) -> &str {
        &self.options.default_extension
    }

    /// Fetch one stored document. Stored bytes are always JSON, regardless
    /// of the extension a config is displayed with.
    #[instrument(skip(self))]
    pub async fn fetch(&self, base: &str, version: &str) -> Result<Document> {
        debug!("Fetching config {}@{}", base, version);

        let bytes = match self.store.get(&blob_key(base, version)).await {
            Ok(bytes) => bytes,
            Err(StorageError::KeyNotFound(_)) => {
                return Err(StorageError::ConfigNotFound(blob_key(base, version)));
            }
            Err(e) => return Err(e),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Publish an immutable version of `base`, then advance the latest alias.
    ///
    /// Versions are append-only: an existing (base, version) pair is never
    /// overwritten. The check-then-write here is racy across processes; the
    /// conditional `put_if_absent` narrows the window but the store offers
    /// no locking.
    #[instrument(skip(self, document))]
    pub async fn publish(
        &self,
        base: &str,
        version: Option<&str>,
        document: &Document,
    ) -> Result<String> {
        let version = match version {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(StorageError::VersionRequired(format!(
                    "{} has no value for field '{}'",
                    base, self.options.version_field
                )));
            }
        };

        match self.fetch(base, version).await {
            Ok(_) => {
                return Err(StorageError::VersionAlreadyExists(blob_key(base, version)));
            }
            Err(StorageError::ConfigNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let bytes = serde_json::to_vec_pretty(document)?;

        // The immutable copy must land before the latest alias moves, so a
        // crash between the writes never leaves "latest" pointing at a
        // version whose snapshot is missing.
        match self
            .store
            .put_if_absent(&blob_key(base, version), bytes.clone())
            .await
        {
            Ok(()) => {}
            Err(StorageError::KeyExists(_)) => {
                return Err(StorageError::VersionAlreadyExists(blob_key(base, version)));
            }
            Err(e) => return Err(e),
        }

        let latest_key = blob_key(base, LATEST);
        self.store.put(&latest_key, bytes).await?;
        self.store
            .set_metadata(&latest_key, LATEST_VERSION_FIELD, version)
            .await?;

        info!("Published {} as version {}", base, version);
        Ok(version.to_string())
    }

    /// All stored versions of `base`, sorted, plus the current latest
    /// pointer from the alias metadata. The literal `latest` pseudo-version
    /// is excluded from the version list.
    #[instrument(skip(self))]
    pub async fn list_versions(&self, base: &str) -> Result<VersionListing> {
        debug!("Listing versions for {}", base);

        let keys = self.store.list(base).await?;
        let mut versions: Vec<String> = keys
            .iter()
            .filter_map(|key| key.split_once('@'))
            .filter(|(name, _)| *name == base)
            .map(|(_, version)| version.to_string())
            .filter(|version| version != LATEST)
            .collect();

        if versions.is_empty() {
            return Err(StorageError::ConfigNotFound(base.to_string()));
        }
        versions.sort();

        let latest = self
            .store
            .get_metadata(&blob_key(base, LATEST), LATEST_VERSION_FIELD)
            .await?;

        Ok(VersionListing { versions, latest })
    }

    /// Distinct base names in the bucket, identified by their latest alias.
    #[instrument(skip(self))]
    pub async fn list_bases(&self) -> Result<Vec<String>> {
        debug!("Listing all config bases");

        let keys = self.store.list("").await?;
        let mut bases: Vec<String> = keys
            .iter()
            .filter_map(|key| key.split_once('@'))
            .filter(|(_, version)| *version == LATEST)
            .map(|(base, _)| base.to_string())
            .collect();

        bases.sort();
        bases.dedup();
        Ok(bases)
    }
}
