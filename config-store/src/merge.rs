use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

use shared_types::{ConfigIdentifier, Document};

use crate::error::Result;
use crate::repository::ConfigRepository;

/// Combines several stored configs into one document by shallow overwrite.
pub struct MergeEngine {
    repository: Arc<ConfigRepository>,
}

impl MergeEngine {
    pub fn new(repository: Arc<ConfigRepository>) -> Self {
        Self { repository }
    }

    /// Shallow-merge the named documents in argument order.
    ///
    /// Later identifiers win on overlapping top-level keys; nested values
    /// are replaced wholesale, never merged recursively. Source documents
    /// are left untouched and the accumulator is a fresh document.
    #[instrument(skip(self))]
    pub async fn merge(&self, identifiers: &[ConfigIdentifier]) -> Result<Document> {
        let mut merged = Document::new();

        for identifier in identifiers {
            let version = identifier.version_or_latest();
            debug!("Merging {}@{}", identifier.base, version);

            let document = self.repository.fetch(&identifier.base, version).await?;
            for (key, value) in document {
                merged.insert(key, value);
            }
        }

        Ok(merged)
    }

    /// Output identifier used when the caller supplies none: a
    /// timestamp-derived base with the repository's default extension.
    pub fn default_output(&self) -> ConfigIdentifier {
        let base = format!("merged_{}", Utc::now().format("%Y%m%d%H%M%S"));
        ConfigIdentifier::new(
            base,
            Some(self.repository.default_extension().to_string()),
            None,
        )
    }
}
