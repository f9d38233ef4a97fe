use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which bucket/namespace the repository binds to. Threaded explicitly
/// through construction so a process can hold several independent
/// repositories (tests in particular).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoreConfig {
    Local { path: PathBuf },
    S3 { bucket: String },
}

impl StoreConfig {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn s3(bucket: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
        }
    }

    /// `file://<path>` selects the local backend; anything else names an
    /// S3 bucket.
    pub fn from_bucket(bucket: &str) -> Self {
        match bucket.strip_prefix("file://") {
            Some(path) => Self::local(path),
            None => Self::s3(bucket),
        }
    }
}
