pub mod adapter;
pub mod codec;
pub mod config;
pub mod error;
pub mod merge;
pub mod name;
pub mod repository;


use async_trait::async_trait;
use bytes::Bytes;

pub use adapter::ObjectStoreAdapter;
pub use config::StoreConfig;
pub use error::{Result, StorageError};
pub use merge::MergeEngine;
pub use repository::{ConfigRepository, RepositoryOptions};

/// The repository's view of the remote blob store.
///
/// Implementations must report a missing key as `StorageError::KeyNotFound`
/// so callers can tell absence apart from transport failures.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Bytes>;

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Write `key` only if it does not exist yet, failing with
    /// `StorageError::KeyExists` otherwise. This is the single abstraction
    /// point for conditional creation, so stores with atomic conditional
    /// writes can provide them without changing the repository contract.
    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Persist a metadata field alongside the object at `key`.
    async fn set_metadata(&self, key: &str, field: &str, value: &str) -> Result<()>;

    async fn get_metadata(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// All object keys starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
