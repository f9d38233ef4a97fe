use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{ObjectStore, PutMode, PutOptions, PutPayload};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::StoreConfig;
use crate::error::{Result, StorageError};
use crate::BlobStore;

/// Prefix namespacing the sidecar objects that carry a key's metadata
/// fields. Bases and versions cannot contain `/`, so no blob key can
/// collide with a sidecar. Sidecars never appear in listings.
const META_PREFIX: &str = "meta/";

pub struct ObjectStoreAdapter {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreAdapter {
    pub fn from_config(config: StoreConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config {
            StoreConfig::Local { path } => {
                info!("Initializing local store at: {:?}", path);
                Arc::new(LocalFileSystem::new_with_prefix(path)?)
            }
            StoreConfig::S3 { bucket } => {
                info!("Initializing S3 store for bucket: {}", bucket);
                Arc::new(
                    AmazonS3Builder::from_env()
                        .with_bucket_name(bucket)
                        .build()?,
                )
            }
        };

        Ok(Self { store })
    }

    fn sidecar_path(key: &str) -> Path {
        Path::from(format!("{META_PREFIX}{key}"))
    }

    async fn read_sidecar(&self, key: &str) -> Result<BTreeMap<String, String>> {
        match self.store.get(&Self::sidecar_path(key)).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
            Err(object_store::Error::NotFound { .. }) => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl BlobStore for ObjectStoreAdapter {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Bytes> {
        debug!("Fetching blob: {}", key);

        match self.store.get(&Path::from(key)).await {
            Ok(result) => Ok(result.bytes().await?),
            Err(object_store::Error::NotFound { .. }) => {
                Err(StorageError::KeyNotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, bytes))]
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        debug!("Writing blob: {} ({} bytes)", key, bytes.len());

        self.store
            .put(&Path::from(key), PutPayload::from(bytes))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, bytes))]
    async fn put_if_absent(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        debug!("Conditionally writing blob: {} ({} bytes)", key, bytes.len());

        let options = PutOptions::from(PutMode::Create);
        match self
            .store
            .put_opts(&Path::from(key), PutPayload::from(bytes), options)
            .await
        {
            Ok(_) => Ok(()),
            Err(object_store::Error::AlreadyExists { .. }) => {
                Err(StorageError::KeyExists(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn set_metadata(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut fields = self.read_sidecar(key).await?;
        fields.insert(field.to_string(), value.to_string());

        let json = serde_json::to_vec_pretty(&fields)?;
        self.store
            .put(&Self::sidecar_path(key), PutPayload::from(json))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_metadata(&self, key: &str, field: &str) -> Result<Option<String>> {
        let fields = self.read_sidecar(key).await?;
        Ok(fields.get(field).cloned())
    }

    #[instrument(skip(self))]
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        debug!("Listing keys with prefix: {:?}", prefix);

        // Keys are flat (`base@version`), so object_store's segment-based
        // prefix listing cannot narrow them; filter by string prefix here.
        let mut keys = Vec::new();
        let mut stream = self.store.list(None);

        while let Some(meta) = stream.next().await.transpose()? {
            let key = meta.location.as_ref().to_string();
            if key.starts_with(META_PREFIX) || !key.starts_with(prefix) {
                continue;
            }
            keys.push(key);
        }

        keys.sort();
        Ok(keys)
    }
}
