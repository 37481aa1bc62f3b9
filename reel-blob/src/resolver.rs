use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::store::{asset_key, content_type_for};
use crate::{ObjectStore, PutResult, StoreError, StoreResult};

/// Reads and writes assets whose existence is recorded as an extension field
/// on some record. The same resolver serves profile images and thumbnails;
/// only the bucket and owner id differ.
#[derive(Clone)]
pub struct AssetResolver {
    store: Arc<dyn ObjectStore>,
}

impl AssetResolver {
    pub fn new<S: ObjectStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_arc(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Fetch `{id}.{extension}` from `bucket`.
    ///
    /// No extension means no asset: the store is not contacted.
    pub async fn resolve(
        &self,
        bucket: &str,
        extension: Option<&str>,
        id: &str,
    ) -> StoreResult<Option<Bytes>> {
        let Some(extension) = extension else {
            return Ok(None);
        };

        let key = asset_key(id, extension);
        let asset = self.store.get(bucket, &key).await?;
        debug!(bucket, key = %key, found = asset.is_some(), "resolved asset");
        Ok(asset)
    }

    /// Store `bytes` as the asset of `id`, replacing any previous object under the same key.
    ///
    /// Objects larger than the backend's `max_object_bytes` are rejected
    /// with [`StoreError::Invalid`] before anything is written.
    pub async fn store(
        &self,
        bucket: &str,
        id: &str,
        extension: &str,
        bytes: Bytes,
    ) -> StoreResult<PutResult> {
        let key = asset_key(id, extension);
        let size = bytes.len() as u64;
        if let Some(max) = self.store.capabilities().max_object_bytes {
            if size > max {
                return Err(StoreError::invalid(format!(
                    "object {} is {} bytes, store accepts at most {}",
                    key, size, max
                )));
            }
        }

        let result = self
            .store
            .put(bucket, &key, bytes, Some(content_type_for(extension)))
            .await?;
        debug!(bucket, key = %key, size = result.size_bytes, "stored asset");
        Ok(result)
    }

    /// Delete the asset of `id` stored under `extension`.
    pub async fn remove(&self, bucket: &str, id: &str, extension: &str) -> StoreResult<()> {
        let key = asset_key(id, extension);
        self.store.delete(bucket, &key).await?;
        debug!(bucket, key = %key, "removed asset");
        Ok(())
    }
}
