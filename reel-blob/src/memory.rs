use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{ObjectStore, PutResult, StoreCapabilities, StoreResult};

type Objects = HashMap<(String, String), Bytes>;

/// In-memory object store for testing and development
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<Objects>>,
    max_object_bytes: Option<u64>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise a per-object size limit, like a real backend would
    pub fn with_max_object_bytes(mut self, bytes: u64) -> Self {
        self.max_object_bytes = Some(bytes);
        self
    }

    /// Seed an object directly
    pub fn insert(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), body.into());
    }

    /// Whether an object exists, without going through the async API
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Number of objects stored in `bucket`
    pub fn count_in(&self, bucket: &str) -> usize {
        self.objects
            .read()
            .keys()
            .filter(|(b, _)| b == bucket)
            .count()
    }

    /// Whether no bucket holds any object
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Option<Bytes>> {
        Ok(self
            .objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        _content_type: Option<&str>,
    ) -> StoreResult<PutResult> {
        let size_bytes = body.len() as u64;
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), body);

        Ok(PutResult {
            etag: None,
            size_bytes,
        })
    }

    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.objects
            .write()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    fn capabilities(&self) -> StoreCapabilities {
        match self.max_object_bytes {
            Some(max) => StoreCapabilities::basic().with_max_object_bytes(max),
            None => StoreCapabilities::basic(),
        }
    }
}
