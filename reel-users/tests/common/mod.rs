#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use reel_blob::{
    MemoryObjectStore, ObjectStore, PutResult, StoreCapabilities, StoreError, StoreResult,
};
use reel_users::{MemoryRecordStore, UserId, UserProfile, UsersConfig, UsersService};

pub const PROFILE_BUCKET: &str = "profiles";
pub const THUMBNAIL_BUCKET: &str = "thumbnails";

pub fn config() -> UsersConfig {
    UsersConfig::new(
        PROFILE_BUCKET,
        THUMBNAIL_BUCKET,
        ("https://cdn/", "360p,720p", "/master.m3u8"),
    )
}

/// Memory-backed object store with scripted failures, delays and call counters.
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryObjectStore,
    failing_keys: HashSet<String>,
    fail_writes: bool,
    delays: HashMap<String, Duration>,
    gets: AtomicUsize,
    deletes: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

impl ScriptedStore {
    pub fn new(inner: MemoryObjectStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_key(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn delay_key(mut self, key: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(key.into(), delay);
        self
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Keys in the order their `get` finished
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().clone()
    }

    fn transport_error() -> StoreError {
        StoreError::backend(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "object store timed out",
        ))
    }
}

#[async_trait]
impl ObjectStore for ScriptedStore {
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Option<Bytes>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(key)
            .copied()
            .unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().push(key.to_string());

        if self.failing_keys.contains(key) {
            return Err(Self::transport_error());
        }
        self.inner.get(bucket, key).await
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<PutResult> {
        if self.fail_writes {
            return Err(Self::transport_error());
        }
        self.inner.put(bucket, key, body, content_type).await
    }

    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(Self::transport_error());
        }
        self.inner.delete(bucket, key).await
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::basic()
    }
}

pub struct Harness {
    pub uuid: UserId,
    pub records: MemoryRecordStore,
    pub objects: MemoryObjectStore,
    pub service: UsersService,
}

/// Service over memory stores with one user, `neo`, and no image.
pub fn harness() -> Harness {
    harness_with(config(), |objects| Arc::new(objects) as Arc<dyn ObjectStore>)
}

/// Like [`harness`], with the object store wrapped by `wrap`.
pub fn harness_with<F>(config: UsersConfig, wrap: F) -> Harness
where
    F: FnOnce(MemoryObjectStore) -> Arc<dyn ObjectStore>,
{
    let records = MemoryRecordStore::new();
    let objects = MemoryObjectStore::new();
    let uuid = UserId::new();
    records.insert_user(UserProfile::new(uuid.clone(), "neo").with_status_message("wake up"));

    let service = UsersService::new(
        config,
        Arc::new(records.clone()),
        Arc::new(records.clone()),
        wrap(objects.clone()),
    );

    Harness {
        uuid,
        records,
        objects,
        service,
    }
}
