use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reel_core::ReelResult;

use crate::models::{UserId, UserProfile, VideoId, VideoRecord};
use crate::patch::ProfileChangeSet;
use crate::store::{UserStore, VideoQuery, VideoStore};

/// In-memory record store for testing and development
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    /// Ordered by id so pages can be read newest-first
    videos: Arc<RwLock<BTreeMap<VideoId, VideoRecord>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, profile: UserProfile) {
        self.users.write().insert(profile.uuid.clone(), profile);
    }

    pub fn insert_video(&self, record: VideoRecord) {
        self.videos.write().insert(record.id.clone(), record);
    }

    /// Current stored profile, bypassing the async API
    pub fn user(&self, uuid: &UserId) -> Option<UserProfile> {
        self.users.read().get(uuid).cloned()
    }

    pub fn video_count(&self) -> usize {
        self.videos.read().len()
    }
}

#[async_trait]
impl UserStore for MemoryRecordStore {
    async fn find_user(&self, uuid: &UserId) -> ReelResult<Option<UserProfile>> {
        Ok(self.user(uuid))
    }

    async fn update_user(&self, uuid: &UserId, changes: &ProfileChangeSet) -> ReelResult<bool> {
        let mut users = self.users.write();
        let Some(profile) = users.get_mut(uuid) else {
            return Ok(false);
        };
        changes.apply_to(profile);
        profile.version += 1;
        Ok(true)
    }
}

#[async_trait]
impl VideoStore for MemoryRecordStore {
    async fn find_videos(&self, query: &VideoQuery) -> ReelResult<Vec<VideoRecord>> {
        let videos = self.videos.read();
        Ok(videos
            .values()
            .rev()
            .filter(|record| query.matches(record))
            .take(query.limit)
            .cloned()
            .collect())
    }
}
