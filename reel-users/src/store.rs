use async_trait::async_trait;
use reel_core::ReelResult;

use crate::models::{UserId, UserProfile, VideoId, VideoRecord};
use crate::patch::ProfileChangeSet;

/// Record store access for user profiles
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, uuid: &UserId) -> ReelResult<Option<UserProfile>>;

    /// Apply `changes` to the profile in a single write.
    ///
    /// Returns `false` when no profile matched.
    async fn update_user(&self, uuid: &UserId, changes: &ProfileChangeSet) -> ReelResult<bool>;
}

/// Record store access for uploaded videos
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Records matching `query`, newest (largest id) first, at most `query.limit`.
    async fn find_videos(&self, query: &VideoQuery) -> ReelResult<Vec<VideoRecord>>;
}

/// One page of an uploader's videos, walking backwards from `before`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
    pub uploader_id: UserId,
    /// Exclusive upper bound on the id
    pub before: Option<VideoId>,
    pub limit: usize,
}

impl VideoQuery {
    pub fn new(uploader_id: UserId, limit: usize) -> Self {
        Self {
            uploader_id,
            before: None,
            limit,
        }
    }

    pub fn before(mut self, cursor: Option<VideoId>) -> Self {
        self.before = cursor;
        self
    }

    /// Filter predicate; ordering and limit are applied by the store.
    pub fn matches(&self, record: &VideoRecord) -> bool {
        record.uploader_id == self.uploader_id
            && self.before.as_ref().map_or(true, |cursor| record.id < *cursor)
    }
}
