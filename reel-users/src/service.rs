use std::sync::Arc;

use reel_blob::{AssetResolver, ObjectStore};
use reel_core::{bail_reel, ReelError, ReelResult};
use tracing::{info, instrument};

use crate::config::UsersConfig;
use crate::feed::FeedAssembler;
use crate::models::{UserId, UserProfile, VideoId};
use crate::patch::ProfilePatch;
use crate::reconciler::ProfileReconciler;
use crate::store::{UserStore, VideoStore};
use crate::views::{FeedPage, ProfileView, UpdatedProfile};

/// Profile and uploaded-video operations exposed to the controller layer.
///
/// Callers are expected to have authenticated the request and to pass only
/// the caller's own id to `patch_profile`.
pub struct UsersService {
    users: Arc<dyn UserStore>,
    assets: AssetResolver,
    reconciler: ProfileReconciler,
    feed: FeedAssembler,
    profile_bucket: String,
}

impl UsersService {
    pub fn new(
        config: UsersConfig,
        users: Arc<dyn UserStore>,
        videos: Arc<dyn VideoStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        let assets = AssetResolver::from_arc(objects);
        Self {
            reconciler: ProfileReconciler::new(assets.clone(), config.profile_bucket.as_str()),
            feed: FeedAssembler::new(&config, users.clone(), videos, assets.clone()),
            profile_bucket: config.profile_bucket,
            users,
            assets,
        }
    }

    #[instrument(skip_all, fields(uuid = %uuid))]
    pub async fn get_profile(&self, uuid: &UserId) -> ReelResult<ProfileView> {
        let profile = self.load_profile(uuid).await?;
        let profile_image = self
            .assets
            .resolve(
                &self.profile_bucket,
                profile.profile_image_extension.as_deref(),
                profile.uuid.as_str(),
            )
            .await
            .map_err(ReelError::from)?;

        Ok(ProfileView::new(profile, profile_image))
    }

    /// Apply `patch` to the caller's profile and echo what changed.
    ///
    /// Fields equal to their stored value are skipped; when nothing is left
    /// the record store is not written at all.
    #[instrument(skip_all, fields(uuid = %uuid))]
    pub async fn patch_profile(&self, uuid: &UserId, patch: ProfilePatch) -> ReelResult<UpdatedProfile> {
        let current = self.load_profile(uuid).await?;
        let reconciliation = self.reconciler.reconcile(&current, patch).await?;

        if !reconciliation.changes.is_empty() {
            let matched = self.users.update_user(uuid, &reconciliation.changes).await?;
            if !matched {
                bail_reel!(not_found, "User not found: {}", uuid);
            }
            info!(fields = ?reconciliation.changes.fields(), "profile updated");
        }

        Ok(reconciliation.response)
    }

    #[instrument(skip_all, fields(uuid = %uuid, limit = limit, cursor = ?cursor))]
    pub async fn get_uploaded_videos(
        &self,
        uuid: &UserId,
        limit: usize,
        cursor: Option<VideoId>,
    ) -> ReelResult<FeedPage> {
        if limit == 0 {
            bail_reel!(bad_request, "limit must be a positive integer");
        }
        self.feed.get_feed(uuid, limit, cursor.as_ref()).await
    }

    async fn load_profile(&self, uuid: &UserId) -> ReelResult<UserProfile> {
        self.users
            .find_user(uuid)
            .await?
            .ok_or_else(|| ReelError::not_found(format!("User not found: {}", uuid)).into_anyhow())
    }
}
