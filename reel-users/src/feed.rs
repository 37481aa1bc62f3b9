use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt};
use reel_blob::AssetResolver;
use reel_core::{ReelError, ReelResult};
use tracing::{debug, warn};

use crate::config::UsersConfig;
use crate::manifest::ManifestUrlBuilder;
use crate::models::{UserId, VideoId, VideoRecord};
use crate::store::{UserStore, VideoQuery, VideoStore};
use crate::views::{FeedPage, UploaderSummary, VideoEntry};

/// What a feed page does when a single asset cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetFailurePolicy {
    /// The whole page fails with the storage error
    #[default]
    FailPage,
    /// The asset is reported absent and the failure is logged
    DegradeToAbsent,
}

impl FromStr for AssetFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::FailPage),
            "degrade" => Ok(Self::DegradeToAbsent),
            other => Err(ReelError::general_error(format!(
                "Unknown asset failure policy: {:?} (expected \"fail\" or \"degrade\")",
                other
            ))
            .into_anyhow()),
        }
    }
}

/// Assembles an uploader's video feed: profile, one page of records and
/// every record's thumbnail and manifest URL.
pub struct FeedAssembler {
    users: Arc<dyn UserStore>,
    videos: Arc<dyn VideoStore>,
    assets: AssetResolver,
    manifests: ManifestUrlBuilder,
    profile_bucket: String,
    thumbnail_bucket: String,
    concurrency: usize,
    failure_policy: AssetFailurePolicy,
}

impl FeedAssembler {
    pub fn new(
        config: &UsersConfig,
        users: Arc<dyn UserStore>,
        videos: Arc<dyn VideoStore>,
        assets: AssetResolver,
    ) -> Self {
        Self {
            users,
            videos,
            assets,
            manifests: config.manifest_builder(),
            profile_bucket: config.profile_bucket.clone(),
            thumbnail_bucket: config.thumbnail_bucket.clone(),
            concurrency: config.asset_concurrency.max(1),
            failure_policy: config.asset_failure,
        }
    }

    /// One page of `uploader_id`'s videos older than `cursor`, newest first.
    ///
    /// An exhausted cursor yields an empty page with the uploader still filled in.
    pub async fn get_feed(
        &self,
        uploader_id: &UserId,
        limit: usize,
        cursor: Option<&VideoId>,
    ) -> ReelResult<FeedPage> {
        let profile = self
            .users
            .find_user(uploader_id)
            .await?
            .ok_or_else(|| ReelError::not_found(format!("User not found: {}", uploader_id)).into_anyhow())?;

        let query = VideoQuery::new(uploader_id.clone(), limit).before(cursor.cloned());
        let (profile_image, records) = futures::try_join!(
            self.resolve_asset(
                &self.profile_bucket,
                profile.profile_image_extension.as_deref(),
                profile.uuid.as_str(),
            ),
            self.videos.find_videos(&query),
        )?;
        debug!(uploader = %uploader_id, count = records.len(), "loaded video page");

        // buffered() keeps record order whatever order the fetches finish in
        let videos = futures::stream::iter(records)
            .map(|record| self.compose(record))
            .buffered(self.concurrency)
            .try_collect::<Vec<_>>()
            .await?;

        Ok(FeedPage {
            videos,
            uploader: UploaderSummary::new(profile, profile_image),
        })
    }

    async fn compose(&self, record: VideoRecord) -> ReelResult<VideoEntry> {
        let thumbnail = self
            .resolve_asset(
                &self.thumbnail_bucket,
                record.thumbnail_extension.as_deref(),
                record.id.as_str(),
            )
            .await?;
        let manifest = self.manifests.build(record.id.as_str());
        Ok(VideoEntry::compose(record, manifest, thumbnail))
    }

    async fn resolve_asset(
        &self,
        bucket: &str,
        extension: Option<&str>,
        id: &str,
    ) -> ReelResult<Option<Bytes>> {
        match self.assets.resolve(bucket, extension, id).await {
            Ok(asset) => Ok(asset),
            Err(err) => match self.failure_policy {
                AssetFailurePolicy::FailPage => Err(ReelError::from(err).into_anyhow()),
                AssetFailurePolicy::DegradeToAbsent => {
                    warn!(bucket, id, error = %err, "asset unavailable, serving page without it");
                    Ok(None)
                }
            },
        }
    }
}
