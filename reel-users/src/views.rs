//! Response values handed to the controller layer.
//!
//! Asset bytes are serialized as standard base64 strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::models::{UserId, UserProfile, VideoId, VideoRecord};
use crate::patch::FieldUpdate;

/// Keys a composed video entry owns; never copied from record metadata.
const RESERVED_VIDEO_KEYS: &[&str] = &[
    "_id",
    "__v",
    "uploaderId",
    "thumbnailExtension",
    "videoExtension",
    "manifest",
    "thumbnailImage",
];

fn serialize_asset<S: Serializer>(asset: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error> {
    match asset {
        Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

fn serialize_asset_update<S: Serializer>(
    asset: &FieldUpdate<Bytes>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    asset
        .as_set()
        .map(|bytes| STANDARD.encode(bytes))
        .serialize(serializer)
}

/// Public view of a profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub nickname: String,
    pub status_message: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_asset"
    )]
    pub profile_image: Option<Bytes>,
}

impl ProfileView {
    pub fn new(profile: UserProfile, profile_image: Option<Bytes>) -> Self {
        Self {
            nickname: profile.nickname,
            status_message: profile.status_message,
            profile_image,
        }
    }
}

/// Uploader shown alongside a feed page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploaderSummary {
    pub uuid: UserId,
    pub nickname: String,
    pub status_message: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_asset"
    )]
    pub profile_image: Option<Bytes>,
}

impl UploaderSummary {
    /// Drops the internal fields (`_id`, `__v`, image extension) of the stored profile.
    pub fn new(profile: UserProfile, profile_image: Option<Bytes>) -> Self {
        Self {
            uuid: profile.uuid,
            nickname: profile.nickname,
            status_message: profile.status_message,
            profile_image,
        }
    }
}

/// A video as shown in a feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    #[serde(rename = "_id")]
    pub id: VideoId,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
    pub manifest: String,
    #[serde(serialize_with = "serialize_asset")]
    pub thumbnail_image: Option<Bytes>,
}

impl VideoEntry {
    /// Replace the record's internal fields with its resolved assets.
    pub fn compose(record: VideoRecord, manifest: String, thumbnail_image: Option<Bytes>) -> Self {
        let mut metadata = record.metadata;
        metadata.retain(|key, _| !RESERVED_VIDEO_KEYS.contains(&key.as_str()));

        Self {
            id: record.id,
            metadata,
            manifest,
            thumbnail_image,
        }
    }
}

/// One page of an uploader's videos
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPage {
    pub videos: Vec<VideoEntry>,
    pub uploader: UploaderSummary,
}

impl FeedPage {
    /// Cursor for the next (older) page; `None` once a page comes back empty.
    pub fn next_cursor(&self) -> Option<&VideoId> {
        self.videos.last().map(|video| &video.id)
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// Fields a profile update actually changed, with the image echoed as bytes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedProfile {
    #[serde(skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub nickname: FieldUpdate<String>,
    #[serde(skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub status_message: FieldUpdate<String>,
    #[serde(
        skip_serializing_if = "FieldUpdate::is_unchanged",
        serialize_with = "serialize_asset_update"
    )]
    pub profile_image: FieldUpdate<Bytes>,
}
