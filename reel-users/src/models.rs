use reel_core::{ReelError, ReelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable public identity of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a new random user id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from existing string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a video record.
///
/// Always 24 lowercase hex characters, so string order equals creation
/// order and the id doubles as the pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    pub const LEN: usize = 24;

    /// Parse a cursor or id supplied by a caller
    pub fn parse(raw: &str) -> ReelResult<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        if normalized.len() != Self::LEN || !normalized.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ReelError::bad_request(format!("Invalid video id: {:?}", raw)).into_anyhow());
        }
        Ok(Self(normalized))
    }

    /// Id for the `n`-th record of a sequence, zero-padded to full width
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("{:024x}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// A user's profile as persisted in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Storage surrogate key, internal only
    #[serde(rename = "_id")]
    pub record_id: String,
    /// Write counter, internal only
    #[serde(rename = "__v", default)]
    pub version: u32,
    pub uuid: UserId,
    pub nickname: String,
    #[serde(default)]
    pub status_message: String,
    /// `None` means no image is stored
    #[serde(default)]
    pub profile_image_extension: Option<String>,
}

impl UserProfile {
    pub fn new(uuid: UserId, nickname: impl Into<String>) -> Self {
        Self {
            record_id: Uuid::new_v4().simple().to_string(),
            version: 0,
            uuid,
            nickname: nickname.into(),
            status_message: String::new(),
            profile_image_extension: None,
        }
    }

    pub fn with_status_message(mut self, status_message: impl Into<String>) -> Self {
        self.status_message = status_message.into();
        self
    }

    pub fn with_profile_image_extension(mut self, extension: impl Into<String>) -> Self {
        self.profile_image_extension = Some(extension.into());
        self
    }
}

/// An uploaded video as persisted in the record store.
///
/// Descriptive fields (title, content, category, ...) are opaque and kept in
/// `metadata`; they pass through to the feed unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    #[serde(rename = "_id")]
    pub id: VideoId,
    pub uploader_id: UserId,
    #[serde(rename = "__v", default)]
    pub version: u32,
    #[serde(default)]
    pub thumbnail_extension: Option<String>,
    #[serde(default)]
    pub video_extension: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl VideoRecord {
    pub fn new(id: VideoId, uploader_id: UserId) -> Self {
        Self {
            id,
            uploader_id,
            version: 0,
            thumbnail_extension: None,
            video_extension: None,
            metadata: Map::new(),
        }
    }

    pub fn with_thumbnail_extension(mut self, extension: impl Into<String>) -> Self {
        self.thumbnail_extension = Some(extension.into());
        self
    }

    pub fn with_video_extension(mut self, extension: impl Into<String>) -> Self {
        self.video_extension = Some(extension.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn sequence_ids_sort_numerically() {
        let ids: Vec<VideoId> = [1u64, 9, 10, 255, 4096].iter().map(|n| VideoId::from_sequence(*n)).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(VideoId::from_sequence(26).as_str(), "00000000000000000000001a");
    }

    #[test]
    fn parse_accepts_object_ids_only() {
        let id = VideoId::parse(" 65A1F0C2B3D4E5F60718293A ").unwrap();
        assert_eq!(id.as_str(), "65a1f0c2b3d4e5f60718293a");

        let err = VideoId::parse("not-an-id").unwrap_err();
        assert_eq!(ReelError::kind_of(&err), ErrorKind::BadRequest);
        assert!(VideoId::parse("65a1f0c2b3d4e5f60718293").is_err());
    }

    #[test]
    fn video_records_read_opaque_metadata() {
        let record: VideoRecord = serde_json::from_value(json!({
            "_id": "65a1f0c2b3d4e5f60718293a",
            "uploaderId": "user-1",
            "__v": 0,
            "thumbnailExtension": "jpg",
            "title": "sunset",
            "category": "travel"
        }))
        .unwrap();

        assert_eq!(record.thumbnail_extension.as_deref(), Some("jpg"));
        assert_eq!(record.video_extension, None);
        assert_eq!(record.metadata.len(), 2);
        assert_eq!(record.metadata["title"], "sunset");
    }
}
