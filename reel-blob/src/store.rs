use async_trait::async_trait;
use bytes::Bytes;

use crate::{StoreError, StoreResult};

/// Bucket/key object storage - must be implemented by all storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object. A missing key is `Ok(None)`, never an error.
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Option<Bytes>>;

    /// Store an object, replacing any existing one under the same key
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> StoreResult<PutResult>;

    /// Delete an object. Deleting a missing key succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()>;

    /// Write limits, checked by [`crate::AssetResolver`] before every put
    fn capabilities(&self) -> StoreCapabilities;
}

/// Result of a successful put operation
#[derive(Debug, Clone)]
pub struct PutResult {
    pub etag: Option<String>,
    pub size_bytes: u64,
}

/// Limits a backend imposes on writes
#[derive(Debug, Clone, Default)]
pub struct StoreCapabilities {
    /// Largest object a single `put` accepts; `None` means unbounded
    pub max_object_bytes: Option<u64>,
}

impl StoreCapabilities {
    pub fn basic() -> Self {
        Self {
            max_object_bytes: None,
        }
    }

    pub fn with_max_object_bytes(mut self, bytes: u64) -> Self {
        self.max_object_bytes = Some(bytes);
        self
    }
}

/// Object key of an asset owned by `id`: `{id}.{extension}`.
pub fn asset_key(id: &str, extension: &str) -> String {
    format!("{}.{}", id, extension)
}

/// Extension of an uploaded file: the text after the last `.`.
///
/// A name without a dot is its own extension. An empty result is rejected
/// because an empty extension would read back as "no asset stored".
pub fn extension_from_filename(filename: &str) -> StoreResult<String> {
    let extension = filename.rsplit('.').next().unwrap_or_default().trim();
    if extension.is_empty() {
        return Err(StoreError::invalid(format!(
            "cannot derive a file extension from {:?}",
            filename
        )));
    }
    Ok(extension.to_string())
}

/// Best-effort MIME type for an image extension
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_keys_join_id_and_extension() {
        assert_eq!(asset_key("8c1f", "png"), "8c1f.png");
    }

    #[test]
    fn extension_is_taken_after_last_dot() {
        assert_eq!(extension_from_filename("me.final.JPG").unwrap(), "JPG");
        assert_eq!(extension_from_filename("avatar").unwrap(), "avatar");
        assert!(extension_from_filename("trailing.").is_err());
        assert!(extension_from_filename("").is_err());
    }

    #[test]
    fn content_types_fall_back_to_octet_stream() {
        assert_eq!(content_type_for("JPEG"), "image/jpeg");
        assert_eq!(content_type_for("webp"), "image/webp");
        assert_eq!(content_type_for("bmpx"), "application/octet-stream");
    }
}
