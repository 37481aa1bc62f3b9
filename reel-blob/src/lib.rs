//! # reel-blob: object storage for media assets
//!
//! Assets (profile images, video thumbnails) live in an external object store
//! under `{owner_id}.{extension}`. The owning record keeps only the extension;
//! a present extension is the single source of truth that an asset exists.
//!
//! ```text
//! ┌─────────────────┐
//! │  Your Service   │  ← knows buckets and owner ids
//! ├─────────────────┤
//! │  AssetResolver  │  ← key derivation, skip I/O when nothing is stored
//! ├─────────────────┤
//! │  ObjectStore    │  ← get/put/delete primitives (S3, memory, custom)
//! └─────────────────┘
//! ```
//!
//! ```rust
//! use bytes::Bytes;
//! use reel_blob::{AssetResolver, MemoryObjectStore};
//!
//! # #[tokio::main]
//! # async fn main() -> reel_blob::StoreResult<()> {
//! let assets = AssetResolver::new(MemoryObjectStore::new());
//! assets.store("profiles", "user-1", "png", Bytes::from_static(b"\x89PNG")).await?;
//!
//! let image = assets.resolve("profiles", Some("png"), "user-1").await?;
//! assert_eq!(image.as_deref(), Some(&b"\x89PNG"[..]));
//!
//! // no extension: nothing is fetched
//! assert!(assets.resolve("profiles", None, "user-1").await?.is_none());
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod resolver;
mod s3_store;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryObjectStore;
pub use resolver::AssetResolver;
pub use s3_store::{S3CompatibleStore, S3Config};
pub use store::{
    asset_key, content_type_for, extension_from_filename, ObjectStore, PutResult,
    StoreCapabilities,
};
