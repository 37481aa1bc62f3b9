//! # reel-users: profiles and uploaded-video feeds
//!
//! Merges records from the record store with assets from the object store:
//!
//! - [`UsersService::get_profile`] resolves the profile image next to the profile fields
//! - [`UsersService::patch_profile`] persists only the fields that really change,
//!   uploading or deleting the profile image as requested
//! - [`UsersService::get_uploaded_videos`] pages through an uploader's videos newest
//!   first, using the last video id of a page as the cursor for the next one
//!
//! ```rust
//! use std::sync::Arc;
//! use reel_blob::MemoryObjectStore;
//! use reel_users::{MemoryRecordStore, UserId, UserProfile, UsersConfig, UsersService};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let records = MemoryRecordStore::new();
//! let uuid = UserId::new();
//! records.insert_user(UserProfile::new(uuid.clone(), "neo"));
//!
//! let config = UsersConfig::new(
//!     "profiles",
//!     "thumbnails",
//!     ("https://cdn/", "360p,720p", "/master.m3u8"),
//! );
//! let users = UsersService::new(
//!     config,
//!     Arc::new(records.clone()),
//!     Arc::new(records),
//!     Arc::new(MemoryObjectStore::new()),
//! );
//!
//! let page = users.get_uploaded_videos(&uuid, 10, None).await?;
//! assert!(page.videos.is_empty());
//! assert_eq!(page.uploader.nickname, "neo");
//! # Ok(())
//! # }
//! ```
//!
//! ## Wiring a binary
//!
//! The embedding process installs logging once, then builds the service from
//! `REEL__*` and `S3_*` environment variables:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reel_blob::S3CompatibleStore;
//! use reel_users::{MemoryRecordStore, UsersConfig, UsersService};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! reel_core::telemetry::init("info,reel_users=debug");
//!
//! let config = UsersConfig::from_env()?;
//! let objects = S3CompatibleStore::from_env().await?;
//! let records = MemoryRecordStore::new(); // swap for the production record store
//! let users = UsersService::new(
//!     config,
//!     Arc::new(records.clone()),
//!     Arc::new(records),
//!     Arc::new(objects),
//! );
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod feed;
pub mod manifest;
pub mod memory_store;
pub mod models;
pub mod patch;
pub mod reconciler;
pub mod service;
pub mod store;
pub mod views;

pub use config::UsersConfig;
pub use feed::{AssetFailurePolicy, FeedAssembler};
pub use manifest::ManifestUrlBuilder;
pub use memory_store::MemoryRecordStore;
pub use models::{UserId, UserProfile, VideoId, VideoRecord};
pub use patch::{FieldChange, FieldUpdate, ImageUpload, ProfileChangeSet, ProfileField, ProfilePatch};
pub use reconciler::{ProfileReconciler, Reconciliation};
pub use service::UsersService;
pub use store::{UserStore, VideoQuery, VideoStore};
pub use views::{FeedPage, ProfileView, UpdatedProfile, UploaderSummary, VideoEntry};
