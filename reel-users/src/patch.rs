//! Requested profile changes and the change set that is actually persisted.
//!
//! A request names each updatable field with a [`FieldUpdate`]:
//! - `Unchanged` → the caller did not mention the field
//! - `Clear`     → the caller explicitly asked to empty / remove it
//! - `Set(v)`    → the caller wants the field to become `v`
//!
//! The reconciler turns a [`ProfilePatch`] into a [`ProfileChangeSet`] that
//! only holds fields whose stored value really changes.

use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::models::UserProfile;

/// Tri-state update of a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FieldUpdate<U> {
        match self {
            FieldUpdate::Unchanged => FieldUpdate::Unchanged,
            FieldUpdate::Clear => FieldUpdate::Clear,
            FieldUpdate::Set(value) => FieldUpdate::Set(f(value)),
        }
    }
}

/// `Clear` serializes as `null`; pair with
/// `skip_serializing_if = "FieldUpdate::is_unchanged"` to omit untouched fields.
impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldUpdate::Set(value) => value.serialize(serializer),
            FieldUpdate::Unchanged | FieldUpdate::Clear => serializer.serialize_none(),
        }
    }
}

/// An uploaded file as received by the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Sparse profile update request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub nickname: FieldUpdate<String>,
    pub status_message: FieldUpdate<String>,
    pub profile_image: FieldUpdate<ImageUpload>,
}

impl ProfilePatch {
    pub const NICKNAME_FIELD: &'static str = "nickname";
    pub const STATUS_MESSAGE_FIELD: &'static str = "statusMessage";
    pub const PROFILE_IMAGE_FIELD: &'static str = "profileImage";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = FieldUpdate::Set(nickname.into());
        self
    }

    pub fn status_message(mut self, status_message: impl Into<String>) -> Self {
        self.status_message = FieldUpdate::Set(status_message.into());
        self
    }

    pub fn clear_status_message(mut self) -> Self {
        self.status_message = FieldUpdate::Clear;
        self
    }

    pub fn upload_image(mut self, upload: ImageUpload) -> Self {
        self.profile_image = FieldUpdate::Set(upload);
        self
    }

    pub fn remove_image(mut self) -> Self {
        self.profile_image = FieldUpdate::Clear;
        self
    }

    /// Translate a multipart-style request: text fields plus an optional file.
    ///
    /// Empty text values leave the field unchanged. A `profileImage` entry
    /// without an uploaded file asks for the stored image to be removed.
    pub fn from_form(fields: &HashMap<String, String>, image: Option<ImageUpload>) -> Self {
        let text = |name: &str| match fields.get(name) {
            Some(value) if !value.is_empty() => FieldUpdate::Set(value.clone()),
            _ => FieldUpdate::Unchanged,
        };

        let profile_image = match image {
            Some(upload) => FieldUpdate::Set(upload),
            None if fields.contains_key(Self::PROFILE_IMAGE_FIELD) => FieldUpdate::Clear,
            None => FieldUpdate::Unchanged,
        };

        Self {
            nickname: text(Self::NICKNAME_FIELD),
            status_message: text(Self::STATUS_MESSAGE_FIELD),
            profile_image,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nickname.is_unchanged()
            && self.status_message.is_unchanged()
            && self.profile_image.is_unchanged()
    }
}

/// Persisted profile fields that an update may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Nickname,
    StatusMessage,
    ProfileImageExtension,
}

impl ProfileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Nickname => "nickname",
            ProfileField::StatusMessage => "statusMessage",
            ProfileField::ProfileImageExtension => "profileImageExtension",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Set(String),
    Unset,
}

/// Minimal set of field writes issued to the record store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChangeSet {
    changes: BTreeMap<ProfileField, FieldChange>,
}

impl ProfileChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        self.changes.insert(field, FieldChange::Set(value.into()));
    }

    pub fn unset(&mut self, field: ProfileField) {
        self.changes.insert(field, FieldChange::Unset);
    }

    pub fn get(&self, field: ProfileField) -> Option<&FieldChange> {
        self.changes.get(&field)
    }

    pub fn contains(&self, field: ProfileField) -> bool {
        self.changes.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.changes.keys().map(ProfileField::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProfileField, &FieldChange)> {
        self.changes.iter()
    }

    /// Apply every change to an in-memory profile
    pub fn apply_to(&self, profile: &mut UserProfile) {
        for (field, change) in &self.changes {
            match (field, change) {
                (ProfileField::Nickname, FieldChange::Set(v)) => profile.nickname = v.clone(),
                (ProfileField::Nickname, FieldChange::Unset) => profile.nickname.clear(),
                (ProfileField::StatusMessage, FieldChange::Set(v)) => {
                    profile.status_message = v.clone()
                }
                (ProfileField::StatusMessage, FieldChange::Unset) => profile.status_message.clear(),
                (ProfileField::ProfileImageExtension, FieldChange::Set(v)) => {
                    profile.profile_image_extension = Some(v.clone())
                }
                (ProfileField::ProfileImageExtension, FieldChange::Unset) => {
                    profile.profile_image_extension = None
                }
            }
        }
    }
}
