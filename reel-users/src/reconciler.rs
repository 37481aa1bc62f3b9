use reel_blob::{extension_from_filename, AssetResolver};
use reel_core::{ReelError, ReelResult};

use crate::models::UserProfile;
use crate::patch::{FieldUpdate, ProfileChangeSet, ProfileField, ProfilePatch};
use crate::views::UpdatedProfile;

/// Outcome of reconciling a patch against the stored profile
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Fields to persist; never holds a value equal to the stored one
    pub changes: ProfileChangeSet,
    pub response: UpdatedProfile,
}

/// Computes the minimal profile change set and performs the image side effects.
#[derive(Clone)]
pub struct ProfileReconciler {
    assets: AssetResolver,
    profile_bucket: String,
}

impl ProfileReconciler {
    pub fn new(assets: AssetResolver, profile_bucket: impl Into<String>) -> Self {
        Self {
            assets,
            profile_bucket: profile_bucket.into(),
        }
    }

    /// Object-store writes happen here, before the caller persists `changes`,
    /// so a failed put or delete leaves the record untouched.
    pub async fn reconcile(
        &self,
        current: &UserProfile,
        patch: ProfilePatch,
    ) -> ReelResult<Reconciliation> {
        let mut changes = ProfileChangeSet::new();
        let mut response = UpdatedProfile::default();

        if let Some(nickname) = text_change(&current.nickname, patch.nickname) {
            changes.set(ProfileField::Nickname, nickname.as_str());
            response.nickname = FieldUpdate::Set(nickname);
        }
        if let Some(status_message) = text_change(&current.status_message, patch.status_message) {
            changes.set(ProfileField::StatusMessage, status_message.as_str());
            response.status_message = FieldUpdate::Set(status_message);
        }

        let uuid = current.uuid.as_str();
        match patch.profile_image {
            FieldUpdate::Set(upload) => {
                let extension = extension_from_filename(&upload.filename)
                    .map_err(ReelError::from)?;
                self.assets
                    .store(&self.profile_bucket, uuid, &extension, upload.bytes.clone())
                    .await
                    .map_err(ReelError::from)?;

                // same key was overwritten; the record already points at it
                if current.profile_image_extension.as_deref() != Some(extension.as_str()) {
                    changes.set(ProfileField::ProfileImageExtension, extension);
                }
                response.profile_image = FieldUpdate::Set(upload.bytes);
            }
            FieldUpdate::Clear => {
                if let Some(extension) = current.profile_image_extension.as_deref() {
                    self.assets
                        .remove(&self.profile_bucket, uuid, extension)
                        .await
                        .map_err(ReelError::from)?;
                    changes.unset(ProfileField::ProfileImageExtension);
                    response.profile_image = FieldUpdate::Clear;
                }
            }
            FieldUpdate::Unchanged => {}
        }

        Ok(Reconciliation { changes, response })
    }
}

/// New value of a text field, or `None` when nothing would change.
fn text_change(current: &str, update: FieldUpdate<String>) -> Option<String> {
    let target = match update {
        FieldUpdate::Unchanged => return None,
        FieldUpdate::Clear => String::new(),
        FieldUpdate::Set(value) => value,
    };
    (target != current).then_some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_changes_drop_no_ops() {
        assert_eq!(text_change("neo", FieldUpdate::Set("neo".into())), None);
        assert_eq!(text_change("neo", FieldUpdate::Unchanged), None);
        assert_eq!(text_change("", FieldUpdate::Clear), None);
        assert_eq!(text_change("neo", FieldUpdate::Clear), Some(String::new()));
        assert_eq!(
            text_change("neo", FieldUpdate::Set("trinity".into())),
            Some("trinity".to_string())
        );
    }
}
