use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Draft, Patch, Record, RecordId};

/// Application role, checked by the admin route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Staff,
    Admin,
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

/// A profile row in the `users` table.
///
/// `uuid` links the profile to its identity in the auth subsystem; the two
/// are created together by the user store and reconciled by the auth store
/// when they drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub uuid: Uuid,
    pub email: String,
    pub username: String,
    pub fullname: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for User {
    type Draft = UserDraft;
    type Patch = UserPatch;

    const TABLE: &'static str = "users";
    const SEARCH_COLUMN: &'static str = "username";

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn media_url(&self) -> Option<&str> {
        self.profile_picture_url.as_deref()
    }
}

/// Input for creating an account: the profile fields plus the password that
/// goes to the auth subsystem. The password is never part of the profile row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub fullname: String,
    pub password: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
}

/// Insert payload for the `users` profile table. Built by the user store
/// from a [`NewUser`] once the auth identity exists.
#[derive(Debug, Clone, Serialize)]
pub struct UserDraft {
    pub uuid: Uuid,
    pub email: String,
    pub username: String,
    pub fullname: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl Draft for UserDraft {
    fn set_media_url(&mut self, url: String) {
        self.profile_picture_url = Some(url);
    }
}

/// Partial update payload for [`User`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl Patch for UserPatch {
    fn set_media_url(&mut self, url: String) {
        self.profile_picture_url = Some(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_and_status_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<UserStatus>("\"suspended\"").unwrap(),
            UserStatus::Suspended
        );
    }

    #[test]
    fn patch_skips_unset_fields_on_the_wire() {
        let patch = UserPatch {
            fullname: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["fullname"], "Ada Lovelace");
    }
}
