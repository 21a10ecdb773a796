//! User store: generic CRUD plus account provisioning and the current
//! profile.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use chronica_core::auth::AuthApi;
use chronica_core::backend::{Blob, StorageApi, TableApi};
use chronica_core::content::{
    NewUser, Record, RecordId, User, UserDraft, UserPatch, UserRole, UserStatus,
};

use crate::context::USERS_BUCKET;
use crate::media;

use super::{EntityStore, Result, StoreError, StoreStatus};

/// Store for `users` profile rows and their auth identities.
///
/// Wraps the generic [`EntityStore`] for the CRUD surface and adds the
/// operations that touch the auth subsystem: provisioning an account
/// creates the auth identity before the profile row, deleting one removes
/// both. It also tracks the currently logged-in profile for the guards.
pub struct UserStore<B>
where
    B: TableApi<User> + StorageApi + AuthApi,
{
    store: EntityStore<User, B>,
    backend: Arc<B>,
    current: RwLock<Option<User>>,
}

impl<B> UserStore<B>
where
    B: TableApi<User> + StorageApi + AuthApi,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            store: EntityStore::new(backend.clone(), "User", USERS_BUCKET),
            backend,
            current: RwLock::new(None),
        }
    }

    /// Fetch all profiles, newest first, replacing the cache.
    pub async fn list(&self) -> Vec<User> {
        self.store.list().await
    }

    /// Fetch one profile by id, upserting it into the cache.
    pub async fn get(&self, id: RecordId) -> Option<User> {
        self.store.get(id).await
    }

    /// Case-insensitive username search.
    pub async fn search(&self, query: &str) -> Vec<User> {
        self.store.search(query).await
    }

    /// Apply a partial profile update, optionally replacing the avatar.
    pub async fn update(&self, id: RecordId, patch: UserPatch, media: Option<Blob>) -> Option<User> {
        self.store.update(id, patch, media).await
    }

    /// Provision an account: auth identity first, then the profile row.
    ///
    /// Duplicate email/username pre-checks run before anything is created;
    /// the check is a read-then-write, so two concurrent callers can both
    /// pass it. If the profile insert fails after the avatar upload, the
    /// blob is deleted (best effort); the already-created auth identity is
    /// left in place and reconciled by the next auth-status check.
    pub async fn add_user(&self, new_user: NewUser, media: Option<Blob>) -> Option<User> {
        let status = self.store.status_cell();
        status.begin();

        if let Err(err) = self.check_unique(&new_user).await {
            status.finish_err(err.to_string());
            return None;
        }

        let identity = match self
            .backend
            .admin_create_user(&new_user.email, &new_user.password, true)
            .await
        {
            Ok(identity) => identity,
            Err(err) => {
                status.finish_err(StoreError::from(err).to_string());
                return None;
            }
        };

        let uploaded = match media {
            Some(blob) => {
                match media::upload(self.backend.as_ref(), USERS_BUCKET, blob, None).await {
                    Ok(url) => Some(url),
                    Err(err) => {
                        // Aborts before the profile insert; the identity
                        // created above is not rolled back.
                        status.finish_err(err.to_string());
                        return None;
                    }
                }
            }
            None => None,
        };

        let draft = UserDraft {
            uuid: identity.id,
            email: new_user.email,
            username: new_user.username,
            fullname: new_user.fullname,
            role: new_user.role,
            status: UserStatus::Active,
            phone_number: new_user.phone_number,
            profile_picture_url: uploaded.clone(),
        };

        match TableApi::<User>::insert(self.backend.as_ref(), &draft).await {
            Ok(user) => {
                tracing::debug!(user = %user.uuid, "account provisioned");
                self.store.push_cached(user.clone()).await;
                status.finish_ok(Some("User Created"));
                Some(user)
            }
            Err(err) => {
                if let Some(url) = uploaded {
                    if let Err(cleanup) =
                        media::remove(self.backend.as_ref(), USERS_BUCKET, &url).await
                    {
                        tracing::warn!(error = %cleanup, "orphaned avatar cleanup failed");
                    }
                }
                status.finish_err(StoreError::from(err).to_string());
                None
            }
        }
    }

    /// Delete a profile row, its auth identity, and its avatar.
    pub async fn delete_user(&self, id: RecordId) -> bool {
        let status = self.store.status_cell();
        status.begin();
        match self.try_delete_user(id).await {
            Ok(()) => {
                status.finish_ok(None);
                true
            }
            Err(err) => {
                status.finish_err(err.to_string());
                false
            }
        }
    }

    /// Resolve the session identity to its profile row.
    ///
    /// Records failures and returns them: guards react to this one.
    pub async fn fetch_current_user(&self) -> Result<User> {
        let status = self.store.status_cell();
        status.begin();
        match self.try_fetch_current_user().await {
            Ok(user) => {
                status.finish_ok(None);
                Ok(user)
            }
            Err(err) => {
                *self.current.write().await = None;
                status.finish_err(err.to_string());
                Err(err)
            }
        }
    }

    /// Update the logged-in profile, then re-fetch it.
    ///
    /// Records failures and returns them.
    pub async fn update_profile(&self, patch: UserPatch) -> Result<User> {
        let current = self.current.read().await.clone();
        let Some(current) = current else {
            return Err(StoreError::Validation(
                "No user is currently logged in".to_string(),
            ));
        };

        let status = self.store.status_cell();
        status.begin();
        match self.try_update_profile(current.id, patch).await {
            Ok(user) => {
                status.finish_ok(None);
                Ok(user)
            }
            Err(err) => {
                status.finish_err(err.to_string());
                Err(err)
            }
        }
    }

    /// The logged-in profile, when loaded.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    /// Whether the logged-in profile has the admin role.
    pub async fn is_admin(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|user| user.role == UserRole::Admin)
    }

    /// Drop the logged-in profile.
    pub async fn clear_profile(&self) {
        *self.current.write().await = None;
    }

    /// Snapshot of the cached collection.
    pub async fn items(&self) -> Vec<User> {
        self.store.items().await
    }

    /// Latest status snapshot.
    pub fn status(&self) -> StoreStatus {
        self.store.status()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.store.subscribe()
    }

    /// Clear error and success messages.
    pub fn reset_status(&self) {
        self.store.reset_status();
    }

    /// Duplicate email/username pre-check. Read-then-write by nature.
    async fn check_unique(&self, new_user: &NewUser) -> Result<()> {
        let rows: Vec<User> = self
            .backend
            .select_eq("email", &new_user.email)
            .await
            .map_err(StoreError::from)?;
        if !rows.is_empty() {
            return Err(StoreError::Validation("Email already in use".to_string()));
        }

        let rows: Vec<User> = self
            .backend
            .select_eq("username", &new_user.username)
            .await
            .map_err(StoreError::from)?;
        if !rows.is_empty() {
            return Err(StoreError::Validation("Username already taken".to_string()));
        }

        Ok(())
    }

    async fn try_delete_user(&self, id: RecordId) -> Result<()> {
        let prior = self.store.cached(id).await;

        TableApi::<User>::delete(self.backend.as_ref(), id)
            .await
            .map_err(StoreError::from)?;

        if let Some(user) = &prior {
            // Identity and avatar follow the row, best effort each.
            if let Err(err) = self.backend.admin_delete_user(user.uuid).await {
                tracing::warn!(user = %user.uuid, error = %err, "auth identity delete failed");
            }
            if let Some(url) = user.profile_picture_url.as_deref() {
                if let Err(err) = media::remove(self.backend.as_ref(), USERS_BUCKET, url).await {
                    tracing::warn!(user = %user.uuid, error = %err, "avatar delete failed");
                }
            }
        }

        self.store.remove_cached(id).await;
        Ok(())
    }

    async fn try_fetch_current_user(&self) -> Result<User> {
        let auth_user = self
            .backend
            .get_user()
            .await
            .map_err(StoreError::from)?
            .ok_or_else(|| StoreError::Auth("No user is currently logged in".to_string()))?;

        let mut rows: Vec<User> = self
            .backend
            .select_eq("uuid", &auth_user.id.to_string())
            .await
            .map_err(StoreError::from)?;
        if rows.len() != 1 {
            return Err(StoreError::NotFound {
                entity: User::TABLE,
                id: auth_user.id.to_string(),
            });
        }

        let user = rows.remove(0);
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn try_update_profile(&self, id: RecordId, patch: UserPatch) -> Result<User> {
        TableApi::<User>::update(self.backend.as_ref(), id, &patch)
            .await
            .map_err(StoreError::from)?;
        self.try_fetch_current_user().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            fullname: "Alice Archivist".to_string(),
            password: "s3cret".to_string(),
            role: UserRole::Staff,
            phone_number: None,
        }
    }

    fn avatar() -> Blob {
        Blob::new("avatar.png", "image/png", b"bytes".to_vec())
    }

    #[tokio::test]
    async fn add_user_creates_identity_then_profile() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend.clone());

        let user = store
            .add_user(new_user("alice@example.com", "alice"), Some(avatar()))
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.profile_picture_url.is_some());
        assert_eq!(store.status().success.as_deref(), Some("User Created"));

        // The identity exists and accepts the chosen password.
        let session = backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .unwrap();
        assert_eq!(session.user.id, user.uuid);
    }

    #[tokio::test]
    async fn add_user_rejects_duplicate_email_and_username() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend.clone());

        store
            .add_user(new_user("alice@example.com", "alice"), None)
            .await
            .unwrap();

        assert!(store
            .add_user(new_user("alice@example.com", "alice2"), None)
            .await
            .is_none());
        assert_eq!(store.status().error.as_deref(), Some("Email already in use"));

        assert!(store
            .add_user(new_user("other@example.com", "alice"), None)
            .await
            .is_none());
        assert_eq!(store.status().error.as_deref(), Some("Username already taken"));
    }

    #[tokio::test]
    async fn failed_profile_insert_compensates_the_avatar_but_not_the_identity() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend.clone());

        backend.fail_next_insert();
        assert!(store
            .add_user(new_user("alice@example.com", "alice"), Some(avatar()))
            .await
            .is_none());

        // Avatar compensated away.
        let removed = backend.removed_objects().await;
        assert_eq!(removed.len(), 1);
        assert!(removed[0].starts_with("users/"));
        assert!(store.items().await.is_empty());

        // The identity survives the failure; only the status check cleans
        // it up later.
        assert!(backend.deleted_auth_users().await.is_empty());
        assert!(backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn delete_user_removes_row_identity_and_avatar() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend.clone());

        let user = store
            .add_user(new_user("alice@example.com", "alice"), Some(avatar()))
            .await
            .unwrap();

        assert!(store.delete_user(user.id).await);

        assert!(store.items().await.is_empty());
        assert_eq!(backend.deleted_auth_users().await, vec![user.uuid]);
        let removed = backend.removed_objects().await;
        assert_eq!(removed.len(), 1);
        assert!(store.get(user.id).await.is_none());
    }

    #[tokio::test]
    async fn fetch_current_user_joins_session_and_profile() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend.clone());

        let user = store
            .add_user(new_user("alice@example.com", "alice"), None)
            .await
            .unwrap();
        backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .unwrap();

        let current = store.fetch_current_user().await.unwrap();
        assert_eq!(current, user);
        assert_eq!(store.current_user().await, Some(user));
        assert!(!store.is_admin().await);
    }

    #[tokio::test]
    async fn fetch_current_user_without_a_session_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend);

        let err = store.fetch_current_user().await.unwrap_err();
        assert_eq!(
            err,
            StoreError::Auth("No user is currently logged in".to_string())
        );
        assert!(store.current_user().await.is_none());
    }

    #[tokio::test]
    async fn update_profile_requires_a_loaded_profile() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend);

        let err = store.update_profile(UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn update_profile_refreshes_the_current_user() {
        let backend = Arc::new(MemoryBackend::new());
        let store = UserStore::new(backend.clone());

        store
            .add_user(new_user("alice@example.com", "alice"), None)
            .await
            .unwrap();
        backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .unwrap();
        store.fetch_current_user().await.unwrap();

        let patch = UserPatch {
            fullname: Some("Alice the Great".to_string()),
            ..Default::default()
        };
        let updated = store.update_profile(patch).await.unwrap();

        assert_eq!(updated.fullname, "Alice the Great");
        assert_eq!(
            store.current_user().await.unwrap().fullname,
            "Alice the Great"
        );
    }
}
