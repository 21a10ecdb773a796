//! In-memory backend implementation.
//!
//! Mirrors the remote platform's observable behavior closely enough for
//! tests and offline development: rows live as JSON objects keyed by table
//! name, ids come from one shared counter, blobs sit in a bucket/path map.
//! Destructive calls (object removals, auth identity deletions) are
//! recorded so tests can assert compensation behavior.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use url::Url;
use uuid::Uuid;

use chronica_core::auth::{self, AuthApi, AuthError, AuthUser, OauthProvider, Session};
use chronica_core::backend::{BackendError, Result, StorageApi, TableApi};
use chronica_core::content::{Record, RecordId};

#[derive(Debug, Clone)]
struct RegisteredUser {
    user: AuthUser,
    password: String,
    confirmed: bool,
}

/// In-memory stand-in for the hosted backend platform.
#[derive(Debug)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<&'static str, Vec<Value>>>,
    next_id: AtomicI64,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    removed_objects: RwLock<Vec<String>>,
    auth_users: RwLock<Vec<RegisteredUser>>,
    deleted_auth_users: RwLock<Vec<Uuid>>,
    recovery_mails: RwLock<Vec<String>>,
    session: RwLock<Option<Session>>,
    fail_next_insert: AtomicBool,
    fail_next_upload: AtomicBool,
    fail_next_select: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            objects: RwLock::new(HashMap::new()),
            removed_objects: RwLock::new(Vec::new()),
            auth_users: RwLock::new(Vec::new()),
            deleted_auth_users: RwLock::new(Vec::new()),
            recovery_mails: RwLock::new(Vec::new()),
            session: RwLock::new(None),
            fail_next_insert: AtomicBool::new(false),
            fail_next_upload: AtomicBool::new(false),
            fail_next_select: AtomicBool::new(false),
        }
    }

    /// Seed an auth identity, as if the user had signed up out of band.
    pub async fn register_auth_user(&self, email: &str, password: &str) -> AuthUser {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        self.auth_users.write().await.push(RegisteredUser {
            user: user.clone(),
            password: password.to_string(),
            confirmed: true,
        });
        user
    }

    /// Force a session, for tests exercising session-dependent flows.
    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }

    /// Make the next `insert` fail, regardless of table.
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// Make the next `upload` fail, regardless of bucket.
    pub fn fail_next_upload(&self) {
        self.fail_next_upload.store(true, Ordering::SeqCst);
    }

    /// Make the next `select_all` fail, regardless of table.
    pub fn fail_next_select(&self) {
        self.fail_next_select.store(true, Ordering::SeqCst);
    }

    /// Whether `bucket/path` currently holds an object.
    pub async fn has_object(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .read()
            .await
            .contains_key(&object_key(bucket, path))
    }

    /// Object keys removed from storage, oldest first.
    pub async fn removed_objects(&self) -> Vec<String> {
        self.removed_objects.read().await.clone()
    }

    /// Auth identities deleted through the admin API.
    pub async fn deleted_auth_users(&self) -> Vec<Uuid> {
        self.deleted_auth_users.read().await.clone()
    }

    /// Addresses password-recovery mail was requested for.
    pub async fn recovery_mails(&self) -> Vec<String> {
        self.recovery_mails.read().await.clone()
    }

    async fn rows(&self, table: &'static str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

fn object_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

/// Stringified view of a JSON field, used by equality filters.
fn field_as_string(row: &Value, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decode<E: Record>(row: Value) -> Result<E> {
    serde_json::from_value(row).map_err(|e| BackendError::Query {
        table: E::TABLE,
        message: e.to_string(),
    })
}

#[async_trait]
impl<E: Record> TableApi<E> for MemoryBackend {
    async fn select_all(&self) -> Result<Vec<E>> {
        if self.fail_next_select.swap(false, Ordering::SeqCst) {
            return Err(BackendError::Query {
                table: E::TABLE,
                message: "injected select failure".to_string(),
            });
        }
        let mut decoded = Vec::new();
        for row in self.rows(E::TABLE).await {
            decoded.push(decode::<E>(row)?);
        }
        decoded.sort_by(|a: &E, b: &E| {
            b.created_at()
                .cmp(&a.created_at())
                .then(b.id().cmp(&a.id()))
        });
        Ok(decoded)
    }

    async fn select_by_id(&self, id: RecordId) -> Result<E> {
        let wanted = id.to_string();
        let matched: Vec<Value> = self
            .rows(E::TABLE)
            .await
            .into_iter()
            .filter(|row| field_as_string(row, "id").as_deref() == Some(wanted.as_str()))
            .collect();

        match <[Value; 1]>::try_from(matched) {
            Ok([row]) => decode(row),
            Err(_) => Err(BackendError::NotFound {
                table: E::TABLE,
                id: wanted,
            }),
        }
    }

    async fn select_eq(&self, column: &str, value: &str) -> Result<Vec<E>> {
        let mut decoded = Vec::new();
        for row in self.rows(E::TABLE).await {
            if field_as_string(&row, column).as_deref() == Some(value) {
                decoded.push(decode::<E>(row)?);
            }
        }
        Ok(decoded)
    }

    async fn search(&self, column: &str, query: &str, limit: usize) -> Result<Vec<E>> {
        let needle = query.to_lowercase();
        let mut decoded = Vec::new();
        for row in self.rows(E::TABLE).await {
            let matches = field_as_string(&row, column)
                .is_some_and(|field| field.to_lowercase().contains(&needle));
            if matches {
                decoded.push(decode::<E>(row)?);
                if decoded.len() == limit {
                    break;
                }
            }
        }
        Ok(decoded)
    }

    async fn insert(&self, draft: &E::Draft) -> Result<E> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(BackendError::Query {
                table: E::TABLE,
                message: "injected insert failure".to_string(),
            });
        }

        let mut value = serde_json::to_value(draft).map_err(|e| BackendError::Query {
            table: E::TABLE,
            message: e.to_string(),
        })?;
        let Some(row) = value.as_object_mut() else {
            return Err(BackendError::Query {
                table: E::TABLE,
                message: "draft did not serialize to an object".to_string(),
            });
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        row.insert("id".to_string(), json!(id));
        row.insert("created_at".to_string(), json!(now));
        row.insert("updated_at".to_string(), json!(now));

        let decoded = decode::<E>(value.clone())?;
        self.tables
            .write()
            .await
            .entry(E::TABLE)
            .or_default()
            .push(value);
        Ok(decoded)
    }

    async fn update(&self, id: RecordId, patch: &E::Patch) -> Result<E> {
        let patch_value = serde_json::to_value(patch).map_err(|e| BackendError::Query {
            table: E::TABLE,
            message: e.to_string(),
        })?;
        let Some(patch_fields) = patch_value.as_object() else {
            return Err(BackendError::Query {
                table: E::TABLE,
                message: "patch did not serialize to an object".to_string(),
            });
        };

        let wanted = id.to_string();
        let mut tables = self.tables.write().await;
        let rows = tables.entry(E::TABLE).or_default();
        let Some(row) = rows
            .iter_mut()
            .find(|row| field_as_string(row, "id").as_deref() == Some(wanted.as_str()))
        else {
            return Err(BackendError::NotFound {
                table: E::TABLE,
                id: wanted,
            });
        };
        let Some(fields) = row.as_object_mut() else {
            return Err(BackendError::Query {
                table: E::TABLE,
                message: "stored row is not an object".to_string(),
            });
        };

        for (key, value) in patch_fields {
            fields.insert(key.clone(), value.clone());
        }
        fields.insert("updated_at".to_string(), json!(Utc::now()));

        decode(row.clone())
    }

    async fn delete(&self, id: RecordId) -> Result<()> {
        let wanted = id.to_string();
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(E::TABLE) {
            rows.retain(|row| field_as_string(row, "id").as_deref() != Some(wanted.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageApi for MemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<()> {
        if self.fail_next_upload.swap(false, Ordering::SeqCst) {
            return Err(BackendError::Storage("injected upload failure".to_string()));
        }
        self.objects
            .write()
            .await
            .insert(object_key(bucket, path), bytes);
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let key = object_key(bucket, path);
        self.objects.write().await.remove(&key);
        self.removed_objects.write().await.push(key);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{bucket}/{path}")
    }
}

#[async_trait]
impl AuthApi for MemoryBackend {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> auth::Result<Session> {
        let registered = {
            let users = self.auth_users.read().await;
            users
                .iter()
                .find(|u| u.user.email.as_deref() == Some(email))
                .cloned()
        };
        let Some(registered) = registered else {
            return Err(AuthError::InvalidCredentials);
        };
        if registered.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        if !registered.confirmed {
            return Err(AuthError::EmailNotConfirmed);
        }

        let session = Session {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Some(Uuid::new_v4().to_string()),
            expires_at: Utc::now() + Duration::hours(1),
            user: registered.user,
        };
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OauthProvider,
        redirect_to: &str,
    ) -> auth::Result<Url> {
        let url = format!(
            "memory://oauth/{provider}?redirect_to={}",
            urlencoding::encode(redirect_to)
        );
        Url::parse(&url).map_err(|e| AuthError::Provider(e.to_string()))
    }

    async fn sign_out(&self) -> auth::Result<()> {
        *self.session.write().await = None;
        Ok(())
    }

    async fn get_session(&self) -> auth::Result<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn get_user(&self) -> auth::Result<Option<AuthUser>> {
        Ok(self.session.read().await.as_ref().map(|s| s.user.clone()))
    }

    async fn reset_password_for_email(&self, email: &str) -> auth::Result<()> {
        self.recovery_mails.write().await.push(email.to_string());
        Ok(())
    }

    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        email_confirm: bool,
    ) -> auth::Result<AuthUser> {
        let mut users = self.auth_users.write().await;
        if users.iter().any(|u| u.user.email.as_deref() == Some(email)) {
            return Err(AuthError::Admin("email address already registered".to_string()));
        }
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        users.push(RegisteredUser {
            user: user.clone(),
            password: password.to_string(),
            confirmed: email_confirm,
        });
        Ok(user)
    }

    async fn admin_delete_user(&self, id: Uuid) -> auth::Result<()> {
        self.auth_users.write().await.retain(|u| u.user.id != id);
        self.deleted_auth_users.write().await.push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronica_core::content::{Category, CategoryDraft, CategoryPatch};

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            slug: Some(chronica_core::slug::slugify(name)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_timestamps() {
        let backend = MemoryBackend::new();
        let first: Category = backend.insert(&draft("Antiquity")).await.unwrap();
        let second: Category = backend.insert(&draft("Middle Ages")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn select_all_orders_newest_first() {
        let backend = MemoryBackend::new();
        let _: Category = backend.insert(&draft("First")).await.unwrap();
        let _: Category = backend.insert(&draft("Second")).await.unwrap();

        let rows: Vec<Category> = backend.select_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        // Same-instant timestamps fall back to id order, newest id first.
        assert_eq!(rows[0].name, "Second");
        assert_eq!(rows[1].name, "First");
    }

    #[tokio::test]
    async fn select_by_id_requires_exactly_one_match() {
        let backend = MemoryBackend::new();
        let row: Category = backend.insert(&draft("Antiquity")).await.unwrap();

        let found: Category = backend.select_by_id(row.id).await.unwrap();
        assert_eq!(found, row);

        let missing: Result<Category> = backend.select_by_id(999).await;
        assert!(matches!(missing, Err(BackendError::NotFound { .. })));
    }

    #[tokio::test]
    async fn update_merges_only_the_supplied_fields() {
        let backend = MemoryBackend::new();
        let row: Category = backend.insert(&draft("Antiquity")).await.unwrap();

        let patch = CategoryPatch {
            description: Some("The ancient world".to_string()),
            ..Default::default()
        };
        let updated: Category = backend.update(row.id, &patch).await.unwrap();

        assert_eq!(updated.name, "Antiquity");
        assert_eq!(updated.slug, "antiquity");
        assert_eq!(updated.description.as_deref(), Some("The ancient world"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let backend = MemoryBackend::new();
        let row: Category = backend.insert(&draft("Antiquity")).await.unwrap();

        TableApi::<Category>::delete(&backend, row.id).await.unwrap();
        TableApi::<Category>::delete(&backend, row.id).await.unwrap();

        let rows: Vec<Category> = backend.select_all().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn removals_are_recorded_for_compensation_checks() {
        let backend = MemoryBackend::new();
        backend
            .upload("events", "a.png", b"bytes".to_vec(), "image/png")
            .await
            .unwrap();
        backend.remove("events", "a.png").await.unwrap();

        assert!(!backend.has_object("events", "a.png").await);
        assert_eq!(backend.removed_objects().await, vec!["events/a.png".to_string()]);
    }

    #[tokio::test]
    async fn sign_in_distinguishes_unknown_and_unconfirmed_accounts() {
        let backend = MemoryBackend::new();
        backend.register_auth_user("alice@example.com", "s3cret").await;

        let err = backend
            .sign_in_with_password("alice@example.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);

        backend
            .admin_create_user("bob@example.com", "pw", false)
            .await
            .unwrap();
        let err = backend
            .sign_in_with_password("bob@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::EmailNotConfirmed);

        let session = backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .unwrap();
        assert_eq!(session.user.email.as_deref(), Some("alice@example.com"));
        assert!(backend.get_session().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn admin_delete_removes_and_records_the_identity() {
        let backend = MemoryBackend::new();
        let user = backend.register_auth_user("alice@example.com", "pw").await;

        backend.admin_delete_user(user.id).await.unwrap();

        assert_eq!(backend.deleted_auth_users().await, vec![user.id]);
        let err = backend
            .sign_in_with_password("alice@example.com", "pw")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }
}
