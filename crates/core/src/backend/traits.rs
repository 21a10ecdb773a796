use async_trait::async_trait;

use crate::content::{Record, RecordId};

use super::Result;

/// Table-level operations on the remote datastore, generic over one row type.
///
/// The remote side owns id assignment and timestamps; every method returns
/// what the backend reports, never locally synthesized rows.
#[async_trait]
pub trait TableApi<E: Record>: Send + Sync {
    /// All rows, newest first (`created_at` descending).
    async fn select_all(&self) -> Result<Vec<E>>;

    /// Exactly one row by id. Zero or many matches is
    /// [`BackendError::NotFound`](super::BackendError::NotFound).
    async fn select_by_id(&self, id: RecordId) -> Result<E>;

    /// Rows where `column` equals `value`.
    async fn select_eq(&self, column: &str, value: &str) -> Result<Vec<E>>;

    /// Rows where `column` contains `query`, case-insensitively.
    async fn search(&self, column: &str, query: &str, limit: usize) -> Result<Vec<E>>;

    /// Insert a row and return it as stored.
    async fn insert(&self, draft: &E::Draft) -> Result<E>;

    /// Apply a partial update and return the row as stored.
    async fn update(&self, id: RecordId, patch: &E::Patch) -> Result<E>;

    /// Delete by id. Deleting an absent row is not an error.
    async fn delete(&self, id: RecordId) -> Result<()>;
}

/// Bucketed object storage on the remote backend.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Store a blob under `bucket/path`.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Remove the object at `bucket/path`.
    async fn remove(&self, bucket: &str, path: &str) -> Result<()>;

    /// Publicly resolvable URL for `bucket/path`.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
