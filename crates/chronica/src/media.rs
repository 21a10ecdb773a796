//! Blob transfer helper binding media lifecycles to entity rows.
//!
//! Upload-then-insert and delete-then-upload are best-effort two-step
//! sequences, not transactions; callers compensate where they can.

use uuid::Uuid;

use chronica_core::backend::{Blob, StorageApi};

use crate::stores::{Result, StoreError};

/// Upload a blob into `bucket` and return its public URL.
///
/// When `path` is omitted, a collision-resistant object name is generated
/// from a fresh UUID plus the blob's original extension.
pub async fn upload<S>(
    storage: &S,
    bucket: &str,
    blob: Blob,
    path: Option<&str>,
) -> Result<String>
where
    S: StorageApi + ?Sized,
{
    let path = match path {
        Some(path) => path.to_string(),
        None => match blob.extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        },
    };

    storage
        .upload(bucket, &path, blob.bytes, &blob.content_type)
        .await
        .map_err(|e| StoreError::Upload(e.to_string()))?;

    Ok(storage.public_url(bucket, &path))
}

/// Remove the blob a public URL points at from `bucket`.
///
/// The object key is derived from the trailing path segment of `url`. An
/// empty URL is silently a no-op (`Ok(false)`); a remote failure propagates
/// to the caller.
pub async fn remove<S>(storage: &S, bucket: &str, url: &str) -> Result<bool>
where
    S: StorageApi + ?Sized,
{
    if url.is_empty() {
        return Ok(false);
    }
    let Some(path) = url.rsplit('/').next().filter(|segment| !segment.is_empty()) else {
        return Ok(false);
    };

    storage
        .remove(bucket, path)
        .await
        .map_err(|e| StoreError::Delete(e.to_string()))?;

    Ok(true)
}
