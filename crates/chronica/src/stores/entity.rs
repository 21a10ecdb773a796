//! Generic cached CRUD store, parametrized per entity type.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use chronica_core::backend::{Blob, StorageApi, TableApi};
use chronica_core::content::{
    Category, Draft, Event, Patch, Person, Record, RecordId, Resource,
};
use chronica_core::slug::unique_slug;

use crate::media;

use super::{Result, StatusCell, StoreStatus};

/// Rows returned by a `search`, matching the remote page size.
const SEARCH_LIMIT: usize = 10;

/// Cached CRUD store for one entity type.
///
/// Owns an in-memory mirror of the remote table plus the entity's media
/// bucket. The mirror is a cache, not a source of truth: it is replaced or
/// spliced from the last successful remote response and never mutated
/// speculatively. Operations are sequences of awaited remote calls with no
/// internal locking across calls; two concurrent operations on the same
/// store race on the remote write and the cache, and the last response to
/// resolve wins.
///
/// Failures are recorded as user-facing strings on the store's status and
/// the operation resolves with an empty sentinel (`None`, `false`, `vec![]`)
/// rather than propagating.
pub struct EntityStore<E, B>
where
    E: Record,
    B: TableApi<E> + StorageApi,
{
    backend: Arc<B>,
    entity: &'static str,
    bucket: &'static str,
    items: RwLock<Vec<E>>,
    status: StatusCell,
}

pub type CategoryStore<B> = EntityStore<Category, B>;
pub type EventStore<B> = EntityStore<Event, B>;
pub type PersonStore<B> = EntityStore<Person, B>;
pub type ResourceStore<B> = EntityStore<Resource, B>;

impl<E, B> EntityStore<E, B>
where
    E: Record,
    B: TableApi<E> + StorageApi,
{
    /// Creates an empty store over `backend`.
    ///
    /// `entity` is the display name used in status messages, `bucket` the
    /// storage bucket owning this entity's blobs.
    pub fn new(backend: Arc<B>, entity: &'static str, bucket: &'static str) -> Self {
        Self {
            backend,
            entity,
            bucket,
            items: RwLock::new(Vec::new()),
            status: StatusCell::new(),
        }
    }

    /// Fetch all rows, newest first, replacing the cache entirely.
    ///
    /// On failure the cache is left unchanged and the result is empty.
    pub async fn list(&self) -> Vec<E> {
        self.status.begin();
        match self.try_list().await {
            Ok(rows) => {
                self.status.finish_ok(None);
                rows
            }
            Err(err) => {
                tracing::warn!(entity = self.entity, error = %err, "list failed");
                self.status.finish_err(err.to_string());
                Vec::new()
            }
        }
    }

    /// Fetch a single row by id and upsert it into the cache.
    pub async fn get(&self, id: RecordId) -> Option<E> {
        self.status.begin();
        match self.try_get(id).await {
            Ok(row) => {
                self.status.finish_ok(None);
                Some(row)
            }
            Err(err) => {
                self.status.finish_err(err.to_string());
                None
            }
        }
    }

    /// Insert a new row, uploading its media first when given.
    ///
    /// The slug is derived from the draft's display name, made unique
    /// against the cached siblings. An upload failure aborts before the
    /// remote insert; an insert failure after a successful upload triggers
    /// a best-effort delete of the uploaded blob.
    pub async fn create(&self, draft: E::Draft, media: Option<Blob>) -> Option<E> {
        self.status.begin();

        let uploaded = match media {
            Some(blob) => {
                match media::upload(self.backend.as_ref(), self.bucket, blob, None).await {
                    Ok(url) => Some(url),
                    Err(err) => {
                        self.status.finish_err(err.to_string());
                        return None;
                    }
                }
            }
            None => None,
        };

        match self.try_insert(draft, uploaded.clone()).await {
            Ok(row) => {
                tracing::debug!(entity = self.entity, id = row.id(), "record created");
                self.status.finish_ok(Some(&format!("{} Added", self.entity)));
                Some(row)
            }
            Err(err) => {
                // The insert failed after the blob landed: delete it so the
                // upload is not orphaned. Best effort; the insert error is
                // what surfaces.
                if let Some(url) = uploaded {
                    if let Err(cleanup) =
                        media::remove(self.backend.as_ref(), self.bucket, &url).await
                    {
                        tracing::warn!(
                            entity = self.entity,
                            error = %cleanup,
                            "orphaned upload cleanup failed"
                        );
                    }
                }
                self.status.finish_err(err.to_string());
                None
            }
        }
    }

    /// Apply a partial update, optionally replacing the media slot.
    ///
    /// With media, the prior blob is deleted before the new one uploads;
    /// nothing restores it if the remote update then fails. The slug moves
    /// only when the patch carries a new display name.
    pub async fn update(&self, id: RecordId, mut patch: E::Patch, media: Option<Blob>) -> Option<E> {
        self.status.begin();

        if let Some(blob) = media {
            let prior = {
                let items = self.items.read().await;
                items
                    .iter()
                    .find(|e| e.id() == id)
                    .and_then(|e| e.media_url().map(str::to_string))
            };
            if let Some(url) = prior {
                if let Err(err) = media::remove(self.backend.as_ref(), self.bucket, &url).await {
                    tracing::warn!(
                        entity = self.entity,
                        id,
                        error = %err,
                        "previous media delete failed"
                    );
                }
            }

            match media::upload(self.backend.as_ref(), self.bucket, blob, None).await {
                Ok(url) => patch.set_media_url(url),
                Err(err) => {
                    self.status.finish_err(err.to_string());
                    return None;
                }
            }
        }

        let renamed = patch.display_name().map(str::to_string);
        if let Some(name) = renamed {
            let slug = {
                let items = self.items.read().await;
                unique_slug(
                    &name,
                    items
                        .iter()
                        .filter(|e| e.id() != id)
                        .filter_map(Record::slug),
                )
            };
            patch.set_slug(slug);
        }

        match self.try_update(id, patch).await {
            Ok(row) => {
                tracing::debug!(entity = self.entity, id, "record updated");
                self.status.finish_ok(Some(&format!("{} Updated", self.entity)));
                Some(row)
            }
            Err(err) => {
                self.status.finish_err(err.to_string());
                None
            }
        }
    }

    /// Delete a row, then its blob (best effort), then drop it from cache.
    pub async fn remove(&self, id: RecordId) -> bool {
        self.status.begin();
        match self.try_remove(id).await {
            Ok(()) => {
                tracing::debug!(entity = self.entity, id, "record deleted");
                self.status.finish_ok(None);
                true
            }
            Err(err) => {
                self.status.finish_err(err.to_string());
                false
            }
        }
    }

    /// Case-insensitive substring search; the result page replaces the cache.
    pub async fn search(&self, query: &str) -> Vec<E> {
        self.status.begin();
        match self.try_search(query).await {
            Ok(rows) => {
                self.status.finish_ok(None);
                rows
            }
            Err(err) => {
                self.status.finish_err(err.to_string());
                Vec::new()
            }
        }
    }

    /// Snapshot of the cached collection.
    pub async fn items(&self) -> Vec<E> {
        self.items.read().await.clone()
    }

    /// Cached row by id, without touching the remote.
    pub async fn cached(&self, id: RecordId) -> Option<E> {
        self.items.read().await.iter().find(|e| e.id() == id).cloned()
    }

    /// Latest status snapshot.
    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    /// Clear error and success messages.
    pub fn reset_status(&self) {
        self.status.reset();
    }

    pub(crate) fn status_cell(&self) -> &StatusCell {
        &self.status
    }

    pub(crate) async fn push_cached(&self, row: E) {
        self.items.write().await.push(row);
    }

    pub(crate) async fn remove_cached(&self, id: RecordId) {
        self.items.write().await.retain(|e| e.id() != id);
    }

    async fn try_list(&self) -> Result<Vec<E>> {
        let rows = self.backend.select_all().await?;
        *self.items.write().await = rows.clone();
        Ok(rows)
    }

    async fn try_get(&self, id: RecordId) -> Result<E> {
        let row = self.backend.select_by_id(id).await?;
        let mut items = self.items.write().await;
        match items.iter_mut().find(|e| e.id() == id) {
            Some(existing) => *existing = row.clone(),
            None => items.push(row.clone()),
        }
        Ok(row)
    }

    async fn try_insert(&self, mut draft: E::Draft, media_url: Option<String>) -> Result<E> {
        if let Some(url) = media_url {
            draft.set_media_url(url);
        }

        let slug = match draft.display_name() {
            Some(name) => {
                let items = self.items.read().await;
                Some(unique_slug(name, items.iter().filter_map(Record::slug)))
            }
            None => None,
        };
        if let Some(slug) = slug {
            draft.set_slug(slug);
        }

        let row = self.backend.insert(&draft).await?;
        self.items.write().await.push(row.clone());
        Ok(row)
    }

    async fn try_update(&self, id: RecordId, patch: E::Patch) -> Result<E> {
        let row = self.backend.update(id, &patch).await?;
        let mut items = self.items.write().await;
        if let Some(existing) = items.iter_mut().find(|e| e.id() == id) {
            *existing = row.clone();
        }
        Ok(row)
    }

    async fn try_remove(&self, id: RecordId) -> Result<()> {
        let prior = {
            let items = self.items.read().await;
            items
                .iter()
                .find(|e| e.id() == id)
                .and_then(|e| e.media_url().map(str::to_string))
        };

        self.backend.delete(id).await?;

        // Row first, blob second: a storage failure here must not
        // resurrect the already-deleted row.
        if let Some(url) = prior {
            if let Err(err) = media::remove(self.backend.as_ref(), self.bucket, &url).await {
                tracing::warn!(
                    entity = self.entity,
                    id,
                    error = %err,
                    "media delete after row delete failed"
                );
            }
        }

        self.items.write().await.retain(|e| e.id() != id);
        Ok(())
    }

    async fn try_search(&self, query: &str) -> Result<Vec<E>> {
        let rows = self
            .backend
            .search(E::SEARCH_COLUMN, query, SEARCH_LIMIT)
            .await?;
        *self.items.write().await = rows.clone();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chronica_core::content::{CategoryDraft, CategoryPatch};

    fn store(backend: &Arc<MemoryBackend>) -> CategoryStore<MemoryBackend> {
        EntityStore::new(backend.clone(), "Category", "categories")
    }

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn png() -> Blob {
        Blob::new("cover.png", "image/png", b"bytes".to_vec())
    }

    #[tokio::test]
    async fn create_appends_to_cache_and_derives_the_slug() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);

        let created = store.create(draft("Ancient Rome"), None).await.unwrap();
        assert_eq!(created.slug, "ancient-rome");
        assert_eq!(store.status().success.as_deref(), Some("Category Added"));

        let listed = store.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn create_makes_the_slug_unique_against_cached_siblings() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);

        let first = store.create(draft("Rome"), None).await.unwrap();
        let second = store.create(draft("Rome"), None).await.unwrap();

        assert_eq!(first.slug, "rome");
        assert_eq!(second.slug, "rome-1");
    }

    #[tokio::test]
    async fn get_upserts_and_reports_missing_rows() {
        let backend = Arc::new(MemoryBackend::new());
        let writer = store(&backend);
        let reader = store(&backend);

        let created = writer.create(draft("Rome"), None).await.unwrap();

        // The reader has an empty cache; get() must fill it.
        let fetched = reader.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(reader.items().await.len(), 1);

        assert!(reader.get(999).await.is_none());
        let status = reader.status();
        assert!(status.error.as_deref().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn upload_failure_aborts_before_the_insert() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);

        backend.fail_next_upload();
        assert!(store.create(draft("Rome"), Some(png())).await.is_none());

        assert!(store.items().await.is_empty());
        let remote: Vec<chronica_core::content::Category> =
            TableApi::select_all(backend.as_ref()).await.unwrap();
        assert!(remote.is_empty());
        assert!(store.status().error.is_some());
    }

    #[tokio::test]
    async fn insert_failure_after_upload_deletes_the_blob() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);

        backend.fail_next_insert();
        assert!(store.create(draft("Rome"), Some(png())).await.is_none());

        // The uploaded blob was compensated away and the cache is unchanged.
        let removed = backend.removed_objects().await;
        assert_eq!(removed.len(), 1);
        assert!(removed[0].starts_with("categories/"));
        assert!(removed[0].ends_with(".png"));
        assert!(!backend.has_object("categories", removed[0].trim_start_matches("categories/")).await);
        assert!(store.items().await.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_media_and_recomputes_the_slug() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);

        let created = store.create(draft("Rome"), Some(png())).await.unwrap();
        let old_url = created.image_url.clone().unwrap();

        let patch = CategoryPatch {
            name: Some("Byzantium".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id, patch, Some(png())).await.unwrap();

        assert_eq!(updated.name, "Byzantium");
        assert_eq!(updated.slug, "byzantium");
        assert_ne!(updated.image_url, Some(old_url.clone()));

        // The prior blob is gone.
        let old_path = old_url.rsplit('/').next().unwrap();
        assert!(!backend.has_object("categories", old_path).await);

        // The cache was spliced in place.
        let items = store.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], updated);
    }

    #[tokio::test]
    async fn remove_deletes_row_then_blob_then_cache_entry() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);

        let created = store.create(draft("Rome"), Some(png())).await.unwrap();
        let path = created
            .image_url
            .as_deref()
            .unwrap()
            .rsplit('/')
            .next()
            .unwrap()
            .to_string();

        assert!(store.remove(created.id).await);

        assert!(store.items().await.is_empty());
        assert!(!backend.has_object("categories", &path).await);
        assert!(store.get(created.id).await.is_none());
        assert!(store.status().error.as_deref().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn list_failure_leaves_the_cache_unchanged() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);
        store.create(draft("Rome"), None).await.unwrap();

        backend.fail_next_select();

        assert!(store.list().await.is_empty());
        assert!(store.status().error.is_some());
        assert_eq!(store.items().await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_updates_last_response_wins() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);
        let created = store.create(draft("Rome"), None).await.unwrap();

        let patch_a = CategoryPatch {
            description: Some("A".to_string()),
            ..Default::default()
        };
        let patch_b = CategoryPatch {
            description: Some("B".to_string()),
            ..Default::default()
        };

        // No per-entity locking or versioning: both updates race on the
        // remote write and the cache splice. Whichever response resolves
        // last is what the cache holds, independent of issue order.
        let (a, b) = tokio::join!(
            store.update(created.id, patch_a, None),
            store.update(created.id, patch_b, None)
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        let cached = store.cached(created.id).await.unwrap();
        assert!(cached == a || cached == b);
        assert!(!store.status().loading);
    }

    #[tokio::test]
    async fn search_replaces_the_cache_with_the_result_page() {
        let backend = Arc::new(MemoryBackend::new());
        let store = store(&backend);
        store.create(draft("Ancient Rome"), None).await.unwrap();
        store.create(draft("Modern Europe"), None).await.unwrap();

        let hits = store.search("rome").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ancient Rome");
        assert_eq!(store.items().await.len(), 1);
    }
}
