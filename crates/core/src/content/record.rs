use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Integer primary key assigned by the backend on insert.
pub type RecordId = i64;

/// A row mirrored from one remote table.
///
/// Implementations tie an entity to its table name, its create/update DTOs,
/// and the generic fields the stores need: the id, the creation timestamp
/// used for ordering, the slug (when the entity carries one), and the URL of
/// the blob the record owns (when it has a media slot).
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Create DTO accepted by the remote insert.
    type Draft: Draft;
    /// Partial update DTO accepted by the remote update.
    type Patch: Patch;

    /// Remote table name.
    const TABLE: &'static str;
    /// Column matched by the store's `search` operation.
    const SEARCH_COLUMN: &'static str;

    fn id(&self) -> RecordId;
    fn created_at(&self) -> DateTime<Utc>;

    /// URL-safe unique identifier, for entities that carry one.
    fn slug(&self) -> Option<&str> {
        None
    }

    /// Public URL of the blob this record owns, when present.
    fn media_url(&self) -> Option<&str> {
        None
    }
}

/// Create DTO. The store fills the slug and media slots before insert.
pub trait Draft: Serialize + Send + Sync {
    /// Slug source; `None` for entities without a display name.
    fn display_name(&self) -> Option<&str> {
        None
    }

    fn set_slug(&mut self, _slug: String) {}

    fn set_media_url(&mut self, _url: String) {}
}

/// Partial update DTO; fields left unset are not touched remotely.
pub trait Patch: Serialize + Send + Sync {
    /// New display name, when the patch renames the entity.
    fn display_name(&self) -> Option<&str> {
        None
    }

    fn set_slug(&mut self, _slug: String) {}

    fn set_media_url(&mut self, _url: String) {}
}
