//! Application context owning every store for one session.

use std::sync::Arc;

use chronica_core::content::{Category, Event, Person, Resource};

use crate::backend::Backend;
use crate::stores::{AuthStore, EntityStore, UserStore};

/// Storage buckets, one per media-owning entity type.
pub const CATEGORIES_BUCKET: &str = "categories";
pub const EVENTS_BUCKET: &str = "events";
pub const PEOPLE_BUCKET: &str = "people";
pub const RESOURCES_BUCKET: &str = "resources";
pub const USERS_BUCKET: &str = "users";

/// Owns one store instance per entity plus the auth store.
///
/// Created once per application session from a shared backend handle and
/// passed to (or injected into) whatever consumes it; there are no ambient
/// global stores.
pub struct AppContext<B: Backend> {
    pub categories: EntityStore<Category, B>,
    pub events: EntityStore<Event, B>,
    pub people: EntityStore<Person, B>,
    pub resources: EntityStore<Resource, B>,
    pub users: UserStore<B>,
    pub auth: AuthStore<B>,
}

impl<B: Backend> AppContext<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            categories: EntityStore::new(backend.clone(), "Category", CATEGORIES_BUCKET),
            events: EntityStore::new(backend.clone(), "Event", EVENTS_BUCKET),
            people: EntityStore::new(backend.clone(), "Person", PEOPLE_BUCKET),
            resources: EntityStore::new(backend.clone(), "Resource", RESOURCES_BUCKET),
            users: UserStore::new(backend.clone()),
            auth: AuthStore::new(backend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chronica_core::content::CategoryDraft;

    #[tokio::test]
    async fn stores_share_one_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend);

        let draft = CategoryDraft {
            name: "Antiquity".to_string(),
            ..Default::default()
        };
        let created = ctx.categories.create(draft, None).await.unwrap();

        assert_eq!(ctx.categories.list().await.len(), 1);
        assert_eq!(ctx.categories.cached(created.id).await, Some(created));
        assert!(ctx.events.list().await.is_empty());
    }
}
