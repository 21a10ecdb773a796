//! Backend implementations and the aggregate backend bound.

mod memory;

pub use memory::MemoryBackend;

use chronica_core::auth::AuthApi;
use chronica_core::backend::{StorageApi, TableApi};
use chronica_core::content::{Category, Event, Person, Resource, User};

/// The full backend surface the application context requires: one table
/// client per entity type plus object storage and auth.
pub trait Backend:
    TableApi<Category>
    + TableApi<Event>
    + TableApi<Person>
    + TableApi<Resource>
    + TableApi<User>
    + StorageApi
    + AuthApi
{
}

impl<T> Backend for T where
    T: TableApi<Category>
        + TableApi<Event>
        + TableApi<Person>
        + TableApi<Resource>
        + TableApi<User>
        + StorageApi
        + AuthApi
{
}
