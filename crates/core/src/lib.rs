//! chronica_core - domain types, slug derivation, and the remote backend
//! trait boundary shared by the HTTP client and the entity stores.

pub mod auth;
pub mod backend;
pub mod content;
pub mod slug;
