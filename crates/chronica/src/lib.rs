//! chronica - entity stores and auth orchestration for the chronica
//! content archive.
//!
//! Every store is a thin orchestration layer over the remote backend: it
//! validates trivial inputs, calls the remote API, moves blobs in and out of
//! object storage, mirrors the last successful response into a local cache,
//! and maps failures to user-facing strings.

pub mod backend;
pub mod cli;
pub mod config;
pub mod context;
pub mod guards;
pub mod media;
pub mod output;
pub mod stores;

pub use context::AppContext;
