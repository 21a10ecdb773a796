mod error;
mod traits;
mod types;

pub use error::{BackendError, Result};
pub use traits::{StorageApi, TableApi};
pub use types::Blob;
