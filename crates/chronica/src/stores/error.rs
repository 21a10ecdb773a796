use thiserror::Error;

use chronica_core::auth::{friendly_message, AuthError};
use chronica_core::backend::BackendError;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// User-facing failure taxonomy for store operations.
///
/// Display output is what lands in a store's `error` field, so every
/// variant renders as a sentence a frontend can show verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A remote select/insert/update/delete failed.
    #[error("{0}")]
    Query(String),

    /// A single-row fetch matched zero rows, or more than one.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A blob upload failed; nothing was inserted.
    #[error("{0}")]
    Upload(String),

    /// A blob removal failed.
    #[error("{0}")]
    Delete(String),

    /// A pre-check rejected the input (e.g. a duplicate email).
    #[error("{0}")]
    Validation(String),

    /// An auth failure, already mapped to its user-facing phrasing.
    #[error("{0}")]
    Auth(String),
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound { table, id } => Self::NotFound { entity: table, id },
            other => Self::Query(other.to_string()),
        }
    }
}

impl From<AuthError> for StoreError {
    fn from(err: AuthError) -> Self {
        Self::Auth(friendly_message(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_not_found_keeps_entity_and_id() {
        let err: StoreError = BackendError::NotFound {
            table: "events",
            id: "7".to_string(),
        }
        .into();
        assert_eq!(err, StoreError::NotFound { entity: "events", id: "7".to_string() });
        assert_eq!(err.to_string(), "events not found: 7");
    }

    #[test]
    fn auth_errors_arrive_friendly_mapped() {
        let err: StoreError = AuthError::InvalidCredentials.into();
        assert_eq!(err.to_string(), "Incorrect email or password");
    }
}
