use thiserror::Error;

/// Errors crossing the remote backend boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A single-row fetch matched zero rows, or more than one.
    #[error("{table} not found: {id}")]
    NotFound { table: &'static str, id: String },

    #[error("query on {table} failed: {message}")]
    Query {
        table: &'static str,
        message: String,
    },

    #[error("storage operation failed: {0}")]
    Storage(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for backend table and storage operations.
pub type Result<T> = std::result::Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_the_table() {
        let err = BackendError::NotFound {
            table: "events",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "events not found: 42");
    }

    #[test]
    fn query_display_carries_the_remote_message() {
        let err = BackendError::Query {
            table: "people",
            message: "permission denied".to_string(),
        };
        assert_eq!(err.to_string(), "query on people failed: permission denied");
    }
}
