use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Email not confirmed")]
    EmailNotConfirmed,

    #[error("no active session")]
    SessionMissing,

    #[error("auth request failed: {0}")]
    Provider(String),

    #[error("admin API refused: {0}")]
    Admin(String),

    #[error("transport error: {0}")]
    Transport(String),
}
