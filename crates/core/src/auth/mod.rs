mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{friendly_message, is_session_expired};
pub use traits::{AuthApi, Result};
pub use types::{AuthUser, OauthProvider, Session};
