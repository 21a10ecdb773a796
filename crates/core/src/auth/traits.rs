use async_trait::async_trait;
use url::Url;
use uuid::Uuid;

use super::{AuthError, AuthUser, OauthProvider, Session};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// The authentication surface of the remote backend.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Build the provider redirect URL that starts an OAuth flow.
    ///
    /// Completion is observed later through [`AuthApi::get_session`] after
    /// the provider redirects back.
    async fn sign_in_with_oauth(
        &self,
        provider: OauthProvider,
        redirect_to: &str,
    ) -> Result<Url>;

    /// Invalidate the current session remotely.
    async fn sign_out(&self) -> Result<()>;

    /// The current session, if one is active and unexpired.
    async fn get_session(&self) -> Result<Option<Session>>;

    /// The identity behind the current session.
    async fn get_user(&self) -> Result<Option<AuthUser>>;

    /// Send a password-recovery mail.
    async fn reset_password_for_email(&self, email: &str) -> Result<()>;

    /// Create an auth identity (privileged).
    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        email_confirm: bool,
    ) -> Result<AuthUser>;

    /// Delete an auth identity (privileged).
    async fn admin_delete_user(&self, id: Uuid) -> Result<()>;
}
