//! Session state machine over the backend's auth surface.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use url::Url;
use uuid::Uuid;

use chronica_core::auth::{friendly_message, AuthApi, AuthUser, OauthProvider, Session};
use chronica_core::backend::TableApi;
use chronica_core::content::User;

use super::{Result, StatusCell, StoreError, StoreStatus};

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Result of a credential login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn(Session),
    /// Rejected with the user-facing message also recorded on the status.
    Rejected(String),
}

#[derive(Debug)]
struct AuthInner {
    state: AuthState,
    session: Option<Session>,
    user: Option<AuthUser>,
}

/// Owns the session identity and the login/logout/OAuth flows.
///
/// Transitions: `Anonymous -> Authenticating -> Authenticated`, back to
/// `Anonymous` on logout or when a session fails cross-validation against
/// the profile table.
pub struct AuthStore<B>
where
    B: AuthApi + TableApi<User>,
{
    backend: Arc<B>,
    inner: RwLock<AuthInner>,
    status: StatusCell,
}

impl<B> AuthStore<B>
where
    B: AuthApi + TableApi<User>,
{
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            inner: RwLock::new(AuthInner {
                state: AuthState::Anonymous,
                session: None,
                user: None,
            }),
            status: StatusCell::new(),
        }
    }

    /// Exchange credentials for a session.
    ///
    /// Known backend failures surface with their friendly phrasing; the
    /// machine stays `Anonymous` on rejection.
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        self.status.begin();
        {
            let mut inner = self.inner.write().await;
            inner.state = AuthState::Authenticating;
        }

        match self.backend.sign_in_with_password(email, password).await {
            Ok(session) => {
                {
                    let mut inner = self.inner.write().await;
                    inner.state = AuthState::Authenticated;
                    inner.user = Some(session.user.clone());
                    inner.session = Some(session.clone());
                }
                tracing::debug!(user = %session.user.id, "login succeeded");
                self.status.finish_ok(Some("Login successful"));
                LoginOutcome::LoggedIn(session)
            }
            Err(err) => {
                let message = friendly_message(&err);
                {
                    let mut inner = self.inner.write().await;
                    inner.state = AuthState::Anonymous;
                    inner.session = None;
                    inner.user = None;
                }
                self.status.finish_err(message.clone());
                LoginOutcome::Rejected(message)
            }
        }
    }

    /// Invalidate the session remotely and locally.
    ///
    /// Not best-effort: a remote failure is recorded and returned, and the
    /// local session is kept.
    pub async fn logout(&self) -> Result<()> {
        match self.backend.sign_out().await {
            Ok(()) => {
                self.clear().await;
                Ok(())
            }
            Err(err) => {
                let err = StoreError::from(err);
                self.status.finish_err(err.to_string());
                Err(err)
            }
        }
    }

    /// Request a password-recovery mail. Records and returns failures.
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.backend
            .reset_password_for_email(email)
            .await
            .map_err(|err| {
                let err = StoreError::from(err);
                self.status.finish_err(err.to_string());
                err
            })
    }

    /// Start an OAuth flow and return the provider redirect URL.
    ///
    /// Local state only reflects that the redirect is ready; completion is
    /// observed later through [`AuthStore::check_current_auth_status`] after
    /// the provider redirects back.
    pub async fn oauth_login(&self, provider: OauthProvider, redirect_to: &str) -> Option<Url> {
        self.status.begin();
        match self.backend.sign_in_with_oauth(provider, redirect_to).await {
            Ok(url) => {
                self.status
                    .finish_ok(Some(&format!("{provider} login redirect ready")));
                Some(url)
            }
            Err(err) => {
                self.status.finish_err(friendly_message(&err));
                None
            }
        }
    }

    /// Fetch the remote session and cross-validate it against the profile
    /// table.
    ///
    /// A session whose identity has no profile row is treated as invalid:
    /// local state is cleared, the orphaned remote identity is deleted, and
    /// the caller sees `false`.
    pub async fn check_current_auth_status(&self) -> bool {
        let session = match self.backend.get_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                self.clear().await;
                return false;
            }
            Err(err) => {
                tracing::warn!(error = %err, "session fetch failed");
                return false;
            }
        };

        if !self.validate_profile(session.user.id).await {
            self.clear().await;
            self.status
                .finish_err("Email address not found, try using another or contact support");
            return false;
        }

        let mut inner = self.inner.write().await;
        inner.state = AuthState::Authenticated;
        inner.user = Some(session.user.clone());
        inner.session = Some(session);
        true
    }

    /// Current state of the machine.
    pub async fn state(&self) -> AuthState {
        self.inner.read().await.state
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.state == AuthState::Authenticated
    }

    pub async fn session(&self) -> Option<Session> {
        self.inner.read().await.session.clone()
    }

    pub async fn current_auth_user(&self) -> Option<AuthUser> {
        self.inner.read().await.user.clone()
    }

    /// Latest status snapshot.
    pub fn status(&self) -> StoreStatus {
        self.status.snapshot()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    /// Clear error and success messages.
    pub fn reset_status(&self) {
        self.status.reset();
    }

    /// Whether the identity has exactly one profile row.
    ///
    /// Zero (or duplicated) rows mean the auth subsystem and the profile
    /// table drifted apart: the remote session and the orphaned identity
    /// are removed, best effort. A transport failure proves nothing about
    /// the profile row and triggers no reconciliation.
    async fn validate_profile(&self, id: Uuid) -> bool {
        let rows: std::result::Result<Vec<User>, _> =
            self.backend.select_eq("uuid", &id.to_string()).await;
        match rows {
            Ok(rows) if rows.len() == 1 => true,
            Ok(_) => {
                if let Err(err) = self.backend.sign_out().await {
                    tracing::warn!(user = %id, error = %err, "orphan session sign-out failed");
                }
                if let Err(err) = self.backend.admin_delete_user(id).await {
                    tracing::warn!(user = %id, error = %err, "orphan identity delete failed");
                }
                false
            }
            Err(err) => {
                tracing::warn!(user = %id, error = %err, "profile cross-check failed");
                false
            }
        }
    }

    async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.state = AuthState::Anonymous;
        inner.session = None;
        inner.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chronica_core::content::{UserDraft, UserRole, UserStatus};

    async fn seed_profile(backend: &MemoryBackend, identity: &AuthUser) {
        let draft = UserDraft {
            uuid: identity.id,
            email: identity.email.clone().unwrap(),
            username: "alice".to_string(),
            fullname: "Alice".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            phone_number: None,
            profile_picture_url: None,
        };
        let _: User = backend.insert(&draft).await.unwrap();
    }

    #[tokio::test]
    async fn login_reaches_authenticated_and_stores_the_session() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_auth_user("alice@example.com", "s3cret").await;
        let store = AuthStore::new(backend);

        let outcome = store.login("alice@example.com", "s3cret").await;

        assert!(matches!(outcome, LoginOutcome::LoggedIn(_)));
        assert_eq!(store.state().await, AuthState::Authenticated);
        assert!(store.session().await.is_some());
        assert_eq!(store.status().success.as_deref(), Some("Login successful"));
    }

    #[tokio::test]
    async fn rejected_login_maps_the_message_and_stays_anonymous() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_auth_user("alice@example.com", "s3cret").await;
        let store = AuthStore::new(backend);

        let outcome = store.login("alice@example.com", "wrong").await;

        assert_eq!(
            outcome,
            LoginOutcome::Rejected("Incorrect email or password".to_string())
        );
        assert_eq!(store.state().await, AuthState::Anonymous);
        assert_eq!(
            store.status().error.as_deref(),
            Some("Incorrect email or password")
        );
    }

    #[tokio::test]
    async fn logout_clears_local_state() {
        let backend = Arc::new(MemoryBackend::new());
        let identity = backend.register_auth_user("alice@example.com", "s3cret").await;
        seed_profile(&backend, &identity).await;
        let store = AuthStore::new(backend.clone());

        store.login("alice@example.com", "s3cret").await;
        store.logout().await.unwrap();

        assert_eq!(store.state().await, AuthState::Anonymous);
        assert!(store.session().await.is_none());
        assert!(backend.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn auth_status_confirms_a_session_with_a_profile_row() {
        let backend = Arc::new(MemoryBackend::new());
        let identity = backend.register_auth_user("alice@example.com", "s3cret").await;
        seed_profile(&backend, &identity).await;
        let store = AuthStore::new(backend.clone());

        backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .unwrap();

        assert!(store.check_current_auth_status().await);
        assert_eq!(store.state().await, AuthState::Authenticated);
    }

    #[tokio::test]
    async fn auth_status_reconciles_a_session_without_a_profile_row() {
        let backend = Arc::new(MemoryBackend::new());
        let identity = backend.register_auth_user("ghost@example.com", "s3cret").await;
        // No profile row seeded: the identity is an orphan.
        let store = AuthStore::new(backend.clone());

        backend
            .sign_in_with_password("ghost@example.com", "s3cret")
            .await
            .unwrap();

        assert!(!store.check_current_auth_status().await);
        assert_eq!(store.state().await, AuthState::Anonymous);
        assert!(store.session().await.is_none());
        // The orphaned identity was deleted remotely.
        assert_eq!(backend.deleted_auth_users().await, vec![identity.id]);
        assert!(store.status().error.is_some());
    }

    #[tokio::test]
    async fn auth_status_without_a_session_is_false() {
        let backend = Arc::new(MemoryBackend::new());
        let store = AuthStore::new(backend);

        assert!(!store.check_current_auth_status().await);
        assert_eq!(store.state().await, AuthState::Anonymous);
    }

    #[tokio::test]
    async fn oauth_login_yields_the_provider_redirect() {
        let backend = Arc::new(MemoryBackend::new());
        let store = AuthStore::new(backend);

        let url = store
            .oauth_login(OauthProvider::Github, "http://localhost:5173/oauth-callback")
            .await
            .unwrap();

        assert_eq!(url.scheme(), "memory");
        assert!(url.as_str().contains("github"));
        // Still anonymous: completion arrives via a later status check.
        assert_eq!(store.state().await, AuthState::Anonymous);
    }

    #[tokio::test]
    async fn reset_password_requests_a_recovery_mail() {
        let backend = Arc::new(MemoryBackend::new());
        let store = AuthStore::new(backend.clone());

        store.reset_password("alice@example.com").await.unwrap();

        assert_eq!(
            backend.recovery_mails().await,
            vec!["alice@example.com".to_string()]
        );
    }
}
