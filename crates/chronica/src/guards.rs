//! Route guards consuming auth and user store state.

use crate::backend::Backend;
use crate::stores::{AuthStore, UserStore};

pub const LOGIN_ROUTE: &str = "/login";
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// What the router should do with a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Requires an authenticated session; hydrates the current profile when it
/// is not loaded yet.
pub async fn auth_guard<B: Backend>(
    auth: &AuthStore<B>,
    users: &UserStore<B>,
) -> GuardDecision {
    if !auth.is_authenticated().await && !auth.check_current_auth_status().await {
        return GuardDecision::Redirect(LOGIN_ROUTE);
    }

    if users.current_user().await.is_none() && users.fetch_current_user().await.is_err() {
        return GuardDecision::Redirect(LOGIN_ROUTE);
    }

    GuardDecision::Allow
}

/// Requires an authenticated session whose profile has the admin role.
pub async fn admin_guard<B: Backend>(
    auth: &AuthStore<B>,
    users: &UserStore<B>,
) -> GuardDecision {
    if !auth.is_authenticated().await && !auth.check_current_auth_status().await {
        return GuardDecision::Redirect(LOGIN_ROUTE);
    }

    if users.fetch_current_user().await.is_err() {
        return GuardDecision::Redirect(LOGIN_ROUTE);
    }

    if users.is_admin().await {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(UNAUTHORIZED_ROUTE)
    }
}

/// Guest-only routes (login, signup): an authenticated visitor is sent to
/// the dashboard instead.
pub async fn guest_guard<B: Backend>(auth: &AuthStore<B>) -> GuardDecision {
    if auth.check_current_auth_status().await {
        GuardDecision::Redirect(DASHBOARD_ROUTE)
    } else {
        GuardDecision::Allow
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::context::AppContext;
    use chronica_core::auth::AuthApi;
    use chronica_core::content::{NewUser, UserRole};

    async fn provision(
        ctx: &AppContext<MemoryBackend>,
        backend: &MemoryBackend,
        role: UserRole,
    ) {
        ctx.users
            .add_user(
                NewUser {
                    email: "alice@example.com".to_string(),
                    username: "alice".to_string(),
                    fullname: "Alice".to_string(),
                    password: "s3cret".to_string(),
                    role,
                    phone_number: None,
                },
                None,
            )
            .await
            .unwrap();
        backend
            .sign_in_with_password("alice@example.com", "s3cret")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn auth_guard_redirects_anonymous_visitors_to_login() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend);

        let decision = auth_guard(&ctx.auth, &ctx.users).await;
        assert_eq!(decision, GuardDecision::Redirect(LOGIN_ROUTE));
    }

    #[tokio::test]
    async fn auth_guard_allows_a_valid_session_and_loads_the_profile() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone());
        provision(&ctx, &backend, UserRole::User).await;

        let decision = auth_guard(&ctx.auth, &ctx.users).await;

        assert_eq!(decision, GuardDecision::Allow);
        assert!(ctx.users.current_user().await.is_some());
    }

    #[tokio::test]
    async fn admin_guard_distinguishes_roles() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone());
        provision(&ctx, &backend, UserRole::User).await;

        assert_eq!(
            admin_guard(&ctx.auth, &ctx.users).await,
            GuardDecision::Redirect(UNAUTHORIZED_ROUTE)
        );

        let admin_backend = Arc::new(MemoryBackend::new());
        let admin_ctx = AppContext::new(admin_backend.clone());
        provision(&admin_ctx, &admin_backend, UserRole::Admin).await;

        assert_eq!(
            admin_guard(&admin_ctx.auth, &admin_ctx.users).await,
            GuardDecision::Allow
        );
    }

    #[tokio::test]
    async fn guest_guard_sends_authenticated_visitors_to_the_dashboard() {
        let backend = Arc::new(MemoryBackend::new());
        let ctx = AppContext::new(backend.clone());

        assert_eq!(guest_guard(&ctx.auth).await, GuardDecision::Allow);

        provision(&ctx, &backend, UserRole::User).await;
        assert_eq!(
            guest_guard(&ctx.auth).await,
            GuardDecision::Redirect(DASHBOARD_ROUTE)
        );
    }
}
