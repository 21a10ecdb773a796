//! Auth API over the platform's `/auth/v1` surface.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use chronica_core::auth::{
    is_session_expired, AuthApi, AuthError, AuthUser, OauthProvider, Result, Session,
};

use crate::BackendClient;

/// Token grant response from the auth endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    user: AuthUser,
}

/// Error payload shape; the auth endpoints are not consistent about the
/// field name, so all known spellings are tried.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a failed auth response body onto the error taxonomy.
fn map_auth_failure(body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .unwrap_or_else(|| body.to_string());

    match message.as_str() {
        "Invalid login credentials" => AuthError::InvalidCredentials,
        "Email not confirmed" => AuthError::EmailNotConfirmed,
        _ => AuthError::Provider(message),
    }
}

impl BackendClient {
    async fn auth_post(
        &self,
        url: String,
        body: serde_json::Value,
        service_role: bool,
    ) -> Result<reqwest::Response> {
        let bearer = if service_role {
            self.service_key()?.to_string()
        } else {
            let session = self.session_token().await;
            session.unwrap_or_else(|| self.anon_key().to_string())
        };

        let response = self
            .http
            .post(url)
            .header("apikey", self.anon_key())
            .header("Authorization", format!("Bearer {bearer}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(map_auth_failure(&body))
        }
    }

    fn anon_key(&self) -> &str {
        &self.anon_key
    }

    fn service_key(&self) -> Result<&str> {
        self.service_key
            .as_deref()
            .ok_or_else(|| AuthError::Admin("service key not configured".to_string()))
    }

    async fn session_token(&self) -> Option<String> {
        let session = self.session.read().await;
        session.as_ref().map(|s| s.access_token.clone())
    }
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .auth_post(
                self.auth_url("token?grant_type=password"),
                serde_json::json!({ "email": email, "password": password }),
                false,
            )
            .await?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let session = Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            user: token.user,
        };
        self.store_session(Some(session.clone())).await;
        Ok(session)
    }

    async fn sign_in_with_oauth(
        &self,
        provider: OauthProvider,
        redirect_to: &str,
    ) -> Result<Url> {
        let url = format!(
            "{}?provider={}&redirect_to={}",
            self.auth_url("authorize"),
            provider,
            urlencoding::encode(redirect_to)
        );
        Url::parse(&url).map_err(|e| AuthError::Provider(e.to_string()))
    }

    async fn sign_out(&self) -> Result<()> {
        if self.session_token().await.is_some() {
            self.auth_post(self.auth_url("logout"), serde_json::json!({}), false)
                .await?;
        }
        self.store_session(None).await;
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        let current = { self.session.read().await.clone() };
        match current {
            Some(session) if is_session_expired(&session, Utc::now()) => {
                self.store_session(None).await;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn get_user(&self) -> Result<Option<AuthUser>> {
        Ok(self.get_session().await?.map(|s| s.user))
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<()> {
        self.auth_post(
            self.auth_url("recover"),
            serde_json::json!({ "email": email }),
            false,
        )
        .await?;
        Ok(())
    }

    async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        email_confirm: bool,
    ) -> Result<AuthUser> {
        let response = self
            .auth_post(
                self.auth_url("admin/users"),
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "email_confirm": email_confirm,
                }),
                true,
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))
    }

    async fn admin_delete_user(&self, id: Uuid) -> Result<()> {
        let service_key = self.service_key()?.to_string();
        let response = self
            .http
            .delete(self.auth_url(&format!("admin/users/{id}")))
            .header("apikey", self.anon_key())
            .header("Authorization", format!("Bearer {service_key}"))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AuthError::Admin(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_credential_failures_get_typed_variants() {
        let body = r#"{"error_description":"Invalid login credentials"}"#;
        assert_eq!(map_auth_failure(body), AuthError::InvalidCredentials);

        let body = r#"{"msg":"Email not confirmed"}"#;
        assert_eq!(map_auth_failure(body), AuthError::EmailNotConfirmed);
    }

    #[test]
    fn unknown_failures_keep_the_remote_message() {
        let body = r#"{"message":"over quota"}"#;
        assert_eq!(
            map_auth_failure(body),
            AuthError::Provider("over quota".to_string())
        );
    }

    #[test]
    fn unparseable_bodies_pass_through_verbatim() {
        assert_eq!(
            map_auth_failure("gateway timeout"),
            AuthError::Provider("gateway timeout".to_string())
        );
    }
}
