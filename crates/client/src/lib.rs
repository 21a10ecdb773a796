//! chronica_client - HTTP client for the hosted backend platform.
//!
//! Implements the `chronica_core` backend traits against the platform's
//! three HTTP surfaces: the table API under `/rest/v1`, the auth API under
//! `/auth/v1`, and bucketed object storage under `/storage/v1`.

mod auth;
mod config;
mod rest;
mod storage;

pub use config::ClientConfig;

use tokio::sync::RwLock;

use chronica_core::auth::Session;

/// HTTP client holding the platform credentials and the bearer session.
///
/// The session lives in memory only; callers that need one across restarts
/// log in again. Requests carry the session token when present and fall
/// back to the anonymous key otherwise. The service-role key, when
/// configured, gates the privileged admin endpoints.
#[derive(Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
    session: RwLock<Option<Session>>,
}

impl BackendClient {
    /// Create a client from explicit configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            service_key: config.service_key,
            session: RwLock::new(None),
        }
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub(crate) fn storage_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path)
    }

    /// Attach the `apikey` header plus a bearer token: the session token
    /// when logged in, the anonymous key otherwise.
    pub(crate) async fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = {
            let session = self.session.read().await;
            session.as_ref().map(|s| s.access_token.clone())
        };
        let bearer = token.unwrap_or_else(|| self.anon_key.clone());
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {bearer}"))
    }

    pub(crate) async fn store_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }
}
