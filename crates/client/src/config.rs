use std::env;

/// Connection settings for the hosted backend platform.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Platform base URL (default: "http://localhost:8000")
    pub url: String,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
    /// Service-role key for privileged admin endpoints, when available.
    pub service_key: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CHRONICA_BACKEND_URL` - platform base URL (default: "http://localhost:8000")
    /// - `CHRONICA_ANON_KEY` - anonymous API key (default: "dev-anon-key")
    /// - `CHRONICA_SERVICE_KEY` - service-role key (optional)
    pub fn from_env() -> Self {
        Self {
            url: env::var("CHRONICA_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            anon_key: env::var("CHRONICA_ANON_KEY")
                .unwrap_or_else(|_| "dev-anon-key".to_string()),
            service_key: env::var("CHRONICA_SERVICE_KEY").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_falls_back_to_defaults() {
        env::remove_var("CHRONICA_BACKEND_URL");
        env::remove_var("CHRONICA_ANON_KEY");
        env::remove_var("CHRONICA_SERVICE_KEY");

        let config = ClientConfig::from_env();

        assert_eq!(config.url, "http://localhost:8000");
        assert_eq!(config.anon_key, "dev-anon-key");
        assert!(config.service_key.is_none());
    }
}
