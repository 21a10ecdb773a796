use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public URL of the frontend app (default: "http://localhost:5173/")
    pub app_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CHRONICA_APP_URL` - public frontend URL (default: "http://localhost:5173/")
    pub fn from_env() -> Self {
        Self {
            app_url: env::var("CHRONICA_APP_URL")
                .unwrap_or_else(|_| "http://localhost:5173/".to_string()),
        }
    }

    /// Redirect target OAuth providers send the browser back to.
    pub fn oauth_callback_url(&self) -> String {
        format!("{}/oauth-callback", self.app_url.trim_end_matches('/'))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_callback_handles_trailing_slashes() {
        let config = Config {
            app_url: "https://chronica.example/".to_string(),
        };
        assert_eq!(
            config.oauth_callback_url(),
            "https://chronica.example/oauth-callback"
        );

        let config = Config {
            app_url: "https://chronica.example".to_string(),
        };
        assert_eq!(
            config.oauth_callback_url(),
            "https://chronica.example/oauth-callback"
        );
    }
}
