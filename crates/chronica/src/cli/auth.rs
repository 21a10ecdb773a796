//! Session CLI commands.

use clap::{Parser, Subcommand, ValueEnum};

use chronica_core::auth::OauthProvider;

/// Session management commands.
#[derive(Debug, Parser)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// CLI mirror of [`OauthProvider`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    Google,
    Github,
    Facebook,
}

impl From<ProviderArg> for OauthProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Google => OauthProvider::Google,
            ProviderArg::Github => OauthProvider::Github,
            ProviderArg::Facebook => OauthProvider::Facebook,
        }
    }
}

/// Available session actions.
#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Log in with email and password.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Invalidate the current session.
    Logout,
    /// Check the current session against the profile table.
    Status,
    /// Request a password-recovery mail.
    ResetPassword {
        /// Account email.
        email: String,
    },
    /// Print the redirect URL that starts an OAuth flow.
    Oauth {
        /// Identity provider.
        provider: ProviderArg,
    },
}
