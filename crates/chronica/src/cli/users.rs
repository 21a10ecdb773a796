//! User account CLI commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use chronica_core::content::UserRole;

/// User account management commands.
#[derive(Debug, Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// CLI mirror of [`UserRole`].
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RoleArg {
    #[default]
    User,
    Staff,
    Admin,
}

impl From<RoleArg> for UserRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::User => UserRole::User,
            RoleArg::Staff => UserRole::Staff,
            RoleArg::Admin => UserRole::Admin,
        }
    }
}

/// Available user actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// List all user profiles.
    List,
    /// Search users by username.
    Search {
        /// Substring to match, case-insensitively.
        query: String,
    },
    /// Provision an account (auth identity plus profile row).
    Create {
        /// Email address; must be unused.
        #[arg(long)]
        email: String,
        /// Username; must be unused.
        #[arg(long)]
        username: String,
        /// Display name.
        #[arg(long)]
        fullname: String,
        /// Initial password.
        #[arg(long)]
        password: String,
        /// Application role.
        #[arg(long, default_value = "user")]
        role: RoleArg,
        /// Phone number.
        #[arg(long)]
        phone: Option<String>,
        /// Path to an avatar uploaded alongside the profile.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Get user by ID.
    Get {
        /// User ID.
        id: i64,
    },
    /// Delete a user (profile row, auth identity, avatar).
    Delete {
        /// User ID.
        id: i64,
    },
}
