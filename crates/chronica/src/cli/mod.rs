//! CLI command definitions for the admin binary.

pub mod auth;
pub mod categories;
pub mod events;
pub mod people;
pub mod resources;
pub mod users;

use clap::{Parser, Subcommand, ValueEnum};

/// Admin CLI for the chronica content archive.
#[derive(Debug, Parser)]
#[command(name = "chronica-admin")]
#[command(about = "Admin CLI for the chronica content archive", long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Category management.
    Categories(categories::CategoriesCommand),
    /// Event management.
    Events(events::EventsCommand),
    /// People management.
    People(people::PeopleCommand),
    /// Resource management.
    Resources(resources::ResourcesCommand),
    /// User account management.
    Users(users::UsersCommand),
    /// Session management.
    Auth(auth::AuthCommand),
}
