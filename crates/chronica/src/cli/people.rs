//! People CLI commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// People management commands.
#[derive(Debug, Parser)]
pub struct PeopleCommand {
    #[command(subcommand)]
    pub action: PeopleAction,
}

/// Available people actions.
#[derive(Debug, Subcommand)]
pub enum PeopleAction {
    /// List all people.
    List,
    /// Search people by name.
    Search {
        /// Substring to match, case-insensitively.
        query: String,
    },
    /// Create a new person.
    Create {
        /// Full name; the slug derives from it.
        #[arg(long)]
        name: String,
        /// Biography text.
        #[arg(long)]
        biography: String,
        /// Birth date (YYYY-MM-DD).
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        /// Death date, when applicable.
        #[arg(long)]
        death_date: Option<NaiveDate>,
        /// Nationality.
        #[arg(long)]
        nationality: Option<String>,
        /// Profession.
        #[arg(long)]
        profession: Option<String>,
        /// DD-MM key for the "born on this day" listings.
        #[arg(long)]
        day_month: String,
        /// Author profile ID.
        #[arg(long)]
        author: i64,
        /// Path to a portrait uploaded alongside the row.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Get person by ID.
    Get {
        /// Person ID.
        id: i64,
    },
    /// Delete person by ID.
    Delete {
        /// Person ID.
        id: i64,
    },
}
