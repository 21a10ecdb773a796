//! Event CLI commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List all events.
    List,
    /// Search events by title.
    Search {
        /// Substring to match, case-insensitively.
        query: String,
    },
    /// Create a new event.
    Create {
        /// Event title; the slug derives from it.
        #[arg(long)]
        title: String,
        /// Body text.
        #[arg(long)]
        content: String,
        /// Date the event starts (YYYY-MM-DD).
        #[arg(long)]
        start_date: NaiveDate,
        /// Date the event ends, for multi-day events.
        #[arg(long)]
        end_date: Option<NaiveDate>,
        /// DD-MM key for the "on this day" listings.
        #[arg(long)]
        day_month: String,
        /// Editorial importance rank.
        #[arg(long, default_value_t = 0)]
        important: i32,
        /// Citation or source URL.
        #[arg(long)]
        source: Option<String>,
        /// Author profile ID.
        #[arg(long)]
        author: i64,
        /// Category IDs, repeatable.
        #[arg(long = "category")]
        categories: Vec<i64>,
        /// Path to a cover image uploaded alongside the row.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Get event by ID.
    Get {
        /// Event ID.
        id: i64,
    },
    /// Delete event by ID.
    Delete {
        /// Event ID.
        id: i64,
    },
}
