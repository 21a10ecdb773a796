//! Category CLI commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Category management commands.
#[derive(Debug, Parser)]
pub struct CategoriesCommand {
    #[command(subcommand)]
    pub action: CategoriesAction,
}

/// Available category actions.
#[derive(Debug, Subcommand)]
pub enum CategoriesAction {
    /// List all categories.
    List,
    /// Search categories by name.
    Search {
        /// Substring to match, case-insensitively.
        query: String,
    },
    /// Create a new category.
    Create {
        /// Category name; the slug derives from it.
        #[arg(long)]
        name: String,
        /// Category description.
        #[arg(long)]
        description: Option<String>,
        /// Path to a cover image uploaded alongside the row.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Get category by ID.
    Get {
        /// Category ID.
        id: i64,
    },
    /// Update a category.
    Update {
        /// Category ID.
        id: i64,
        /// New name; the slug follows it.
        #[arg(long)]
        name: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// Replacement cover image.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete category by ID.
    Delete {
        /// Category ID.
        id: i64,
    },
}
