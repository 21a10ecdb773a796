//! Resource CLI commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use chronica_core::content::MediaType;

/// Resource management commands.
#[derive(Debug, Parser)]
pub struct ResourcesCommand {
    #[command(subcommand)]
    pub action: ResourcesAction,
}

/// CLI mirror of [`MediaType`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MediaTypeArg {
    Image,
    Video,
    Audio,
    Document,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Image => MediaType::Image,
            MediaTypeArg::Video => MediaType::Video,
            MediaTypeArg::Audio => MediaType::Audio,
            MediaTypeArg::Document => MediaType::Document,
        }
    }
}

/// Available resource actions.
#[derive(Debug, Subcommand)]
pub enum ResourcesAction {
    /// List all resources.
    List,
    /// Create a new resource attached to an event.
    Create {
        /// Event the resource belongs to.
        #[arg(long)]
        event: i64,
        /// Kind of media.
        #[arg(long)]
        media_type: MediaTypeArg,
        /// Citation or source URL.
        #[arg(long)]
        source: Option<String>,
        /// Author profile ID.
        #[arg(long)]
        author: i64,
        /// Path to the media file uploaded into the resource's slot.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Get resource by ID.
    Get {
        /// Resource ID.
        id: i64,
    },
    /// Delete resource by ID.
    Delete {
        /// Resource ID.
        id: i64,
    },
}
