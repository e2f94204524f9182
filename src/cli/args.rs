//! CLI argument definitions using clap
//!
//! Commands:
//! - dochistory init [--force]
//! - dochistory open | save | purge-history
//! - dochistory auto-revision|mark-revisions|show-revisions <on|off>
//! - dochistory add-revision --id <id> [--description <text>] [--version <v>]
//! - dochistory history | revisions | show
//! - dochistory nearest --version <v> [--greater]
//! - dochistory related --other <state file>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// dochistory - document identity, save history and revisions
#[derive(Parser, Debug)]
#[command(name = "dochistory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State file to operate on (overrides the configured path)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a new document identity
    Init {
        /// Replace an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Start a new editing session on the document
    Open,

    /// Record a save in the document history
    Save,

    /// Switch auto-revisioning
    AutoRevision {
        #[arg(value_enum)]
        mode: Switch,
    },

    /// Switch revision marking
    MarkRevisions {
        #[arg(value_enum)]
        mode: Switch,
    },

    /// Switch revision display
    ShowRevisions {
        #[arg(value_enum)]
        mode: Switch,
    },

    /// Add a named revision
    AddRevision {
        #[arg(long)]
        id: u32,

        #[arg(long)]
        description: Option<String>,

        /// Document version the revision belongs to (default: current)
        #[arg(long)]
        version: Option<u32>,
    },

    /// Print the save history
    History,

    /// Print the revision table
    Revisions,

    /// Print identity and policy flags
    Show,

    /// Find the revision nearest to a document version
    Nearest {
        #[arg(long)]
        version: u32,

        /// Look above the version instead of below
        #[arg(long)]
        greater: bool,
    },

    /// Compare identity and history with another state file
    Related {
        #[arg(long)]
        other: PathBuf,
    },

    /// Discard the save history
    PurgeHistory,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
