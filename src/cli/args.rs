//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::NodeId;

/// Directory trees from flat archive listings
#[derive(Parser, Debug)]
#[command(name = "archtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/archtree/archtree.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Listing segment separator (overrides config)
    #[arg(short, long, global = true)]
    pub separator: Option<char>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a listing as a directory tree
    Tree {
        /// Listing file, one path per line ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        listing: Option<PathBuf>,
        /// Prefix nodes with their ids
        #[arg(long)]
        ids: bool,
        /// Dump the tree as JSON instead of drawing it
        #[arg(long, conflicts_with = "ids")]
        json: bool,
    },

    /// List file nodes with their ids
    Leaves {
        /// Listing file, one path per line ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        listing: Option<PathBuf>,
    },

    /// Split a composite path into container and inner path
    Split {
        /// Composite path, e.g. d2data.mpq\data\global\items\flp2ax.dc6
        path: String,
    },

    /// Locate the file node with the given id
    Resolve {
        /// Node id as shown by `tree --ids` or `leaves`
        id: NodeId,
        /// Listing file, one path per line ("-" for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        listing: Option<PathBuf>,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
