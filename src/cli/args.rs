//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{Position, Priority};

/// Organizational tree editor: positioned nodes with priority, progress, people, comments and files
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Tree document (default: `default_document` from config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Extra config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which node a command acts on.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// First node whose title contains this text (case-insensitive)
    #[arg(short, long, value_name = "FRAGMENT", required_unless_present = "at", conflicts_with = "at")]
    pub node: Option<String>,

    /// First node whose region contains this point
    #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
    pub at: Option<Position>,
}

/// Where a new node attaches; without either option it becomes top-level.
#[derive(Args, Debug, Clone)]
pub struct Anchor {
    /// Attach under the first node whose title contains this text
    #[arg(short, long, value_name = "FRAGMENT", conflicts_with = "at")]
    pub under: Option<String>,

    /// Attach under the node at this point
    #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
    pub at: Option<Position>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a document holding only the root node
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Show the whole tree
    Show,

    /// Show every field of one node
    Info {
        #[command(flatten)]
        target: Target,
    },

    /// Add a child below-right of its anchor
    Add {
        #[command(flatten)]
        anchor: Anchor,
        /// Title of the new node
        title: String,
    },

    /// Add a child level with its anchor
    Twin {
        #[command(flatten)]
        anchor: Anchor,
        /// Title of the new node
        title: String,
    },

    /// Move a node by an offset (children stay where they are)
    Move {
        #[command(flatten)]
        target: Target,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
    },

    /// Put a node at an absolute position
    Place {
        #[command(flatten)]
        target: Target,
        /// New position
        #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
        to: Position,
    },

    /// Edit title, text, people, progress or priority
    Edit {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
        /// Comma separated names, replaces the current list
        #[arg(long)]
        people: Option<String>,
        /// 0..=100
        #[arg(long, allow_hyphen_values = true)]
        progress: Option<i64>,
        /// urgent, medium, low (or the tags {} [] ())
        #[arg(long)]
        priority: Option<Priority>,
        /// Clear the node text
        #[arg(long, conflicts_with = "text")]
        clear_text: bool,
    },

    /// Delete a node; its children become top-level
    Delete {
        #[command(flatten)]
        target: Target,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage comments of a node
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Manage file references of a node
    Attach {
        #[command(subcommand)]
        command: AttachCommands,
    },

    /// Find the first node whose title contains a fragment
    Find {
        /// Text to look for (case-insensitive)
        fragment: String,
    },

    /// Find the node at a point
    Hit {
        /// Point on the plane
        #[arg(value_name = "X,Y", allow_hyphen_values = true)]
        point: Position,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentCommands {
    /// Append a comment
    Add {
        #[command(flatten)]
        target: Target,
        text: String,
    },
    /// Replace the comment at INDEX (0-based)
    Edit {
        #[command(flatten)]
        target: Target,
        index: usize,
        text: String,
    },
    /// Remove the comment at INDEX (0-based)
    Rm {
        #[command(flatten)]
        target: Target,
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum AttachCommands {
    /// Reference a file from a node
    Add {
        #[command(flatten)]
        target: Target,
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Point the reference at INDEX to another file
    Replace {
        #[command(flatten)]
        target: Target,
        index: usize,
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Drop the reference at INDEX (0-based)
    Rm {
        #[command(flatten)]
        target: Target,
        index: usize,
    },
    /// Open the referenced file with the configured opener
    Open {
        #[command(flatten)]
        target: Target,
        index: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}
