use std::path::PathBuf;

use boardsync_core::types::Column;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "boardsync",
    version,
    about = "Three-column task board shared by every process pointed at the same store"
)]
pub struct Cli {
    /// Config file (default: ~/.config/boardsync/config.json)
    #[arg(long, env = "BOARDSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store directory; overrides the config file
    #[arg(long, env = "BOARDSYNC_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Store key of the board; overrides the config file
    #[arg(long)]
    pub key: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the board
    Show {
        /// Also print each task's avatar URL
        #[arg(long)]
        avatars: bool,
    },

    /// Add a task to the top of a column
    Add {
        #[arg(long, default_value = "todo")]
        column: Column,
        #[arg(long)]
        title: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        description: String,
    },

    /// Move a task to a position in a column
    Move {
        /// Task id, or a unique prefix of it
        id: String,
        #[arg(long)]
        to: Column,
        /// Position in the destination column, counted after the task is taken out
        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Replace the board with the demo board
    Demo,

    /// Replace the board with an empty board
    Clear,

    /// Print the board again whenever another process changes it
    Watch,

    /// Print the avatar URL for an email address
    Avatar { email: String },
}
