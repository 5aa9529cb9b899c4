//! CLI module - Command-line interface for MyReads
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// MyReads - Personal reading tracker
#[derive(Parser)]
#[command(name = "myreads")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Print an Argon2 hash to use as APP_PASSWORD
    HashPassword {
        /// Password to hash; read from stdin when omitted
        password: Option<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Search the catalog without adding anything
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Results page
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// List books on your reading list
    #[command(alias = "ls", alias = "l")]
    List {
        /// Only show one status (want_to_read, reading, read)
        #[arg(long)]
        status: Option<String>,
    },
}

impl Cli {
    /// `init` writes the default config and must work while the existing one
    /// is unreadable.
    #[must_use]
    pub const fn needs_config(&self) -> bool {
        !matches!(self.command, Some(Commands::Init))
    }
}

pub use commands::*;
