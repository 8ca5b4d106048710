//! Command-line interface for feedbackstore.
//!
//! This module provides the CLI structure for the `fbstore` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, GetCommand, ListCommand, OutputFormat,
    StatusCommand,
};

use crate::logging::Verbosity;

/// fbstore - Keep track of multilingual feedback
///
/// Stores short feedback messages (email, a language pair, a comment and an
/// attachment link) in a local database, and lists, shows or removes them.
#[derive(Debug, Parser)]
#[command(name = "fbstore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the message database (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all stored messages
    List(ListCommand),

    /// Show a single message
    Get(GetCommand),

    /// Add a new message
    Add(AddCommand),

    /// Delete a message
    Delete(DeleteCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
