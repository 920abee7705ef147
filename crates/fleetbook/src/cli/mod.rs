//! Command-line interface for fleetbook.
//!
//! This module provides the CLI structure, listing renderers, and the
//! interactive shell for the `fleetbook` binary.

mod commands;
pub mod render;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, EditCommand, ListCommand, OutputFormat, RecordArgs, RemoveCommand,
    StatusCommand,
};

/// fleetbook - Keep track of a fleet of vehicles
///
/// Lists, adds, edits, and removes vehicle records kept in a local document
/// collection.
#[derive(Debug, Parser)]
#[command(name = "fleetbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

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
    /// List all vehicles
    List(ListCommand),

    /// Add a vehicle
    Add(RecordArgs),

    /// Change fields of an existing vehicle
    Edit(EditCommand),

    /// Remove a vehicle
    #[command(alias = "rm")]
    Remove(RemoveCommand),

    /// Show store status
    Status(StatusCommand),

    /// Open an interactive form session
    Shell,

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
