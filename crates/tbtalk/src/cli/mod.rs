//! Command-line interface for tbtalk.
//!
//! This module provides the CLI structure for the `tbtalk` binary. The
//! default action is `run`, which starts the interactive meeting shell.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::ConfigCommand;

/// tbtalk - Single-session toolbox talk meeting record
///
/// Records attendance, hazard/mitigation discussion, action items, and
/// sign-off confirmations for one pre-work safety briefing, then exports a
/// flat-text summary document.
#[derive(Debug, Parser)]
#[command(name = "tbtalk")]
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

    /// The command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive meeting record shell
    Run,

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
