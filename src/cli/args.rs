//! Defines the command-line arguments and subcommands for the trellis CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "trellis",
    version,
    about = "An interactive, grammar-driven enumerator for command-line invocations."
)]
pub struct TrellisArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
///
/// Every subcommand takes one or more grammar description paths; a directory
/// is expanded to the `.json` files beneath it.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enumerate a command interactively from the given grammars.
    Session {
        /// Paths to grammar description files or directories.
        #[arg(required = true)]
        grammars: Vec<PathBuf>,
    },
    /// Pretty-print the grammar tree.
    Tree {
        /// Paths to grammar description files or directories.
        #[arg(required = true)]
        grammars: Vec<PathBuf>,
    },
    /// Load the grammars and report any schema problems.
    Validate {
        /// Paths to grammar description files or directories.
        #[arg(required = true)]
        grammars: Vec<PathBuf>,
    },
    /// List the commands the grammars define, with their source files.
    Commands {
        /// Paths to grammar description files or directories.
        #[arg(required = true)]
        grammars: Vec<PathBuf>,
    },
}
