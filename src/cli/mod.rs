//! The trellis command-line interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use crate::cli::args::{Command, TrellisArgs};
use crate::errors::{print_error, TrellisError};
use crate::grammar::schema::{expand_grammar_paths, grammar_from_files, LoadedGrammar};
use crate::session;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = TrellisArgs::parse();

    let result = match args.command {
        Command::Session { grammars } => handle_session(&grammars),
        Command::Tree { grammars } => handle_tree(&grammars),
        Command::Validate { grammars } => handle_validate(&grammars),
        Command::Commands { grammars } => handle_commands(&grammars),
    };

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

fn load(paths: &[PathBuf]) -> Result<LoadedGrammar, TrellisError> {
    let files = expand_grammar_paths(paths)?;
    grammar_from_files(&files)
}

fn handle_session(paths: &[PathBuf]) -> Result<(), TrellisError> {
    let loaded = load(paths)?;
    session::run_session(Arc::new(loaded.grammar));
    Ok(())
}

fn handle_tree(paths: &[PathBuf]) -> Result<(), TrellisError> {
    let loaded = load(paths)?;
    output::print_tree(&loaded.grammar.pretty());
    Ok(())
}

fn handle_validate(paths: &[PathBuf]) -> Result<(), TrellisError> {
    let loaded = load(paths)?;
    println!(
        "ok: {} command(s) across {} node(s)",
        loaded.commands.len(),
        loaded.grammar.len()
    );
    Ok(())
}

fn handle_commands(paths: &[PathBuf]) -> Result<(), TrellisError> {
    let loaded = load(paths)?;
    output::print_census(&loaded.commands);
    Ok(())
}
