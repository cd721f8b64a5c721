//! Handles all user-facing output for the CLI and session.
//!
//! Centralizing menu printing, load reports, and result rendering here keeps
//! the user experience consistent across subcommands.

use std::collections::HashMap;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::grammar::schema::LoadedCommand;

/// Prints the current choice menu on one line.
pub fn print_choices(labels: &[String]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    print!("choices:");
    let _ = stdout.reset();
    println!(" {}", labels.join(", "));
}

/// Prints an accepted derivation as a command line.
pub fn print_accepted(tokens: &[String]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    print!("accepted:");
    let _ = stdout.reset();
    println!(" {}", tokens.join(" "));
}

/// Prints the per-file load report with a running per-name count.
///
/// Duplicate names are legitimate (they fork on selection); the count makes
/// them visible.
pub fn print_census(commands: &[LoadedCommand]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut origin: Option<&str> = None;
    for command in commands {
        if origin != Some(command.origin.as_str()) {
            println!("loading from {}", command.origin);
            origin = Some(command.origin.as_str());
        }
        let count = counts.entry(command.name.as_str()).or_insert(0);
        *count += 1;
        println!(" > loaded {} ({})", command.name, count);
    }
}

/// Prints the indented grammar tree listing.
pub fn print_tree(pretty: &str) {
    println!("{pretty}");
}
