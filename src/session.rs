//! Interactive enumeration session.
//!
//! A read-select loop over an [`Interface`]: print the current choice menu,
//! read a label, commit it. Selection mistakes are reported and the menu is
//! offered again; the loop ends when `<DONE>` is accepted or input runs out.

use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::output;
use crate::errors::print_error;
use crate::grammar::Grammar;
use crate::interface::Interface;
use crate::walk::DONE_LABEL;

/// Session state that persists across selections.
pub struct SessionState {
    grammar: Arc<Grammar>,
    interface: Interface,
}

impl SessionState {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        let interface = Interface::new(grammar.clone());
        Self { grammar, interface }
    }

    /// Applies one label; reports recoverable errors without aborting.
    /// Returns true once the session has reached an accepted derivation.
    pub fn select_line(&mut self, input: &str) -> bool {
        if let Err(e) = self.interface.select(input) {
            print_error(e);
            return false;
        }
        if self.interface.is_done() {
            if let Some(accepted) = self.interface.accepted() {
                output::print_accepted(&accepted.rendered_path());
            }
            return true;
        }
        false
    }
}

/// Main session entry point.
pub fn run_session(grammar: Arc<Grammar>) {
    println!("trellis session");
    println!("Type :help for help, :quit to exit, select <DONE> to accept");
    println!();

    let mut state = SessionState::new(grammar);

    loop {
        output::print_choices(&state.interface.text_choices());
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some(command) = line.strip_prefix(':') {
                    match handle_session_command(command, &mut state) {
                        SessionCommand::Continue => continue,
                        SessionCommand::Quit => break,
                    }
                }
                if state.select_line(line) {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}

/// Session meta-command results.
enum SessionCommand {
    Continue,
    Quit,
}

/// Handle meta-commands that start with ':'.
fn handle_session_command(command: &str, state: &mut SessionState) -> SessionCommand {
    match command.to_ascii_lowercase().as_str() {
        "help" | "h" => {
            println!("Session commands:");
            println!("  :help, :h     Show this help");
            println!("  :tree, :t     Print the grammar tree");
            println!("  :restart, :r  Drop all selections and start over");
            println!("  :quit, :q     Exit without accepting");
            println!();
            println!("Anything else is matched against the current choices.");
            println!("Select {DONE_LABEL} to accept the derivation.");
            SessionCommand::Continue
        }
        "tree" | "t" => {
            output::print_tree(&state.grammar.pretty());
            SessionCommand::Continue
        }
        "restart" | "r" => {
            state.interface = Interface::new(state.grammar.clone());
            println!("Session restarted.");
            SessionCommand::Continue
        }
        "quit" | "q" => SessionCommand::Quit,
        _ => {
            println!("Unknown command: :{}. Type :help for available commands.", command);
            SessionCommand::Continue
        }
    }
}
