pub use crate::errors::{print_error, ErrorCategory, SchemaSource, TrellisError};
pub use crate::grammar::{Grammar, GrammarBuilder, NodeId, NodeKind};
pub use crate::interface::Interface;
pub use crate::walk::{Choice, DONE_LABEL};

pub mod cli;
pub mod enumerator;
pub mod errors;
pub mod grammar;
pub mod interface;
pub mod session;
pub mod walk;
