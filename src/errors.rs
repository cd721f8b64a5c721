//! Unified, `miette`-based diagnostics for the trellis crate.
//!
//! Every failure mode is a variant of [`TrellisError`]. Schema errors carry
//! the grammar description text they were raised against so reports can
//! label the offending spot; choice errors are plain and recoverable.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Unified error type for all trellis failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum TrellisError {
    #[error("Schema error: unknown option kind `{kind}`")]
    #[diagnostic(
        code(trellis::schema::unknown_kind),
        help(
            "recognized kinds are compound_options, optional_option, exclusive_options, \
             flag_option, long_flag_option, and argument_option"
        )
    )]
    UnknownOptionKind {
        kind: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("unrecognized kind tag")]
        span: SourceSpan,
    },

    #[error("Schema error: `{kind}` is missing required field `{field}`")]
    #[diagnostic(code(trellis::schema::missing_field))]
    MissingSchemaField {
        kind: String,
        field: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("Schema error: long flag `{flag}` marks its argument optional but declares no argument")]
    #[diagnostic(
        code(trellis::schema::inconsistent_argument),
        help("set `arg_exists` to true and supply `argument`, or drop `arg_optional`")
    )]
    InconsistentArgument {
        flag: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("inconsistent flags")]
        span: SourceSpan,
    },

    #[error("Schema error: `{kind}` requires at least one child option")]
    #[diagnostic(code(trellis::schema::empty_group))]
    EmptyGroup {
        kind: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("empty group")]
        span: SourceSpan,
    },

    #[error("Schema error: malformed grammar description: {reason}")]
    #[diagnostic(code(trellis::schema::malformed))]
    MalformedSchema {
        reason: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parse failed here")]
        span: SourceSpan,
    },

    #[error("Schema error: cannot read grammar file `{path}`")]
    #[diagnostic(
        code(trellis::schema::io),
        help("check that the grammar file exists and is readable")
    )]
    SchemaIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{label}` is not one of the current choices")]
    #[diagnostic(code(trellis::choice::invalid))]
    InvalidChoice {
        label: String,
        #[help]
        help: Option<String>,
    },

    #[error("choice index {index} is out of range ({len} choices)")]
    #[diagnostic(
        code(trellis::internal::index_out_of_range),
        help("indices are only valid against the `choices()` call that produced them")
    )]
    ChoiceIndexOutOfRange { index: usize, len: usize },
}

/// Coarse error classification for test assertions.
///
/// Matching on the category avoids string-matching rendered messages in
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Choice,
    Internal,
}

impl TrellisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownOptionKind { .. }
            | Self::MissingSchemaField { .. }
            | Self::InconsistentArgument { .. }
            | Self::EmptyGroup { .. }
            | Self::MalformedSchema { .. }
            | Self::SchemaIo { .. } => ErrorCategory::Schema,
            Self::InvalidChoice { .. } => ErrorCategory::Choice,
            Self::ChoiceIndexOutOfRange { .. } => ErrorCategory::Internal,
        }
    }

    /// Recoverable errors leave the structure that raised them untouched;
    /// the caller may retry the operation.
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Choice
    }
}

/// The grammar description text an error can point into.
///
/// Real description text is preferred; the fallback exists for errors raised
/// against grammars assembled programmatically, where no text was ever read.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub name: String,
    pub content: String,
}

impl SchemaSource {
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Use only when no real description text is available.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "<builder>".to_string(),
            content: format!("// {context}"),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.clone())
    }

    /// Best-effort span of the first occurrence of `needle` in the
    /// description text, for labeling diagnostics. Falls back to an empty
    /// span at the start when the needle cannot be located.
    pub fn span_of(&self, needle: &str) -> SourceSpan {
        match self.content.find(needle) {
            Some(start) => (start..start + needle.len()).into(),
            None => unspanned(),
        }
    }
}

/// A placeholder span for errors not tied to a location in the description
/// text. Makes the intent of an empty span explicit and searchable.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Prints a [`TrellisError`] as a full miette report on stderr.
///
/// Use this for user-facing error display in CLI and session contexts.
pub fn print_error(error: TrellisError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
