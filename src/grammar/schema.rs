//! Loading grammar trees from description files.
//!
//! A description file is a JSON array of command entries, each pairing a
//! command name with an option tree built from a small set of kind tags
//! (`compound_options`, `optional_option`, `exclusive_options`,
//! `flag_option`, `long_flag_option`, `argument_option`). Deserialization is
//! permissive; all structural validation happens here so that every rejection
//! is a proper diagnostic naming the offending tag.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::errors::{SchemaSource, TrellisError};
use crate::grammar::{Grammar, GrammarBuilder, NodeId};

/// One command entry in a description file.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    pub option: OptionSpec,
}

/// A raw option node as it appears in a description file.
///
/// Only `type` is universally required; which of the remaining fields must be
/// present depends on the kind tag and is checked in [`build_option`].
#[derive(Debug, Clone, Deserialize)]
pub struct OptionSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub commands: Option<Vec<OptionSpec>>,
    #[serde(default)]
    pub cmd: Option<Box<OptionSpec>>,
    #[serde(default)]
    pub flag_name: Option<String>,
    #[serde(default)]
    pub arg_exists: Option<bool>,
    #[serde(default)]
    pub arg_optional: Option<bool>,
    #[serde(default)]
    pub argument: Option<Box<OptionSpec>>,
    #[serde(default)]
    pub arg_name: Option<String>,
    #[serde(default)]
    pub arg_type: Option<String>,
    #[serde(default, rename = "isList")]
    pub is_list: Option<bool>,
}

/// One command as it was loaded, with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedCommand {
    pub name: String,
    pub origin: String,
}

/// The result of assembling a grammar from one or more description files.
#[derive(Debug)]
pub struct LoadedGrammar {
    pub grammar: Grammar,
    pub commands: Vec<LoadedCommand>,
}

/// Builds a grammar from a single description text.
pub fn grammar_from_str(source: &str, origin: &str) -> Result<Grammar, TrellisError> {
    let src = SchemaSource::from_text(origin, source);
    let specs = parse_specs(source, &src)?;
    let mut builder = GrammarBuilder::new();
    let mut commands = Vec::with_capacity(specs.len());
    for spec in &specs {
        commands.push(build_command(&mut builder, spec, &src)?);
    }
    Ok(builder.finish(commands))
}

/// Assembles one grammar from several description files.
///
/// Commands from every file are appended to a single Program root, in file
/// order then declaration order. Duplicate command names are permitted; two
/// entries sharing a name become an ambiguity fork when that name is
/// selected.
pub fn grammar_from_files(paths: &[PathBuf]) -> Result<LoadedGrammar, TrellisError> {
    let mut builder = GrammarBuilder::new();
    let mut command_ids = Vec::new();
    let mut commands = Vec::new();
    for path in paths {
        let origin = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|source| TrellisError::SchemaIo {
            path: origin.clone(),
            source,
        })?;
        let src = SchemaSource::from_text(&origin, &source);
        for spec in &parse_specs(&source, &src)? {
            command_ids.push(build_command(&mut builder, spec, &src)?);
            commands.push(LoadedCommand {
                name: spec.name.clone(),
                origin: origin.clone(),
            });
        }
    }
    Ok(LoadedGrammar {
        grammar: builder.finish(command_ids),
        commands,
    })
}

/// Expands a mixed list of files and directories into description files.
///
/// Directories are searched recursively for `.json` files; plain files pass
/// through untouched. Discovered files are sorted for deterministic load
/// order.
pub fn expand_grammar_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, TrellisError> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            out.extend(discover_grammar_files(path)?);
        } else {
            out.push(path.clone());
        }
    }
    Ok(out)
}

/// Recursively collects `.json` description files under `root`, sorted.
pub fn discover_grammar_files(root: &Path) -> Result<Vec<PathBuf>, TrellisError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| TrellisError::SchemaIo {
            path: root.display().to_string(),
            source: e.into(),
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn parse_specs(source: &str, src: &SchemaSource) -> Result<Vec<CommandSpec>, TrellisError> {
    serde_json::from_str(source).map_err(|e| TrellisError::MalformedSchema {
        src: src.to_named_source(),
        span: offset_span(source, e.line(), e.column()),
        reason: e.to_string(),
    })
}

fn build_command(
    builder: &mut GrammarBuilder,
    spec: &CommandSpec,
    src: &SchemaSource,
) -> Result<NodeId, TrellisError> {
    let option = build_option(builder, &spec.option, src)?;
    Ok(builder.command(&spec.name, option))
}

/// Translates one raw option node into the arena, children first.
pub fn build_option(
    builder: &mut GrammarBuilder,
    spec: &OptionSpec,
    src: &SchemaSource,
) -> Result<NodeId, TrellisError> {
    match spec.kind.as_str() {
        "compound_options" => {
            let children = group_children(spec, src)?;
            let items = build_children(builder, children, src)?;
            Ok(builder.sequence(items))
        }
        "exclusive_options" => {
            let children = group_children(spec, src)?;
            let alts = build_children(builder, children, src)?;
            Ok(builder.exclusive(alts))
        }
        "optional_option" => {
            let inner = spec
                .cmd
                .as_deref()
                .ok_or_else(|| missing_field(spec, "cmd", src))?;
            let inner = build_option(builder, inner, src)?;
            Ok(builder.optional(inner))
        }
        "flag_option" => {
            let name = spec
                .flag_name
                .as_deref()
                .ok_or_else(|| missing_field(spec, "flag_name", src))?;
            Ok(builder.flag(name))
        }
        "long_flag_option" => build_long_flag(builder, spec, src),
        "argument_option" => {
            let name = spec
                .arg_name
                .as_deref()
                .ok_or_else(|| missing_field(spec, "arg_name", src))?;
            let arg_type = spec
                .arg_type
                .as_deref()
                .ok_or_else(|| missing_field(spec, "arg_type", src))?;
            let is_list = spec
                .is_list
                .ok_or_else(|| missing_field(spec, "isList", src))?;
            Ok(builder.argument(name, arg_type, is_list))
        }
        other => Err(TrellisError::UnknownOptionKind {
            kind: other.to_string(),
            src: src.to_named_source(),
            span: src.span_of(other),
        }),
    }
}

fn build_long_flag(
    builder: &mut GrammarBuilder,
    spec: &OptionSpec,
    src: &SchemaSource,
) -> Result<NodeId, TrellisError> {
    let name = spec
        .flag_name
        .as_deref()
        .ok_or_else(|| missing_field(spec, "flag_name", src))?;
    let arg_exists = spec
        .arg_exists
        .ok_or_else(|| missing_field(spec, "arg_exists", src))?;
    let arg_optional = spec.arg_optional.unwrap_or(false);

    if !arg_exists {
        if arg_optional {
            return Err(TrellisError::InconsistentArgument {
                flag: name.to_string(),
                src: src.to_named_source(),
                span: src.span_of(name),
            });
        }
        return Ok(builder.long_flag(name, None));
    }

    let argument = spec
        .argument
        .as_deref()
        .ok_or_else(|| missing_field(spec, "argument", src))?;
    let mut arg = build_option(builder, argument, src)?;
    if arg_optional {
        arg = builder.optional(arg);
    }
    Ok(builder.long_flag(name, Some(arg)))
}

fn group_children<'s>(
    spec: &'s OptionSpec,
    src: &SchemaSource,
) -> Result<&'s [OptionSpec], TrellisError> {
    let children = spec
        .commands
        .as_deref()
        .ok_or_else(|| missing_field(spec, "commands", src))?;
    if children.is_empty() {
        return Err(TrellisError::EmptyGroup {
            kind: spec.kind.clone(),
            src: src.to_named_source(),
            span: src.span_of(&spec.kind),
        });
    }
    Ok(children)
}

fn build_children(
    builder: &mut GrammarBuilder,
    children: &[OptionSpec],
    src: &SchemaSource,
) -> Result<Vec<NodeId>, TrellisError> {
    children
        .iter()
        .map(|child| build_option(builder, child, src))
        .collect()
}

fn missing_field(spec: &OptionSpec, field: &str, src: &SchemaSource) -> TrellisError {
    TrellisError::MissingSchemaField {
        kind: spec.kind.clone(),
        field: field.to_string(),
        src: src.to_named_source(),
        span: src.span_of(&spec.kind),
    }
}

/// Converts serde_json's 1-based line/column into a byte span.
fn offset_span(source: &str, line: usize, column: usize) -> miette::SourceSpan {
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            offset += column.saturating_sub(1).min(text.len());
            return (offset..offset).into();
        }
        offset += text.len();
    }
    (0..0).into()
}
