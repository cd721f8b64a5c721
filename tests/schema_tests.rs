//! Schema loading and diagnostics tests.

use std::fs;
use std::path::PathBuf;

use miette::Diagnostic;
use trellis::grammar::schema::{
    discover_grammar_files, expand_grammar_paths, grammar_from_files, grammar_from_str,
};
use trellis::{ErrorCategory, Interface, TrellisError};

/// A scratch directory removed on drop, so parallel tests never collide.
struct Scratch {
    root: PathBuf,
}

impl Scratch {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("trellis-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn code_of(err: &TrellisError) -> String {
    err.code().map(|c| c.to_string()).unwrap_or_default()
}

#[test]
fn the_bundled_grammar_loads() {
    let loaded = grammar_from_files(&[PathBuf::from("data/core_utils.json")]).unwrap();
    let names: Vec<&str> = loaded.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["find", "ls", "head", "du", "tar"]);
    assert!(loaded.grammar.pretty().contains("[Command] find"));
}

#[test]
fn unknown_kind_tag_is_named_and_coded() {
    let bad = r#"[{ "name": "x", "option": { "type": "sideways_option" } }]"#;
    let err = grammar_from_str(bad, "bad.json").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);
    assert!(err.to_string().contains("sideways_option"));
    assert_eq!(code_of(&err), "trellis::schema::unknown_kind");
}

#[test]
fn missing_required_field_is_reported_per_kind() {
    let bad = r#"[{ "name": "x", "option": { "type": "flag_option" } }]"#;
    let err = grammar_from_str(bad, "bad.json").unwrap_err();
    assert!(matches!(
        &err,
        TrellisError::MissingSchemaField { kind, field, .. }
            if kind == "flag_option" && field == "flag_name"
    ));
}

#[test]
fn empty_groups_are_rejected() {
    for kind in ["compound_options", "exclusive_options"] {
        let bad = format!(r#"[{{ "name": "x", "option": {{ "type": "{kind}", "commands": [] }} }}]"#);
        let err = grammar_from_str(&bad, "bad.json").unwrap_err();
        assert_eq!(code_of(&err), "trellis::schema::empty_group");
    }
}

#[test]
fn inconsistent_argument_flags_are_rejected() {
    let bad = r#"[{ "name": "x", "option": {
        "type": "long_flag_option", "flag_name": "--level",
        "arg_exists": false, "arg_optional": true } }]"#;
    let err = grammar_from_str(bad, "bad.json").unwrap_err();
    assert_eq!(code_of(&err), "trellis::schema::inconsistent_argument");
    assert!(err.to_string().contains("--level"));
}

#[test]
fn malformed_json_is_a_schema_error() {
    let err = grammar_from_str("[{", "broken.json").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Schema);
    assert_eq!(code_of(&err), "trellis::schema::malformed");
}

#[test]
fn unreadable_files_are_reported_with_their_path() {
    let err = grammar_from_files(&[PathBuf::from("data/does_not_exist.json")]).unwrap_err();
    assert!(matches!(&err, TrellisError::SchemaIo { path, .. }
        if path.contains("does_not_exist")));
}

#[test]
fn commands_from_several_files_share_one_root() {
    let scratch = Scratch::new("merge");
    let a = scratch.file(
        "a.json",
        r#"[{ "name": "touch", "option": { "type": "flag_option", "flag_name": "-c" } }]"#,
    );
    let b = scratch.file(
        "b.json",
        r#"[{ "name": "touch", "option": { "type": "flag_option", "flag_name": "-a" } }]"#,
    );
    let loaded = grammar_from_files(&[a, b]).unwrap();
    assert_eq!(loaded.commands.len(), 2);
    assert_eq!(loaded.grammar.commands().len(), 2);

    // Same surface name from two files: one menu entry, a fork on selection.
    let mut i = Interface::new(std::sync::Arc::new(loaded.grammar));
    assert_eq!(i.text_choices(), ["<DONE>", "touch"]);
    i.select("touch").unwrap();
    assert_eq!(i.enumerators().len(), 2);
}

#[test]
fn discovery_walks_directories_recursively_and_sorts() {
    let scratch = Scratch::new("discover");
    scratch.file(
        "nested/deep/b.json",
        r#"[{ "name": "b", "option": { "type": "flag_option", "flag_name": "-b" } }]"#,
    );
    scratch.file(
        "a.json",
        r#"[{ "name": "a", "option": { "type": "flag_option", "flag_name": "-a" } }]"#,
    );
    scratch.file("notes.txt", "not a grammar");

    let files = discover_grammar_files(&scratch.root).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("a.json"));
    assert!(files[1].ends_with("nested/deep/b.json"));

    let expanded = expand_grammar_paths(&[scratch.root.clone()]).unwrap();
    assert_eq!(expanded, files);
}
