//! A single cursor over a grammar tree.
//!
//! An [`Enumerator`] owns one derivation path (root first, then every
//! terminal committed so far) over a shared, immutable [`Grammar`]. Choices
//! are recomputed from scratch on every call; nothing about the menu is
//! cached, so the path is the entire state.

use std::sync::Arc;

use crate::errors::TrellisError;
use crate::grammar::{Grammar, NodeId};
use crate::walk::{self, Choice, Trace};

/// A derivation in progress: the committed path plus a terminal flag.
///
/// Cloning yields a fully independent derivation; the grammar itself is
/// shared through the `Arc`, never duplicated.
#[derive(Debug, Clone)]
pub struct Enumerator {
    grammar: Arc<Grammar>,
    path: Trace,
    finished: bool,
}

impl Enumerator {
    pub fn new(grammar: Arc<Grammar>) -> Self {
        let path = Trace::starting_at(grammar.root());
        Self {
            grammar,
            path,
            finished: false,
        }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// The committed derivation path, root first.
    pub fn path(&self) -> &[NodeId] {
        self.path.nodes()
    }

    /// True once the DONE sentinel has been committed; the path is then the
    /// accepted parse.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The choices currently available, recomputed fresh on every call.
    ///
    /// The committed path is forked into a working trace so the walk can
    /// mark skipped and exhausted structure without touching the path
    /// itself.
    pub fn choices(&self) -> Vec<Choice> {
        if self.finished {
            return Vec::new();
        }
        let mut scratch = self.path.clone();
        let at = scratch.last().unwrap_or(self.grammar.root());
        walk::next_choices(&self.grammar, at, &mut scratch)
    }

    /// The rendered labels of [`Enumerator::choices`], in the same order.
    pub fn labels(&self) -> Vec<String> {
        self.choices()
            .iter()
            .map(|choice| choice.label(&self.grammar).to_string())
            .collect()
    }

    /// Commits the `index`-th entry of the current choice menu.
    ///
    /// Indices are only meaningful against the `choices()` result computed
    /// inside this call; a stale index is a caller bug, reported as an
    /// out-of-range error.
    pub fn commit(&mut self, index: usize) -> Result<(), TrellisError> {
        let choices = self.choices();
        let choice =
            choices
                .get(index)
                .copied()
                .ok_or(TrellisError::ChoiceIndexOutOfRange {
                    index,
                    len: choices.len(),
                })?;
        match choice {
            Choice::Done => self.finished = true,
            Choice::Node(id) => self.path.push(id),
        }
        Ok(())
    }

    /// Removes the most recent commitment.
    ///
    /// Accepting DONE is undone first (the path itself carries no sentinel
    /// entry); otherwise the last path element is removed. With nothing
    /// committed this is a no-op; the root never leaves the path.
    pub fn undo(&mut self) {
        if self.finished {
            self.finished = false;
            return;
        }
        self.path.pop();
    }

    /// Indices into the current choice menu whose label equals `label`.
    ///
    /// More than one index means `label` is ambiguous between grammar
    /// positions on this derivation.
    pub fn matching_indices(&self, label: &str) -> Vec<usize> {
        self.choices()
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.label(&self.grammar) == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// The committed path rendered as surface tokens, root omitted.
    pub fn rendered_path(&self) -> Vec<String> {
        self.path()
            .iter()
            .skip(1)
            .map(|&id| self.grammar.display_name(id).to_string())
            .collect()
    }

    /// Two enumerators with equal paths and terminal flags behave
    /// identically from here on.
    pub(crate) fn same_derivation(&self, other: &Self) -> bool {
        self.finished == other.finished && self.path.nodes() == other.path.nodes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    fn find_grammar() -> Arc<Grammar> {
        let mut b = GrammarBuilder::new();
        let name = b.flag("-name");
        let pattern = b.argument("Pattern", "Regex", false);
        let seq = b.sequence(vec![name, pattern]);
        let find = b.command("find", seq);
        Arc::new(b.finish(vec![find]))
    }

    fn select(e: &mut Enumerator, label: &str) {
        let indices = e.matching_indices(label);
        assert_eq!(indices.len(), 1, "label `{label}` should match exactly once");
        e.commit(indices[0]).unwrap();
    }

    #[test]
    fn choices_are_never_cached() {
        let mut e = Enumerator::new(find_grammar());
        assert_eq!(e.labels(), ["<DONE>", "find"]);
        select(&mut e, "find");
        assert_eq!(e.labels(), ["-name"]);
    }

    #[test]
    fn commit_rejects_stale_indices() {
        let mut e = Enumerator::new(find_grammar());
        let err = e.commit(7).unwrap_err();
        assert!(matches!(
            err,
            TrellisError::ChoiceIndexOutOfRange { index: 7, len: 2 }
        ));
        assert_eq!(e.path().len(), 1);
    }

    #[test]
    fn undo_reverses_one_commitment() {
        let mut e = Enumerator::new(find_grammar());
        select(&mut e, "find");
        select(&mut e, "-name");
        e.undo();
        assert_eq!(e.labels(), ["-name"]);
        assert_eq!(e.rendered_path(), ["find"]);
    }

    #[test]
    fn undo_after_done_reopens_the_menu() {
        let mut e = Enumerator::new(find_grammar());
        select(&mut e, "find");
        select(&mut e, "-name");
        select(&mut e, "Pattern");
        select(&mut e, "<DONE>");
        assert!(e.is_finished());
        assert!(e.choices().is_empty());
        e.undo();
        assert!(!e.is_finished());
        assert_eq!(e.labels(), ["<DONE>"]);
    }

    #[test]
    fn clones_do_not_share_paths() {
        let mut a = Enumerator::new(find_grammar());
        select(&mut a, "find");
        let b = a.clone();
        select(&mut a, "-name");
        assert_eq!(a.rendered_path(), ["find", "-name"]);
        assert_eq!(b.rendered_path(), ["find"]);
    }
}
