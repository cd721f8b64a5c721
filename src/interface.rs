//! The caller-facing front end over a set of parallel derivations.
//!
//! An [`Interface`] presents many live [`Enumerator`]s as a single textual
//! choice menu. Selecting a label commits it on every derivation that can
//! accept it (forking a derivation once per position when the label is
//! ambiguous) and silently drops every derivation that cannot. The live set
//! is therefore always exactly the derivations consistent with the labels
//! chosen so far.

use std::sync::Arc;

use crate::enumerator::Enumerator;
use crate::errors::TrellisError;
use crate::grammar::Grammar;
use crate::walk::DONE_LABEL;

#[derive(Debug, Clone)]
pub struct Interface {
    grammar: Arc<Grammar>,
    enumerators: Vec<Enumerator>,
}

impl Interface {
    /// Starts a session with a single derivation at the root.
    pub fn new(grammar: Arc<Grammar>) -> Self {
        let enumerators = vec![Enumerator::new(grammar.clone())];
        Self {
            grammar,
            enumerators,
        }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// The live derivations, in creation order.
    pub fn enumerators(&self) -> &[Enumerator] {
        &self.enumerators
    }

    /// The distinct labels currently offered, in first-seen order across the
    /// live derivations.
    pub fn text_choices(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for enumerator in &self.enumerators {
            for label in enumerator.labels() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    pub fn is_valid_choice(&self, label: &str) -> bool {
        self.text_choices().iter().any(|l| l == label)
    }

    /// True iff `label` is the completion sentinel and currently offered.
    pub fn is_terminal(&self, label: &str) -> bool {
        label == DONE_LABEL && self.is_valid_choice(DONE_LABEL)
    }

    /// True once some derivation has accepted the completion sentinel.
    pub fn is_done(&self) -> bool {
        self.enumerators.iter().any(Enumerator::is_finished)
    }

    /// The first accepted derivation, once [`Interface::is_done`] holds.
    pub fn accepted(&self) -> Option<&Enumerator> {
        self.enumerators.iter().find(|e| e.is_finished())
    }

    /// Commits `label` on every derivation that offers it.
    ///
    /// Each derivation is cloned once per position matching `label`, so an
    /// ambiguous label forks; derivations with no match are dropped. Forks
    /// that end up on structurally equal paths are merged, since they cannot
    /// diverge afterwards. A label outside the current menu is a recoverable
    /// error and leaves the interface untouched.
    pub fn select(&mut self, label: &str) -> Result<(), TrellisError> {
        let offered = self.text_choices();
        if !offered.iter().any(|l| l == label) {
            return Err(TrellisError::InvalidChoice {
                label: label.to_string(),
                help: Some(format!("currently offered: {}", offered.join(", "))),
            });
        }
        let mut survivors: Vec<Enumerator> = Vec::new();
        for enumerator in &self.enumerators {
            for index in enumerator.matching_indices(label) {
                let mut fork = enumerator.clone();
                fork.commit(index)?;
                if !survivors.iter().any(|s| s.same_derivation(&fork)) {
                    survivors.push(fork);
                }
            }
        }
        self.enumerators = survivors;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    /// One command whose two exclusive branches both start with `-v`.
    fn ambiguous_grammar() -> Arc<Grammar> {
        let mut b = GrammarBuilder::new();
        let v1 = b.flag("-v");
        let f = b.flag("-f");
        let left = b.sequence(vec![v1, f]);
        let v2 = b.flag("-v");
        let x = b.flag("-x");
        let right = b.sequence(vec![v2, x]);
        let alt = b.exclusive(vec![left, right]);
        let cmd = b.command("tar", alt);
        Arc::new(b.finish(vec![cmd]))
    }

    #[test]
    fn ambiguous_label_is_listed_once_but_forks() {
        let mut i = Interface::new(ambiguous_grammar());
        i.select("tar").unwrap();
        assert_eq!(i.text_choices(), ["-v"]);
        i.select("-v").unwrap();
        assert_eq!(i.enumerators().len(), 2);
        assert_eq!(i.text_choices(), ["-f", "-x"]);
    }

    #[test]
    fn pruning_drops_derivations_that_cannot_continue() {
        let mut i = Interface::new(ambiguous_grammar());
        i.select("tar").unwrap();
        i.select("-v").unwrap();
        i.select("-f").unwrap();
        assert_eq!(i.enumerators().len(), 1);
        assert_eq!(
            i.enumerators()[0].rendered_path(),
            ["tar", "-v", "-f"]
        );
    }

    #[test]
    fn failed_select_changes_nothing() {
        let mut i = Interface::new(ambiguous_grammar());
        i.select("tar").unwrap();
        let before = i.text_choices();
        let count = i.enumerators().len();
        let err = i.select("-zzz").unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(i.text_choices(), before);
        assert_eq!(i.enumerators().len(), count);
    }
}
