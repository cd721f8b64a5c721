//! The traversal protocol: which tokens can extend a derivation next.
//!
//! The whole algorithm lives in three functions matched over [`NodeKind`]:
//!
//! - [`entry_choices`]: a node is entered fresh from its parent; drill into
//!   its sub-structure until terminals surface.
//! - [`next_choices`]: a node is already on the derivation path; compute
//!   every terminal reachable from it.
//! - [`exit_choices`]: a node's subtree is exhausted; record it and hand
//!   control to its parent, which either advances (Sequence) or exits in
//!   turn.
//!
//! All three thread a [`Trace`]: the derivation path copied into a working
//! set that the walk extends as it resolves skippable and exhausted
//! structure. Marking an `Optional` as visited mid-walk is what lets an
//! enclosing `Sequence` offer the content behind it in the same menu.

use std::collections::HashSet;

use crate::grammar::{Grammar, NodeId, NodeKind};

/// Surface text of the completion sentinel offered at the root.
pub const DONE_LABEL: &str = "<DONE>";

/// One offerable next move: a terminal grammar node, or completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Accept the derivation as complete.
    Done,
    /// Extend the derivation with this terminal node.
    Node(NodeId),
}

impl Choice {
    /// The label this choice is offered under.
    pub fn label<'g>(&self, grammar: &'g Grammar) -> &'g str {
        match self {
            Choice::Done => DONE_LABEL,
            Choice::Node(id) => grammar.display_name(*id),
        }
    }
}

/// An ordered visit list with an O(1) membership index.
///
/// The committed derivation path is one of these; `choices` computations
/// fork it and extend the fork as they walk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trace {
    order: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl Trace {
    pub fn starting_at(root: NodeId) -> Self {
        let mut trace = Self::default();
        trace.push(root);
        trace
    }

    pub fn push(&mut self, id: NodeId) {
        self.order.push(id);
        self.seen.insert(id);
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }

    pub fn last(&self) -> Option<NodeId> {
        self.order.last().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    /// Removes the most recent entry, refusing to remove the first.
    pub fn pop(&mut self) -> Option<NodeId> {
        if self.order.len() <= 1 {
            return None;
        }
        let id = self.order.pop()?;
        // The walk may record a node more than once; only drop the
        // membership entry when no earlier occurrence remains.
        if !self.order.contains(&id) {
            self.seen.remove(&id);
        }
        Some(id)
    }
}

/// Choices available when `id` is entered fresh from its parent.
pub fn entry_choices(grammar: &Grammar, id: NodeId, trace: &mut Trace) -> Vec<Choice> {
    match grammar.kind(id) {
        NodeKind::Command { .. }
        | NodeKind::Flag { .. }
        | NodeKind::LongFlag { .. }
        | NodeKind::Argument { .. } => vec![Choice::Node(id)],
        NodeKind::Program { .. }
        | NodeKind::Optional { .. }
        | NodeKind::Sequence { .. }
        | NodeKind::Exclusive { .. } => next_choices(grammar, id, trace),
    }
}

/// Choices reachable from `id` when it is already on the derivation path.
pub fn next_choices(grammar: &Grammar, id: NodeId, trace: &mut Trace) -> Vec<Choice> {
    match grammar.kind(id) {
        NodeKind::Program { commands } => {
            let mut out = vec![Choice::Done];
            for &command in commands {
                if !trace.contains(command) {
                    out.extend(entry_choices(grammar, command, trace));
                }
            }
            out
        }
        NodeKind::Command { option, .. } => {
            trace.push(id);
            entry_choices(grammar, *option, trace)
        }
        NodeKind::Flag { .. } | NodeKind::Argument { .. } => exit_choices(grammar, id, trace),
        NodeKind::LongFlag { arg, .. } => match *arg {
            Some(arg) => {
                trace.push(id);
                entry_choices(grammar, arg, trace)
            }
            None => exit_choices(grammar, id, trace),
        },
        NodeKind::Optional { inner } => {
            trace.push(id);
            let mut out = entry_choices(grammar, *inner, trace);
            out.extend(exit_choices(grammar, id, trace));
            out
        }
        NodeKind::Sequence { items } => {
            trace.push(id);
            let Some(&last_item) = items.last() else {
                return exit_choices(grammar, id, trace);
            };
            if trace.contains(last_item) {
                return exit_choices(grammar, id, trace);
            }
            // Scan from the end for the rightmost visited child; the one
            // after it is the next mandatory element. No child visited means
            // the sequence starts at its first element.
            let mut next = last_item;
            for &item in items.iter().rev() {
                if trace.contains(item) {
                    return entry_choices(grammar, next, trace);
                }
                next = item;
            }
            entry_choices(grammar, next, trace)
        }
        NodeKind::Exclusive { alts } => {
            trace.push(id);
            let mut out = Vec::new();
            for &alt in alts {
                out.extend(entry_choices(grammar, alt, trace));
            }
            out
        }
    }
}

/// `id`'s subtree is exhausted: record it and continue in its parent.
pub fn exit_choices(grammar: &Grammar, id: NodeId, trace: &mut Trace) -> Vec<Choice> {
    trace.push(id);
    resume_after(grammar, grammar.parent(id), id, trace)
}

/// Continue traversal inside `parent` after `just_left` finished.
fn resume_after(
    grammar: &Grammar,
    parent: NodeId,
    just_left: NodeId,
    trace: &mut Trace,
) -> Vec<Choice> {
    match grammar.kind(parent) {
        // Back at the root: the derivation may stop here or open another
        // command.
        NodeKind::Program { .. } => next_choices(grammar, parent, trace),
        NodeKind::Sequence { items } => {
            trace.push(parent);
            let position = items.iter().position(|&item| item == just_left);
            match position {
                Some(i) if i + 1 < items.len() => entry_choices(grammar, items[i + 1], trace),
                // The finished child was the last element (or not a direct
                // child, which committed paths never produce): exhausted.
                _ => exit_choices(grammar, parent, trace),
            }
        }
        // Every other kind is itself finished once a child is.
        _ => exit_choices(grammar, parent, trace),
    }
}
