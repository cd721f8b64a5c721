//! Grammar tree for command-line invocations.
//!
//! The tree is an arena of nodes indexed by [`NodeId`]. Children own nothing;
//! every node records its structural parent as an id, so upward traversal is
//! free of ownership cycles and the whole grammar can be shared read-only
//! behind an `Arc` by any number of enumeration sessions.

use std::fmt::Write as _;

pub mod schema;

/// Opaque grammar node identifier into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The node kinds legal syntax is described with.
///
/// `Command`, `Flag`, `LongFlag`, and `Argument` are the terminals a caller
/// can actually pick; the remaining kinds shape what is reachable when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root sentinel; the top-level set of alternative commands.
    Program { commands: Vec<NodeId> },
    /// A named command with a single option sub-tree.
    Command { name: String, option: NodeId },
    /// A bare flag such as `-l`.
    Flag { name: String },
    /// A flag that may carry a value, such as `--depth <N>`.
    LongFlag { name: String, arg: Option<NodeId> },
    /// A positional or flag value with a semantic type tag.
    Argument {
        name: String,
        arg_type: String,
        is_list: bool,
    },
    /// Content that may be taken or skipped.
    Optional { inner: NodeId },
    /// Ordered, mandatory children.
    Sequence { items: Vec<NodeId> },
    /// Mutually exclusive alternatives.
    Exclusive { alts: Vec<NodeId> },
}

/// One arena slot: the node kind plus its structural parent.
///
/// The root's parent is itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarNode {
    parent: NodeId,
    kind: NodeKind,
}

/// An immutable grammar tree.
///
/// Built once through [`GrammarBuilder`] or the schema loader, then never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    nodes: Vec<GrammarNode>,
    root: NodeId,
}

impl Grammar {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The ids of the top-level commands, in declaration order.
    pub fn commands(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Program { commands } => commands,
            _ => &[],
        }
    }

    /// The surface text a node is offered under.
    ///
    /// Terminals render as their name; structural nodes never reach a choice
    /// menu and render as a bracketed kind tag for debugging output.
    pub fn display_name(&self, id: NodeId) -> &str {
        match self.kind(id) {
            NodeKind::Command { name, .. }
            | NodeKind::Flag { name }
            | NodeKind::LongFlag { name, .. }
            | NodeKind::Argument { name, .. } => name,
            NodeKind::Program { .. } => "<program>",
            NodeKind::Optional { .. } => "<optional>",
            NodeKind::Sequence { .. } => "<sequence>",
            NodeKind::Exclusive { .. } => "<exclusive>",
        }
    }

    /// Renders the whole tree as an indented listing, one node per line.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_node(self.root, 0, &mut out);
        out.trim_end().to_string()
    }

    fn pretty_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.kind(id) {
            NodeKind::Program { commands } => {
                let _ = writeln!(out, "{indent}[Program]");
                for &cmd in commands {
                    self.pretty_node(cmd, depth + 1, out);
                }
            }
            NodeKind::Command { name, option } => {
                let _ = writeln!(out, "{indent}[Command] {name}");
                self.pretty_node(*option, depth + 1, out);
            }
            NodeKind::Flag { name } => {
                let _ = writeln!(out, "{indent}[Flag] {name}");
            }
            NodeKind::LongFlag { name, arg } => {
                let _ = writeln!(out, "{indent}[LongFlag] {name}");
                if let Some(arg) = arg {
                    self.pretty_node(*arg, depth + 1, out);
                }
            }
            NodeKind::Argument {
                name,
                arg_type,
                is_list,
            } => {
                let list = if *is_list { " (list)" } else { "" };
                let _ = writeln!(out, "{indent}[Argument] {name} : {arg_type}{list}");
            }
            NodeKind::Optional { inner } => {
                let _ = writeln!(out, "{indent}[Optional]");
                self.pretty_node(*inner, depth + 1, out);
            }
            NodeKind::Sequence { items } => {
                let _ = writeln!(out, "{indent}[Sequence]");
                for &item in items {
                    self.pretty_node(item, depth + 1, out);
                }
            }
            NodeKind::Exclusive { alts } => {
                let _ = writeln!(out, "{indent}[Exclusive]");
                for &alt in alts {
                    self.pretty_node(alt, depth + 1, out);
                }
            }
        }
    }
}

/// Bottom-up arena builder.
///
/// Children are pushed first; pushing a composite patches each child's
/// parent back-reference to the composite's id. [`GrammarBuilder::finish`]
/// pushes the Program root (its own parent) and seals the tree.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    nodes: Vec<GrammarNode>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        // Parent is patched when the enclosing composite is pushed; the
        // placeholder self-reference is only ever final for the root.
        self.nodes.push(GrammarNode { parent: id, kind });
        id
    }

    fn adopt(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.nodes[child.index()].parent = parent;
        }
    }

    pub fn flag(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Flag { name: name.into() })
    }

    pub fn long_flag(&mut self, name: impl Into<String>, arg: Option<NodeId>) -> NodeId {
        let id = self.push(NodeKind::LongFlag {
            name: name.into(),
            arg,
        });
        if let Some(arg) = arg {
            self.adopt(id, &[arg]);
        }
        id
    }

    pub fn argument(
        &mut self,
        name: impl Into<String>,
        arg_type: impl Into<String>,
        is_list: bool,
    ) -> NodeId {
        self.push(NodeKind::Argument {
            name: name.into(),
            arg_type: arg_type.into(),
            is_list,
        })
    }

    pub fn optional(&mut self, inner: NodeId) -> NodeId {
        let id = self.push(NodeKind::Optional { inner });
        self.adopt(id, &[inner]);
        id
    }

    pub fn sequence(&mut self, items: Vec<NodeId>) -> NodeId {
        let id = self.push(NodeKind::Sequence {
            items: items.clone(),
        });
        self.adopt(id, &items);
        id
    }

    pub fn exclusive(&mut self, alts: Vec<NodeId>) -> NodeId {
        let id = self.push(NodeKind::Exclusive { alts: alts.clone() });
        self.adopt(id, &alts);
        id
    }

    pub fn command(&mut self, name: impl Into<String>, option: NodeId) -> NodeId {
        let id = self.push(NodeKind::Command {
            name: name.into(),
            option,
        });
        self.adopt(id, &[option]);
        id
    }

    /// Seals the tree under a Program root listing `commands`.
    pub fn finish(mut self, commands: Vec<NodeId>) -> Grammar {
        let root = self.push(NodeKind::Program {
            commands: commands.clone(),
        });
        self.adopt(root, &commands);
        Grammar {
            nodes: self.nodes,
            root,
        }
    }
}
