//! Block stack assembly.
//!
//! Nodes arrive in source order. The assembler keeps a stack of open
//! blocks, one per nesting level, with the deepest on top. A node is placed
//! in the block whose depth equals its own, after every deeper block has
//! been rolled up into its parent.
//!
//! A node with an empty value does not produce a value immediately. It is
//! held as the pending parent, and the next node opens a child block under
//! it. When that next node is not actually deeper, the child block is
//! marked collapsed and rolls up as `null`.

use crate::config::ParseOptions;
use crate::exception::{ExceptionLog, Reason};
use crate::interpret::interpret;
use crate::tokenizer::{Node, NodeKind};
use crate::value::{Mapping, Value};

/// An open container.
#[derive(Debug)]
enum Container {
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Container {
    fn new(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Sequence => Container::Sequence(Vec::new()),
            NodeKind::Mapping => Container::Mapping(Mapping::new()),
        }
    }

    #[inline]
    fn kind(&self) -> NodeKind {
        match self {
            Container::Sequence(_) => NodeKind::Sequence,
            Container::Mapping(_) => NodeKind::Mapping,
        }
    }

    /// Append to a sequence, or assign under `key` in a mapping.
    fn insert(&mut self, key: &str, value: Value) {
        match self {
            Container::Sequence(items) => items.push(value),
            Container::Mapping(map) => {
                map.insert(key.to_string(), value);
            }
        }
    }

    fn into_value(self) -> Value {
        match self {
            Container::Sequence(items) => Value::Sequence(items),
            Container::Mapping(map) => Value::Mapping(map),
        }
    }
}

/// A container accumulating nodes at one depth.
#[derive(Debug)]
struct Block {
    depth: usize,
    /// The node that opened this block; None only for the root
    parent: Option<Node>,
    container: Container,
    /// Rolls up as `null` instead of its container
    collapsed: bool,
}

impl Block {
    #[inline]
    fn kind(&self) -> NodeKind {
        self.container.kind()
    }

    /// Close the block, returning its parent node and finished value.
    fn finish(self) -> (Option<Node>, Value) {
        let value = if self.collapsed {
            Value::Null
        } else {
            self.container.into_value()
        };
        (self.parent, value)
    }
}

/// Assembler state for one parse.
struct Assembler<'a> {
    /// Open blocks, deepest last
    blocks: Vec<Block>,
    /// Empty-valued node waiting to see whether the next node nests under it
    pending: Option<Node>,
    options: &'a ParseOptions,
    log: &'a mut ExceptionLog,
}

impl<'a> Assembler<'a> {
    fn new(options: &'a ParseOptions, log: &'a mut ExceptionLog) -> Self {
        Self {
            blocks: Vec::new(),
            pending: None,
            options,
            log,
        }
    }

    fn push_node(&mut self, node: Node) {
        if self.blocks.is_empty() || self.pending.is_some() {
            let parent = self.pending.take();
            let collapsed = parent.as_ref().is_some_and(|p| p.depth >= node.depth);
            self.blocks.push(Block {
                depth: node.depth,
                parent,
                container: Container::new(node.kind()),
                collapsed,
            });
        }

        if !self.blocks.iter().any(|b| b.depth == node.depth) {
            self.log
                .record(node.line, Reason::InvalidIndentation, node.text);
            return;
        }

        self.roll_up_to(node.depth);

        let Some(top) = self.blocks.last_mut() else {
            return;
        };

        if node.kind() != top.kind() {
            self.log.record(node.line, Reason::KindMismatch, node.text);
            return;
        }

        // Only reachable when a collapsed block hid an unmatched depth.
        if node.depth != top.depth {
            self.log
                .record(node.line, Reason::InvalidIndentation, node.text);
            return;
        }

        if node.raw_value.is_empty() {
            self.pending = Some(node);
        } else {
            let value = interpret(&node.raw_value, self.options);
            top.container.insert(&node.key, value);
        }
    }

    /// Roll up blocks whose parent is at or below `depth`.
    fn roll_up_to(&mut self, depth: usize) {
        while let Some(top) = self.blocks.last() {
            let rolls_up = top.parent.as_ref().is_some_and(|p| depth <= p.depth);
            if !rolls_up {
                break;
            }
            self.merge_top();
        }
    }

    /// Pop the top block and merge its value into the block beneath.
    fn merge_top(&mut self) {
        let Some(top) = self.blocks.pop() else {
            return;
        };
        let (parent, value) = top.finish();
        if let (Some(beneath), Some(parent)) = (self.blocks.last_mut(), parent) {
            beneath.container.insert(&parent.key, value);
        }
    }

    fn finish(mut self) -> Value {
        if let Some(node) = self.pending.take() {
            if let Some(top) = self.blocks.last_mut() {
                top.container.insert(&node.key, Value::Null);
            }
        }

        while self.blocks.len() > 1 {
            self.merge_top();
        }

        self.blocks
            .pop()
            .map(|root| root.finish().1)
            .unwrap_or(Value::Null)
    }
}

/// Assemble accepted nodes into a document value.
///
/// Returns `Value::Null` when no node was placed.
pub(crate) fn assemble(nodes: Vec<Node>, options: &ParseOptions, log: &mut ExceptionLog) -> Value {
    let mut assembler = Assembler::new(options, log);
    for node in nodes {
        assembler.push_node(node);
    }
    assembler.finish()
}
