use crate::grammar::{FieldId, Grammar, Symbol};
use crate::green::{Flags, Green, GreenChild, GreenData};
use crate::length::{Length, Range};
use crate::reuse::Subtree;
use crate::tree::Tree;

/// A token consumed by the engine, in absolute coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leaf {
    pub symbol: Symbol,
    pub field: Option<FieldId>,
    pub start: Length,
    pub end: Length,
    /// Bytes after `end` the lexer looked at before deciding the token ended.
    pub lookahead_bytes: u32,
    /// Tokens such as comments that may appear anywhere.
    pub extra: bool,
}

/// Assembles a [`Tree`] from a flat stream of start/leaf/finish calls.
///
/// Leaves arrive in document order; whitespace between them becomes the
/// padding of the following leaf.
pub struct Builder {
    grammar: &'static Grammar,
    parents: Vec<OpenNode>,
    children: Vec<GreenChild>,
    position: Length,
}

struct OpenNode {
    symbol: Symbol,
    field: Option<FieldId>,
    start: Length,
    first_child: usize,
}

impl Builder {
    pub fn new(grammar: &'static Grammar) -> Self {
        Self { grammar, parents: Vec::new(), children: Vec::new(), position: Length::ZERO }
    }

    /// End of the last leaf added so far.
    pub fn position(&self) -> Length {
        self.position
    }

    pub fn start_node(&mut self, symbol: Symbol, field: Option<FieldId>) {
        self.parents.push(OpenNode {
            symbol,
            field,
            start: self.position,
            first_child: self.children.len(),
        });
    }

    pub fn finish_node(&mut self) {
        let Some(open) = self.parents.pop() else {
            debug_assert!(false, "finish_node without a matching start_node");
            return;
        };

        let children = self.children.split_off(open.first_child);
        let node = self.node(open.symbol, open.start, children);
        self.children.push(GreenChild { node, field: open.field });
    }

    pub fn leaf(&mut self, leaf: Leaf) {
        let flags = Flags {
            named: self.grammar.is_named(leaf.symbol),
            extra: leaf.extra,
            has_error: leaf.symbol == Symbol::ERROR,
            ..Flags::default()
        };

        let node = Green::new(GreenData {
            symbol: leaf.symbol,
            padding: leaf.start.saturating_sub(self.position),
            size: leaf.end.saturating_sub(leaf.start),
            lookahead_bytes: leaf.lookahead_bytes,
            flags,
            named_child_count: 0,
            children: Vec::new(),
        });

        if leaf.end.bytes >= self.position.bytes {
            self.position = leaf.end;
        }
        self.children.push(GreenChild { node, field: leaf.field });
    }

    /// Adds a zero-width token the engine expected but did not find.
    pub fn missing(&mut self, symbol: Symbol, field: Option<FieldId>) {
        let flags = Flags {
            named: self.grammar.is_named(symbol),
            missing: true,
            has_error: true,
            ..Flags::default()
        };

        let node = Green::new(GreenData {
            symbol,
            padding: Length::ZERO,
            size: Length::ZERO,
            lookahead_bytes: 0,
            flags,
            named_child_count: 0,
            children: Vec::new(),
        });
        self.children.push(GreenChild { node, field });
    }

    /// Splices an unchanged subtree of an older tree in at the current position.
    pub fn reuse(&mut self, subtree: Subtree, field: Option<FieldId>) {
        let node = subtree.into_green();
        self.position = self.position + node.total();
        self.children.push(GreenChild { node, field });
    }

    /// Closes the tree. The root is stretched to `end` so trailing whitespace belongs to it.
    pub fn finish(mut self, end: Length, included_ranges: Vec<Range>) -> Tree {
        debug_assert!(self.parents.is_empty(), "unfinished nodes left in the builder");
        while !self.parents.is_empty() {
            self.finish_node();
        }

        let mut root = if self.children.len() == 1
            && let Some(child) = self.children.pop()
        {
            child.node
        } else {
            let children = std::mem::take(&mut self.children);
            self.node(Symbol::ERROR, Length::ZERO, children)
        };

        let data = root.make_mut();
        if end.bytes >= data.padding.bytes {
            data.size = end - data.padding;
        }

        Tree::new(root, self.grammar, included_ranges)
    }

    fn node(&self, symbol: Symbol, start: Length, children: Vec<GreenChild>) -> Green {
        let padding = children.first().map_or(Length::ZERO, |child| child.node.padding);
        let size = self.position.saturating_sub(start + padding);

        let mut offset = 0u32;
        let mut lookahead_end = 0u32;
        for child in &children {
            offset = offset.saturating_add(child.node.total().bytes);
            lookahead_end = lookahead_end.max(offset.saturating_add(child.node.lookahead_bytes));
        }

        let flags = Flags {
            named: self.grammar.is_named(symbol),
            has_error: symbol == Symbol::ERROR
                || children.iter().any(|child| child.node.flags.has_error),
            ..Flags::default()
        };
        let named_child_count = children.iter().filter(|child| child.node.flags.named).count();

        Green::new(GreenData {
            symbol,
            padding,
            size,
            lookahead_bytes: lookahead_end.saturating_sub((padding + size).bytes),
            flags,
            named_child_count: named_child_count as u32,
            children,
        })
    }
}
