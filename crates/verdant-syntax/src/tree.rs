use std::fmt;

use tracing::trace;

use crate::cursor::TreeCursor;
use crate::grammar::Grammar;
use crate::green::{Green, RelativeEdit};
use crate::length::{InputEdit, Point, Range};
use crate::node::Node;

/// The result of a parse.
///
/// Cloning is cheap and shares all nodes; [`Tree::edit`] copies only the
/// nodes it touches, so other clones keep seeing the text they were parsed from.
#[derive(Clone)]
pub struct Tree {
    root: Green,
    grammar: &'static Grammar,
    included_ranges: Vec<Range>,
}

impl Tree {
    pub(crate) fn new(root: Green, grammar: &'static Grammar, included_ranges: Vec<Range>) -> Self {
        Self { root, grammar, included_ranges }
    }

    pub(crate) fn root_green(&self) -> &Green {
        &self.root
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::new(self, &self.root, self.root.padding)
    }

    pub fn grammar(&self) -> &'static Grammar {
        self.grammar
    }

    /// The ranges of the document this tree was parsed from.
    pub fn included_ranges(&self) -> &[Range] {
        &self.included_ranges
    }

    pub fn walk(&self) -> TreeCursor<'_> {
        self.root_node().walk()
    }

    /// Adjusts the tree to a text edit made after it was parsed.
    ///
    /// Nodes overlapping the edit get `has_changes` set so a following parse
    /// with this tree as the old tree rebuilds them.
    pub fn edit(&mut self, edit: &InputEdit) {
        trace!(
            start = edit.start_byte,
            old_end = edit.old_end_byte,
            new_end = edit.new_end_byte,
            "editing tree"
        );

        self.root.edit(RelativeEdit {
            start: edit.start(),
            old_end: edit.old_end(),
            new_end: edit.new_end(),
        });

        for range in &mut self.included_ranges {
            if *range != Range::WHOLE_DOCUMENT {
                shift_range(range, edit);
            }
        }
    }

    /// Ranges whose syntactic structure differs between this tree, edited
    /// to match the new text, and `new_tree`, parsed from it.
    pub fn changed_ranges(&self, new_tree: &Self) -> Vec<Range> {
        crate::changes::changed_ranges(self, new_tree)
    }
}

fn shift_range(range: &mut Range, edit: &InputEdit) {
    if range.end_byte >= edit.old_end_byte {
        if range.end_byte != u32::MAX {
            range.end_byte = edit.new_end_byte.saturating_add(range.end_byte - edit.old_end_byte);
            range.end_point = edit.new_end_point + (range.end_point - edit.old_end_point);
            if range.end_byte < edit.new_end_byte {
                range.end_byte = u32::MAX;
                range.end_point = Point::MAX;
            }
        }
    } else if range.end_byte > edit.start_byte {
        range.end_byte = edit.start_byte;
        range.end_point = edit.start_point;
    }

    if range.start_byte >= edit.old_end_byte {
        range.start_byte = edit.new_end_byte.saturating_add(range.start_byte - edit.old_end_byte);
        range.start_point = edit.new_end_point + (range.start_point - edit.old_end_point);
    } else if range.start_byte > edit.start_byte {
        range.start_byte = edit.start_byte;
        range.start_point = edit.start_point;
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Tree {:?}}}", self.root_node())
    }
}
