use std::ops::Deref;

use triomphe::Arc;

use crate::grammar::{FieldId, Symbol};
use crate::length::Length;

/// Immutable, position-independent tree storage.
///
/// Nodes only know their own `padding` (whitespace before the first byte)
/// and `size`; absolute positions are recovered while walking down from the root.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Green(Arc<GreenData>);

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct GreenData {
    pub(crate) symbol: Symbol,
    pub(crate) padding: Length,
    pub(crate) size: Length,
    /// Bytes past the end that the lexer inspected to produce this node.
    pub(crate) lookahead_bytes: u32,
    pub(crate) flags: Flags,
    pub(crate) named_child_count: u32,
    pub(crate) children: Vec<GreenChild>,
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct GreenChild {
    pub(crate) node: Green,
    pub(crate) field: Option<FieldId>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Flags {
    pub(crate) named: bool,
    pub(crate) extra: bool,
    pub(crate) missing: bool,
    pub(crate) has_changes: bool,
    pub(crate) has_error: bool,
}

/// An edit expressed relative to the start of a node's padding.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RelativeEdit {
    pub(crate) start: Length,
    pub(crate) old_end: Length,
    pub(crate) new_end: Length,
}

impl Green {
    pub(crate) fn new(data: GreenData) -> Self {
        Self(Arc::new(data))
    }

    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn make_mut(&mut self) -> &mut GreenData {
        Arc::make_mut(&mut self.0)
    }

    /// Rewrites padding and size of every node touched by `edit`, copying
    /// shared nodes on the way down. Untouched subtrees stay shared.
    pub(crate) fn edit(&mut self, edit: RelativeEdit) {
        let is_noop =
            edit.old_end.bytes == edit.start.bytes && edit.new_end.bytes == edit.start.bytes;
        let mut is_pure_insertion = edit.old_end.bytes == edit.start.bytes;

        let mut padding = self.padding;
        let mut size = self.size;
        let total = padding + size;
        let lookahead_end = total.bytes.saturating_add(self.lookahead_bytes);

        if edit.start.bytes > lookahead_end || (is_noop && edit.start.bytes == lookahead_end) {
            return;
        }

        if edit.old_end.bytes <= padding.bytes {
            // Entirely inside the leading whitespace.
            padding = edit.new_end + (padding - edit.old_end);
        } else if edit.start.bytes < padding.bytes {
            // Starts in the whitespace and runs into the content.
            size = size.saturating_sub(edit.old_end - padding);
            padding = edit.new_end;
        } else if edit.start.bytes == padding.bytes && is_pure_insertion {
            padding = edit.new_end;
        } else if edit.start.bytes < total.bytes
            || (edit.start.bytes == total.bytes && is_pure_insertion)
        {
            size = (edit.new_end - padding) + total.saturating_sub(edit.old_end);
        }

        let data = self.make_mut();
        data.padding = padding;
        data.size = size;
        data.flags.has_changes = true;

        let mut edit = edit;
        let mut child_right = Length::ZERO;
        for (index, child) in data.children.iter_mut().enumerate() {
            let child_size = child.node.total();
            let child_left = child_right;
            child_right = child_left + child_size;

            if child_right.bytes.saturating_add(child.node.lookahead_bytes) < edit.start.bytes {
                continue;
            }
            if child_left.bytes > edit.old_end.bytes
                || (child_left.bytes == edit.old_end.bytes && child_size.bytes > 0 && index > 0)
            {
                break;
            }

            let mut child_edit = RelativeEdit {
                start: edit.start.saturating_sub(child_left),
                old_end: edit.old_end.saturating_sub(child_left),
                new_end: edit.new_end.saturating_sub(child_left),
            };

            // Only the first child reached absorbs the inserted text.
            if child_right.bytes > edit.start.bytes
                || (child_right.bytes == edit.start.bytes && is_pure_insertion)
            {
                edit.new_end = edit.start;
                is_pure_insertion = false;
            } else {
                child_edit.old_end = child_edit.start;
                child_edit.new_end = child_edit.start;
            }

            child.node.edit(child_edit);
        }
    }
}

impl Deref for Green {
    type Target = GreenData;

    fn deref(&self) -> &GreenData {
        &self.0
    }
}

impl GreenData {
    /// Padding plus size.
    pub(crate) fn total(&self) -> Length {
        self.padding + self.size
    }
}
