use crate::grammar::FieldId;
use crate::green::Green;
use crate::length::{Length, Point};
use crate::node::{ChildEntries, Node};
use crate::tree::Tree;

/// A stateful depth-first walker.
///
/// Keeps the path from the node it was created for down to the current
/// node, so moving to a parent or sibling is O(1).
#[derive(Clone)]
pub struct TreeCursor<'tree> {
    tree: &'tree Tree,
    stack: Vec<Entry<'tree>>,
}

#[derive(Clone, Copy)]
struct Entry<'tree> {
    green: &'tree Green,
    start: Length,
    index: usize,
    field: Option<FieldId>,
}

impl<'tree> TreeCursor<'tree> {
    pub fn new(node: Node<'tree>) -> Self {
        let mut cursor = Self { tree: node.tree(), stack: Vec::with_capacity(8) };
        cursor.reset(node);
        cursor
    }

    /// Re-targets the cursor at `node`, which becomes the new top.
    pub fn reset(&mut self, node: Node<'tree>) {
        self.tree = node.tree();
        self.stack.clear();
        self.stack.push(Entry { green: node.green(), start: node.start(), index: 0, field: None });
    }

    fn top(&self) -> &Entry<'tree> {
        &self.stack[self.stack.len() - 1]
    }

    pub fn node(&self) -> Node<'tree> {
        let top = self.top();
        Node::new(self.tree, top.green, top.start)
    }

    /// The field of the current node within its parent. `None` at the top.
    pub fn field_id(&self) -> Option<FieldId> {
        self.top().field
    }

    pub fn field_name(&self) -> Option<&'static str> {
        self.tree.grammar().field_name(self.field_id()?)
    }

    /// Levels below the node the cursor was created for.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn goto_parent(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    pub fn goto_first_child(&mut self) -> bool {
        let top = *self.top();
        let Some(child) = top.green.children.first() else {
            return false;
        };
        self.stack.push(Entry {
            green: &child.node,
            start: top.start,
            index: 0,
            field: child.field,
        });
        true
    }

    pub fn goto_next_sibling(&mut self) -> bool {
        let len = self.stack.len();
        if len < 2 {
            return false;
        }
        let parent = self.stack[len - 2];
        let current = self.stack[len - 1];
        let Some(next) = parent.green.children.get(current.index + 1) else {
            return false;
        };

        self.stack[len - 1] = Entry {
            green: &next.node,
            start: current.start + current.green.size + next.node.padding,
            index: current.index + 1,
            field: next.field,
        };
        true
    }

    pub fn goto_previous_sibling(&mut self) -> bool {
        let len = self.stack.len();
        if len < 2 {
            return false;
        }
        let parent = self.stack[len - 2];
        let Some(index) = self.stack[len - 1].index.checked_sub(1) else {
            return false;
        };

        self.goto_parent();
        self.push_child(parent, |entry_index, _, _| entry_index == index).is_some()
    }

    /// Moves to the first child extending beyond `byte` and returns its index.
    pub fn goto_first_child_for_byte(&mut self, byte: u32) -> Option<usize> {
        let top = *self.top();
        self.push_child(top, |_, _, end| end.bytes > byte)
    }

    /// Moves to the first child extending beyond `point` and returns its index.
    pub fn goto_first_child_for_point(&mut self, point: Point) -> Option<usize> {
        let top = *self.top();
        self.push_child(top, |_, _, end| end.extent > point)
    }

    fn push_child(
        &mut self,
        parent: Entry<'tree>,
        matches: impl Fn(usize, Length, Length) -> bool,
    ) -> Option<usize> {
        let (index, child, start) = ChildEntries::new(parent.green, parent.start)
            .find(|&(index, child, start)| matches(index, start, start + child.node.size))?;
        self.stack.push(Entry { green: &child.node, start, index, field: child.field });
        Some(index)
    }
}
