use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};

use text_size::{TextRange, TextSize};

use crate::cursor::TreeCursor;
use crate::grammar::{FieldId, Symbol};
use crate::green::{Green, GreenChild, GreenData};
use crate::length::{InputEdit, Length, Point, Range, shift_position};
use crate::reuse::Subtree;
use crate::tree::Tree;

/// A borrowed view of one syntax node.
///
/// Nodes are `Copy` and never outlive their [`Tree`]. Absence is `None`.
#[derive(Clone, Copy)]
pub struct Node<'tree> {
    tree: &'tree Tree,
    green: &'tree Green,
    start: Length,
}

impl<'tree> Node<'tree> {
    pub(crate) fn new(tree: &'tree Tree, green: &'tree Green, start: Length) -> Self {
        Self { tree, green, start }
    }

    pub(crate) fn green(&self) -> &'tree Green {
        self.green
    }

    pub(crate) fn start(&self) -> Length {
        self.start
    }

    pub(crate) fn end(&self) -> Length {
        self.start + self.green.size
    }

    /// Start of the whitespace before this node.
    pub(crate) fn total_start_byte(&self) -> u32 {
        self.start.bytes.saturating_sub(self.green.padding.bytes)
    }

    fn data(&self) -> &'tree GreenData {
        self.green
    }

    pub fn tree(&self) -> &'tree Tree {
        self.tree
    }

    /// Identity of the underlying storage, stable while the tree is unchanged.
    pub fn id(&self) -> usize {
        std::ptr::from_ref(self.data()).addr()
    }

    #[inline]
    pub fn symbol(&self) -> Symbol {
        self.green.symbol
    }

    /// The grammar name of this node's symbol.
    #[inline]
    pub fn kind(&self) -> &'static str {
        self.tree.grammar().symbol_name(self.symbol()).unwrap_or_default()
    }

    #[inline]
    pub fn is_named(&self) -> bool {
        self.green.flags.named
    }

    /// Inserted by error recovery; spans zero bytes.
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.green.flags.missing
    }

    #[inline]
    pub fn is_extra(&self) -> bool {
        self.green.flags.extra
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.symbol() == Symbol::ERROR
    }

    /// Whether this node or any descendant is an error or missing node.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.green.flags.has_error
    }

    /// Whether a [`Tree::edit`] touched this node since it was parsed.
    #[inline]
    pub fn has_changes(&self) -> bool {
        self.green.flags.has_changes
    }

    #[inline]
    pub fn start_byte(&self) -> u32 {
        self.start.bytes
    }

    #[inline]
    pub fn end_byte(&self) -> u32 {
        self.end().bytes
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.start.extent
    }

    #[inline]
    pub fn end_point(&self) -> Point {
        self.end().extent
    }

    pub fn byte_range(&self) -> TextRange {
        TextRange::new(TextSize::new(self.start_byte()), TextSize::new(self.end_byte()))
    }

    pub fn point_range(&self) -> std::ops::Range<Point> {
        self.start_point()..self.end_point()
    }

    pub fn range(&self) -> Range {
        Range::from_lengths(self.start, self.end())
    }

    /// The text of this node.
    ///
    /// # Panics
    ///
    /// If `source` is shorter than the text this tree was parsed from.
    pub fn utf8_text<'a>(&self, source: &'a [u8]) -> Result<&'a str, std::str::Utf8Error> {
        std::str::from_utf8(&source[self.start_byte() as usize..self.end_byte() as usize])
    }

    /// The UTF-16 code units of this node, for trees parsed from UTF-16 input.
    pub fn utf16_text<'a>(&self, source: &'a [u16]) -> &'a [u16] {
        &source[self.start_byte() as usize / 2..self.end_byte() as usize / 2]
    }

    pub fn walk(&self) -> TreeCursor<'tree> {
        TreeCursor::new(*self)
    }

    /// Detaches this node's structure for reuse in a newer tree.
    pub fn subtree(&self) -> Subtree {
        Subtree::new(self.green.clone())
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.green.children.len()
    }

    #[inline]
    pub fn named_child_count(&self) -> usize {
        self.green.named_child_count as usize
    }

    pub fn children(&self) -> Children<'tree> {
        Children { tree: self.tree, entries: ChildEntries::new(self.green, self.start) }
    }

    pub fn named_children(&self) -> impl Iterator<Item = Self> + use<'tree> {
        self.children().filter(Self::is_named)
    }

    pub fn child(&self, index: usize) -> Option<Self> {
        self.children().nth(index)
    }

    pub fn named_child(&self, index: usize) -> Option<Self> {
        self.named_children().nth(index)
    }

    pub fn child_by_field_id(&self, field: FieldId) -> Option<Self> {
        ChildEntries::new(self.green, self.start)
            .find(|(_, child, _)| child.field == Some(field))
            .map(|(_, child, start)| Self::new(self.tree, &child.node, start))
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Self> {
        let field = self.tree.grammar().field_id_for_name(name)?;
        self.child_by_field_id(field)
    }

    /// The field under which the `index`-th child is stored.
    pub fn field_name_for_child(&self, index: usize) -> Option<&'static str> {
        let field = self.green.children.get(index)?.field?;
        self.tree.grammar().field_name(field)
    }

    /// Found by searching down from the root; costs O(depth × siblings).
    pub fn parent(&self) -> Option<Self> {
        let root = self.tree.root_node();
        if *self == root {
            return None;
        }
        find_parent(root, self)
    }

    /// The number of siblings before this node. Zero for the root.
    pub fn child_index(&self) -> usize {
        self.parent()
            .and_then(|parent| parent.children().position(|child| child == *self))
            .unwrap_or_default()
    }

    /// The field this node is stored under in its parent.
    pub fn field_name(&self) -> Option<&'static str> {
        self.parent()?.field_name_for_child(self.child_index())
    }

    fn siblings(&self) -> Option<(Self, usize)> {
        let parent = self.parent()?;
        let index = parent.children().position(|child| child == *self)?;
        Some((parent, index))
    }

    pub fn next_sibling(&self) -> Option<Self> {
        let (parent, index) = self.siblings()?;
        parent.child(index + 1)
    }

    pub fn prev_sibling(&self) -> Option<Self> {
        let (parent, index) = self.siblings()?;
        parent.child(index.checked_sub(1)?)
    }

    pub fn next_named_sibling(&self) -> Option<Self> {
        let (parent, index) = self.siblings()?;
        parent.children().skip(index + 1).find(Self::is_named)
    }

    pub fn prev_named_sibling(&self) -> Option<Self> {
        let (parent, index) = self.siblings()?;
        parent.children().take(index).filter(Self::is_named).last()
    }

    /// The first child that extends beyond `byte`.
    pub fn first_child_for_byte(&self, byte: u32) -> Option<Self> {
        self.children().find(|child| child.end_byte() > byte)
    }

    pub fn first_named_child_for_byte(&self, byte: u32) -> Option<Self> {
        self.children().find(|child| child.is_named() && child.end_byte() > byte)
    }

    /// The smallest node within this one spanning `start..end`.
    pub fn descendant_for_byte_range(&self, start: u32, end: u32) -> Option<Self> {
        self.descendant_for_range(
            start,
            end,
            |node| node.start.bytes,
            |node| node.end().bytes,
            false,
        )
    }

    pub fn named_descendant_for_byte_range(&self, start: u32, end: u32) -> Option<Self> {
        self.descendant_for_range(
            start,
            end,
            |node| node.start.bytes,
            |node| node.end().bytes,
            true,
        )
    }

    pub fn descendant_for_point_range(&self, start: Point, end: Point) -> Option<Self> {
        self.descendant_for_range(start, end, Self::start_point, Self::end_point, false)
    }

    pub fn named_descendant_for_point_range(&self, start: Point, end: Point) -> Option<Self> {
        self.descendant_for_range(start, end, Self::start_point, Self::end_point, true)
    }

    fn descendant_for_range<P: Ord + Copy>(
        &self,
        range_start: P,
        range_end: P,
        start_of: impl Fn(&Self) -> P,
        end_of: impl Fn(&Self) -> P,
        named_only: bool,
    ) -> Option<Self> {
        if range_start > range_end {
            return None;
        }

        let mut node = *self;
        let mut last_relevant = *self;
        'descend: loop {
            for child in node.children() {
                let child_start = start_of(&child);
                let child_end = end_of(&child);

                if child_end < range_end {
                    continue;
                }
                // Empty nodes may sit exactly on the start of the range.
                let reaches_start = if child_start == child_end {
                    child_end >= range_start
                } else {
                    child_end > range_start
                };
                if !reaches_start {
                    continue;
                }
                if range_start < child_start {
                    break;
                }

                node = child;
                if !named_only || node.is_named() {
                    last_relevant = node;
                }
                continue 'descend;
            }
            break;
        }

        Some(last_relevant)
    }

    /// Moves this handle's position across `edit` without touching the tree.
    ///
    /// Prefer taking nodes from the edited tree instead; an edited handle
    /// no longer compares equal to nodes of its tree.
    pub fn edit(&mut self, edit: &InputEdit) {
        self.start = shift_position(self.start, edit);
    }

    /// Renders the named structure, with field labels and missing nodes.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_sexp(*self, None, &mut out);
        out
    }
}

fn find_parent<'tree>(ancestor: Node<'tree>, target: &Node<'tree>) -> Option<Node<'tree>> {
    for child in ancestor.children() {
        if child == *target {
            return Some(ancestor);
        }
        if child.start_byte() <= target.start_byte()
            && target.end_byte() <= child.end_byte()
            && child.child_count() > 0
            && let Some(parent) = find_parent(child, target)
        {
            return Some(parent);
        }
    }
    None
}

fn write_sexp(node: Node<'_>, field: Option<&str>, out: &mut String) {
    let visible = node.is_named() || node.is_missing();
    if !visible {
        for child in node.children() {
            write_sexp(child, None, out);
        }
        return;
    }

    if !out.is_empty() {
        out.push(' ');
    }
    if let Some(field) = field {
        let _ = write!(out, "{field}: ");
    }

    if node.is_missing() {
        if node.is_named() {
            let _ = write!(out, "(MISSING {})", node.kind());
        } else {
            let _ = write!(out, "(MISSING \"{}\")", node.kind().escape_default());
        }
        return;
    }

    out.push('(');
    out.push_str(node.kind());
    for (index, child) in node.children().enumerate() {
        write_sexp(child, node.field_name_for_child(index), out);
    }
    out.push(')');
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data(), other.data())
            && self.start == other.start
            && self.tree.root_green().ptr_eq(other.tree.root_green())
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
        self.start.bytes.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Node {} {} - {}}}", self.kind(), self.start_point(), self.end_point())
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sexp())
    }
}

/// Children of a node, with their absolute positions.
#[derive(Clone)]
pub struct Children<'tree> {
    tree: &'tree Tree,
    entries: ChildEntries<'tree>,
}

impl<'tree> Iterator for Children<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, child, start) = self.entries.next()?;
        Some(Node::new(self.tree, &child.node, start))
    }
}

/// Walks a node's child list, tracking where each child starts.
///
/// The first child starts where the parent does; every later child
/// starts after its own padding.
#[derive(Clone)]
pub(crate) struct ChildEntries<'tree> {
    children: std::iter::Enumerate<std::slice::Iter<'tree, GreenChild>>,
    position: Length,
}

impl<'tree> ChildEntries<'tree> {
    pub(crate) fn new(green: &'tree Green, start: Length) -> Self {
        Self { children: green.children.iter().enumerate(), position: start }
    }
}

impl<'tree> Iterator for ChildEntries<'tree> {
    type Item = (usize, &'tree GreenChild, Length);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, child) = self.children.next()?;
        if index > 0 {
            self.position = self.position + child.node.padding;
        }
        let start = self.position;
        self.position = start + child.node.size;
        Some((index, child, start))
    }
}
