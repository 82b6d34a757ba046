use std::fmt;

use crate::green::Green;
use crate::node::Node;
use crate::tree::Tree;

/// A detached handle to the structure of a node, ready to be spliced into
/// a new tree with [`Builder::reuse`](crate::Builder::reuse).
#[derive(Clone)]
pub struct Subtree(Green);

impl Subtree {
    pub(crate) fn new(green: Green) -> Self {
        Self(green)
    }

    pub(crate) fn into_green(self) -> Green {
        self.0
    }

    /// Byte length including leading whitespace.
    pub fn total_bytes(&self) -> u32 {
        self.0.total().bytes
    }
}

impl fmt::Debug for Subtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subtree")
            .field("symbol", &self.0.symbol)
            .field("total_bytes", &self.total_bytes())
            .finish()
    }
}

/// Looks up nodes of an edited tree that a reparse may take over unchanged.
pub struct ReusableNodes<'tree> {
    root: Option<Node<'tree>>,
}

impl<'tree> ReusableNodes<'tree> {
    pub fn new(tree: Option<&'tree Tree>) -> Self {
        Self { root: tree.map(Tree::root_node) }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Unchanged, error-free nodes whose leading whitespace starts at `byte`,
    /// outermost first.
    pub fn candidates_at(&self, byte: u32) -> Vec<Node<'tree>> {
        let mut candidates = Vec::new();
        let Some(mut node) = self.root else {
            return candidates;
        };

        'descend: loop {
            for child in node.children() {
                let total_start = child.total_start_byte();
                let end = child.end_byte();
                if total_start == byte && end > byte {
                    let mut chain = Some(child);
                    while let Some(candidate) = chain {
                        if candidate.total_start_byte() != byte {
                            break;
                        }
                        if !candidate.has_changes() && !candidate.has_error() {
                            candidates.push(candidate);
                        }
                        chain = candidate.child(0);
                    }
                    break 'descend;
                }
                if total_start < byte && byte < end {
                    node = child;
                    continue 'descend;
                }
                if total_start > byte {
                    break 'descend;
                }
            }
            break;
        }

        candidates
    }
}
