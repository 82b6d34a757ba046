//! Incrementally updatable syntax trees.
//!
//! A [`Tree`] is an immutable, structurally shared arrangement of nodes that
//! only store their own extents. Positions are reconstructed while
//! navigating, which lets [`Tree::edit`] shift everything after an edit by
//! rewriting a single root-to-leaf path.

mod builder;
mod changes;
mod cursor;
/// Symbol and field tables shared by parsers and trees.
pub mod grammar;
mod green;
mod length;
mod node;
mod reuse;
mod tree;

/// Engine-facing tree construction.
pub use builder::{Builder, Leaf};
/// Depth-first walker with O(1) moves.
pub use cursor::TreeCursor;
pub use grammar::{FieldId, Grammar, Symbol, SymbolInfo, SymbolKind};
/// Coordinates and edits.
pub use length::{InputEdit, Length, Point, Range};
/// Borrowed node handles.
pub use node::{Children, Node};
/// Subtree reuse for incremental parsing.
pub use reuse::{ReusableNodes, Subtree};
pub use tree::Tree;
