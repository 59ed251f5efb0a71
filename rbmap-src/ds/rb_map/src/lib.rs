//! 赤黒木による順序付き連想配列。
//!
//! [`RbMap`] keeps its entries sorted by key under a strict weak ordering
//! (see [`compare::Compare`]), and supports lookup, insertion and removal
//! in $`O(\log n)`$ time.
//!
//! Besides Rust iterators, the map exposes [`Position`]s: copyable
//! handles to an entry or to the past-the-end position, which can be
//! stepped in both directions and used to erase entries. Misuse of a
//! position, such as stepping past the end or passing a position of
//! another map, is reported as an [`Error`] rather than being undefined.
//!
//! ## Implementation notes
//!
//! Nodes live in an arena and refer to each other by index, with a
//! parent link for traversal and rebalancing. The past-the-end position
//! is a tag of [`Position`], not a node of the tree.

mod cursor;
mod debug;
mod error;
pub mod iter;
mod map;
mod node;
mod tree;

pub use compare::{Compare, Natural};
pub use cursor::{Cursor, CursorMut, Position, RawCursor};
pub use debug::Render;
pub use error::{Error, Result};
pub use map::{Entry, OccupiedEntry, RbMap, VacantEntry};
