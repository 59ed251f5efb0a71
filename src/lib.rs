//! 赤黒木による順序付き連想配列と、その周辺。
//!
//! ```
//! use rbmap::{Error, RbMap, Reverse, Natural};
//!
//! let mut map = RbMap::with_compare(Reverse(Natural));
//! map.extend([(1, "one"), (3, "three"), (2, "two")]);
//! assert!(map.keys().copied().eq([3, 2, 1]));
//!
//! let last = map.prev(map.end()).unwrap();
//! assert_eq!(map.entry_at(last), Ok((&1, &"one")));
//! assert!(matches!(map.next(map.end()), Err(Error::InvalidIterator(_))));
//! ```

#[doc(inline)]
pub use compare::{self, ByKey, Compare, Natural, Reverse};
#[doc(inline)]
pub use rb_map::{
    self, iter, Cursor, CursorMut, Entry, Error, OccupiedEntry, Position,
    RawCursor, RbMap, Render, Result, VacantEntry,
};
