use std::{
    fmt,
    ops::{Bound, Index, RangeBounds},
    sync::atomic::{self, AtomicU64},
};

use compare::{Compare, Natural};
use tracing::debug;

use crate::{
    cursor::{Cursor, CursorMut, Handle, Position, RawCursor},
    error::{Error, Result},
    iter::{IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut},
    node::NodeId,
    tree::{RawTree, SearchResult},
};

mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// Identity of a map instance. Positions carry it so that a position
/// handed to another map is rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct MapId(u64);

impl MapId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// An ordered map based on a red-black tree.
///
/// Keys are unique under the ordering `C`, a strict weak ordering given
/// at construction time. Lookup, insertion and removal take
/// $`O(\log n)`$ time.
///
/// Besides the usual Rust API, the map hands out [`Position`]s, which
/// behave like bidirectional iterators: they can be advanced with
/// [`next`](RbMap::next), moved back with [`prev`](RbMap::prev), and
/// passed to [`erase`](RbMap::erase). The past-the-end position is
/// [`end`](RbMap::end).
///
/// # Examples
/// ```
/// use rb_map::RbMap;
///
/// let mut map = RbMap::new();
/// for k in [10, 20, 5, 15, 25, 1] {
///     map.insert(k, k * 10);
/// }
/// assert_eq!(map.len(), 6);
/// assert!(map.keys().copied().eq([1, 5, 10, 15, 20, 25]));
///
/// // a present key is never overwritten
/// let (pos, inserted) = map.insert(10, 0);
/// assert!(!inserted);
/// assert_eq!(map.entry_at(pos), Ok((&10, &100)));
///
/// map.erase(pos).unwrap();
/// assert!(map.keys().copied().eq([1, 5, 15, 20, 25]));
/// ```
pub struct RbMap<K, V, C = Natural> {
    pub(crate) tree: RawTree<K, V>,
    pub(crate) cmp: C,
    pub(crate) id: MapId,
}

impl<K, V> RbMap<K, V> {
    /// Makes an empty map ordered by [`Ord`].
    pub fn new() -> Self { Self::with_compare(Natural) }
}

impl<K, V, C> RbMap<K, V, C> {
    pub fn with_compare(cmp: C) -> Self {
        Self { tree: RawTree::new(), cmp, id: MapId::fresh() }
    }

    pub fn compare(&self) -> &C { &self.cmp }

    pub fn len(&self) -> usize { self.tree.len }
    pub fn is_empty(&self) -> bool { self.tree.len == 0 }

    pub fn clear(&mut self) {
        debug!(len = self.tree.len, "clear");
        self.tree.clear();
    }

    pub(crate) fn position_of(&self, node: Option<NodeId>) -> Position {
        let node = node.map(|id| Handle {
            id,
            generation: self.tree.arena.generation(id),
        });
        Position { map: self.id, node }
    }

    /// Checks that `pos` was made by this map and that its entry is still
    /// there. `None` is the end position.
    pub(crate) fn resolve(
        &self,
        pos: Position,
        err: fn(&'static str) -> Error,
    ) -> Result<Option<NodeId>> {
        if pos.map != self.id {
            return Err(err("position belongs to another map"));
        }
        match pos.node {
            None => Ok(None),
            Some(Handle { id, generation })
                if self.tree.arena.is_live(id, generation) =>
            {
                Ok(Some(id))
            }
            Some(_) => Err(err("position refers to an erased entry")),
        }
    }

    /// The position of the least key, or [`end`](Self::end) if empty.
    pub fn begin(&self) -> Position { self.position_of(self.tree.first()) }
    /// The past-the-end position.
    pub fn end(&self) -> Position { self.position_of(None) }

    /// The position following `pos`.
    ///
    /// # Errors
    /// [`Error::InvalidIterator`] if `pos` is the end, or is not a valid
    /// position of this map.
    pub fn next(&self, pos: Position) -> Result<Position> {
        match self.resolve(pos, Error::InvalidIterator)? {
            Some(x) => Ok(self.position_of(self.tree.successor(x))),
            None => Err(Error::InvalidIterator("advancing past the end")),
        }
    }

    /// The position preceding `pos`. Going back from the end yields the
    /// greatest key, or the end itself if the map is empty.
    ///
    /// # Errors
    /// [`Error::InvalidIterator`] if `pos` is the least key, or is not a
    /// valid position of this map.
    pub fn prev(&self, pos: Position) -> Result<Position> {
        match self.resolve(pos, Error::InvalidIterator)? {
            Some(x) => match self.tree.predecessor(x) {
                Some(y) => Ok(self.position_of(Some(y))),
                None => Err(Error::InvalidIterator(
                    "retreating before the first entry",
                )),
            },
            None => Ok(self.position_of(self.tree.last())),
        }
    }

    pub fn entry_at(&self, pos: Position) -> Result<(&K, &V)> {
        match self.resolve(pos, Error::InvalidIterator)? {
            Some(x) => Ok(self.tree.arena.entry(x)),
            None => Err(Error::InvalidIterator("dereferencing the end")),
        }
    }

    pub fn value_at_mut(&mut self, pos: Position) -> Result<&mut V> {
        match self.resolve(pos, Error::InvalidIterator)? {
            Some(x) => Ok(self.tree.arena.entry_mut(x).1),
            None => Err(Error::InvalidIterator("dereferencing the end")),
        }
    }

    /// Number of steps from `from` forward to `to`.
    pub fn distance(&self, from: Position, to: Position) -> Result<usize> {
        let mut cur = self.resolve(from, Error::InvalidIterator)?;
        let to = self.resolve(to, Error::InvalidIterator)?;
        let mut res = 0;
        while cur != to {
            let Some(x) = cur else {
                return Err(Error::InvalidIterator(
                    "`to` is not reachable from `from`",
                ));
            };
            cur = self.tree.successor(x);
            res += 1;
        }
        Ok(res)
    }

    /// Removes the entry at `pos` and returns it. Positions of the
    /// other entries stay valid.
    ///
    /// # Errors
    /// [`Error::OutOfBound`] if `pos` is the end, belongs to another
    /// map, or its entry has already been removed. The map is left
    /// untouched.
    pub fn erase(&mut self, pos: Position) -> Result<(K, V)> {
        let node = self.resolve(pos, Error::OutOfBound).and_then(|x| {
            x.ok_or(Error::OutOfBound("erasing the end"))
        });
        match node {
            Ok(x) => Ok(self.tree.remove(x)),
            Err(e) => {
                debug!(error = %e, "erase rejected");
                Err(e)
            }
        }
    }

    pub fn cursor(&self, pos: Position) -> Result<Cursor<'_, K, V, C>> {
        self.resolve(pos, Error::InvalidIterator)?;
        Ok(RawCursor::new(self, pos))
    }
    pub fn cursor_front(&self) -> Cursor<'_, K, V, C> {
        RawCursor::new(self, self.begin())
    }
    pub fn cursor_mut(
        &mut self,
        pos: Position,
    ) -> Result<CursorMut<'_, K, V, C>> {
        self.resolve(pos, Error::InvalidIterator)?;
        Ok(RawCursor::new(self, pos))
    }
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let pos = self.begin();
        RawCursor::new(self, pos)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        let range = Range::new(&self.tree, self.tree.first(), self.tree.last());
        Iter::new(range, self.tree.len)
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let (front, back) = (self.tree.first(), self.tree.last());
        let len = self.tree.len;
        let (links, entries) = self.tree.arena.split_mut();
        IterMut::new(links, entries, front, back, len)
    }
    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.iter()) }
    pub fn values(&self) -> Values<'_, K, V> { Values(self.iter()) }
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.iter_mut())
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|x| self.tree.arena.entry(x))
    }
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|x| self.tree.arena.entry(x))
    }
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let x = self.tree.first()?;
        Some(self.tree.remove(x))
    }
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let x = self.tree.last()?;
        Some(self.tree.remove(x))
    }

    /// Keeps only the entries for which `f` returns `true`, visiting
    /// them in ascending order.
    pub fn retain<F: FnMut(&K, &mut V) -> bool>(&mut self, mut f: F) {
        let mut cur = self.tree.first();
        while let Some(x) = cur {
            cur = self.tree.successor(x);
            let (k, v) = self.tree.arena.entry_mut(x);
            if !f(k, v) {
                self.tree.remove(x);
            }
        }
    }
}

impl<K, V, C: Compare<K>> RbMap<K, V, C> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let x = self.tree.find(key, &self.cmp)?;
        Some(self.tree.arena.entry(x))
    }
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let x = self.tree.find(key, &self.cmp)?;
        Some(self.tree.arena.entry_mut(x).1)
    }

    /// Checked lookup.
    ///
    /// # Errors
    /// [`Error::OutOfBound`] if no key equivalent to `key` is present.
    ///
    /// # Examples
    /// ```
    /// use rb_map::{Error, RbMap};
    ///
    /// let mut map = RbMap::<i32, String>::new();
    /// assert!(matches!(map.at(&999), Err(Error::OutOfBound(_))));
    /// map.get_or_insert_default(999).push_str("ok");
    /// assert_eq!(map.at(&999).map(String::as_str), Ok("ok"));
    /// ```
    pub fn at(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or_else(key_not_found)
    }
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V> {
        self.get_mut(key).ok_or_else(key_not_found)
    }

    /// Returns the value for `key`, inserting `V::default()` first if
    /// the key is absent. The default is only built when needed.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.find(key, &self.cmp).is_some()
    }
    /// Either 0 or 1, as keys are unique.
    pub fn count(&self, key: &K) -> usize { self.contains_key(key) as usize }

    /// The position of `key`, or [`end`](Self::end) if absent.
    pub fn find(&self, key: &K) -> Position {
        self.position_of(self.tree.find(key, &self.cmp))
    }
    /// The position of the first key not less than `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        self.position_of(self.tree.lower_bound(key, &self.cmp))
    }
    /// The position of the first key greater than `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        self.position_of(self.tree.upper_bound(key, &self.cmp))
    }

    /// Inserts an entry unless an equivalent key is already present.
    ///
    /// Returns the position of the entry with that key and whether the
    /// insertion took place. An existing entry keeps its value; the
    /// given `key` and `value` are dropped in that case.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        match self.tree.search(&key, &self.cmp) {
            SearchResult::Found(x) => (self.position_of(Some(x)), false),
            SearchResult::GoDown(at) => {
                let x = self.tree.insert_at(key, value, at);
                (self.position_of(Some(x)), true)
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let x = self.tree.find(key, &self.cmp)?;
        Some(self.tree.remove(x))
    }

    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        match self.tree.search(&key, &self.cmp) {
            SearchResult::Found(node) => Entry::occupied(node, self),
            SearchResult::GoDown(at) => Entry::vacant(key, at, self),
        }
    }

    /// Iterates over the entries whose keys lie in `range`, in
    /// ascending order. An empty or inverted range yields nothing.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        let tree = &self.tree;
        let cmp = &self.cmp;
        let front = match range.start_bound() {
            Bound::Included(k) => tree.lower_bound(k, cmp),
            Bound::Excluded(k) => tree.upper_bound(k, cmp),
            Bound::Unbounded => tree.first(),
        };
        let past = match range.end_bound() {
            Bound::Included(k) => Some(tree.upper_bound(k, cmp)),
            Bound::Excluded(k) => Some(tree.lower_bound(k, cmp)),
            Bound::Unbounded => None,
        };
        let back = match past {
            Some(Some(x)) => tree.predecessor(x),
            Some(None) | None => tree.last(),
        };
        match (front, back) {
            (Some(f), Some(b))
                if !cmp.less(tree.arena.key(b), tree.arena.key(f)) =>
            {
                Range::new(tree, Some(f), Some(b))
            }
            _ => Range::new(tree, None, None),
        }
    }
}

fn key_not_found() -> Error {
    let e = Error::OutOfBound("key not found");
    debug!(error = %e, "lookup rejected");
    e
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self { Self::new() }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbMap<K, V, C> {
    /// Deep copy with the same shape. The copy is a new map: positions
    /// of `self` are foreign to it.
    fn clone(&self) -> Self {
        debug!(len = self.tree.len, "deep copy");
        Self {
            tree: self.tree.deep_clone(),
            cmp: self.cmp.clone(),
            id: MapId::fresh(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RbMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RbMap<K, V, C> {}

/// Lookup that panics if the key is absent; see [`RbMap::at`] for the
/// checked version.
impl<K, V, C: Compare<K>> Index<&K> for RbMap<K, V, C> {
    type Output = V;
    fn index(&self, key: &K) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self { arr.into_iter().collect() }
}

/// Earlier entries win over later ones with an equivalent key, as with
/// [`RbMap::insert`].
impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RbMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_compare(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RbMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut RbMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

impl<K, V, C> IntoIterator for RbMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter(self.tree.drain_sorted().into_iter())
    }
}

#[cfg(test)]
mod tests;
