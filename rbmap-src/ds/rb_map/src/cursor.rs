use std::ops::{Deref, DerefMut};

use compare::Natural;

use crate::{error::Result, map::MapId, node::NodeId, RbMap};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Handle {
    pub id: NodeId,
    pub generation: u32,
}

/// A position in a map: an entry, or the past-the-end position.
///
/// Positions do not borrow the map. They compare equal only if they
/// denote the same entry of the same map, regardless of the keys and
/// values involved. A position whose entry has been removed is stale,
/// and every map operation rejects it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) map: MapId,
    // `None` stands for the end
    pub(crate) node: Option<Handle>,
}

impl Position {
    pub fn is_end(&self) -> bool { self.node.is_none() }
}

/// A cursor over a map, read-only or mutable depending on `R`.
///
/// See [`Cursor`] and [`CursorMut`].
#[derive(Clone)]
pub struct RawCursor<R> {
    map: R,
    pos: Position,
}

pub type Cursor<'a, K, V, C = Natural> = RawCursor<&'a RbMap<K, V, C>>;
pub type CursorMut<'a, K, V, C = Natural> = RawCursor<&'a mut RbMap<K, V, C>>;

impl<K, V, C, R: Deref<Target = RbMap<K, V, C>>> RawCursor<R> {
    pub(crate) fn new(map: R, pos: Position) -> Self { Self { map, pos } }

    pub fn position(&self) -> Position { self.pos }
    pub fn is_end(&self) -> bool { self.pos.is_end() }

    pub fn move_next(&mut self) -> Result<()> {
        self.pos = self.map.next(self.pos)?;
        Ok(())
    }
    pub fn move_prev(&mut self) -> Result<()> {
        self.pos = self.map.prev(self.pos)?;
        Ok(())
    }

    // `K`, `V` and `C` are only reachable through `R`
    pub fn key_value<'b>(&'b self) -> Result<(&'b K, &'b V)>
    where
        K: 'b,
        V: 'b,
        C: 'b,
    {
        self.map.entry_at(self.pos)
    }
    pub fn key<'b>(&'b self) -> Result<&'b K>
    where
        K: 'b,
        V: 'b,
        C: 'b,
    {
        Ok(self.key_value()?.0)
    }
    pub fn value<'b>(&'b self) -> Result<&'b V>
    where
        K: 'b,
        V: 'b,
        C: 'b,
    {
        Ok(self.key_value()?.1)
    }
}

impl<K, V, C, R: DerefMut<Target = RbMap<K, V, C>>> RawCursor<R> {
    pub fn value_mut<'b>(&'b mut self) -> Result<&'b mut V>
    where
        K: 'b,
        V: 'b,
        C: 'b,
    {
        self.map.value_at_mut(self.pos)
    }

    /// Removes the current entry and moves to the next one.
    pub fn remove_current(&mut self) -> Result<(K, V)> {
        // `erase` reports why the position cannot be removed
        let Ok(next) = self.map.next(self.pos) else {
            return self.map.erase(self.pos);
        };
        let entry = self.map.erase(self.pos)?;
        self.pos = next;
        Ok(entry)
    }
}
