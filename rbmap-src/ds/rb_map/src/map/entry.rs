use compare::Natural;

use crate::{
    cursor::Position,
    node::{Dir, NodeId},
    RbMap,
};

pub enum Entry<'a, K, V, C = Natural> {
    Vacant(VacantEntry<'a, K, V, C>),
    Occupied(OccupiedEntry<'a, K, V, C>),
}

pub struct VacantEntry<'a, K, V, C = Natural> {
    key: K,
    at: Option<(NodeId, Dir)>,
    map: &'a mut RbMap<K, V, C>,
}

pub struct OccupiedEntry<'a, K, V, C = Natural> {
    node: NodeId,
    map: &'a mut RbMap<K, V, C>,
}

impl<'a, K, V, C> Entry<'a, K, V, C> {
    pub(crate) fn vacant(
        key: K,
        at: Option<(NodeId, Dir)>,
        map: &'a mut RbMap<K, V, C>,
    ) -> Self {
        Self::Vacant(VacantEntry { key, at, map })
    }
    pub(crate) fn occupied(node: NodeId, map: &'a mut RbMap<K, V, C>) -> Self {
        Self::Occupied(OccupiedEntry { node, map })
    }

    pub fn and_modify<F: FnOnce(&mut V)>(self, f: F) -> Self {
        match self {
            Self::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Self::Vacant(entry) => Self::Vacant(entry),
        }
    }

    pub fn key(&self) -> &K {
        match self {
            Self::Occupied(entry) => entry.key(),
            Self::Vacant(entry) => entry.key(),
        }
    }
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default),
        }
    }
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default()),
        }
    }
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(
        self,
        default: F,
    ) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }
}

impl<'a, K, V, C> VacantEntry<'a, K, V, C> {
    pub fn key(&self) -> &K { &self.key }
    pub fn into_key(self) -> K { self.key }
    pub fn insert(self, value: V) -> &'a mut V {
        let Self { key, at, map } = self;
        let x = map.tree.insert_at(key, value, at);
        map.tree.arena.entry_mut(x).1
    }
}

impl<'a, K, V, C> OccupiedEntry<'a, K, V, C> {
    pub fn key(&self) -> &K { self.map.tree.arena.key(self.node) }
    pub fn position(&self) -> Position { self.map.position_of(Some(self.node)) }
    pub fn get(&self) -> &V { self.map.tree.arena.entry(self.node).1 }
    pub fn get_mut(&mut self) -> &mut V {
        self.map.tree.arena.entry_mut(self.node).1
    }
    pub fn into_mut(self) -> &'a mut V {
        let Self { node, map } = self;
        map.tree.arena.entry_mut(node).1
    }
    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }
    pub fn remove(self) -> V { self.remove_entry().1 }
    pub fn remove_entry(self) -> (K, V) {
        let Self { node, map } = self;
        map.tree.remove(node)
    }
}
