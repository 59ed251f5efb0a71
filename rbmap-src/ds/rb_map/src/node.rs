use std::ops::{Index, IndexMut, Not};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left,
    Right,
}

impl Not for Dir {
    type Output = Dir;
    fn not(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// The shape part of a node. Entries are kept in a separate array so
/// that the shape can be borrowed while values are borrowed mutably.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Links {
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub color: Color,
    // bumped every time the slot is vacated
    pub generation: u32,
}

impl Links {
    fn new(generation: u32) -> Self {
        Self {
            parent: None,
            left: None,
            right: None,
            color: Color::Red,
            generation,
        }
    }
    pub fn child(&self, dir: Dir) -> Option<NodeId> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }
    pub fn child_mut(&mut self, dir: Dir) -> &mut Option<NodeId> {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }
}

pub(crate) struct Arena<K, V> {
    links: Vec<Links>,
    entries: Vec<Option<(K, V)>>,
    free: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Self { links: vec![], entries: vec![], free: vec![] }
    }
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            links: Vec::with_capacity(cap),
            entries: Vec::with_capacity(cap),
            free: vec![],
        }
    }

    /// Allocates a detached red node.
    pub fn alloc(&mut self, key: K, val: V) -> NodeId {
        if let Some(id) = self.free.pop() {
            let generation = self.links[id.0].generation;
            self.links[id.0] = Links::new(generation);
            self.entries[id.0] = Some((key, val));
            id
        } else {
            let id = NodeId(self.links.len());
            self.links.push(Links::new(0));
            self.entries.push(Some((key, val)));
            id
        }
    }

    /// Takes the entry out and makes the slot reusable. The caller must
    /// have unlinked the node beforehand.
    pub fn dealloc(&mut self, id: NodeId) -> (K, V) {
        let Some(entry) = self.entries[id.0].take() else {
            unreachable!("double free of {id:?}");
        };
        let links = &mut self.links[id.0];
        *links = Links::new(links.generation.wrapping_add(1));
        self.free.push(id);
        entry
    }

    /// Drops every entry. Slots are kept, with bumped generations, so
    /// that handles taken before are recognized as stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for i in (0..self.links.len()).rev() {
            if self.entries[i].take().is_some() {
                let generation = self.links[i].generation.wrapping_add(1);
                self.links[i] = Links::new(generation);
            }
            self.free.push(NodeId(i));
        }
    }

    pub fn is_live(&self, id: NodeId, generation: u32) -> bool {
        id.0 < self.entries.len()
            && self.entries[id.0].is_some()
            && self.links[id.0].generation == generation
    }
    pub fn generation(&self, id: NodeId) -> u32 { self.links[id.0].generation }

    pub fn entry(&self, id: NodeId) -> (&K, &V) {
        match &self.entries[id.0] {
            Some((k, v)) => (k, v),
            None => unreachable!("vacant slot {id:?}"),
        }
    }
    pub fn entry_mut(&mut self, id: NodeId) -> (&K, &mut V) {
        match &mut self.entries[id.0] {
            Some((k, v)) => (k, v),
            None => unreachable!("vacant slot {id:?}"),
        }
    }
    pub fn key(&self, id: NodeId) -> &K { self.entry(id).0 }

    pub fn links(&self) -> &[Links] { &self.links }
    pub fn split_mut(&mut self) -> (&[Links], &mut [Option<(K, V)>]) {
        (&self.links, &mut self.entries)
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Links;
    fn index(&self, id: NodeId) -> &Links { &self.links[id.0] }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Links { &mut self.links[id.0] }
}

pub(crate) fn leftmost(links: &[Links], mut x: NodeId) -> NodeId {
    while let Some(l) = links[x.0].left {
        x = l;
    }
    x
}

pub(crate) fn rightmost(links: &[Links], mut x: NodeId) -> NodeId {
    while let Some(r) = links[x.0].right {
        x = r;
    }
    x
}

/// In-order successor; `None` stands for the past-the-end position.
pub(crate) fn successor(links: &[Links], x: NodeId) -> Option<NodeId> {
    if let Some(r) = links[x.0].right {
        return Some(leftmost(links, r));
    }
    let mut x = x;
    while let Some(p) = links[x.0].parent {
        if links[p.0].left == Some(x) {
            return Some(p);
        }
        x = p;
    }
    None
}

/// In-order predecessor; `None` if `x` is the minimum.
pub(crate) fn predecessor(links: &[Links], x: NodeId) -> Option<NodeId> {
    if let Some(l) = links[x.0].left {
        return Some(rightmost(links, l));
    }
    let mut x = x;
    while let Some(p) = links[x.0].parent {
        if links[p.0].right == Some(x) {
            return Some(p);
        }
        x = p;
    }
    None
}
