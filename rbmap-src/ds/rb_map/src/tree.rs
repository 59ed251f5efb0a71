//! Red-black tree engine over an arena of nodes.
//!
//! Invariants, after every public operation:
//!
//! 1. the root is black;
//! 2. a red node has no red child;
//! 3. every path from a node down to an absent child meets the same
//!    number of black nodes (absent children count as black);
//! 4. the in-order sequence of keys is strictly increasing.

use compare::Compare;
use tracing::trace;

use crate::node::{self, Arena, Color, Dir, NodeId};

pub(crate) enum SearchResult {
    Found(NodeId),
    // where the key would be attached; `None` for an empty tree
    GoDown(Option<(NodeId, Dir)>),
}

pub(crate) struct RawTree<K, V> {
    pub arena: Arena<K, V>,
    pub root: Option<NodeId>,
    pub len: usize,
}

impl<K, V> RawTree<K, V> {
    pub fn new() -> Self { Self { arena: Arena::new(), root: None, len: 0 } }

    pub fn color(&self, x: Option<NodeId>) -> Color {
        x.map_or(Color::Black, |x| self.arena[x].color)
    }
    pub fn parent(&self, x: NodeId) -> Option<NodeId> { self.arena[x].parent }
    pub fn child(&self, x: NodeId, dir: Dir) -> Option<NodeId> {
        self.arena[x].child(dir)
    }
    /// Which side of its parent `x` hangs on. `x` must not be the root.
    fn dir_of(&self, x: NodeId, parent: NodeId) -> Dir {
        if self.arena[parent].left == Some(x) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|r| node::leftmost(self.arena.links(), r))
    }
    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|r| node::rightmost(self.arena.links(), r))
    }
    pub fn successor(&self, x: NodeId) -> Option<NodeId> {
        node::successor(self.arena.links(), x)
    }
    pub fn predecessor(&self, x: NodeId) -> Option<NodeId> {
        node::predecessor(self.arena.links(), x)
    }

    pub fn search<C: Compare<K>>(&self, key: &K, cmp: &C) -> SearchResult {
        let mut cur = self.root;
        let mut last = None;
        while let Some(x) = cur {
            let dir = if cmp.less(key, self.arena.key(x)) {
                Dir::Left
            } else if cmp.less(self.arena.key(x), key) {
                Dir::Right
            } else {
                return SearchResult::Found(x);
            };
            last = Some((x, dir));
            cur = self.child(x, dir);
        }
        SearchResult::GoDown(last)
    }

    pub fn find<C: Compare<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
        match self.search(key, cmp) {
            SearchResult::Found(x) => Some(x),
            SearchResult::GoDown(_) => None,
        }
    }

    /// First node whose key is not less than `key`.
    pub fn lower_bound<C: Compare<K>>(
        &self,
        key: &K,
        cmp: &C,
    ) -> Option<NodeId> {
        self.partition_point(|k| cmp.less(k, key))
    }

    /// First node whose key is greater than `key`.
    pub fn upper_bound<C: Compare<K>>(
        &self,
        key: &K,
        cmp: &C,
    ) -> Option<NodeId> {
        self.partition_point(|k| !cmp.less(key, k))
    }

    // `pred` must hold for a prefix of the in-order sequence.
    fn partition_point(&self, pred: impl Fn(&K) -> bool) -> Option<NodeId> {
        let mut cur = self.root;
        let mut res = None;
        while let Some(x) = cur {
            if pred(self.arena.key(x)) {
                cur = self.arena[x].right;
            } else {
                res = Some(x);
                cur = self.arena[x].left;
            }
        }
        res
    }

    fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            Some(p) => {
                let dir = self.dir_of(old, p);
                *self.arena[p].child_mut(dir) = new;
            }
            None => self.root = new,
        }
    }

    /// Moves `x` down towards `dir`; its child on the other side comes
    /// up and takes its place.
    fn rotate(&mut self, x: NodeId, dir: Dir) {
        let Some(y) = self.child(x, !dir) else {
            unreachable!("rotation of {x:?} without a pivot");
        };
        trace!(node = x.0, pivot = y.0, ?dir, "rotate");
        let inner = self.child(y, dir);
        *self.arena[x].child_mut(!dir) = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }
        let parent = self.parent(x);
        self.replace_child(parent, x, Some(y));
        self.arena[y].parent = parent;
        *self.arena[y].child_mut(dir) = Some(x);
        self.arena[x].parent = Some(y);
    }

    /// Attaches a new entry at a position found by [`Self::search`].
    pub fn insert_at(
        &mut self,
        key: K,
        val: V,
        at: Option<(NodeId, Dir)>,
    ) -> NodeId {
        let x = self.arena.alloc(key, val);
        self.len += 1;
        match at {
            Some((p, dir)) => {
                debug_assert!(self.child(p, dir).is_none());
                *self.arena[p].child_mut(dir) = Some(x);
                self.arena[x].parent = Some(p);
                self.insert_fixup(x);
            }
            None => {
                debug_assert!(self.root.is_none());
                self.root = Some(x);
            }
        }
        if let Some(r) = self.root {
            self.arena[r].color = Color::Black;
        }
        x
    }

    fn insert_fixup(&mut self, mut x: NodeId) {
        while let Some(mut p) = self.parent(x) {
            if self.arena[p].color == Color::Black {
                return;
            }
            // a red parent is never the root
            let Some(g) = self.parent(p) else { return };
            let pd = self.dir_of(p, g);
            let uncle = self.child(g, !pd);
            if let (Some(u), Color::Red) = (uncle, self.color(uncle)) {
                trace!(grandparent = g.0, "color flip");
                self.arena[p].color = Color::Black;
                self.arena[u].color = Color::Black;
                self.arena[g].color = Color::Red;
                x = g;
                continue;
            }
            if self.dir_of(x, p) != pd {
                // zig-zag: straighten it first
                self.rotate(p, pd);
                (x, p) = (p, x);
            }
            debug_assert_eq!(self.parent(x), Some(p));
            self.rotate(g, !pd);
            self.arena[p].color = Color::Black;
            self.arena[g].color = Color::Red;
            return;
        }
    }

    /// Unlinks `t` and returns its entry.
    pub fn remove(&mut self, t: NodeId) -> (K, V) {
        if let (Some(l), Some(_)) = (self.arena[t].left, self.arena[t].right) {
            let pred = node::rightmost(self.arena.links(), l);
            self.swap_with_predecessor(t, pred);
        }

        let parent = self.parent(t);
        let child = self.arena[t].left.or(self.arena[t].right);
        if let Some(c) = child {
            self.replace_child(parent, t, Some(c));
            self.arena[c].parent = parent;
            self.arena[c].color = Color::Black;
        } else if parent.is_none() {
            self.root = None;
        } else {
            if self.arena[t].color == Color::Black {
                self.remove_fixup(t);
            }
            // rotations may have changed the parent
            let parent = self.parent(t);
            self.replace_child(parent, t, None);
        }

        self.len -= 1;
        if let Some(r) = self.root {
            self.arena[r].color = Color::Black;
        }
        self.arena.dealloc(t)
    }

    /// Exchanges the tree positions (parent, children, color) of `t`
    /// and its in-order predecessor `p`. Afterwards `t` has no right
    /// child.
    fn swap_with_predecessor(&mut self, t: NodeId, p: NodeId) {
        trace!(target = t.0, predecessor = p.0, "relink predecessor");
        let lt = self.arena[t];
        let lp = self.arena[p];
        debug_assert!(lp.right.is_none());

        self.replace_child(lt.parent, t, Some(p));
        self.arena[p].parent = lt.parent;
        self.arena[p].right = lt.right;
        if let Some(r) = lt.right {
            self.arena[r].parent = Some(p);
        }

        if lt.left == Some(p) {
            self.arena[p].left = Some(t);
            self.arena[t].parent = Some(p);
        } else {
            self.arena[p].left = lt.left;
            if let Some(l) = lt.left {
                self.arena[l].parent = Some(p);
            }
            let Some(pp) = lp.parent else { unreachable!() };
            self.arena[pp].right = Some(t);
            self.arena[t].parent = Some(pp);
        }

        self.arena[t].left = lp.left;
        if let Some(l) = lp.left {
            self.arena[l].parent = Some(t);
        }
        self.arena[t].right = None;

        self.arena[p].color = lt.color;
        self.arena[t].color = lp.color;
    }

    /// Resolves the black deficit that removing the black leaf `x`
    /// would cause. `x` stays linked; the caller unlinks it afterwards.
    fn remove_fixup(&mut self, mut x: NodeId) {
        while let Some(p) = self.parent(x) {
            let d = self.dir_of(x, p);
            let Some(mut s) = self.child(p, !d) else {
                unreachable!("black node {x:?} without a sibling");
            };
            trace!(node = x.0, parent = p.0, sibling = s.0, "double black");

            if self.arena[s].color == Color::Red {
                self.arena[s].color = Color::Black;
                self.arena[p].color = Color::Red;
                self.rotate(p, d);
                let Some(t) = self.child(p, !d) else { unreachable!() };
                s = t;
            }

            let far = self.child(s, !d);
            let near = self.child(s, d);
            if let (Some(far), Color::Red) = (far, self.color(far)) {
                self.arena[s].color = self.arena[p].color;
                self.arena[p].color = Color::Black;
                self.arena[far].color = Color::Black;
                self.rotate(p, d);
                return;
            }
            if let (Some(near), Color::Red) = (near, self.color(near)) {
                // becomes the far case on the next round
                self.arena[near].color = Color::Black;
                self.arena[s].color = Color::Red;
                self.rotate(s, !d);
                continue;
            }

            self.arena[s].color = Color::Red;
            if self.arena[p].color == Color::Red {
                self.arena[p].color = Color::Black;
                return;
            }
            x = p;
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Removes every entry, in order.
    pub fn drain_sorted(&mut self) -> Vec<(K, V)> {
        let mut ids = Vec::with_capacity(self.len);
        let mut cur = self.first();
        while let Some(x) = cur {
            ids.push(x);
            cur = self.successor(x);
        }
        let res = ids
            .into_iter()
            .map(|x| self.arena.dealloc(x))
            .collect();
        self.root = None;
        self.len = 0;
        res
    }

    pub fn black_height_of(&self, x: Option<NodeId>) -> usize {
        let mut cur = x;
        let mut res = 0;
        while let Some(y) = cur {
            if self.arena[y].color == Color::Black {
                res += 1;
            }
            cur = self.arena[y].left;
        }
        res
    }
}

impl<K: Clone, V: Clone> RawTree<K, V> {
    /// Deep copy keeping the shape and the colors. Uses an explicit
    /// stack, so it does not depend on the call stack depth.
    pub fn deep_clone(&self) -> Self {
        let mut arena = Arena::with_capacity(self.len);
        let Some(root) = self.root else {
            return Self { arena, root: None, len: 0 };
        };

        let clone_one = |arena: &mut Arena<K, V>, src: NodeId| {
            let (k, v) = self.arena.entry(src);
            let dst = arena.alloc(k.clone(), v.clone());
            arena[dst].color = self.arena[src].color;
            dst
        };

        let new_root = clone_one(&mut arena, root);
        let mut stack = vec![(root, new_root)];
        while let Some((src, dst)) = stack.pop() {
            for dir in [Dir::Left, Dir::Right] {
                if let Some(sc) = self.child(src, dir) {
                    let dc = clone_one(&mut arena, sc);
                    arena[dc].parent = Some(dst);
                    *arena[dst].child_mut(dir) = Some(dc);
                    stack.push((sc, dc));
                }
            }
        }
        Self { arena, root: Some(new_root), len: self.len }
    }
}
