//! Iterators over [`RbMap`](crate::RbMap).

use std::{iter::FusedIterator, marker::PhantomData, ptr::NonNull};

use crate::{
    node::{self, Links, NodeId},
    tree::RawTree,
};

/// Entries between two nodes, both ends inclusive.
pub struct Range<'a, K, V> {
    tree: &'a RawTree<K, V>,
    // both `Some` or both `None`
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a, K, V> Range<'a, K, V> {
    pub(crate) fn new(
        tree: &'a RawTree<K, V>,
        front: Option<NodeId>,
        back: Option<NodeId>,
    ) -> Self {
        debug_assert_eq!(front.is_some(), back.is_some());
        Self { tree, front, back }
    }
    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.front?;
        if self.front == self.back {
            self.finish();
        } else {
            self.front = self.tree.successor(x);
        }
        Some(self.tree.arena.entry(x))
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let x = self.back?;
        if self.front == self.back {
            self.finish();
        } else {
            self.back = self.tree.predecessor(x);
        }
        Some(self.tree.arena.entry(x))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self { Self { ..*self } }
}

pub struct Iter<'a, K, V> {
    range: Range<'a, K, V>,
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(range: Range<'a, K, V>, len: usize) -> Self {
        Self { range, len }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let res = self.range.next()?;
        self.len -= 1;
        Some(res)
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let res = self.range.next_back()?;
        self.len -= 1;
        Some(res)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self { Self { range: self.range.clone(), len: self.len } }
}

pub struct IterMut<'a, K, V> {
    links: &'a [Links],
    entries: NonNull<Option<(K, V)>>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    len: usize,
    _marker: PhantomData<&'a mut (K, V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(
        links: &'a [Links],
        entries: &'a mut [Option<(K, V)>],
        front: Option<NodeId>,
        back: Option<NodeId>,
        len: usize,
    ) -> Self {
        let entries = NonNull::from(entries).cast();
        Self { links, entries, front, back, len, _marker: PhantomData }
    }

    /// # Safety
    /// `x` must be a live node that has not been yielded yet.
    unsafe fn yield_node(&mut self, x: NodeId) -> (&'a K, &'a mut V) {
        // Each node is yielded at most once, so the returned references
        // never alias. The shape lives in `links`, apart from `entries`.
        let slot = unsafe { &mut *self.entries.as_ptr().add(x.0) };
        match slot {
            Some((k, v)) => (k, v),
            None => unreachable!("vacant slot {x:?}"),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.front?;
        self.len -= 1;
        self.front = node::successor(self.links, x);
        Some(unsafe { self.yield_node(x) })
    }
    fn size_hint(&self) -> (usize, Option<usize>) { (self.len, Some(self.len)) }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let x = self.back?;
        self.len -= 1;
        self.back = node::predecessor(self.links, x);
        Some(unsafe { self.yield_node(x) })
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

unsafe impl<K: Send, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);
pub struct ValuesMut<'a, K, V>(pub(crate) IterMut<'a, K, V>);

/// Owning iterator, in ascending order of keys.
pub struct IntoIter<K, V>(pub(crate) std::vec::IntoIter<(K, V)>);

macro_rules! forward_iter {
    ( $( $name:ident<$($lt:lifetime)?> => $item:ty, |$x:ident| $map:expr; )* ) => { $(
        impl<$($lt,)? K, V> Iterator for $name<$($lt,)? K, V> {
            type Item = $item;
            fn next(&mut self) -> Option<$item> {
                self.0.next().map(|$x| $map)
            }
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.0.size_hint()
            }
        }
        impl<$($lt,)? K, V> DoubleEndedIterator for $name<$($lt,)? K, V> {
            fn next_back(&mut self) -> Option<$item> {
                self.0.next_back().map(|$x| $map)
            }
        }
        impl<$($lt,)? K, V> ExactSizeIterator for $name<$($lt,)? K, V> {}
        impl<$($lt,)? K, V> FusedIterator for $name<$($lt,)? K, V> {}
    )* };
}

forward_iter! {
    Keys<'a> => &'a K, |x| x.0;
    Values<'a> => &'a V, |x| x.1;
    ValuesMut<'a> => &'a mut V, |x| x.1;
    IntoIter<> => (K, V), |x| x;
}
