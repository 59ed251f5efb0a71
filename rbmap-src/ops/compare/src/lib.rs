//! 順序付け。
//!
//! A strict weak ordering is given by a single predicate `less`. Two
//! keys are equivalent when neither is less than the other.

use std::cmp::Ordering;

pub trait Compare<K: ?Sized> {
    fn less(&self, lhs: &K, rhs: &K) -> bool;

    fn compare(&self, lhs: &K, rhs: &K) -> Ordering {
        if self.less(lhs, rhs) {
            Ordering::Less
        } else if self.less(rhs, lhs) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
    fn equiv(&self, lhs: &K, rhs: &K) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }
}

/// The ordering given by [`Ord`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    fn less(&self, lhs: &K, rhs: &K) -> bool { lhs < rhs }
    fn compare(&self, lhs: &K, rhs: &K) -> Ordering { lhs.cmp(rhs) }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: Compare<K>> Compare<K> for Reverse<C> {
    fn less(&self, lhs: &K, rhs: &K) -> bool { self.0.less(rhs, lhs) }
}

/// Orders keys by a projection.
///
/// ```
/// use compare::{ByKey, Compare};
///
/// let by_len = ByKey(|s: &&str| s.len());
/// assert!(by_len.less(&"ab", &"abc"));
/// assert!(by_len.equiv(&"ab", &"cd"));
/// ```
#[derive(Clone, Copy)]
pub struct ByKey<F>(pub F);

impl<K: ?Sized, T: Ord, F: Fn(&K) -> T> Compare<K> for ByKey<F> {
    fn less(&self, lhs: &K, rhs: &K) -> bool { (self.0)(lhs) < (self.0)(rhs) }
}

impl<K: ?Sized, F: Fn(&K, &K) -> bool> Compare<K> for F {
    fn less(&self, lhs: &K, rhs: &K) -> bool { self(lhs, rhs) }
}
