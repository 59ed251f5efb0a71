use std::ops::{Bound, RangeBounds};

/// An ordered map over a sorted `Vec`. Insertion and removal take
/// linear time; meant as a reference for tests.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SortedVecMap<K, V>(Vec<(K, V)>);

impl<K: Ord, V> SortedVecMap<K, V> {
    pub fn new() -> Self { Self(vec![]) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.0.binary_search_by(|(k, _)| k.cmp(key))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).ok().map(|i| &self.0[i].1)
    }
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.search(key).ok().map(|i| &mut self.0[i].1)
    }

    /// Inserts unless the key is present; returns whether it inserted.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        match self.search(&key) {
            Ok(_) => false,
            Err(i) => {
                self.0.insert(i, (key, value));
                true
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.search(key).ok().map(|i| self.0.remove(i).1)
    }

    /// Index of the first key not less than `key`.
    pub fn lower_bound(&self, key: &K) -> usize {
        self.0.partition_point(|(k, _)| k < key)
    }
    /// Index of the first key greater than `key`.
    pub fn upper_bound(&self, key: &K) -> usize {
        self.0.partition_point(|(k, _)| k <= key)
    }

    pub fn range<R: RangeBounds<K>>(&self, range: R) -> &[(K, V)] {
        let start = match range.start_bound() {
            Bound::Included(k) => self.lower_bound(k),
            Bound::Excluded(k) => self.upper_bound(k),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(k) => self.upper_bound(k),
            Bound::Excluded(k) => self.lower_bound(k),
            Bound::Unbounded => self.0.len(),
        };
        if start < end { &self.0[start..end] } else { &[] }
    }

    pub fn as_slice(&self) -> &[(K, V)] { &self.0 }
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

#[test]
fn sanity_check() {
    let mut map = SortedVecMap::new();
    assert!(map.insert(3, "c"));
    assert!(map.insert(1, "a"));
    assert!(!map.insert(3, "x"));
    assert!(map.insert(2, "b"));
    assert_eq!(map.as_slice(), [(1, "a"), (2, "b"), (3, "c")]);
    assert_eq!(map.get(&3), Some(&"c"));
    assert_eq!(map.range(2..), [(2, "b"), (3, "c")]);
    assert_eq!(map.range(..=1), [(1, "a")]);
    assert!(map.range(3..1).is_empty());
    assert_eq!(map.remove(&2), Some("b"));
    assert_eq!(map.remove(&2), None);
    *map.get_mut(&1).unwrap() = "z";
    assert!(map.iter().map(|(_, v)| *v).eq(["z", "c"]));
    assert_eq!(map.len(), 2);
}
