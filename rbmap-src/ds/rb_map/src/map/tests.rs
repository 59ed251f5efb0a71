use std::collections::BTreeMap;

use compare::{ByKey, Natural, Reverse};
use proptest::prelude::*;
use randgen::{Distinct, Gen, Op, Ops};
use sorted_vec_map::SortedVecMap;

use crate::{Error, Position, RbMap};

fn scenario_a() -> RbMap<i32, i32> {
    let mut map = RbMap::new();
    for k in [10, 20, 5, 15, 25, 1] {
        let (_, inserted) = map.insert(k, k * 10);
        assert!(inserted);
        map.assert_invariants();
    }
    map
}

fn positions<K, V, C>(map: &RbMap<K, V, C>) -> Vec<Position> {
    let mut res = vec![];
    let mut pos = map.begin();
    while !pos.is_end() {
        res.push(pos);
        pos = map.next(pos).unwrap();
    }
    res
}

#[test]
fn insertion_order() {
    let map = scenario_a();
    assert_eq!(map.len(), 6);
    assert!(map.keys().copied().eq([1, 5, 10, 15, 20, 25]));
    assert_eq!(positions(&map).len(), map.len());
}

#[test]
fn erase_inner_node() {
    let mut map = scenario_a();
    let five = map.find(&5);
    let pos = map.find(&10);
    assert_eq!(map.erase(pos), Ok((10, 100)));
    assert!(map.keys().copied().eq([1, 5, 15, 20, 25]));
    assert_eq!(map.assert_invariants(), 2);
    assert_eq!(
        map.render().to_string(),
        "\
5 (B)
├── 1 (B)
└── 20 (B)
    ├── 15 (R)
    └── 25 (R)
"
    );

    // the predecessor moved up in place of the erased node
    assert_eq!(map.entry_at(five), Ok((&5, &50)));
    let next = map.next(five).and_then(|p| map.entry_at(p));
    assert_eq!(next, Ok((&15, &150)));
}

#[test]
fn checked_and_defaulting_access() {
    let mut map = RbMap::<i32, i32>::new();
    assert!(matches!(map.at(&999), Err(Error::OutOfBound(_))));
    assert!(map.is_empty());
    assert_eq!(*map.get_or_insert_default(999), 0);
    assert_eq!(map.len(), 1);
    assert_eq!(map.at(&999), Ok(&0));
    *map.at_mut(&999).unwrap() = 7;
    assert_eq!(map[&999], 7);
}

#[test]
#[should_panic(expected = "key not found")]
fn index_absent() {
    let map: RbMap<_, _> = [(1, 1)].into();
    let _ = &map[&2];
}

#[test]
fn erase_end() {
    let mut map = scenario_a();
    assert!(matches!(map.erase(map.end()), Err(Error::OutOfBound(_))));
    assert_eq!(map.len(), 6);

    let mut empty = RbMap::<i32, ()>::new();
    assert_eq!(empty.begin(), empty.end());
    assert!(matches!(empty.erase(empty.begin()), Err(Error::OutOfBound(_))));
    map.assert_invariants();
}

#[test]
fn insert_existing_key() {
    let mut map = scenario_a();
    let before = map.render().to_string();
    for k in [1, 5, 10, 15, 20, 25] {
        let (pos, inserted) = map.insert(k, -1);
        assert!(!inserted);
        assert_eq!(pos, map.find(&k));
        assert_eq!(map.entry_at(pos), Ok((&k, &(k * 10))));
    }
    assert_eq!(map.len(), 6);
    assert_eq!(map.render().to_string(), before);
}

#[test]
fn find() {
    let map = scenario_a();
    for k in 0..30 {
        let pos = map.find(&k);
        if map.contains_key(&k) {
            assert_eq!(map.count(&k), 1);
            assert_eq!(map.entry_at(pos), Ok((&k, &(k * 10))));
            assert_eq!(map.get_key_value(&k), Some((&k, &(k * 10))));
        } else {
            assert_eq!(map.count(&k), 0);
            assert_eq!(pos, map.end());
            assert_eq!(map.get(&k), None);
        }
    }
}

#[test]
fn step_both_ways() {
    let map = scenario_a();
    let all = positions(&map);
    for w in all.windows(2) {
        assert_eq!(map.next(w[0]), Ok(w[1]));
        assert_eq!(map.prev(w[1]), Ok(w[0]));
    }
    let (first, last) = (all[0], all[all.len() - 1]);
    assert_eq!(first, map.begin());
    assert_eq!(map.next(last), Ok(map.end()));
    assert_eq!(map.prev(map.end()), Ok(last));
    assert_eq!(map.next(map.prev(map.end()).unwrap()), Ok(map.end()));

    assert!(matches!(map.prev(first), Err(Error::InvalidIterator(_))));
    assert!(matches!(map.next(map.end()), Err(Error::InvalidIterator(_))));
    assert!(matches!(map.entry_at(map.end()), Err(Error::InvalidIterator(_))));

    let empty = RbMap::<i32, i32>::new();
    assert_eq!(empty.prev(empty.end()), Ok(empty.end()));
}

#[test]
fn stale_positions() {
    let mut map = scenario_a();
    let pos = map.find(&15);
    map.erase(pos).unwrap();
    assert!(matches!(map.erase(pos), Err(Error::OutOfBound(_))));
    assert!(matches!(map.next(pos), Err(Error::InvalidIterator(_))));
    assert!(matches!(map.prev(pos), Err(Error::InvalidIterator(_))));
    assert!(matches!(map.entry_at(pos), Err(Error::InvalidIterator(_))));

    // the slot is reused, the position stays stale
    let (fresh, _) = map.insert(15, 0);
    assert_ne!(fresh, pos);
    assert!(map.entry_at(pos).is_err());
    assert_eq!(map.entry_at(fresh), Ok((&15, &0)));

    let begin = map.begin();
    map.clear();
    assert!(map.is_empty());
    assert!(map.entry_at(begin).is_err());
    assert_eq!(map.begin(), map.end());
    map.assert_invariants();
}

#[test]
fn foreign_positions() {
    let mut a = scenario_a();
    let mut b = a.clone();
    assert_eq!(a, b);
    assert_ne!(a.begin(), b.begin());
    assert_ne!(a.end(), b.end());

    let pos = a.find(&10);
    assert!(matches!(b.erase(pos), Err(Error::OutOfBound(_))));
    assert!(matches!(b.erase(a.end()), Err(Error::OutOfBound(_))));
    assert!(matches!(b.next(pos), Err(Error::InvalidIterator(_))));
    assert!(matches!(
        b.distance(a.begin(), b.end()),
        Err(Error::InvalidIterator(_))
    ));
    assert_eq!(b.len(), 6);

    // copies are independent
    a.erase(pos).unwrap();
    *b.get_mut(&1).unwrap() = 0;
    assert_eq!(a.len(), 5);
    assert_eq!(b.len(), 6);
    assert_eq!(a[&1], 10);
    assert_eq!(b[&10], 100);
    a.assert_invariants();
    b.assert_invariants();
}

#[test]
fn distance() {
    let map = scenario_a();
    assert_eq!(map.distance(map.begin(), map.end()), Ok(6));
    assert_eq!(map.distance(map.find(&5), map.find(&20)), Ok(3));
    assert_eq!(map.distance(map.end(), map.end()), Ok(0));
    assert!(map.distance(map.find(&20), map.find(&5)).is_err());
    assert!(map.distance(map.end(), map.begin()).is_err());
}

#[test]
fn bounds_and_ranges() {
    let map = scenario_a();
    let key = |pos| map.entry_at(pos).map(|(k, _)| *k).ok();
    assert_eq!(key(map.lower_bound(&10)), Some(10));
    assert_eq!(key(map.upper_bound(&10)), Some(15));
    assert_eq!(key(map.lower_bound(&11)), Some(15));
    assert_eq!(key(map.lower_bound(&0)), Some(1));
    assert_eq!(map.lower_bound(&26), map.end());
    assert_eq!(map.upper_bound(&25), map.end());

    fn keys<'a>(it: impl Iterator<Item = (&'a i32, &'a i32)>) -> Vec<i32> {
        it.map(|(k, _)| *k).collect()
    }
    assert_eq!(keys(map.range(5..20)), [5, 10, 15]);
    assert_eq!(keys(map.range(5..=20)), [5, 10, 15, 20]);
    assert_eq!(keys(map.range(..)), [1, 5, 10, 15, 20, 25]);
    assert_eq!(keys(map.range(11..14)), [0; 0]);
    assert_eq!(keys(map.range(20..5)), [0; 0]);
    assert_eq!(keys(map.range(26..)), [0; 0]);
    assert_eq!(keys(map.range(..1)), [0; 0]);
    assert_eq!(keys(map.range(2..).rev()), [25, 20, 15, 10, 5]);

    assert_eq!(map.first_key_value(), Some((&1, &10)));
    assert_eq!(map.last_key_value(), Some((&25, &250)));
}

#[test]
fn custom_order() {
    let mut map = RbMap::with_compare(Reverse(Natural));
    map.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
    assert!(map.keys().copied().eq([3, 2, 1]));
    assert_eq!(map.lower_bound(&5), map.begin());
    map.assert_invariants();

    // keys of equal length are equivalent
    let mut by_len =
        RbMap::with_compare(|a: &&str, b: &&str| a.len() < b.len());
    assert!(by_len.insert("ccc", 3).1);
    assert!(by_len.insert("a", 1).1);
    assert!(!by_len.insert("b", 2).1);
    assert_eq!(by_len.get(&"z"), Some(&1));
    assert_eq!(by_len.remove_entry(&"zzz"), Some(("ccc", 3)));
    assert_eq!(by_len.len(), 1);

    let mut abs = RbMap::with_compare(ByKey(|x: &i32| x.abs()));
    abs.extend([(-3, ()), (2, ()), (3, ()), (-1, ())]);
    assert!(abs.keys().copied().eq([-1, 2, -3]));
    abs.assert_invariants();
}

#[test]
fn removals() {
    let mut map: RbMap<_, _> = (0..20).map(|i| (i, i)).collect();
    assert_eq!(map.pop_first(), Some((0, 0)));
    assert_eq!(map.pop_last(), Some((19, 19)));
    assert_eq!(map.remove(&10), Some(10));
    assert_eq!(map.remove(&10), None);
    map.retain(|k, v| {
        *v *= 2;
        k % 3 != 0
    });
    map.assert_invariants();
    assert!(map.iter().eq([
        (&1, &2),
        (&2, &4),
        (&4, &8),
        (&5, &10),
        (&7, &14),
        (&8, &16),
        (&11, &22),
        (&13, &26),
        (&14, &28),
        (&16, &32),
        (&17, &34),
    ]));
    while map.pop_first().is_some() {
        map.assert_invariants();
    }
    assert_eq!(map.pop_last(), None);
    assert_eq!(format!("{map:?}"), "{}");
}

#[test]
fn erase_while_iterating() {
    let mut rng = randgen::rng();
    let keys = Distinct { bound: 0..1000, len: 500 }.generate(&mut rng);
    let mut map: RbMap<_, _> = keys.iter().map(|&k| (k, k)).collect();

    let mut pos = map.begin();
    while !pos.is_end() {
        let next = map.next(pos).unwrap();
        if map.entry_at(pos).unwrap().0 % 2 == 1 {
            map.erase(pos).unwrap();
            map.assert_invariants();
        }
        pos = next;
    }
    assert!(map.keys().all(|k| k % 2 == 0));
    assert_eq!(map.len(), keys.iter().filter(|&k| k % 2 == 0).count());
}

#[test]
fn deep_copy() {
    let mut rng = randgen::rng();
    let keys = Distinct { bound: -500..500, len: 300 }.generate(&mut rng);
    let map: RbMap<_, _> =
        keys.iter().map(|&k| (k, k.to_string())).collect();
    let copy = map.clone();
    assert_eq!(copy, map);
    assert_eq!(copy.render().to_string(), map.render().to_string());
    assert_eq!(copy.assert_invariants(), map.assert_invariants());

    let mut copy = copy;
    copy.clear();
    assert_eq!(map.len(), 300);
    assert_ne!(copy, map);

    let stale = copy.begin();
    copy.clone_from(&map);
    assert_eq!(copy, map);
    assert!(copy.entry_at(copy.begin()).is_ok());
    assert!(copy.entry_at(stale).is_err());
}

#[test]
fn against_naive() {
    let mut rng = randgen::rng();
    for keys in [0..8, -50..50, 0..1000] {
        let ops = Ops { keys, len: 2000 }.generate(&mut rng);
        let mut map = RbMap::new();
        let mut naive = SortedVecMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let (pos, inserted) = map.insert(k, v);
                    assert_eq!(inserted, naive.insert(k, v));
                    assert_eq!(map.entry_at(pos).map(|(k, _)| *k), Ok(k));
                }
                Op::Remove(k) => assert_eq!(map.remove(&k), naive.remove(&k)),
                Op::Get(k) => assert_eq!(map.get(&k), naive.get(&k)),
                Op::LowerBound(k) => {
                    let i = naive.lower_bound(&k);
                    let expected = naive.as_slice().get(i).map(|(k, v)| (k, v));
                    assert_eq!(map.entry_at(map.lower_bound(&k)).ok(), expected);
                }
                Op::EraseNth(n) => {
                    if naive.is_empty() {
                        assert!(map.erase(map.begin()).is_err());
                        continue;
                    }
                    let mut pos = map.begin();
                    for _ in 0..n % naive.len() {
                        pos = map.next(pos).unwrap();
                    }
                    let (k, v) = map.erase(pos).unwrap();
                    assert_eq!(naive.remove(&k), Some(v));
                }
                Op::Clear => {
                    map.clear();
                    naive = SortedVecMap::new();
                }
            }
            map.assert_invariants();
            assert_eq!(map.len(), naive.len());
        }
        assert!(map.iter().eq(naive.iter()));
        assert!(map.iter().rev().eq(naive.iter().rev()));
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Insert(i32),
    Remove(i32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0i32..200).prop_map(Step::Insert),
        2 => (0i32..200).prop_map(Step::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn agrees_with_btree_map(
        steps in prop::collection::vec(step(), 0..400)
    ) {
        let mut map = RbMap::new();
        let mut expected = BTreeMap::new();
        for step in steps {
            match step {
                Step::Insert(k) => {
                    let (_, inserted) = map.insert(k, k * 2);
                    prop_assert_eq!(inserted, !expected.contains_key(&k));
                    expected.entry(k).or_insert(k * 2);
                }
                Step::Remove(k) => {
                    prop_assert_eq!(map.remove(&k), expected.remove(&k));
                }
            }
            map.assert_invariants();
        }
        prop_assert_eq!(map.len(), expected.len());
        prop_assert_eq!(positions(&map).len(), map.len());
        prop_assert!(map.iter().eq(expected.iter()));
        for (k, v) in &expected {
            prop_assert_eq!(map.entry_at(map.find(k)), Ok((k, v)));
        }
    }

    #[test]
    fn ranges_agree(
        keys in prop::collection::vec(0i32..100, 0..100),
        lo in 0i32..100,
        hi in 0i32..100
    ) {
        let map: RbMap<_, _> = keys.iter().map(|&k| (k, ())).collect();
        let mut naive = SortedVecMap::new();
        for &k in &keys {
            naive.insert(k, ());
        }
        let got: Vec<_> = map.range(lo..hi).map(|(k, _)| *k).collect();
        let want: Vec<_> = naive.range(lo..hi).iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(got, want);
        let got: Vec<_> = map.range(lo..=hi).map(|(k, _)| *k).collect();
        let want: Vec<_> =
            naive.range(lo..=hi).iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(got, want);
    }
}
