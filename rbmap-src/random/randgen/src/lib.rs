//! テスト用の乱択生成。

use std::{collections::BTreeSet, ops::Range};

use rand::{
    distributions::{Distribution, Uniform, WeightedIndex},
    seq::SliceRandom,
    Rng, SeedableRng,
};
use rand_chacha::ChaCha20Rng;

pub trait Gen {
    type Output;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output;
}

/// The fixed-seed generator shared by tests and benches.
pub fn rng() -> ChaCha20Rng {
    ChaCha20Rng::from_seed([
        0x55, 0xEF, 0xE0, 0x3C, 0x71, 0xDA, 0xFC, 0xAB, 0x5C, 0x1A, 0x9F, 0xEB,
        0xA4, 0x9E, 0x61, 0xE6, 0x1E, 0x7E, 0x29, 0x77, 0x38, 0x9A, 0xF5, 0x67,
        0xF5, 0xDD, 0x07, 0x06, 0xAE, 0xE4, 0x5A, 0xDC,
    ])
}

impl Gen for Range<i32> {
    type Output = i32;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        Uniform::from(self.clone()).sample(rng)
    }
}

/// `len` distinct values from `bound`, in ascending order.
pub struct StrictAsc<B> {
    pub bound: B,
    pub len: usize,
}

/// `len` distinct values from `bound`, in random order.
pub struct Distinct<B> {
    pub bound: B,
    pub len: usize,
}

impl Gen for StrictAsc<Range<i32>> {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { bound: Range { start, end }, len } = self;
        let width = (end - start) as usize;
        assert!(*len <= width, "not enough values in {start}..{end}");

        // pick the complement instead when most of the values are taken
        let dense = 2 * len > width;
        let count = if dense { width - len } else { *len };

        let mut seen = BTreeSet::new();
        while seen.len() < count {
            seen.insert((*start..*end).generate(rng));
        }

        if dense {
            (*start..*end).filter(|x| !seen.contains(x)).collect()
        } else {
            seen.into_iter().collect()
        }
    }
}

impl Gen for Distinct<Range<i32>> {
    type Output = Vec<i32>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let Self { bound, len } = self;
        let mut res = StrictAsc { bound: bound.clone(), len: *len }.generate(rng);
        res.shuffle(rng);
        res
    }
}

/// An operation on an ordered map with `i32` keys and values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Op {
    Insert(i32, i32),
    Remove(i32),
    Get(i32),
    LowerBound(i32),
    /// Removes the entry at the `n % len`-th position, if any.
    EraseNth(usize),
    Clear,
}

/// A sequence of `len` operations on keys drawn from `keys`.
///
/// Insertions are twice as likely as removals, so that the map grows.
/// `Clear` is rare.
pub struct Ops {
    pub keys: Range<i32>,
    pub len: usize,
}

impl Gen for Ops {
    type Output = Vec<Op>;
    fn generate<R: Rng>(&self, rng: &mut R) -> Self::Output {
        let kinds = match WeightedIndex::new([40, 20, 15, 10, 10, 1]) {
            Ok(w) => w,
            Err(e) => unreachable!("{e}"),
        };
        (0..self.len)
            .map(|_| {
                let key = self.keys.generate(rng);
                match kinds.sample(rng) {
                    0 => Op::Insert(key, rng.gen()),
                    1 => Op::Remove(key),
                    2 => Op::Get(key),
                    3 => Op::LowerBound(key),
                    4 => Op::EraseNth(rng.gen()),
                    _ => Op::Clear,
                }
            })
            .collect()
    }
}

#[test]
fn uniformity() {
    use std::collections::BTreeMap;

    let mut rng = rng();
    let n = 10_usize.pow(5);

    let mut map = BTreeMap::new();
    for _ in 0..n {
        let tmp = StrictAsc { bound: 0..4, len: 3 }.generate(&mut rng);
        *map.entry(tmp).or_insert(0) += 1;
    }
    let k = 4;
    assert_eq!(map.len(), k);
    for &v in map.values() {
        assert!(v >= (n / k) * 97 / 100);
        assert!(v <= (n / k) * 103 / 100);
    }
}

#[test]
fn distinct() {
    let mut rng = rng();
    for len in [0, 1, 10, 99, 100] {
        let mut a = Distinct { bound: 0..100, len }.generate(&mut rng);
        assert_eq!(a.len(), len);
        a.sort_unstable();
        a.dedup();
        assert_eq!(a.len(), len);
        assert!(a.iter().all(|x| (0..100).contains(x)));
    }
}

#[test]
fn ops() {
    let mut rng = rng();
    let ops = Ops { keys: -5..5, len: 1000 }.generate(&mut rng);
    assert_eq!(ops.len(), 1000);
    let inserts = ops.iter().filter(|op| matches!(op, Op::Insert(..))).count();
    let removes = ops.iter().filter(|op| matches!(op, Op::Remove(_))).count();
    assert!(inserts > removes);
    assert!(ops.iter().all(|op| match op {
        Op::Insert(k, _) | Op::Remove(k) | Op::Get(k) | Op::LowerBound(k) =>
            (-5..5).contains(k),
        Op::EraseNth(_) | Op::Clear => true,
    }));
}
