//! Small helpers for wiring incremental stages together.
//!
//! None of these carry state beyond a running snapshot, and the snapshot a
//! fold hands out always equals the fold of every diff seen so far.

use crate::diff::{Dataset, DatasetDiff};
use core::hash::Hash;

#[inline]
pub fn pair<A, B>(a: A, b: B) -> (A, B) {
    (a, b)
}

#[inline]
pub fn triple<A, B, C>(a: A, b: B, c: C) -> (A, B, C) {
    (a, b, c)
}

/// Swaps the members of a pair.
#[inline]
pub fn swap<A, B>((a, b): (A, B)) -> (B, A) {
    (b, a)
}

/// Maps each slot of a pair with its own function.
pub fn pair_map<A, B, C, D>(
    f1: impl Fn(A) -> B,
    f2: impl Fn(C) -> D,
) -> impl Fn((A, C)) -> (B, D) {
    move |(a, c)| (f1(a), f2(c))
}

/// Combines two pairs slot by slot.
pub fn pair_map2<A, B, C, D, E, F>(
    f1: impl Fn(A, B) -> C,
    f2: impl Fn(D, E) -> F,
) -> impl Fn((A, D), (B, E)) -> (C, F) {
    move |(a, d), (b, e)| (f1(a, b), f2(d, e))
}

/// Maps each slot of a triple with its own function.
pub fn triple_map<A, B, C, D, E, F>(
    f1: impl Fn(A) -> B,
    f2: impl Fn(C) -> D,
    f3: impl Fn(E) -> F,
) -> impl Fn((A, C, E)) -> (B, D, F) {
    move |(a, c, e)| (f1(a), f2(c), f3(e))
}

/// Running snapshot of a diff stream.
#[derive(Clone, Debug)]
pub struct DiffFold<K, V> {
    snapshot: Dataset<K, V>,
}

impl<K, V> Default for DiffFold<K, V> {
    fn default() -> Self {
        Self {
            snapshot: Dataset::default(),
        }
    }
}

impl<K, V> DiffFold<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `snapshot` instead of the empty dataset.
    pub fn from_snapshot(snapshot: Dataset<K, V>) -> Self {
        Self { snapshot }
    }

    /// Folds `diff` into the snapshot and returns the new snapshot.
    pub fn fold(&mut self, diff: &DatasetDiff<K, V>) -> &Dataset<K, V> {
        diff.apply(&mut self.snapshot);
        &self.snapshot
    }

    #[inline]
    pub fn snapshot(&self) -> &Dataset<K, V> {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Dataset<K, V> {
        self.snapshot
    }
}

/// Diffs each value against the value before it.
pub struct DiffStream<S, F> {
    prev: S,
    differ: F,
}

impl<S, D, F> DiffStream<S, F>
where
    F: Fn(&S, &S) -> D,
{
    /// Starts with `seed` as the previous value.
    pub fn new(seed: S, differ: F) -> Self {
        Self { prev: seed, differ }
    }

    /// Returns the diff from the previous value to `cur`, which becomes
    /// the previous value.
    pub fn next(&mut self, cur: S) -> D {
        let diff = (self.differ)(&self.prev, &cur);
        self.prev = cur;
        diff
    }

    #[inline]
    pub fn prev(&self) -> &S {
        &self.prev
    }
}
