//! Incremental slicing of an ordered source.
//!
//! `DynamicSlice` keeps the part of a source sequence whose indices fall in a
//! window `[begin, end)` and reports window moves as diffs. Only indices in
//! the symmetric difference of the old and new window are read, so shifting
//! a window costs the size of the change, not the size of the window.

use crate::diff::DatasetDiff;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::Range;

/// An immutable, randomly indexable sequence.
pub trait ConstArray {
    type Item;

    /// Returns the number of items.
    fn len(&self) -> usize;

    /// Returns the item at `index`. `index` is always below `len()`.
    fn get_item(&self, index: usize) -> Self::Item;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> ConstArray for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get_item(&self, index: usize) -> T {
        self[index].clone()
    }
}

impl<T: Clone> ConstArray for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get_item(&self, index: usize) -> T {
        self[index].clone()
    }
}

impl<A: ConstArray + ?Sized> ConstArray for &A {
    type Item = A::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get_item(&self, index: usize) -> A::Item {
        (**self).get_item(index)
    }
}

impl<A: ConstArray + ?Sized> ConstArray for Rc<A> {
    type Item = A::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn get_item(&self, index: usize) -> A::Item {
        (**self).get_item(index)
    }
}

/// A `ConstArray` backed by a length and an accessor function.
pub struct FnArray<F, T> {
    len: usize,
    get: F,
    _item: PhantomData<fn() -> T>,
}

impl<F, T> FnArray<F, T>
where
    F: Fn(usize) -> T,
{
    pub fn new(len: usize, get: F) -> Self {
        Self {
            len,
            get,
            _item: PhantomData,
        }
    }
}

impl<F, T> ConstArray for FnArray<F, T>
where
    F: Fn(usize) -> T,
{
    type Item = T;

    fn len(&self) -> usize {
        self.len
    }

    fn get_item(&self, index: usize) -> T {
        (self.get)(index)
    }
}

/// A requested window `[begin, end)` over source indices.
///
/// Bounds may be negative or past the end of the source; they are clamped
/// when the window is applied. A window with `begin >= end` is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    pub begin: i64,
    pub end: i64,
}

impl Window {
    #[inline]
    pub fn new(begin: i64, end: i64) -> Self {
        Self { begin, end }
    }

    /// The empty window.
    #[inline]
    pub fn empty() -> Self {
        Self { begin: 0, end: 0 }
    }

    /// Clamps the window to a source of length `len`.
    pub fn clamp(self, len: usize) -> Range<usize> {
        let len = len as i64;
        let begin = self.begin.clamp(0, len);
        let end = self.end.clamp(0, len);
        if begin >= end {
            0..0
        } else {
            begin as usize..end as usize
        }
    }
}

impl From<(i64, i64)> for Window {
    fn from((begin, end): (i64, i64)) -> Self {
        Self { begin, end }
    }
}

impl From<Range<i64>> for Window {
    fn from(range: Range<i64>) -> Self {
        Self {
            begin: range.start,
            end: range.end,
        }
    }
}

/// Indices of `a` that are not in `b`, as at most two ranges.
fn difference(a: &Range<usize>, b: &Range<usize>) -> [Range<usize>; 2] {
    if b.is_empty() {
        return [a.clone(), 0..0];
    }
    [a.start..a.end.min(b.start), a.start.max(b.end)..a.end]
}

/// Maintains a window over a source of `(id, value)` items.
///
/// Items are keyed by the id the source yields, not by their position.
pub struct DynamicSlice<A> {
    source: A,
    current: Range<usize>,
}

impl<A, K, V> DynamicSlice<A>
where
    A: ConstArray<Item = (K, V)>,
{
    /// Creates a slice with an empty window.
    pub fn new(source: A) -> Self {
        Self {
            source,
            current: 0..0,
        }
    }

    /// Returns the currently materialized index range.
    #[inline]
    pub fn current(&self) -> Range<usize> {
        self.current.clone()
    }

    /// Returns the source.
    #[inline]
    pub fn source(&self) -> &A {
        &self.source
    }

    /// Moves the window and returns the diff from the previous window.
    pub fn update(&mut self, window: impl Into<Window>) -> DatasetDiff<K, V> {
        let window = window.into();
        if window.begin > window.end {
            log::warn!(
                "reversed window {}..{}, treating it as empty",
                window.begin,
                window.end
            );
        }
        let next = window.clamp(self.source.len());
        let prev = core::mem::replace(&mut self.current, next.clone());

        let mut diff = DatasetDiff::new();
        for range in difference(&next, &prev) {
            for index in range {
                let (id, value) = self.source.get_item(index);
                diff.add(id, value);
            }
        }
        for range in difference(&prev, &next) {
            for index in range {
                let (id, _) = self.source.get_item(index);
                diff.remove(id);
            }
        }

        log::trace!(
            "slice {:?} -> {:?} (requested {}..{}): +{} -{}",
            prev,
            next,
            window.begin,
            window.end,
            diff.insertions().len(),
            diff.deletions().len()
        );
        diff
    }

    /// Empties the window, returning deletions for everything in view.
    pub fn reset(&mut self) -> DatasetDiff<K, V> {
        self.update(Window::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Dataset;

    fn identity_source(len: usize) -> FnArray<impl Fn(usize) -> (usize, usize), (usize, usize)> {
        FnArray::new(len, |i| (i, i))
    }

    fn keys(data: &Dataset<usize, usize>) -> Vec<usize> {
        let mut keys: Vec<usize> = data.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_window_clamp() {
        assert_eq!(Window::new(-10, 10).clamp(100), 0..10);
        assert_eq!(Window::new(90, 200).clamp(100), 90..100);
        assert_eq!(Window::new(5, 3).clamp(100), 0..0);
        assert_eq!(Window::new(-5, -1).clamp(100), 0..0);
        assert_eq!(Window::new(0, 5).clamp(0), 0..0);
    }

    #[test]
    fn test_initial_window() {
        let mut slice = DynamicSlice::new(identity_source(5));
        let diff = slice.update((0, 5));

        let mut data = Dataset::new();
        diff.apply(&mut data);
        assert_eq!(keys(&data), [0, 1, 2, 3, 4]);
        assert!(diff.deletions().is_empty());
    }

    #[test]
    fn test_shift_is_minimal() {
        let mut slice = DynamicSlice::new(identity_source(100));
        slice.update((0, 5));
        let diff = slice.update((5, 10));

        assert_eq!(diff.insertions().len(), 5);
        assert_eq!(diff.deletions().len(), 5);
        assert!(diff.updates().is_empty());
        let inserted: Vec<usize> = diff.insertions().iter().map(|c| c.id).collect();
        assert_eq!(inserted, [5, 6, 7, 8, 9]);
        assert_eq!(diff.deletions(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_grow_and_shrink() {
        let mut slice = DynamicSlice::new(identity_source(100));
        let mut data = Dataset::new();

        slice.update((0, 5)).apply(&mut data);

        let grow = slice.update((0, 10));
        assert_eq!(grow.insertions().len(), 5);
        assert!(grow.deletions().is_empty());
        grow.apply(&mut data);
        assert_eq!(keys(&data), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

        let shrink = slice.update((5, 10));
        assert!(shrink.insertions().is_empty());
        assert_eq!(shrink.deletions().len(), 5);
        shrink.apply(&mut data);
        assert_eq!(keys(&data), [5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_out_of_range_windows_are_clamped() {
        let mut slice = DynamicSlice::new(identity_source(100));
        let mut data = Dataset::new();

        slice.update((0, 5)).apply(&mut data);
        slice.update((0, 10)).apply(&mut data);
        slice.update((5, 10)).apply(&mut data);
        slice.update((-10, 10)).apply(&mut data);
        assert_eq!(keys(&data), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

        slice.update((-10, 3)).apply(&mut data);
        assert_eq!(keys(&data), [0, 1, 2]);
    }

    #[test]
    fn test_disjoint_jump() {
        let mut slice = DynamicSlice::new(identity_source(100));
        let mut data = Dataset::new();

        slice.update((0, 5)).apply(&mut data);
        let jump = slice.update((10, 15));
        assert_eq!(jump.insertions().len(), 5);
        assert_eq!(jump.deletions().len(), 5);
        jump.apply(&mut data);
        assert_eq!(keys(&data), [10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_repeated_window_is_empty() {
        let mut slice = DynamicSlice::new(identity_source(100));
        slice.update((3, 8));
        assert!(slice.update((3, 8)).is_empty());
    }

    #[test]
    fn test_reversed_window_removes_everything() {
        let mut slice = DynamicSlice::new(identity_source(100));
        slice.update((3, 8));
        let diff = slice.update((8, 3));
        assert_eq!(diff.deletions().len(), 5);
        assert_eq!(slice.current(), 0..0);
    }

    #[test]
    fn test_reset() {
        let mut slice = DynamicSlice::new(identity_source(10));
        slice.update((0, 4));
        assert_eq!(slice.reset().deletions().len(), 4);
        assert!(slice.reset().is_empty());
    }

    #[test]
    fn test_keys_come_from_items() {
        let source: Vec<(&str, u32)> = alloc::vec![("a", 1), ("b", 2), ("c", 3)];
        let mut slice = DynamicSlice::new(&source);
        let diff = slice.update((1, 3));
        let ids: Vec<&str> = diff.insertions().iter().map(|c| c.id).collect();
        assert_eq!(ids, ["b", "c"]);
    }
}
