//! Keyed datasets and the changesets that move them between states.
//!
//! A `DatasetDiff` carries three operation lists: insertions, updates and
//! deletions. Applying a diff processes the lists in that order, so deleting
//! an id that the same diff inserts removes it completely.

use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::{HashMap, HashSet};

/// A keyed collection. Every key maps to exactly one current value.
pub type Dataset<K, V> = HashMap<K, V>;

/// Changes to a set of ids, such as the current selection.
pub type IdSetDiff<K> = DatasetDiff<K, K>;

/// A single insertion or update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change<K, V> {
    pub id: K,
    pub value: V,
}

impl<K, V> Change<K, V> {
    #[inline]
    pub fn new(id: K, value: V) -> Self {
        Self { id, value }
    }
}

/// A set of changes that moves a `Dataset` from one state to another.
///
/// A diff is built by the stage that produces it (`add`, `update`, `remove`)
/// and is passed downstream by value, after which it is only read.
///
/// Application is permissive: an update for an absent id inserts it and a
/// deletion of an absent id does nothing. When the same id is inserted twice
/// the later insertion wins.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetDiff<K, V> {
    insertions: Vec<Change<K, V>>,
    updates: Vec<Change<K, V>>,
    deletions: Vec<K>,
}

impl<K, V> Default for DatasetDiff<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> DatasetDiff<K, V> {
    /// Creates an empty diff.
    #[inline]
    pub fn new() -> Self {
        Self {
            insertions: Vec::new(),
            updates: Vec::new(),
            deletions: Vec::new(),
        }
    }

    /// Creates a diff from its three operation lists.
    pub fn from_parts(
        insertions: Vec<Change<K, V>>,
        updates: Vec<Change<K, V>>,
        deletions: Vec<K>,
    ) -> Self {
        Self {
            insertions,
            updates,
            deletions,
        }
    }

    /// Appends an insertion.
    #[inline]
    pub fn add(&mut self, id: K, value: V) {
        self.insertions.push(Change::new(id, value));
    }

    /// Appends an update.
    #[inline]
    pub fn update(&mut self, id: K, value: V) {
        self.updates.push(Change::new(id, value));
    }

    /// Appends a deletion.
    #[inline]
    pub fn remove(&mut self, id: K) {
        self.deletions.push(id);
    }

    #[inline]
    pub fn insertions(&self) -> &[Change<K, V>] {
        &self.insertions
    }

    #[inline]
    pub fn updates(&self) -> &[Change<K, V>] {
        &self.updates
    }

    #[inline]
    pub fn deletions(&self) -> &[K] {
        &self.deletions
    }

    /// Returns true if the diff carries no operations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty() && self.updates.is_empty() && self.deletions.is_empty()
    }

    /// Returns the total number of operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.insertions.len() + self.updates.len() + self.deletions.len()
    }

    /// Splits the diff into its insertions, updates and deletions.
    pub fn into_parts(self) -> (Vec<Change<K, V>>, Vec<Change<K, V>>, Vec<K>) {
        (self.insertions, self.updates, self.deletions)
    }

    /// Maps every id and value into a new diff.
    pub fn map<K2, V2, FV, FK>(&self, mut value_fn: FV, mut id_fn: FK) -> DatasetDiff<K2, V2>
    where
        FV: FnMut(&V) -> V2,
        FK: FnMut(&K) -> K2,
    {
        let mut map_change = |c: &Change<K, V>| Change::new(id_fn(&c.id), value_fn(&c.value));
        let insertions = self.insertions.iter().map(&mut map_change).collect();
        let updates = self.updates.iter().map(&mut map_change).collect();
        let deletions = self.deletions.iter().map(|id| id_fn(id)).collect();
        DatasetDiff {
            insertions,
            updates,
            deletions,
        }
    }

    /// Maps the values, keeping the ids.
    pub fn map_values<V2, FV>(&self, value_fn: FV) -> DatasetDiff<K, V2>
    where
        K: Clone,
        FV: FnMut(&V) -> V2,
    {
        self.map(value_fn, K::clone)
    }

    /// Concatenates `other` after `self`, list by list.
    ///
    /// Nothing is deduplicated. Because application runs all insertions,
    /// then all updates, then all deletions, the result only equals applying
    /// `self` then `other` when no id deleted by `self` is reintroduced by
    /// `other` and no id written by `self` is inserted again by `other`.
    /// Use [`DatasetDiff::compose`] when that cannot be guaranteed.
    pub fn and_then(mut self, other: Self) -> Self {
        self.insertions.extend(other.insertions);
        self.updates.extend(other.updates);
        self.deletions.extend(other.deletions);
        self
    }
}

impl<K, V> DatasetDiff<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a diff that inserts every entry of `dataset`.
    pub fn from_dataset(dataset: &Dataset<K, V>) -> Self
    where
        V: Clone,
    {
        let insertions = dataset
            .iter()
            .map(|(id, value)| Change::new(id.clone(), value.clone()))
            .collect();
        Self {
            insertions,
            updates: Vec::new(),
            deletions: Vec::new(),
        }
    }

    /// Combines two consecutive diffs into one whose application always
    /// equals applying `self` then `other`.
    ///
    /// Operations of `self` on ids that `other` touches are dropped, since
    /// the state of those ids is decided by `other` alone.
    pub fn compose(self, other: Self) -> Self {
        let touched: HashSet<&K> = other
            .insertions
            .iter()
            .chain(other.updates.iter())
            .map(|c| &c.id)
            .chain(other.deletions.iter())
            .collect();

        let mut insertions: Vec<Change<K, V>> = Vec::new();
        let mut updates: Vec<Change<K, V>> = Vec::new();
        let mut deletions: Vec<K> = Vec::new();

        insertions.extend(self.insertions.into_iter().filter(|c| !touched.contains(&c.id)));
        updates.extend(self.updates.into_iter().filter(|c| !touched.contains(&c.id)));
        deletions.extend(self.deletions.into_iter().filter(|id| !touched.contains(id)));
        drop(touched);

        insertions.extend(other.insertions);
        updates.extend(other.updates);
        deletions.extend(other.deletions);

        Self {
            insertions,
            updates,
            deletions,
        }
    }

    /// Applies the diff to `dataset`.
    pub fn apply(&self, dataset: &mut Dataset<K, V>)
    where
        V: Clone,
    {
        for c in &self.insertions {
            dataset.insert(c.id.clone(), c.value.clone());
        }
        let mut absent_updates = 0usize;
        for c in &self.updates {
            if dataset.insert(c.id.clone(), c.value.clone()).is_none() {
                absent_updates += 1;
            }
        }
        for id in &self.deletions {
            dataset.remove(id);
        }
        if absent_updates > 0 {
            log::warn!("{} update(s) referenced absent ids and were inserted", absent_updates);
        }
    }

    /// Applies the diff to `dataset`, moving the values out of the diff.
    pub fn apply_owned(self, dataset: &mut Dataset<K, V>) {
        for c in self.insertions {
            dataset.insert(c.id, c.value);
        }
        let mut absent_updates = 0usize;
        for c in self.updates {
            if dataset.insert(c.id, c.value).is_none() {
                absent_updates += 1;
            }
        }
        for id in &self.deletions {
            dataset.remove(id);
        }
        if absent_updates > 0 {
            log::warn!("{} update(s) referenced absent ids and were inserted", absent_updates);
        }
    }

    /// Returns the ids this diff leaves present and absent, respectively.
    pub fn touched_ids(&self) -> (HashSet<K>, HashSet<K>) {
        let mut present: HashSet<K> = self
            .insertions
            .iter()
            .chain(self.updates.iter())
            .map(|c| c.id.clone())
            .collect();
        let mut absent = HashSet::new();
        for id in &self.deletions {
            present.remove(id);
            absent.insert(id.clone());
        }
        (present, absent)
    }
}

/// Anything that describes a batch of changes.
///
/// Implemented for `DatasetDiff` and for tuples of diffs, so stages that
/// carry several diffs side by side can still ask whether anything changed.
pub trait Diff {
    /// Returns true if applying the changes would leave every dataset as is.
    fn is_empty(&self) -> bool;
}

impl<K, V> Diff for DatasetDiff<K, V> {
    #[inline]
    fn is_empty(&self) -> bool {
        DatasetDiff::is_empty(self)
    }
}

impl<A: Diff, B: Diff> Diff for (A, B) {
    #[inline]
    fn is_empty(&self) -> bool {
        self.0.is_empty() && self.1.is_empty()
    }
}

impl<A: Diff, B: Diff, C: Diff> Diff for (A, B, C) {
    #[inline]
    fn is_empty(&self) -> bool {
        self.0.is_empty() && self.1.is_empty() && self.2.is_empty()
    }
}

/// Applies `diff` to `acc` and returns it.
pub fn fold_dataset<K, V>(mut acc: Dataset<K, V>, diff: &DatasetDiff<K, V>) -> Dataset<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    diff.apply(&mut acc);
    acc
}

/// Collects `entries` into a dataset.
pub fn dataset_from<K, V, I>(entries: I) -> Dataset<K, V>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    entries.into_iter().collect()
}
