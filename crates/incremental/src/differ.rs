//! Diffing of two dataset snapshots.

use crate::diff::{Dataset, DatasetDiff};
use core::hash::Hash;

/// Computes the diff that moves `prev` to `cur`.
///
/// Every id present in both snapshots is reported as an update, whether or
/// not its value changed. Use this when values are not cheaply comparable.
pub fn diff_dataset<K, V>(prev: &Dataset<K, V>, cur: &Dataset<K, V>) -> DatasetDiff<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let mut diff = DatasetDiff::new();
    for (id, value) in cur {
        if prev.contains_key(id) {
            diff.update(id.clone(), value.clone());
        } else {
            diff.add(id.clone(), value.clone());
        }
    }
    for id in prev.keys() {
        if !cur.contains_key(id) {
            diff.remove(id.clone());
        }
    }
    diff
}

/// Computes the diff that moves `prev` to `cur`, skipping unchanged values.
pub fn diff_pure_dataset<K, V>(prev: &Dataset<K, V>, cur: &Dataset<K, V>) -> DatasetDiff<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    diff_dataset_by(prev, cur, V::eq)
}

/// Computes the diff that moves `prev` to `cur`, skipping values `unchanged`
/// reports as equal.
pub fn diff_dataset_by<K, V, F>(prev: &Dataset<K, V>, cur: &Dataset<K, V>, unchanged: F) -> DatasetDiff<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: Fn(&V, &V) -> bool,
{
    let mut diff = DatasetDiff::new();
    for (id, value) in cur {
        match prev.get(id) {
            Some(old) if unchanged(old, value) => {}
            Some(_) => diff.update(id.clone(), value.clone()),
            None => diff.add(id.clone(), value.clone()),
        }
    }
    for id in prev.keys() {
        if !cur.contains_key(id) {
            diff.remove(id.clone());
        }
    }
    diff
}

/// Which ids present in both snapshots are reported as updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffPolicy {
    /// Every shared id is an update (`diff_dataset`).
    #[default]
    Always,
    /// Only shared ids whose value changed (`diff_pure_dataset`).
    OnChange,
}

impl DiffPolicy {
    /// Diffs two snapshots according to this policy.
    pub fn diff<K, V>(self, prev: &Dataset<K, V>, cur: &Dataset<K, V>) -> DatasetDiff<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone + PartialEq,
    {
        self.diff_with(prev, cur, V::eq)
    }

    /// Diffs two snapshots according to this policy, with `unchanged`
    /// deciding equality for `OnChange`. `Always` never calls it, so values
    /// need not implement `PartialEq`.
    pub fn diff_with<K, V, F>(self, prev: &Dataset<K, V>, cur: &Dataset<K, V>, unchanged: F) -> DatasetDiff<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
        F: Fn(&V, &V) -> bool,
    {
        match self {
            DiffPolicy::Always => diff_dataset(prev, cur),
            DiffPolicy::OnChange => diff_dataset_by(prev, cur, unchanged),
        }
    }
}
