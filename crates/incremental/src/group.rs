//! Incremental grouping of a keyed dataset.
//!
//! `GroupDiffBy` turns diffs over items into diffs over groups. The value of
//! a group in the output is itself a diff over that group's members: the
//! members a new group starts with, or the member changes of an existing one.

use crate::diff::DatasetDiff;
use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::{HashMap, HashSet};

/// Member changes collected for one group while processing one input diff.
struct PendingGroup<K, V> {
    existed: bool,
    members: DatasetDiff<K, V>,
}

/// Groups touched by one input diff, in first-touch order.
struct GroupBatch<K, G, V> {
    order: Vec<G>,
    pending: HashMap<G, PendingGroup<K, V>>,
}

impl<K, G, V> GroupBatch<K, G, V>
where
    G: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self {
            order: Vec::new(),
            pending: HashMap::new(),
        }
    }

    fn entry(&mut self, group: &G, existed: bool) -> &mut DatasetDiff<K, V> {
        if !self.pending.contains_key(group) {
            self.order.push(group.clone());
        }
        &mut self
            .pending
            .entry(group.clone())
            .or_insert_with(|| PendingGroup {
                existed,
                members: DatasetDiff::new(),
            })
            .members
    }
}

/// Incremental group-by over a diff stream.
///
/// Keeps the members of every group and the group of every item, so that an
/// update moving an item to another group can be turned into a removal from
/// the old group and an insertion into the new one.
pub struct GroupDiffBy<K, G, F> {
    selector: F,
    groups: HashMap<G, HashSet<K>>,
    item_groups: HashMap<K, G>,
}

impl<K, G, F> GroupDiffBy<K, G, F>
where
    K: Eq + Hash + Clone,
    G: Eq + Hash + Clone,
{
    /// Creates an empty grouping that assigns items with `selector`.
    pub fn new<V>(selector: F) -> Self
    where
        F: Fn(&V) -> G,
    {
        Self {
            selector,
            groups: HashMap::new(),
            item_groups: HashMap::new(),
        }
    }

    /// Returns the number of non-empty groups.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the members of `group`.
    pub fn members(&self, group: &G) -> Option<&HashSet<K>> {
        self.groups.get(group)
    }

    /// Returns the group `id` currently belongs to.
    pub fn group_of(&self, id: &K) -> Option<&G> {
        self.item_groups.get(id)
    }

    /// Checks that the member sets and the item-to-group index agree.
    pub fn is_consistent(&self) -> bool {
        let member_count: usize = self.groups.values().map(|members| members.len()).sum();
        member_count == self.item_groups.len()
            && self.groups.values().all(|members| !members.is_empty())
            && self.item_groups.iter().all(|(id, group)| {
                self.groups
                    .get(group)
                    .map(|members| members.contains(id))
                    .unwrap_or(false)
            })
    }

    /// Processes one item diff and returns the resulting group diff.
    ///
    /// A group that did not exist before this diff is reported as an
    /// insertion, one that no longer exists after it as a deletion, and any
    /// other touched group as an update carrying its member changes.
    pub fn apply<V>(&mut self, diff: &DatasetDiff<K, V>) -> DatasetDiff<G, DatasetDiff<K, V>>
    where
        F: Fn(&V) -> G,
        V: Clone,
    {
        let mut batch = GroupBatch::new();

        for change in diff.insertions() {
            self.add_item(&mut batch, &change.id, &change.value);
        }
        for change in diff.updates() {
            let group = (self.selector)(&change.value);
            match self.item_groups.get(&change.id) {
                Some(current) if *current == group => {
                    batch
                        .entry(&group, true)
                        .update(change.id.clone(), change.value.clone());
                }
                Some(_) => {
                    self.remove_item(&mut batch, &change.id);
                    self.add_item(&mut batch, &change.id, &change.value);
                }
                None => {
                    log::warn!("group update for an unknown item, treating it as an insertion");
                    self.add_item(&mut batch, &change.id, &change.value);
                }
            }
        }
        for id in diff.deletions() {
            self.remove_item(&mut batch, id);
        }

        let mut out = DatasetDiff::new();
        let GroupBatch { order, mut pending } = batch;
        for group in order {
            let Some(PendingGroup { existed, members }) = pending.remove(&group) else {
                continue;
            };
            match (existed, self.groups.contains_key(&group)) {
                (false, true) => {
                    log::debug!("group created with {} member change(s)", members.len());
                    out.add(group, members);
                }
                (true, true) => out.update(group, members),
                (true, false) => {
                    log::debug!("group dropped");
                    out.remove(group);
                }
                (false, false) => {}
            }
        }

        log::trace!(
            "grouped {} item change(s) into {} group change(s)",
            diff.len(),
            out.len()
        );
        out
    }

    fn add_item<V>(&mut self, batch: &mut GroupBatch<K, G, V>, id: &K, item: &V)
    where
        F: Fn(&V) -> G,
        V: Clone,
    {
        let group = (self.selector)(item);
        let existed = self.groups.contains_key(&group);
        batch.entry(&group, existed).add(id.clone(), item.clone());
        self.groups.entry(group.clone()).or_default().insert(id.clone());
        self.item_groups.insert(id.clone(), group);
    }

    fn remove_item<V>(&mut self, batch: &mut GroupBatch<K, G, V>, id: &K) {
        let Some(group) = self.item_groups.remove(id) else {
            log::warn!("group deletion for an unknown item, ignoring it");
            return;
        };
        batch.entry(&group, true).remove(id.clone());
        if let Some(members) = self.groups.get_mut(&group) {
            members.remove(id);
            if members.is_empty() {
                self.groups.remove(&group);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Change, Dataset};

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        title: &'static str,
    }

    fn item(title: &'static str) -> Item {
        Item { title }
    }

    fn by_title() -> GroupDiffBy<u32, &'static str, fn(&Item) -> &'static str> {
        GroupDiffBy::new(|i: &Item| i.title)
    }

    fn inserts(items: &[(u32, &'static str)]) -> DatasetDiff<u32, Item> {
        let mut diff = DatasetDiff::new();
        for &(id, title) in items {
            diff.add(id, item(title));
        }
        diff
    }

    #[test]
    fn test_insertions_create_groups() {
        let mut grouping = by_title();
        let out = grouping.apply(&inserts(&[(1, "CEO"), (2, "Trader"), (3, "Trader")]));

        assert_eq!(out.insertions().len(), 2);
        assert!(out.updates().is_empty());
        let traders = out.insertions().iter().find(|c| c.id == "Trader").unwrap();
        assert_eq!(traders.value.insertions().len(), 2);
        assert_eq!(grouping.group_count(), 2);
        assert!(grouping.is_consistent());
    }

    #[test]
    fn test_insertion_into_existing_group_is_update() {
        let mut grouping = by_title();
        grouping.apply(&inserts(&[(1, "CEO")]));
        let out = grouping.apply(&inserts(&[(2, "CEO")]));

        assert!(out.insertions().is_empty());
        assert_eq!(out.updates().len(), 1);
        assert_eq!(out.updates()[0].value.insertions(), &[Change::new(2, item("CEO"))]);
    }

    #[test]
    fn test_update_within_group() {
        let mut grouping = by_title();
        grouping.apply(&inserts(&[(1, "CEO")]));

        let mut diff = DatasetDiff::new();
        diff.update(1, item("CEO"));
        let out = grouping.apply(&diff);

        assert_eq!(out.updates().len(), 1);
        assert_eq!(out.updates()[0].id, "CEO");
        assert_eq!(out.updates()[0].value.updates().len(), 1);
    }

    #[test]
    fn test_rekey_last_member_moves_to_new_group() {
        let mut grouping = by_title();
        grouping.apply(&inserts(&[(1, "CEO")]));

        let mut diff = DatasetDiff::new();
        diff.update(1, item("Trader"));
        let out = grouping.apply(&diff);

        assert_eq!(out.deletions(), &["CEO"]);
        assert_eq!(out.insertions().len(), 1);
        assert_eq!(out.insertions()[0].id, "Trader");
        assert_eq!(grouping.group_of(&1), Some(&"Trader"));
        assert!(grouping.is_consistent());
    }

    #[test]
    fn test_rekey_into_existing_group() {
        let mut grouping = by_title();
        grouping.apply(&inserts(&[(1, "CEO"), (2, "CEO"), (3, "Trader")]));

        let mut diff = DatasetDiff::new();
        diff.update(1, item("Trader"));
        let out = grouping.apply(&diff);

        assert!(out.insertions().is_empty());
        assert!(out.deletions().is_empty());
        assert_eq!(out.updates().len(), 2);
        let ceo = out.updates().iter().find(|c| c.id == "CEO").unwrap();
        assert_eq!(ceo.value.deletions(), &[1]);
        let trader = out.updates().iter().find(|c| c.id == "Trader").unwrap();
        assert_eq!(trader.value.insertions().len(), 1);
        assert!(grouping.is_consistent());
    }

    #[test]
    fn test_deleting_last_member_drops_group() {
        let mut grouping = by_title();
        grouping.apply(&inserts(&[(1, "CEO"), (2, "Trader"), (3, "Trader")]));

        let mut diff = DatasetDiff::new();
        diff.remove(1);
        diff.remove(2);
        let out = grouping.apply(&diff);

        assert_eq!(out.deletions(), &["CEO"]);
        assert_eq!(out.updates().len(), 1);
        assert_eq!(out.updates()[0].value.deletions(), &[2]);
        assert_eq!(grouping.group_count(), 1);
        assert!(grouping.is_consistent());
    }

    #[test]
    fn test_group_created_and_dropped_in_one_diff() {
        let mut grouping = by_title();
        let mut diff = inserts(&[(1, "CEO")]);
        diff.remove(1);
        let out = grouping.apply(&diff);

        assert!(out.is_empty());
        assert_eq!(grouping.group_count(), 0);
    }

    #[test]
    fn test_unknown_ids_are_tolerated() {
        let mut grouping = by_title();
        let mut diff = DatasetDiff::new();
        diff.remove(42);
        diff.update(7, item("Manager"));
        let out = grouping.apply(&diff);

        assert_eq!(out.insertions().len(), 1);
        assert_eq!(out.insertions()[0].id, "Manager");
        assert!(grouping.is_consistent());
    }

    #[test]
    fn test_folded_groups_match_membership() {
        let mut grouping = by_title();
        let mut mirror: Dataset<&'static str, Dataset<u32, Item>> = Dataset::new();

        let mut fold = |out: DatasetDiff<&'static str, DatasetDiff<u32, Item>>| {
            for c in out.insertions() {
                let mut members = Dataset::new();
                c.value.apply(&mut members);
                mirror.insert(c.id, members);
            }
            for c in out.updates() {
                c.value.apply(mirror.entry(c.id).or_default());
            }
            for id in out.deletions() {
                mirror.remove(id);
            }
        };

        fold(grouping.apply(&inserts(&[(1, "CEO"), (2, "CEO"), (3, "Trader")])));
        let mut diff = DatasetDiff::new();
        diff.update(2, item("Trader"));
        diff.remove(1);
        fold(grouping.apply(&diff));

        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror["Trader"].len(), 2);
    }
}
