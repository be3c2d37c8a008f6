//! Mapping of time ranges onto positions in a date-sorted record list.

use crate::email::Email;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// Returns the first index in `[begin, end)` at which `target` could be
/// inserted into the ordered sequence `get` while keeping it ordered.
pub fn binary_search_by<A, G, C>(get: G, target: &A, begin: usize, end: usize, cmp: C) -> usize
where
    G: Fn(usize) -> A,
    C: Fn(&A, &A) -> Ordering,
{
    let (mut low, mut high) = (begin, end);
    while low < high {
        let mid = low + (high - low) / 2;
        if cmp(&get(mid), target) == Ordering::Less {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    low
}

/// Day lookup over a date-sorted list of emails.
///
/// Days are offsets from the date of the first email, so day `0` is the
/// first day of the dataset.
#[derive(Clone, Debug, Default)]
pub struct TimeIndex {
    days: Vec<i64>,
}

impl TimeIndex {
    /// Builds the index. `emails` must already be sorted by date.
    pub fn new(emails: &[Email]) -> Self {
        Self {
            days: emails.iter().map(Email::day).collect(),
        }
    }

    /// Returns the number of indexed emails.
    #[inline]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if no emails are indexed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns the day number of the first email.
    pub fn first_day(&self) -> Option<i64> {
        self.days.first().copied()
    }

    /// Returns the day number of the last email.
    pub fn last_day(&self) -> Option<i64> {
        self.days.last().copied()
    }

    /// Returns the number of days between the first and last email.
    pub fn span(&self) -> i64 {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    /// Returns the position of the first email sent on or after day offset `day`.
    pub fn day_to_index(&self, day: i64) -> usize {
        let Some(first) = self.first_day() else {
            return 0;
        };
        let target = first.saturating_add(day);
        binary_search_by(|i| self.days[i], &target, 0, self.days.len(), |a, b| a.cmp(b))
    }

    /// Converts the day range `[begin_day, end_day)` into an index range.
    pub fn window(&self, begin_day: i64, end_day: i64) -> (i64, i64) {
        (
            self.day_to_index(begin_day) as i64,
            self.day_to_index(end_day) as i64,
        )
    }
}

/// Counts emails per day, for the timeline.
///
/// Days are offsets from the earliest email, as in `TimeIndex`. Only days
/// with at least one email are listed, in ascending order. The input need
/// not be sorted.
pub fn email_counts_by_day(emails: &[Email]) -> Vec<(i64, usize)> {
    let Some(first) = emails.iter().map(Email::day).min() else {
        return Vec::new();
    };
    let mut counts = BTreeMap::new();
    for email in emails {
        *counts.entry(email.day() - first).or_insert(0usize) += 1;
    }
    counts.into_iter().collect()
}
