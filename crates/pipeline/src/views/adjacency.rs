//! Adjacency matrix view.
//!
//! Rows and columns are people ordered by title rank; the cell of
//! `(from, to)` aggregates every email `from` sent to `to`. Cells are kept
//! up to date incrementally: an email entering or leaving the view touches
//! exactly one cell.

use super::DiffConsumer;
use crate::selection::Selection;
use crate::types::{EmailDiff, Emails, People, PeopleDiff, SelectionDiff};
use alloc::vec::Vec;
use hashbrown::{HashMap, HashSet};
use mailgraph_core::{Email, PersonId};

/// Aggregate of the emails between one sender and one receiver.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatrixCell {
    pub count: usize,
    pub sentiment_sum: f64,
}

impl MatrixCell {
    /// Mean sentiment of the cell's emails.
    pub fn mean_sentiment(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sentiment_sum / self.count as f64
        }
    }
}

type CellKey = (PersonId, PersonId);

#[derive(Default)]
pub struct AdjacencyMatrix {
    people: People,
    emails: Emails,
    cells: HashMap<CellKey, MatrixCell>,
    order: Vec<PersonId>,
    dirty: HashSet<CellKey>,
    order_changed: bool,
    selection: Selection,
}

impl AdjacencyMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the people in row order: by title rank, then by id.
    #[inline]
    pub fn order(&self) -> &[PersonId] {
        &self.order
    }

    /// Returns the row of `id`.
    pub fn position(&self, id: PersonId) -> Option<usize> {
        self.order.iter().position(|p| *p == id)
    }

    pub fn cell(&self, from: PersonId, to: PersonId) -> Option<&MatrixCell> {
        self.cells.get(&(from, to))
    }

    /// Returns the number of non-empty cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn people(&self) -> &People {
        &self.people
    }

    #[inline]
    pub fn emails(&self) -> &Emails {
        &self.emails
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns true if any email of the cell is selected.
    pub fn is_cell_selected(&self, from: PersonId, to: PersonId) -> bool {
        self.selection.selected_emails().any(|id| {
            self.emails
                .get(&id)
                .map(|e| e.from_id == from && e.to_id == to)
                .unwrap_or(false)
        })
    }

    /// Returns the cells changed since the last call, sorted, and whether
    /// the row order changed.
    pub fn take_dirty(&mut self) -> (Vec<CellKey>, bool) {
        let mut cells: Vec<CellKey> = self.dirty.drain().collect();
        cells.sort_unstable();
        (cells, core::mem::take(&mut self.order_changed))
    }

    fn add_email(&mut self, email: &Email) {
        let key = (email.from_id, email.to_id);
        let cell = self.cells.entry(key).or_default();
        cell.count += 1;
        cell.sentiment_sum += email.sentiment;
        self.dirty.insert(key);
    }

    fn retract_email(&mut self, email: &Email) {
        let key = (email.from_id, email.to_id);
        if let Some(cell) = self.cells.get_mut(&key) {
            cell.count -= 1;
            cell.sentiment_sum -= email.sentiment;
            if cell.count == 0 {
                self.cells.remove(&key);
            }
        }
        self.dirty.insert(key);
    }

    fn put_email(&mut self, email: &Email) {
        if let Some(old) = self.emails.insert(email.id, email.clone()) {
            self.retract_email(&old);
        }
        self.add_email(email);
    }

    fn reorder(&mut self) {
        let people = &self.people;
        self.order = people.keys().copied().collect();
        self.order.sort_unstable_by_key(|id| (people[id].title.rank(), *id));
        self.order_changed = true;
    }
}

impl DiffConsumer for AdjacencyMatrix {
    fn apply(&mut self, people: &PeopleDiff, emails: &EmailDiff) {
        if !people.is_empty() {
            people.apply(&mut self.people);
            self.reorder();
        }

        for change in emails.insertions() {
            self.put_email(&change.value);
        }
        for change in emails.updates() {
            self.put_email(&change.value);
        }
        for id in emails.deletions() {
            if let Some(old) = self.emails.remove(id) {
                self.retract_email(&old);
            }
        }

        log::trace!(
            "adjacency matrix: {} people, {} cell(s), {} dirty",
            self.people.len(),
            self.cells.len(),
            self.dirty.len()
        );
    }

    fn select(&mut self, selection: &SelectionDiff) {
        self.selection.apply(selection);
        for id in selection
            .1
            .insertions()
            .iter()
            .map(|c| c.id)
            .chain(selection.1.deletions().iter().copied())
        {
            if let Some(email) = self.emails.get(&id) {
                self.dirty.insert((email.from_id, email.to_id));
            }
        }
    }
}
