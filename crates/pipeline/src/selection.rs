//! The selection channel shared by the views.
//!
//! Selections travel as id-set diffs, the same changeset type the data
//! uses, so a view folds them exactly like it folds people and emails.

use crate::types::SelectionDiff;
use mailgraph_core::{EmailId, PersonId};
use mailgraph_incremental::{Dataset, IdSetDiff};
use mailgraph_reactive::{Observable, Subject, Subscription};

/// Carries selection changes from the view that makes them to every view
/// that shows them.
#[derive(Clone, Default)]
pub struct SelectionChannel {
    subject: Subject<SelectionDiff>,
}

impl SelectionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a selection change. Empty changes are dropped.
    pub fn publish(&self, diff: SelectionDiff) {
        if diff.0.is_empty() && diff.1.is_empty() {
            return;
        }
        log::trace!(
            "selection change: {} person op(s), {} email op(s)",
            diff.0.len(),
            diff.1.len()
        );
        self.subject.next(diff);
    }

    pub fn select_people(&self, ids: impl IntoIterator<Item = PersonId>) {
        let mut people = IdSetDiff::new();
        for id in ids {
            people.add(id, id);
        }
        self.publish((people, IdSetDiff::new()));
    }

    pub fn deselect_people(&self, ids: impl IntoIterator<Item = PersonId>) {
        let mut people = IdSetDiff::new();
        for id in ids {
            people.remove(id);
        }
        self.publish((people, IdSetDiff::new()));
    }

    pub fn select_emails(&self, ids: impl IntoIterator<Item = EmailId>) {
        let mut emails = IdSetDiff::new();
        for id in ids {
            emails.add(id, id);
        }
        self.publish((IdSetDiff::new(), emails));
    }

    pub fn deselect_emails(&self, ids: impl IntoIterator<Item = EmailId>) {
        let mut emails = IdSetDiff::new();
        for id in ids {
            emails.remove(id);
        }
        self.publish((IdSetDiff::new(), emails));
    }

    pub fn changes(&self) -> Observable<SelectionDiff> {
        self.subject.as_observable()
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(SelectionDiff) + 'static,
    {
        self.subject.subscribe(observer)
    }
}

/// A view's local copy of the selection.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    people: Dataset<PersonId, PersonId>,
    emails: Dataset<EmailId, EmailId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a selection change into the mirror.
    pub fn apply(&mut self, diff: &SelectionDiff) {
        diff.0.apply(&mut self.people);
        diff.1.apply(&mut self.emails);
    }

    #[inline]
    pub fn is_person_selected(&self, id: PersonId) -> bool {
        self.people.contains_key(&id)
    }

    #[inline]
    pub fn is_email_selected(&self, id: EmailId) -> bool {
        self.emails.contains_key(&id)
    }

    pub fn selected_people(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.people.keys().copied()
    }

    pub fn selected_emails(&self) -> impl Iterator<Item = EmailId> + '_ {
        self.emails.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.emails.is_empty()
    }
}
