//! Consumers of the pipeline's diff stream.
//!
//! A view keeps its own mirror of people and emails, folds every diff into
//! it and records which parts of its rendering the diff invalidated. Views
//! never share state with each other.

mod adjacency;
mod node_link;

pub use adjacency::{AdjacencyMatrix, MatrixCell};
pub use node_link::{Edge, Node, NodeLinkGraph, RenderOp};

use crate::types::{Changes, EmailDiff, PeopleDiff, SelectionDiff};
use alloc::rc::Rc;
use core::cell::RefCell;
use mailgraph_reactive::{Observable, Subscription};

/// Something that folds people and email diffs into a rendering.
pub trait DiffConsumer {
    /// Folds one pipeline emission.
    fn apply(&mut self, people: &PeopleDiff, emails: &EmailDiff);

    /// Folds one selection change.
    fn select(&mut self, selection: &SelectionDiff);
}

/// Feeds `changes` and `selection` into `consumer` until the returned
/// subscription is dropped.
pub fn attach<C>(
    consumer: &Rc<RefCell<C>>,
    changes: &Observable<Changes>,
    selection: &Observable<SelectionDiff>,
) -> Subscription
where
    C: DiffConsumer + 'static,
{
    let target = Rc::clone(consumer);
    let data = changes.subscribe(move |(people, emails): Changes| {
        target.borrow_mut().apply(&people, &emails);
    });
    let target = Rc::clone(consumer);
    let selected = selection.subscribe(move |diff: SelectionDiff| {
        target.borrow_mut().select(&diff);
    });
    data.and(selected)
}
