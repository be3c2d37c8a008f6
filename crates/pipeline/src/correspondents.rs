//! Correspondents derived from the emails currently in view.
//!
//! Every email contributes two endpoints, its sender and its receiver. The
//! endpoints are grouped by person id: a person appears when their first
//! endpoint enters the view and disappears when their last one leaves.

use crate::types::{EmailDiff, PeopleDiff};
use mailgraph_core::{EmailId, Person, PersonId};
use mailgraph_incremental::DatasetDiff;
use mailgraph_reactive::{group_diff_by, Observable};

/// Which side of an email an endpoint is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Sender,
    Receiver,
}

/// Identifier of one endpoint of one email.
pub type EndpointId = (EmailId, Endpoint);

/// Changes to the endpoints of the emails in view.
pub type EndpointDiff = DatasetDiff<EndpointId, Person>;

/// Splits an email diff into the diff of its endpoints.
pub fn endpoint_diff(emails: &EmailDiff) -> EndpointDiff {
    let mut out = EndpointDiff::new();
    for change in emails.insertions() {
        out.add((change.id, Endpoint::Sender), change.value.sender());
        out.add((change.id, Endpoint::Receiver), change.value.receiver());
    }
    for change in emails.updates() {
        out.update((change.id, Endpoint::Sender), change.value.sender());
        out.update((change.id, Endpoint::Receiver), change.value.receiver());
    }
    for id in emails.deletions() {
        out.remove((*id, Endpoint::Sender));
        out.remove((*id, Endpoint::Receiver));
    }
    out
}

/// Turns endpoint groups into people.
///
/// A new group is a new person, described by its first endpoint. A dropped
/// group is a removed person. Changes within a group leave the person as is.
pub fn people_diff(groups: &DatasetDiff<PersonId, EndpointDiff>) -> PeopleDiff {
    let mut out = PeopleDiff::new();
    for group in groups.insertions() {
        let first = group
            .value
            .insertions()
            .first()
            .or_else(|| group.value.updates().first());
        if let Some(endpoint) = first {
            out.add(group.id, endpoint.value.clone());
        }
    }
    for id in groups.deletions() {
        out.remove(*id);
    }
    out
}

/// Derives a people diff from the email diff carried by each value.
///
/// `email_diff` extracts the email diff from a value and `finalize`
/// combines the value with the derived people diff.
pub fn dynamic_correspondents<A, B, FD, FF>(
    source: &Observable<A>,
    email_diff: FD,
    finalize: FF,
) -> Observable<B>
where
    A: 'static,
    B: 'static,
    FD: Fn(&A) -> &EmailDiff + 'static,
    FF: Fn(A, PeopleDiff) -> B + 'static,
{
    let endpoints = source.map(move |value: A| {
        let endpoints = endpoint_diff(email_diff(&value));
        (value, endpoints)
    });
    group_diff_by(
        &endpoints,
        |(_, endpoints): &(A, EndpointDiff)| endpoints,
        |person: &Person| person.id,
        move |(value, _), groups| finalize(value, people_diff(&groups)),
    )
}
