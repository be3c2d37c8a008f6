//! Correspondent extraction.

use crate::email::{Email, Person, PersonId};
use hashbrown::HashMap;

/// Collects every sender and receiver of `emails`, keyed by person id.
///
/// When a person appears several times, the last record wins.
pub fn get_correspondents(emails: &[Email]) -> HashMap<PersonId, Person> {
    let mut people = HashMap::new();
    for email in emails {
        people.insert(email.from_id, email.sender());
        people.insert(email.to_id, email.receiver());
    }
    people
}
