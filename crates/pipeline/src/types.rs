//! Dataset and diff types shared across the pipeline and its views.

use mailgraph_core::{Email, EmailId, Person, PersonId};
use mailgraph_incremental::{Dataset, DatasetDiff, IdSetDiff};

pub type People = Dataset<PersonId, Person>;
pub type Emails = Dataset<EmailId, Email>;
pub type PeopleDiff = DatasetDiff<PersonId, Person>;
pub type EmailDiff = DatasetDiff<EmailId, Email>;

/// One pipeline emission: what happened to the people and to the emails.
pub type Changes = (PeopleDiff, EmailDiff);

/// Selection changes: selected people and selected emails, by id.
pub type SelectionDiff = (IdSetDiff<PersonId>, IdSetDiff<EmailId>);
