//! Mailgraph Core - record types and input handling for mailgraph.
//!
//! This crate provides the foundational types the incremental pipeline
//! operates on:
//!
//! - `Email`: A single correspondence record (sender, receiver, date, sentiment)
//! - `Person`: A correspondent derived from the sender/receiver fields
//! - `Title`: The job title of a correspondent
//! - `IdAllocator`: Session scoped allocator for record identifiers
//! - `TimeIndex`: Maps day offsets onto positions in a date-sorted record list
//! - `Error`: Error types for record parsing and configuration
//!
//! # Example
//!
//! ```rust
//! use mailgraph_core::{parse_emails, IdAllocator, Title};
//!
//! let text = "date,fromId,fromEmail,fromJobtitle,toId,toEmail,toJobtitle,messageType,sentiment\n\
//!             2001-05-14,1,kenneth.lay@enron.com,CEO,2,jeff.skilling@enron.com,President,TO,0.25\n";
//!
//! let mut ids = IdAllocator::new();
//! let emails = parse_emails(text, &mut ids).unwrap();
//!
//! assert_eq!(emails.len(), 1);
//! assert_eq!(emails[0].from_title, Title::Ceo);
//! ```

#![no_std]

extern crate alloc;

mod correspondents;
mod email;
mod error;
mod id;
mod parse;
mod time;

pub use correspondents::get_correspondents;
pub use email::{Email, EmailId, MessageType, Person, PersonId, Title};
pub use error::{Error, Result};
pub use id::IdAllocator;
pub use parse::{parse_emails, sort_by_date};
pub use time::{binary_search_by, email_counts_by_day, TimeIndex};
