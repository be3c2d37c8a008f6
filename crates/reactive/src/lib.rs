//! Mailgraph Reactive - push-based diff streams.
//!
//! This crate connects the incremental state machines of
//! `mailgraph_incremental` into streams. Values are pushed from sources to
//! subscribers synchronously, on the caller's thread, in the order they are
//! produced.
//!
//! # Core Concepts
//!
//! - `Observable`: A cold stream; every subscription runs its own stages
//! - `Subject`: A hot source that multicasts pushed values, optionally replaying the latest
//! - `Subscription`: Guard that unsubscribes when dropped
//! - `SubscriptionManager`: The observer registry behind every `Subject`
//!
//! # Diff Operators
//!
//! - `dynamic_slice()`: Window moves to diffs
//! - `diff_switch_all()`: Stream of diff streams to one diff stream
//! - `group_diff_by()`: Item diffs to group diffs
//! - `fold_diff_first()`, `diff_stream()`, `diff_map_first()`: Snapshot/diff plumbing
//!
//! # Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use mailgraph_reactive::{dynamic_slice, fold_diff, Subject};
//!
//! let source: Rc<Vec<(u32, &str)>> = Rc::new(vec![(1, "a"), (2, "b"), (3, "c")]);
//! let windows = Subject::new();
//! let view = fold_diff(&dynamic_slice(source, &windows.as_observable()));
//!
//! let size = Rc::new(RefCell::new(0));
//! let sink = size.clone();
//! let _subscription = view.subscribe(move |(snapshot, _diff)| *sink.borrow_mut() = snapshot.len());
//!
//! windows.next((0i64, 2i64));
//! assert_eq!(*size.borrow(), 2);
//! ```

#![no_std]

extern crate alloc;

pub mod observable;
pub mod operators;
pub mod subject;
pub mod subscription;

pub use observable::{combine_latest, Observable};
pub use operators::{
    diff_map_first, diff_stream, diff_switch_all, dynamic_slice, fold_diff, fold_diff_first,
    group_diff_by,
};
pub use subject::Subject;
pub use subscription::{Callback, Subscription, SubscriptionId, SubscriptionManager};

// Re-export commonly used types from dependencies
pub use mailgraph_incremental::{Dataset, DatasetDiff, DiffPolicy, Window};
