//! Mailgraph Incremental - dataset diffs and incremental transforms.
//!
//! This crate implements the incremental core of mailgraph: a small algebra
//! of keyed datasets and the diffs between them, plus the stateful transforms
//! that consume and produce diffs instead of full snapshots.
//!
//! # Core Concepts
//!
//! - `Dataset<K, V>`: A keyed collection
//! - `DatasetDiff<K, V>`: Insertions, updates and deletions moving a dataset between states
//! - `diff_dataset` / `diff_pure_dataset`: Diff two snapshots
//!
//! # Incremental Transforms
//!
//! - `DynamicSlice`: Keeps a moving window over an ordered source in view
//! - `DiffSwitch`: Merges successive inner diff streams against one baseline
//! - `GroupDiffBy`: Re-keys item diffs into group diffs
//! - `DiffFold` / `DiffStream`: Thread snapshots alongside diffs
//!
//! # Example
//!
//! ```rust
//! use mailgraph_incremental::{Dataset, DynamicSlice, FnArray};
//!
//! let source = FnArray::new(100, |i| (i, i * 10));
//! let mut slice = DynamicSlice::new(source);
//! let mut view = Dataset::new();
//!
//! slice.update((0, 5)).apply(&mut view);
//! slice.update((2, 7)).apply(&mut view);
//!
//! assert_eq!(view.len(), 5);
//! assert!(view.contains_key(&6));
//! assert!(!view.contains_key(&1));
//! ```

#![no_std]

extern crate alloc;

pub mod combinators;
pub mod diff;
pub mod differ;
pub mod group;
pub mod slice;
pub mod switch;

pub use combinators::{pair, pair_map, pair_map2, swap, triple, triple_map, DiffFold, DiffStream};
pub use diff::{dataset_from, fold_dataset, Change, Dataset, DatasetDiff, Diff, IdSetDiff};
pub use differ::{diff_dataset, diff_dataset_by, diff_pure_dataset, DiffPolicy};
pub use group::GroupDiffBy;
pub use slice::{ConstArray, DynamicSlice, FnArray, Window};
pub use switch::{DiffSwitch, Generation};
