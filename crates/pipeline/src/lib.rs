//! Mailgraph - incremental correspondence views over email datasets.
//!
//! This crate wires the record types of `mailgraph_core`, the diff algebra
//! of `mailgraph_incremental` and the streams of `mailgraph_reactive` into
//! the correspondence pipeline, and provides the views that consume it.
//!
//! # Core Concepts
//!
//! - `CorrespondencePipeline`: Loaded emails and user controls in, people and email diffs out
//! - `PipelineConfig`: Differ policy, dataset truncation and initial controls
//! - `TitleFilter`: Which job titles are shown
//! - `SelectionChannel`: Selection changes shared between views
//! - `DiffConsumer`: A view folding the diffs, with `AdjacencyMatrix` and `NodeLinkGraph`
//!
//! # Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use mailgraph::{attach, AdjacencyMatrix, CorrespondencePipeline, PipelineConfig, SelectionChannel};
//! use mailgraph_core::IdAllocator;
//!
//! let config = PipelineConfig::builder().initial_days(0, 7).build().unwrap();
//! let pipeline = CorrespondencePipeline::new(config);
//! let selection = SelectionChannel::new();
//!
//! let matrix = Rc::new(RefCell::new(AdjacencyMatrix::new()));
//! let _view = attach(&matrix, &pipeline.changes(), &selection.changes());
//!
//! let text = "date,fromId,fromEmail,fromJobtitle,toId,toEmail,toJobtitle,messageType,sentiment\n\
//!             2001-05-14,1,kenneth.lay@enron.com,CEO,2,jeff.skilling@enron.com,President,TO,0.25\n\
//!             2001-06-30,2,jeff.skilling@enron.com,President,1,kenneth.lay@enron.com,CEO,CC,-0.5\n";
//! pipeline.load_text(text, &mut IdAllocator::new()).unwrap();
//!
//! // Only the first email falls in the first week.
//! assert_eq!(matrix.borrow().emails().len(), 1);
//! assert_eq!(matrix.borrow().cell(1, 2).unwrap().count, 1);
//!
//! pipeline.set_time_range(0, 60);
//! assert_eq!(matrix.borrow().emails().len(), 2);
//! ```

#![no_std]

extern crate alloc;

pub mod config;
pub mod correspondents;
pub mod filter;
pub mod pipeline;
pub mod selection;
pub mod types;
pub mod views;

pub use config::{NodeLinkOptions, PipelineConfig, PipelineConfigBuilder, DEFAULT_INITIAL_DAYS};
pub use correspondents::{dynamic_correspondents, endpoint_diff, people_diff, Endpoint, EndpointId};
pub use filter::TitleFilter;
pub use pipeline::CorrespondencePipeline;
pub use selection::{Selection, SelectionChannel};
pub use types::{Changes, EmailDiff, Emails, People, PeopleDiff, SelectionDiff};
pub use views::{attach, AdjacencyMatrix, DiffConsumer, Edge, MatrixCell, Node, NodeLinkGraph, RenderOp};

// Re-export commonly used types from dependencies
pub use mailgraph_core::{Email, Error, Person, Result, Title};
pub use mailgraph_incremental::DiffPolicy;
