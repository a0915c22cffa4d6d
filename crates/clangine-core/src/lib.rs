//! Core types for clangine
//!
//! This crate provides the completion data model shared by the engine and
//! its editor adapters:
//!
//! - [`CompletionChunk`] - One typed fragment of a completion candidate
//! - [`CompletionCandidate`] - A raw front-end result (chunks + priority)
//! - [`FormattedCompletion`] - The editor-agnostic snippet/abbr/menu record
//! - [`SortOrder`] - Candidate ordering policy
//! - [`format_results`] - Filter, sort and format a batch of candidates
//!
//! The formatter is pure: it never touches the front-end or the filesystem,
//! which keeps it trivially testable.
//!
//! # Example
//!
//! ```
//! use clangine_core::{CompletionCandidate, CompletionChunk, SortOrder, format_results};
//!
//! let candidate = CompletionCandidate {
//!     chunks: vec![
//!         CompletionChunk::ResultType("int".into()),
//!         CompletionChunk::TypedText("min".into()),
//!         CompletionChunk::Text("(".into()),
//!         CompletionChunk::Placeholder("int a".into()),
//!         CompletionChunk::Text(")".into()),
//!     ],
//!     priority: 50,
//! };
//!
//! let items = format_results(&[candidate], "mi", SortOrder::Priority);
//! assert_eq!(items[0].abbr, "min");
//! assert_eq!(items[0].snippet.as_deref(), Some("min(${1:int a})"));
//! assert_eq!(items[0].menu, "int min(int a)");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod chunk;
pub mod format;

pub use chunk::{CompletionCandidate, CompletionChunk};
pub use format::{FormattedCompletion, SortOrder, format_candidate, format_results};
