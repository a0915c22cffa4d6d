//! Engine error taxonomy.
//!
//! Per-request failures (`Parse`, `NoCompletion`) are reported as "no
//! results for this request" plus a diagnostic record for the log; they
//! never corrupt cached state for other files. `Database` failures are
//! configuration errors: they surface once at startup and no completions
//! can be produced until the configuration is fixed.

use crate::db::DatabaseError;
use crate::frontend::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the analysis facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The front-end failed to produce any translation unit.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The parse succeeded but the completion query returned nothing,
    /// typically because the cursor sits in an unparseable region.
    #[error("no completion results at {path}:{line}:{column}")]
    NoCompletion {
        /// The file the request was made against.
        path: PathBuf,
        /// 1-based request line.
        line: u32,
        /// 1-based request column.
        column: u32,
    },

    /// The configured compilation database could not be loaded.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl EngineError {
    /// Whether this error is fatal to the whole facade, as opposed to a
    /// single request coming back empty.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
