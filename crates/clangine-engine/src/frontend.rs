//! The front-end boundary.
//!
//! The engine never links a compiler directly; it drives whatever parser
//! and indexer the embedder supplies through these traits. The shapes
//! mirror what a libclang-style library offers: parse a file with compiler
//! arguments and in-memory buffer overrides, reparse a unit in place, run
//! code completion at a position, and expose diagnostics and definition
//! locations.

use clangine_core::CompletionCandidate;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An in-memory override for a file's on-disk content.
///
/// Completion always operates on the editor's unsaved buffer, never on
/// whatever happens to be on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsavedFile {
    /// The path whose content is overridden.
    pub path: PathBuf,
    /// The full buffer text.
    pub contents: String,
}

impl UnsavedFile {
    /// Create a new buffer override.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Options for the initial parse of a translation unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Build a reusable precompiled preamble so reparses stay cheap.
    pub precompiled_preamble: bool,
    /// Keep detailed preprocessing records; completion ranges need them.
    pub detailed_preprocessing_record: bool,
}

impl ParseOptions {
    /// The options the translation unit cache parses with.
    pub const fn for_completion() -> Self {
        Self {
            precompiled_preamble: true,
            detailed_preprocessing_record: true,
        }
    }
}

/// Options for a code-completion query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompleteOptions {
    /// Include preprocessor macros in the results.
    pub include_macros: bool,
    /// Include code patterns (loop skeletons and the like).
    pub include_code_patterns: bool,
}

/// The front-end failed to produce a translation unit.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("front-end failed to parse {path}: {message}")]
pub struct ParseError {
    /// The file that failed to parse.
    pub path: PathBuf,
    /// The front-end's description of the failure.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A resolved source location, as delivered to a jump-to-definition
/// consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// The file containing the definition.
    pub file: PathBuf,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// A parsed translation unit owned by the cache.
///
/// Reparse mutates the unit in place; callers must serialize reparse and
/// completion calls against one unit (the cache wraps each unit in its own
/// mutex for exactly this reason).
pub trait TranslationUnit: Send {
    /// Reparse with new buffer overrides, reusing the precompiled preamble.
    fn reparse(&mut self, unsaved: &[UnsavedFile]) -> Result<(), ParseError>;

    /// Run code completion at a 1-based (line, column) position.
    ///
    /// Returns `None` when the front-end produced no completion result at
    /// all (cursor in an unparseable region); an empty vector is a valid
    /// result.
    fn complete(
        &mut self,
        path: &Path,
        line: u32,
        column: u32,
        unsaved: &[UnsavedFile],
        options: CompleteOptions,
    ) -> Option<Vec<CompletionCandidate>>;

    /// Number of diagnostics produced by the last parse or reparse.
    fn diagnostic_count(&self) -> usize;

    /// The definition (or referenced declaration) under the given 1-based
    /// position, if the front-end can resolve one.
    fn definition_at(&self, line: u32, column: u32) -> Option<SourceLocation>;
}

impl std::fmt::Debug for dyn TranslationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationUnit").finish_non_exhaustive()
    }
}

/// A parser/indexer service capable of producing translation units.
pub trait Frontend: Send + Sync {
    /// Parse `path` with the given compiler arguments, substituting the
    /// unsaved buffers for on-disk content.
    fn parse(
        &self,
        path: &Path,
        args: &[String],
        unsaved: &[UnsavedFile],
        options: ParseOptions,
    ) -> Result<Box<dyn TranslationUnit>, ParseError>;
}
