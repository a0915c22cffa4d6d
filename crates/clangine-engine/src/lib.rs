//! Compiler-driven code completion engine for C-family languages.
//!
//! This crate turns cursor position + buffer text into ranked completion
//! candidates by driving a compiler front-end through a trait boundary:
//!
//! - [`args::ArgumentResolver`] - Derives normalized compiler invocation
//!   arguments from a compilation database, with a stale-but-useful
//!   fallback for files absent from it (headers)
//! - [`probe`] - Best-effort heuristic search for builtin header locations
//! - [`tu::TranslationUnitCache`] - One parsed unit per file, incrementally
//!   reparsed rather than rebuilt
//! - [`engine::Engine`] - The analysis facade orchestrating a request:
//!   resolve args, get-or-parse the unit, complete at (line, column),
//!   filter/sort/format
//!
//! The front-end itself (libclang or anything shaped like it) stays behind
//! the [`frontend::Frontend`] and [`frontend::TranslationUnit`] traits; the
//! embedder supplies the implementation.
//!
//! # Example
//!
//! ```ignore
//! use clangine_engine::{AnalysisRequest, Config, Engine};
//! use std::path::Path;
//!
//! let engine = Engine::new(frontend, &Config::default())?;
//! let items = engine.complete(&AnalysisRequest {
//!     path: Path::new("/src/main.c"),
//!     line: 12,
//!     column: 9,
//!     buffer: &buffer_text,
//!     typed: "pr",
//!     filetype: "c",
//! })?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod args;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod frontend;
pub mod probe;
pub mod tu;

mod paths;

pub use args::{ArgumentResolver, CompileQuery};
pub use config::Config;
pub use db::{CompilationDatabase, CompileCommand, DatabaseError, JsonCompilationDatabase};
pub use engine::{AnalysisRequest, Engine};
pub use error::EngineError;
pub use frontend::{
    CompleteOptions, Frontend, ParseError, ParseOptions, SourceLocation, TranslationUnit,
    UnsavedFile,
};
pub use tu::{TranslationUnitCache, UnitHandle};
