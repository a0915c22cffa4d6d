//! Engine configuration.
//!
//! Everything the host environment can set: where the toolchain and the
//! compilation database live, extra compiler arguments, completion query
//! options and the result ordering. The LSP adapter deserializes this
//! straight from the client's `initializationOptions`.

use crate::frontend::CompleteOptions;
use clangine_core::SortOrder;
use serde::Deserialize;
use std::path::PathBuf;

/// User-facing engine configuration. All fields have defaults, so an empty
/// configuration object is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the front-end library (file or directory); used to derive
    /// builtin-header probe candidates.
    pub library_path: Option<PathBuf>,
    /// Directory containing `compile_commands.json`, or the file itself.
    pub compilation_database: Option<PathBuf>,
    /// Extra compiler arguments as one shell-style string, split with
    /// POSIX `shlex` rules.
    pub user_options: String,
    /// Include preprocessor macros in completion results.
    pub complete_macros: bool,
    /// Include code patterns in completion results.
    pub complete_code_patterns: bool,
    /// Result ordering: `"priority"`, `"alpha"`, or anything else to keep
    /// the front-end order.
    pub sort_order: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_path: None,
            compilation_database: None,
            user_options: String::new(),
            complete_macros: false,
            complete_code_patterns: false,
            sort_order: String::from("priority"),
        }
    }
}

impl Config {
    /// The user options split with POSIX shell tokenization rules.
    /// A string that cannot be tokenized (unbalanced quotes) yields no
    /// arguments rather than garbage.
    pub fn split_user_options(&self) -> Vec<String> {
        match shlex::split(&self.user_options) {
            Some(options) => options,
            None => {
                tracing::warn!(
                    options = self.user_options,
                    "user options are not valid shell syntax; ignoring"
                );
                Vec::new()
            }
        }
    }

    /// The completion query options.
    pub fn complete_options(&self) -> CompleteOptions {
        CompleteOptions {
            include_macros: self.complete_macros,
            include_code_patterns: self.complete_code_patterns,
        }
    }

    /// The configured result ordering.
    pub fn ordering(&self) -> SortOrder {
        SortOrder::from_name(&self.sort_order)
    }
}
