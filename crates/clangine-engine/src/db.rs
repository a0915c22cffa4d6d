//! Compilation database access.
//!
//! A compilation database maps each source file to the exact compiler
//! invocation used to build it. The shipped implementation reads the
//! `compile_commands.json` format emitted by CMake, Bear and friends;
//! anything else can plug in through the [`CompilationDatabase`] trait.

use crate::paths::resolve_key;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One entry of a compilation database.
///
/// Either `arguments` (an argv array) or `command` (a single shell string)
/// is present; `argv` normalizes the two forms.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileCommand {
    /// The working directory of the compilation.
    pub directory: String,
    /// The whole command as one shell-quoted string.
    #[serde(default)]
    pub command: Option<String>,
    /// The command as an argv array, compiler invocation included.
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
    /// The main source file, absolute or relative to `directory`.
    pub file: String,
}

impl CompileCommand {
    /// The argument vector of this command, splitting the `command` string
    /// form with POSIX shell tokenization when necessary.
    pub fn argv(&self) -> Option<Vec<String>> {
        if let Some(arguments) = &self.arguments {
            return Some(arguments.clone());
        }
        let command = self.command.as_deref()?;
        let argv = shlex::split(command);
        if argv.is_none() {
            tracing::debug!(command, "compile command failed shell tokenization");
        }
        argv
    }
}

/// Errors loading a compilation database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// IO error reading the database file.
    #[error("failed to read compilation database {path}: {source}")]
    Io {
        /// The database file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The database file is not valid JSON of the expected shape.
    #[error("failed to parse compilation database {path}: {source}")]
    Json {
        /// The database file path.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// A service answering "how was this file compiled".
pub trait CompilationDatabase: Send + Sync {
    /// Compile commands recorded for `path`, best match first, or `None`
    /// when the file is not an independent compilation unit (headers).
    fn lookup(&self, path: &Path) -> Option<Vec<CompileCommand>>;
}

/// A `compile_commands.json` database held in memory.
#[derive(Debug, Default)]
pub struct JsonCompilationDatabase {
    commands: HashMap<PathBuf, Vec<CompileCommand>>,
}

impl JsonCompilationDatabase {
    /// Load a database from a directory containing `compile_commands.json`,
    /// or from the JSON file itself.
    pub fn from_directory(path: &Path) -> Result<Self, DatabaseError> {
        let file = if path.is_dir() {
            path.join("compile_commands.json")
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&file).map_err(|source| DatabaseError::Io {
            path: file.clone(),
            source,
        })?;
        let entries: Vec<CompileCommand> =
            serde_json::from_str(&content).map_err(|source| DatabaseError::Json {
                path: file.clone(),
                source,
            })?;

        let mut commands: HashMap<PathBuf, Vec<CompileCommand>> = HashMap::new();
        for entry in entries {
            let directory = PathBuf::from(&entry.directory);
            let source_file = Path::new(&entry.file);
            let absolute = if source_file.is_absolute() {
                source_file.to_path_buf()
            } else {
                directory.join(source_file)
            };
            commands.entry(resolve_key(&absolute)).or_default().push(entry);
        }

        tracing::debug!(
            entries = commands.len(),
            path = %file.display(),
            "loaded compilation database"
        );

        Ok(Self { commands })
    }

    /// Number of distinct source files in the database.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the database has no entries.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CompilationDatabase for JsonCompilationDatabase {
    fn lookup(&self, path: &Path) -> Option<Vec<CompileCommand>> {
        let key = resolve_key(path);
        self.commands.get(&key).cloned()
    }
}
