//! Compiler argument resolution.
//!
//! The resolver turns "which file is the cursor in" into the exact
//! arguments the front-end needs to parse that file. Database hits are
//! stripped of everything that only makes sense for a process invocation
//! (the compiler token, `-c`, `-o` and its operand, the input file) and
//! relative `-I` paths are absolutized against the command's working
//! directory, so the front-end can be driven from any directory.
//!
//! Files absent from the database (headers, mostly) reuse the last
//! successfully resolved query: headers inherit the flags of whatever
//! translation unit last pulled them in. This works remarkably well in
//! practice and is the resolver's only cross-call mutable state.

use crate::db::CompilationDatabase;
use crate::paths::normalize;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A resolved compiler invocation: arguments plus working directory.
///
/// Callers always receive their own copy; mutating it cannot corrupt the
/// resolver's retained fallback state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileQuery {
    /// Compiler arguments, without the invocation token, `-c`, `-o` or the
    /// input file.
    pub args: Vec<String>,
    /// The compiler working directory, when known.
    pub cwd: Option<PathBuf>,
}

/// Derives compiler arguments for a source file.
pub struct ArgumentResolver {
    database: Option<Arc<dyn CompilationDatabase>>,
    user_options: Vec<String>,
    builtin_include: Option<PathBuf>,
    /// The last successfully resolved database query; reused on misses.
    last_query: Mutex<CompileQuery>,
}

impl ArgumentResolver {
    /// Create a resolver.
    ///
    /// `user_options` are extra arguments appended to every query (already
    /// split with shell rules); `builtin_include` is the probed builtin
    /// header directory, if one was needed and found.
    pub fn new(
        database: Option<Arc<dyn CompilationDatabase>>,
        user_options: Vec<String>,
        builtin_include: Option<PathBuf>,
    ) -> Self {
        Self {
            database,
            user_options,
            builtin_include,
            last_query: Mutex::new(CompileQuery::default()),
        }
    }

    /// Full argument resolution for one file: database (or fallback)
    /// arguments, user options, language-shape flags, builtin include.
    pub fn resolve(&self, path: &Path, filetype: &str) -> CompileQuery {
        let mut query = self.database_params(path);

        query.args.extend(self.user_options.iter().cloned());
        query.args.extend(language_args(path, filetype));
        if let Some(include) = &self.builtin_include {
            query.args.push(format!("-I{}", include.display()));
        }

        query
    }

    /// The database-derived part of the query (steps 1-3).
    ///
    /// A hit replaces the retained fallback; a miss returns a copy of it.
    pub fn database_params(&self, path: &Path) -> CompileQuery {
        if let Some(database) = &self.database {
            if let Some(first) = database
                .lookup(path)
                .and_then(|commands| commands.into_iter().next())
            {
                if let Some(argv) = first.argv() {
                    let cwd = PathBuf::from(&first.directory);
                    let args = strip_invocation(&argv, &cwd, path);
                    *self.last_query.lock() = CompileQuery {
                        args,
                        cwd: Some(cwd),
                    };
                } else {
                    tracing::warn!(
                        path = %path.display(),
                        "compile command for file could not be tokenized; reusing last query"
                    );
                }
            }
        }

        // Never hand out the retained query itself: callers get a deep copy.
        self.last_query.lock().clone()
    }
}

/// Strip the process-invocation parts of a compile command.
fn strip_invocation(argv: &[String], cwd: &Path, path: &Path) -> Vec<String> {
    let mut args = Vec::new();
    // The first token is the compiler itself.
    let mut skip_next = true;

    for arg in argv {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "-c" {
            continue;
        }
        if arg == "-o" {
            skip_next = true;
            continue;
        }
        if Path::new(arg) == path || normalize(&cwd.join(arg)) == path {
            continue;
        }
        if let Some(include) = arg.strip_prefix("-I") {
            if !Path::new(include).is_absolute() {
                let absolute = normalize(&cwd.join(include));
                args.push(format!("-I{}", absolute.display()));
                continue;
            }
        }
        args.push(arg.clone());
    }

    args
}

/// Language-shape flags derived from the declared filetype and extension:
/// `-x c`, `-x objective-c`, a `++` suffix for the C++ family, and a
/// `-header` suffix when the extension contains `h`.
fn language_args(path: &Path, filetype: &str) -> Vec<String> {
    let mut lang = if filetype.contains("objc") {
        String::from("objective-c")
    } else {
        String::from("c")
    };

    if filetype.starts_with("cpp") || filetype.starts_with("objcpp") {
        lang.push_str("++");
    }

    let is_header = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.contains('h'));
    if is_header {
        lang.push_str("-header");
    }

    vec![String::from("-x"), lang]
}
