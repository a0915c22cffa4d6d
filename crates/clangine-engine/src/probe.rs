//! Builtin header probing.
//!
//! A front-end that is not installed at a standard location sometimes
//! fails to locate its own builtin include files. The probe is a one-shot,
//! educated guess: walk a fixed list of known install layouts, pick the
//! newest-looking version directory in each, and keep the first one that
//! makes a trivial parse come back clean.

use crate::frontend::{Frontend, ParseOptions, UnsavedFile};
use std::fs;
use std::path::{Path, PathBuf};

/// The synthetic file used for the diagnostic check.
const PROBE_FILE: &str = "test.c";
const PROBE_SOURCE: &str = "#include \"stddef.h\"\n";

/// Check whether the front-end can locate its builtin headers.
///
/// Parses a synthetic file including one standard header; any diagnostic
/// means the builtin include directory was not found.
pub fn can_find_builtin_headers(frontend: &dyn Frontend, extra_args: &[String]) -> bool {
    let probe = UnsavedFile::new(PROBE_FILE, PROBE_SOURCE);
    match frontend.parse(
        Path::new(PROBE_FILE),
        extra_args,
        std::slice::from_ref(&probe),
        ParseOptions::default(),
    ) {
        Ok(unit) => unit.diagnostic_count() == 0,
        Err(_) => false,
    }
}

/// Search known install layouts for the builtin header directory.
///
/// Candidates derived from `library_path` come first (a file path is
/// reduced to its directory), then two common distribution locations. Each
/// candidate contributes its lexicographically greatest subdirectory (a
/// version-string heuristic) with `include` appended; the first one that
/// eliminates the probe diagnostics wins. Unlistable directories are
/// simply skipped.
pub fn probe_builtin_headers(
    frontend: &dyn Frontend,
    library_path: Option<&Path>,
) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(library) = library_path {
        let library = if library.is_file() {
            library.parent().unwrap_or(library)
        } else {
            library
        };
        candidates.push(library.join("../lib/clang")); // default install
        candidates.push(library.join("../clang")); // gentoo
        candidates.push(library.join("clang")); // opensuse
        candidates.push(library.to_path_buf());
    }
    candidates.push(PathBuf::from("/usr/lib64/clang")); // openSUSE, Fedora
    candidates.push(PathBuf::from("/usr/lib/clang"));

    for candidate in candidates {
        let Some(include) = versioned_include_dir(&candidate) else {
            continue;
        };
        let arg = format!("-I{}", include.display());
        if can_find_builtin_headers(frontend, std::slice::from_ref(&arg)) {
            tracing::info!(path = %include.display(), "found builtin header directory");
            return Some(include);
        }
    }

    tracing::warn!("no candidate directory provided usable builtin headers");
    None
}

/// `<dir>/<greatest subdirectory>/include`, or `None` when `dir` cannot be
/// listed at all.
fn versioned_include_dir(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    subdirs.sort();

    let version = subdirs.pop().unwrap_or_else(|| String::from("."));
    Some(dir.join(version).join("include"))
}
