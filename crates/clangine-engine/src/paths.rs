//! Lexical path normalization.
//!
//! The compilation database records paths relative to each command's
//! working directory. Those paths may name files that do not exist on this
//! machine (generated sources, other build trees), so normalization is
//! purely lexical: `.` components drop, `..` pops the preceding component.

use std::path::{Component, Path, PathBuf};

/// Normalize a path lexically, without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Resolve a path for cache/lookup keys: canonical when the file exists,
/// lexically normalized otherwise.
pub(crate) fn resolve_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_cur_dir() {
        assert_eq!(
            normalize(Path::new("/a/./b/./c")),
            PathBuf::from("/a/b/c")
        );
    }

    #[test]
    fn test_normalize_pops_parent_dir() {
        assert_eq!(
            normalize(Path::new("/a/b/../include")),
            PathBuf::from("/a/include")
        );
    }

    #[test]
    fn test_normalize_keeps_leading_parents_relative() {
        assert_eq!(normalize(Path::new("../x/y")), PathBuf::from("../x/y"));
    }

    #[test]
    fn test_resolve_key_missing_file_falls_back() {
        let path = Path::new("/definitely/not/../here/file.c");
        assert_eq!(resolve_key(path), PathBuf::from("/definitely/here/file.c"));
    }
}
