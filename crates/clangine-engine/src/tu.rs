//! The translation unit cache.
//!
//! One parsed unit per source file, created on first request and reparsed
//! in place afterwards; reparsing against the precompiled preamble is what
//! keeps interactive latency low. The cache is the sole owner of every
//! unit; callers borrow a handle for the duration of one request.
//!
//! Units are never evicted within a session. A stale-but-working unit
//! beats none, so a later transient parse error never invalidates a
//! previously cached handle.

use crate::frontend::{Frontend, ParseError, ParseOptions, TranslationUnit, UnsavedFile};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A shared, per-path handle to a cached translation unit.
///
/// The mutex serializes reparse and completion calls against one unit;
/// requests for different files proceed independently.
pub type UnitHandle = Arc<Mutex<Box<dyn TranslationUnit>>>;

/// Per-file cache of parsed translation units.
pub struct TranslationUnitCache {
    frontend: Arc<dyn Frontend>,
    units: Mutex<HashMap<PathBuf, UnitHandle>>,
}

impl TranslationUnitCache {
    /// Create an empty cache backed by the given front-end.
    pub fn new(frontend: Arc<dyn Frontend>) -> Self {
        Self {
            frontend,
            units: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached unit for `path`, or parse one.
    ///
    /// An existing unit is returned unchanged, without a reparse; the
    /// buffer override only matters on the initial parse. Completion
    /// queries pass the current buffer themselves.
    pub fn get_or_create(
        &self,
        args: &[String],
        unsaved: &UnsavedFile,
        path: &Path,
    ) -> Result<UnitHandle, ParseError> {
        self.fetch(args, unsaved, path, false)
    }

    /// Like [`get_or_create`](Self::get_or_create), but an existing unit
    /// is reparsed in place with the current buffer first. Navigation
    /// requests need up-to-date source positions.
    pub fn get_or_create_refreshed(
        &self,
        args: &[String],
        unsaved: &UnsavedFile,
        path: &Path,
    ) -> Result<UnitHandle, ParseError> {
        self.fetch(args, unsaved, path, true)
    }

    /// Whether a unit is cached for `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.units.lock().contains_key(path)
    }

    fn fetch(
        &self,
        args: &[String],
        unsaved: &UnsavedFile,
        path: &Path,
        refresh: bool,
    ) -> Result<UnitHandle, ParseError> {
        let existing = self.units.lock().get(path).cloned();
        if let Some(handle) = existing {
            if refresh {
                handle.lock().reparse(std::slice::from_ref(unsaved))?;
            }
            return Ok(handle);
        }

        tracing::debug!(path = %path.display(), "parsing new translation unit");
        let mut unit = self.frontend.parse(
            path,
            args,
            std::slice::from_ref(unsaved),
            ParseOptions::for_completion(),
        )?;

        // The initial parse does not populate the preamble cache that
        // completion relies on; one forced reparse does. Warm before
        // publishing, so a failed creation leaves nothing cached.
        unit.reparse(std::slice::from_ref(unsaved))?;

        let handle: UnitHandle = Arc::new(Mutex::new(unit));
        self.units
            .lock()
            .insert(path.to_path_buf(), handle.clone());

        Ok(handle)
    }
}
