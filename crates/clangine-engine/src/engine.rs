//! The analysis facade.
//!
//! One `Engine` per session owns the resolver, the prober result and the
//! translation unit cache, and orchestrates each request: resolve
//! arguments, get-or-parse the unit, run the front-end query, then filter,
//! sort and format. Requests for the same file must not overlap; the
//! per-unit mutex queues them, and a caller that edited the buffer again
//! may safely discard the superseded result.

use crate::args::ArgumentResolver;
use crate::config::Config;
use crate::db::{CompilationDatabase, JsonCompilationDatabase};
use crate::error::EngineError;
use crate::frontend::{CompleteOptions, Frontend, SourceLocation, UnsavedFile};
use crate::probe::{can_find_builtin_headers, probe_builtin_headers};
use crate::tu::TranslationUnitCache;
use clangine_core::{FormattedCompletion, SortOrder, format_results};
use std::path::Path;
use std::sync::Arc;

/// One analysis request from the host: where the cursor is and what the
/// buffer currently contains.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    /// The file under the cursor.
    pub path: &'a Path,
    /// 1-based cursor line.
    pub line: u32,
    /// 1-based column where the completed identifier starts.
    pub column: u32,
    /// The full unsaved buffer text.
    pub buffer: &'a str,
    /// The identifier prefix typed so far; empty for definition requests.
    pub typed: &'a str,
    /// The declared filetype (`c`, `cpp`, `objc`, `objcpp`, ...).
    pub filetype: &'a str,
}

/// The completion engine facade.
pub struct Engine {
    resolver: ArgumentResolver,
    cache: TranslationUnitCache,
    complete_options: CompleteOptions,
    sort_order: SortOrder,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("complete_options", &self.complete_options)
            .field("sort_order", &self.sort_order)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine for one session.
    ///
    /// Loads the compilation database when one is configured (a database
    /// that cannot be loaded is a fatal configuration error) and runs the
    /// builtin-header probe once if the front-end cannot find its own
    /// headers. A failed probe is logged and swallowed; completion
    /// continues, possibly degraded.
    pub fn new(frontend: Arc<dyn Frontend>, config: &Config) -> Result<Self, EngineError> {
        let database: Option<Arc<dyn CompilationDatabase>> =
            match &config.compilation_database {
                Some(path) => Some(Arc::new(JsonCompilationDatabase::from_directory(path)?)),
                None => None,
            };

        // The header check runs bare: user options must not be able to
        // break the trivial parse and force a probe that cannot succeed.
        let builtin_include = if can_find_builtin_headers(frontend.as_ref(), &[]) {
            None
        } else {
            probe_builtin_headers(frontend.as_ref(), config.library_path.as_deref())
        };

        Ok(Self {
            resolver: ArgumentResolver::new(
                database,
                config.split_user_options(),
                builtin_include,
            ),
            cache: TranslationUnitCache::new(frontend),
            complete_options: config.complete_options(),
            sort_order: config.ordering(),
        })
    }

    /// Produce ranked completions at the request position.
    pub fn complete(
        &self,
        request: &AnalysisRequest<'_>,
    ) -> Result<Vec<FormattedCompletion>, EngineError> {
        let query = self.resolver.resolve(request.path, request.filetype);
        tracing::debug!(
            path = %request.path.display(),
            line = request.line,
            column = request.column,
            args = ?query.args,
            "completion request"
        );

        let unsaved = UnsavedFile::new(request.path, request.buffer);
        let handle = self
            .cache
            .get_or_create(&query.args, &unsaved, request.path)?;

        let mut unit = handle.lock();
        let candidates = unit
            .complete(
                request.path,
                request.line,
                request.column,
                std::slice::from_ref(&unsaved),
                self.complete_options,
            )
            .ok_or_else(|| EngineError::NoCompletion {
                path: request.path.to_path_buf(),
                line: request.line,
                column: request.column,
            })?;
        drop(unit);

        Ok(format_results(&candidates, request.typed, self.sort_order))
    }

    /// Resolve the definition under the cursor, reparsing the unit first
    /// so source positions match the current buffer.
    pub fn definition(
        &self,
        request: &AnalysisRequest<'_>,
    ) -> Result<Option<SourceLocation>, EngineError> {
        let query = self.resolver.resolve(request.path, request.filetype);
        let unsaved = UnsavedFile::new(request.path, request.buffer);
        let handle = self
            .cache
            .get_or_create_refreshed(&query.args, &unsaved, request.path)?;

        let unit = handle.lock();
        Ok(unit.definition_at(request.line, request.column))
    }
}
