//! Go-to-definition handler.
//!
//! The engine reparses the cached unit against the current buffer before
//! resolving, so locations line up with what the editor shows.

use super::{byte_offset, filetype_for, get_line};
use clangine_engine::{AnalysisRequest, Engine};
use lsp_types::{GotoDefinitionParams, GotoDefinitionResponse, Location, Position, Range, Uri};
use std::path::Path;

/// Handle a go-to-definition request against the engine.
pub fn handle_goto_definition(
    engine: &Engine,
    params: &GotoDefinitionParams,
    path: &Path,
    source: &str,
    language_id: &str,
) -> Option<GotoDefinitionResponse> {
    let position = params.text_document_position_params.position;
    // LSP columns are UTF-16 code units; the engine wants 1-based bytes.
    let line_text = get_line(source, position.line as usize);
    let column = u32::try_from(byte_offset(line_text, position.character)).unwrap_or(0) + 1;

    let location = engine
        .definition(&AnalysisRequest {
            path,
            line: position.line + 1,
            column,
            buffer: source,
            typed: "",
            filetype: filetype_for(language_id),
        })
        .map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "definition lookup failed");
        })
        .ok()??;

    let uri: Uri = format!("file://{}", location.file.display()).parse().ok()?;
    let target = Position {
        line: location.line.saturating_sub(1),
        character: location.column.saturating_sub(1),
    };

    Some(GotoDefinitionResponse::Scalar(Location {
        uri,
        range: Range {
            start: target,
            end: target,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clangine_engine::{
        CompleteOptions, Config, Frontend, ParseError, ParseOptions, SourceLocation,
        TranslationUnit, UnsavedFile,
    };
    use lsp_types::{
        PartialResultParams, TextDocumentIdentifier, TextDocumentPositionParams,
        WorkDoneProgressParams,
    };
    use std::path::PathBuf;
    use std::sync::Arc;

    struct PinnedFrontend {
        target: Option<SourceLocation>,
    }

    struct PinnedUnit {
        target: Option<SourceLocation>,
    }

    impl TranslationUnit for PinnedUnit {
        fn reparse(&mut self, _unsaved: &[UnsavedFile]) -> Result<(), ParseError> {
            Ok(())
        }

        fn complete(
            &mut self,
            _path: &Path,
            _line: u32,
            _column: u32,
            _unsaved: &[UnsavedFile],
            _options: CompleteOptions,
        ) -> Option<Vec<clangine_core::CompletionCandidate>> {
            None
        }

        fn diagnostic_count(&self) -> usize {
            0
        }

        fn definition_at(&self, _line: u32, _column: u32) -> Option<SourceLocation> {
            self.target.clone()
        }
    }

    impl Frontend for PinnedFrontend {
        fn parse(
            &self,
            _path: &Path,
            _args: &[String],
            _unsaved: &[UnsavedFile],
            _options: ParseOptions,
        ) -> Result<Box<dyn TranslationUnit>, ParseError> {
            Ok(Box::new(PinnedUnit {
                target: self.target.clone(),
            }))
        }
    }

    fn params_at(line: u32, character: u32) -> GotoDefinitionParams {
        GotoDefinitionParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: "file:///proj/main.c".parse().unwrap(),
                },
                position: Position { line, character },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        }
    }

    #[test]
    fn test_resolved_location_is_zero_based() {
        let engine = Engine::new(
            Arc::new(PinnedFrontend {
                target: Some(SourceLocation {
                    file: PathBuf::from("/proj/include/widget.h"),
                    line: 12,
                    column: 5,
                }),
            }),
            &Config::default(),
        )
        .unwrap();

        let response = handle_goto_definition(
            &engine,
            &params_at(3, 8),
            Path::new("/proj/main.c"),
            "widget_init();\n",
            "c",
        )
        .unwrap();

        let GotoDefinitionResponse::Scalar(location) = response else {
            panic!("expected scalar response");
        };
        assert_eq!(location.uri.as_str(), "file:///proj/include/widget.h");
        assert_eq!(location.range.start.line, 11);
        assert_eq!(location.range.start.character, 4);
    }

    struct EchoFrontend;

    struct EchoUnit;

    impl TranslationUnit for EchoUnit {
        fn reparse(&mut self, _unsaved: &[UnsavedFile]) -> Result<(), ParseError> {
            Ok(())
        }

        fn complete(
            &mut self,
            _path: &Path,
            _line: u32,
            _column: u32,
            _unsaved: &[UnsavedFile],
            _options: CompleteOptions,
        ) -> Option<Vec<clangine_core::CompletionCandidate>> {
            None
        }

        fn diagnostic_count(&self) -> usize {
            0
        }

        fn definition_at(&self, line: u32, column: u32) -> Option<SourceLocation> {
            Some(SourceLocation {
                file: PathBuf::from("/echo"),
                line,
                column,
            })
        }
    }

    impl Frontend for EchoFrontend {
        fn parse(
            &self,
            _path: &Path,
            _args: &[String],
            _unsaved: &[UnsavedFile],
            _options: ParseOptions,
        ) -> Result<Box<dyn TranslationUnit>, ParseError> {
            Ok(Box::new(EchoUnit))
        }
    }

    #[test]
    fn test_cursor_column_converted_to_bytes() {
        let engine = Engine::new(Arc::new(EchoFrontend), &Config::default()).unwrap();

        // '→' is one UTF-16 unit but three bytes; the cursor sits on the
        // 'w' (unit 8, byte 10).
        let response = handle_goto_definition(
            &engine,
            &params_at(0, 8),
            Path::new("/proj/main.c"),
            "/* \u{2192} */ widget_init();\n",
            "c",
        )
        .unwrap();

        let GotoDefinitionResponse::Scalar(location) = response else {
            panic!("expected scalar response");
        };
        assert_eq!(location.range.start.character, 10);
    }

    #[test]
    fn test_unresolved_definition_yields_none() {
        let engine = Engine::new(
            Arc::new(PinnedFrontend { target: None }),
            &Config::default(),
        )
        .unwrap();

        let response = handle_goto_definition(
            &engine,
            &params_at(0, 0),
            Path::new("/proj/main.c"),
            "int x;\n",
            "c",
        );
        assert!(response.is_none());
    }
}
