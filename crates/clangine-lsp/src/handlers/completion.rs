//! Completion handler.
//!
//! Positions the engine query at the start of the identifier being typed,
//! hands the typed prefix to the engine for filtering, and converts the
//! formatted records into LSP completion items. Placeholder snippets map
//! onto LSP snippet syntax directly.

use super::{filetype_for, query_position};
use clangine_engine::{AnalysisRequest, Engine};
use lsp_types::{
    CompletionItem, CompletionParams, CompletionResponse, Documentation, InsertTextFormat,
};
use std::path::Path;

/// Handle a completion request against the engine.
pub fn handle_completion(
    engine: &Engine,
    params: &CompletionParams,
    path: &Path,
    source: &str,
    language_id: &str,
) -> Option<CompletionResponse> {
    let position = params.text_document_position.position;
    let (typed, line, column) = query_position(source, position);

    let results = engine
        .complete(&AnalysisRequest {
            path,
            line,
            column,
            buffer: source,
            typed,
            filetype: filetype_for(language_id),
        })
        .map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "completion failed");
        })
        .ok()?;

    let items: Vec<CompletionItem> = results
        .iter()
        .enumerate()
        .map(|(rank, result)| {
            let (insert_text, insert_text_format) = match &result.snippet {
                Some(snippet) => (snippet.clone(), InsertTextFormat::SNIPPET),
                None => (result.word.clone(), InsertTextFormat::PLAIN_TEXT),
            };
            CompletionItem {
                label: result.abbr.clone(),
                filter_text: Some(result.word.clone()),
                insert_text: Some(insert_text),
                insert_text_format: Some(insert_text_format),
                detail: (!result.menu.is_empty()).then(|| result.menu.clone()),
                documentation: (!result.info.is_empty())
                    .then(|| Documentation::String(result.info.clone())),
                // The engine already ranked the results; preserve its order.
                sort_text: Some(format!("{rank:05}")),
                ..CompletionItem::default()
            }
        })
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(CompletionResponse::Array(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clangine_core::{CompletionCandidate, CompletionChunk};
    use clangine_engine::{
        CompleteOptions, Config, Frontend, ParseError, ParseOptions, SourceLocation,
        TranslationUnit, UnsavedFile,
    };
    use lsp_types::{
        PartialResultParams, Position, TextDocumentIdentifier, TextDocumentPositionParams,
        WorkDoneProgressParams,
    };
    use std::sync::Arc;

    struct StaticFrontend {
        candidates: Vec<CompletionCandidate>,
    }

    struct StaticUnit {
        candidates: Vec<CompletionCandidate>,
    }

    impl TranslationUnit for StaticUnit {
        fn reparse(&mut self, _unsaved: &[UnsavedFile]) -> Result<(), ParseError> {
            Ok(())
        }

        fn complete(
            &mut self,
            _path: &std::path::Path,
            _line: u32,
            _column: u32,
            _unsaved: &[UnsavedFile],
            _options: CompleteOptions,
        ) -> Option<Vec<CompletionCandidate>> {
            Some(self.candidates.clone())
        }

        fn diagnostic_count(&self) -> usize {
            0
        }

        fn definition_at(&self, _line: u32, _column: u32) -> Option<SourceLocation> {
            None
        }
    }

    impl Frontend for StaticFrontend {
        fn parse(
            &self,
            _path: &std::path::Path,
            _args: &[String],
            _unsaved: &[UnsavedFile],
            _options: ParseOptions,
        ) -> Result<Box<dyn TranslationUnit>, ParseError> {
            Ok(Box::new(StaticUnit {
                candidates: self.candidates.clone(),
            }))
        }
    }

    fn engine_with(candidates: Vec<CompletionCandidate>) -> Engine {
        Engine::new(
            Arc::new(StaticFrontend { candidates }),
            &Config::default(),
        )
        .unwrap()
    }

    fn params_at(line: u32, character: u32) -> CompletionParams {
        CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: "file:///proj/main.c".parse().unwrap(),
                },
                position: Position { line, character },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        }
    }

    #[test]
    fn test_function_becomes_snippet_item() {
        let engine = engine_with(vec![CompletionCandidate {
            chunks: vec![
                CompletionChunk::ResultType("void".into()),
                CompletionChunk::TypedText("print_all".into()),
                CompletionChunk::Text("(".into()),
                CompletionChunk::Placeholder("int count".into()),
                CompletionChunk::Text(")".into()),
            ],
            priority: 20,
        }]);

        let source = "pri\n";
        let response = handle_completion(
            &engine,
            &params_at(0, 3),
            std::path::Path::new("/proj/main.c"),
            source,
            "c",
        )
        .unwrap();

        let CompletionResponse::Array(items) = response else {
            panic!("expected array response");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "print_all");
        assert_eq!(items[0].insert_text.as_deref(), Some("print_all(${1:int count})"));
        assert_eq!(items[0].insert_text_format, Some(InsertTextFormat::SNIPPET));
        assert_eq!(items[0].detail.as_deref(), Some("void print_all(int count)"));
    }

    #[test]
    fn test_variable_inserts_plain_text() {
        let engine = engine_with(vec![CompletionCandidate {
            chunks: vec![
                CompletionChunk::ResultType("int".into()),
                CompletionChunk::TypedText("printer_count".into()),
            ],
            priority: 8,
        }]);

        let response = handle_completion(
            &engine,
            &params_at(0, 3),
            std::path::Path::new("/proj/main.c"),
            "pri\n",
            "c",
        )
        .unwrap();

        let CompletionResponse::Array(items) = response else {
            panic!("expected array response");
        };
        assert_eq!(items[0].insert_text.as_deref(), Some("printer_count"));
        assert_eq!(
            items[0].insert_text_format,
            Some(InsertTextFormat::PLAIN_TEXT)
        );
    }

    #[test]
    fn test_prefix_filters_out_non_matches() {
        let engine = engine_with(vec![
            CompletionCandidate {
                chunks: vec![CompletionChunk::TypedText("print".into())],
                priority: 1,
            },
            CompletionCandidate {
                chunks: vec![CompletionChunk::TypedText("scan".into())],
                priority: 1,
            },
        ]);

        let response = handle_completion(
            &engine,
            &params_at(0, 3),
            std::path::Path::new("/proj/main.c"),
            "pri\n",
            "c",
        )
        .unwrap();

        let CompletionResponse::Array(items) = response else {
            panic!("expected array response");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "print");
    }

    #[test]
    fn test_completes_on_line_with_multibyte_comment() {
        let engine = engine_with(vec![CompletionCandidate {
            chunks: vec![CompletionChunk::TypedText("print".into())],
            priority: 1,
        }]);

        // The '→' in the comment is one UTF-16 unit but three bytes.
        let source = "/* \u{2192} */ pri\n";
        let response = handle_completion(
            &engine,
            &params_at(0, 11),
            std::path::Path::new("/proj/main.c"),
            source,
            "c",
        )
        .unwrap();

        let CompletionResponse::Array(items) = response else {
            panic!("expected array response");
        };
        assert_eq!(items[0].label, "print");
    }

    #[test]
    fn test_no_matches_yields_none() {
        let engine = engine_with(vec![CompletionCandidate {
            chunks: vec![CompletionChunk::TypedText("scan".into())],
            priority: 1,
        }]);

        let response = handle_completion(
            &engine,
            &params_at(0, 3),
            std::path::Path::new("/proj/main.c"),
            "pri\n",
            "c",
        );
        assert!(response.is_none());
    }
}
