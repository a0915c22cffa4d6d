//! End-to-end engine tests against a scripted front-end: compilation
//! database resolution feeding the parse, unit caching across requests, and
//! completion formatting of the returned candidates.

use clangine_core::{CompletionCandidate, CompletionChunk};
use clangine_engine::{
    AnalysisRequest, CompleteOptions, Config, Engine, Frontend, ParseError, ParseOptions,
    SourceLocation, TranslationUnit, UnsavedFile,
};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// A front-end that records every parse invocation and serves a fixed
/// candidate set.
#[derive(Default)]
struct RecordingFrontend {
    parses: AtomicUsize,
    parse_args: Mutex<Vec<Vec<String>>>,
    candidates: Vec<CompletionCandidate>,
}

struct RecordingUnit {
    candidates: Vec<CompletionCandidate>,
}

impl TranslationUnit for RecordingUnit {
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
    ) -> Option<Vec<CompletionCandidate>> {
        Some(self.candidates.clone())
    }

    fn diagnostic_count(&self) -> usize {
        0
    }

    fn definition_at(&self, line: u32, column: u32) -> Option<SourceLocation> {
        Some(SourceLocation {
            file: PathBuf::from("/proj/include/widget.h"),
            line: line + 1,
            column,
        })
    }
}

impl Frontend for RecordingFrontend {
    fn parse(
        &self,
        _path: &Path,
        args: &[String],
        _unsaved: &[UnsavedFile],
        _options: ParseOptions,
    ) -> Result<Box<dyn TranslationUnit>, ParseError> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        self.parse_args.lock().push(args.to_vec());
        Ok(Box::new(RecordingUnit {
            candidates: self.candidates.clone(),
        }))
    }
}

fn method_candidate() -> CompletionCandidate {
    CompletionCandidate {
        chunks: vec![
            CompletionChunk::ResultType("size_t".into()),
            CompletionChunk::TypedText("length".into()),
            CompletionChunk::Text("(".into()),
            CompletionChunk::Text(")".into()),
        ],
        priority: 35,
    }
}

fn write_database(dir: &Path, file: &Path) {
    let entry = serde_json::json!([{
        "directory": dir.to_str().unwrap(),
        "command": format!(
            "cc -c -Iinclude -DWIDGETS=1 -o widget.o {}",
            file.display()
        ),
        "file": file.to_str().unwrap(),
    }]);
    fs::write(
        dir.join("compile_commands.json"),
        serde_json::to_vec(&entry).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_database_args_reach_the_frontend() {
    let project = TempDir::new().unwrap();
    let source = project.path().join("widget.c");
    fs::write(&source, "int widget;\n").unwrap();
    write_database(project.path(), &source);

    let frontend = Arc::new(RecordingFrontend {
        candidates: vec![method_candidate()],
        ..RecordingFrontend::default()
    });
    let config = Config {
        compilation_database: Some(project.path().to_path_buf()),
        user_options: "-Wall".into(),
        ..Config::default()
    };
    let engine = Engine::new(frontend.clone(), &config).unwrap();

    let buffer = String::from("int widget;\n");
    let items = engine
        .complete(&AnalysisRequest {
            path: &source,
            line: 1,
            column: 1,
            buffer: &buffer,
            typed: "",
            filetype: "c",
        })
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].word, "length");
    assert_eq!(items[0].abbr, "length");
    assert_eq!(items[0].snippet.as_deref(), Some("length()"));
    assert_eq!(items[0].menu, "size_t length()");

    // Last parse is the translation unit itself (the builtin-header check
    // parses first). The invocation, -c, -o and the input file are gone;
    // the include path is absolute; user options follow database options.
    let args = frontend.parse_args.lock().last().unwrap().clone();
    let include = format!("-I{}", project.path().join("include").display());
    assert!(args.contains(&include));
    assert!(args.contains(&"-DWIDGETS=1".to_string()));
    assert!(args.contains(&"-Wall".to_string()));
    assert!(args.contains(&"-x".to_string()));
    assert!(!args.contains(&"cc".to_string()));
    assert!(!args.contains(&"-c".to_string()));
    assert!(!args.contains(&"-o".to_string()));
    assert!(!args.iter().any(|a| a.ends_with("widget.c")));
}

#[test]
fn test_header_request_inherits_last_source_args() {
    let project = TempDir::new().unwrap();
    let source = project.path().join("widget.c");
    let header = project.path().join("widget.h");
    fs::write(&source, "int widget;\n").unwrap();
    fs::write(&header, "extern int widget;\n").unwrap();
    write_database(project.path(), &source);

    let frontend = Arc::new(RecordingFrontend::default());
    let config = Config {
        compilation_database: Some(project.path().to_path_buf()),
        ..Config::default()
    };
    let engine = Engine::new(frontend.clone(), &config).unwrap();

    let buffer = String::from("int widget;\n");
    let request = |path| AnalysisRequest {
        path,
        line: 1,
        column: 1,
        buffer: &buffer,
        typed: "",
        filetype: "c",
    };

    engine.complete(&request(&source)).unwrap();
    engine.complete(&request(&header)).unwrap();

    // The header is not in the database, yet its parse sees the include
    // path remembered from the source file's query.
    let args = frontend.parse_args.lock().last().unwrap().clone();
    let include = format!("-I{}", project.path().join("include").display());
    assert!(args.contains(&include));
    // Header requests drive the language explicitly.
    assert!(args.contains(&"c-header".to_string()));
}

#[test]
fn test_unit_is_cached_across_requests() {
    let frontend = Arc::new(RecordingFrontend {
        candidates: vec![method_candidate()],
        ..RecordingFrontend::default()
    });
    let engine = Engine::new(frontend.clone(), &Config::default()).unwrap();

    let buffer = String::from("x.len\n");
    let request = AnalysisRequest {
        path: Path::new("/proj/main.cpp"),
        line: 1,
        column: 3,
        buffer: &buffer,
        typed: "len",
        filetype: "cpp",
    };

    engine.complete(&request).unwrap();
    engine.complete(&request).unwrap();

    // One builtin-header check plus one unit parse; the second completion
    // reuses the cached unit.
    assert_eq!(frontend.parses.load(Ordering::SeqCst), 2);
}

#[test]
fn test_definition_round_trip() {
    let frontend = Arc::new(RecordingFrontend::default());
    let engine = Engine::new(frontend, &Config::default()).unwrap();

    let buffer = String::from("widget_init();\n");
    let location = engine
        .definition(&AnalysisRequest {
            path: Path::new("/proj/main.c"),
            line: 1,
            column: 1,
            buffer: &buffer,
            typed: "",
            filetype: "c",
        })
        .unwrap()
        .expect("scripted front-end always resolves");

    assert_eq!(location.file, Path::new("/proj/include/widget.h"));
    assert_eq!(location.line, 2);
}
