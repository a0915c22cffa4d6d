//! Main event loop for the LSP server.
//!
//! Notifications (document sync) are handled synchronously so the VFS is
//! always current before any request reads it. Requests run on the loop
//! thread as well; the engine serializes per-file work internally.

use crate::handlers::completion::handle_completion;
use crate::handlers::definition::handle_goto_definition;
use crate::vfs::Vfs;
use clangine_engine::Engine;
use crossbeam_channel::{Receiver, Sender};
use lsp_types::notification::{
    DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument, Notification,
};
use lsp_types::request::{Completion, GotoDefinition, Request, Shutdown};
use lsp_types::{CompletionParams, GotoDefinitionParams, Uri};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Convert a URI to a file path.
#[cfg(not(windows))]
fn uri_to_path(uri: &Uri) -> Option<PathBuf> {
    uri.as_str().strip_prefix("file://").map(PathBuf::from)
}

/// Convert a URI to a file path (Windows version).
#[cfg(windows)]
fn uri_to_path(uri: &Uri) -> Option<PathBuf> {
    uri.as_str()
        .strip_prefix("file://")
        // Handle Windows paths like file:///C:/...
        .map(|p| p.strip_prefix('/').unwrap_or(p))
        .map(PathBuf::from)
}

/// State managed by the main loop.
pub struct MainLoopState {
    /// Virtual file system for open documents.
    pub vfs: Arc<RwLock<Vfs>>,
    /// The completion engine; `None` when construction failed and the
    /// server runs with analysis disabled.
    pub engine: Option<Arc<Engine>>,
    /// Sender for outgoing LSP messages.
    pub sender: Sender<lsp_server::Message>,
    /// Whether shutdown was requested.
    pub shutdown_requested: bool,
}

impl MainLoopState {
    /// Create a new main loop state.
    pub fn new(sender: Sender<lsp_server::Message>, engine: Option<Arc<Engine>>) -> Self {
        Self {
            vfs: Arc::new(RwLock::new(Vfs::new())),
            engine,
            sender,
            shutdown_requested: false,
        }
    }

    /// Document path, buffer text and language id for a URI.
    fn document_for(&self, uri: &Uri) -> Option<(PathBuf, String, String)> {
        let path = uri_to_path(uri)?;
        let vfs = self.vfs.read();
        let doc = vfs.get(&path)?;
        let text = doc.text();
        let language_id = doc.language_id().to_string();
        drop(vfs);
        Some((path, text, language_id))
    }

    /// Handle an LSP request (expects response).
    fn handle_request(&mut self, req: lsp_server::Request) {
        let id = req.id.clone();

        let result = match req.method.as_str() {
            Shutdown::METHOD => {
                self.shutdown_requested = true;
                Ok(serde_json::Value::Null)
            }
            Completion::METHOD => self.handle_completion_request(req),
            GotoDefinition::METHOD => self.handle_goto_definition_request(req),
            _ => {
                tracing::warn!("Unhandled request: {}", req.method);
                Err(format!("Unhandled request: {}", req.method))
            }
        };

        let response = match result {
            Ok(value) => lsp_server::Response::new_ok(id, value),
            Err(msg) => {
                let error_code = if msg.starts_with("Unhandled request") {
                    lsp_server::ErrorCode::MethodNotFound
                } else {
                    lsp_server::ErrorCode::InternalError
                };
                lsp_server::Response::new_err(id, error_code as i32, msg)
            }
        };

        self.send(lsp_server::Message::Response(response));
    }

    /// Handle the textDocument/completion request.
    fn handle_completion_request(
        &self,
        req: lsp_server::Request,
    ) -> Result<serde_json::Value, String> {
        let params: CompletionParams =
            serde_json::from_value(req.params).map_err(|e| e.to_string())?;

        let Some(engine) = &self.engine else {
            return Ok(serde_json::Value::Null);
        };

        let uri = &params.text_document_position.text_document.uri;
        let Some((path, text, language_id)) = self.document_for(uri) else {
            return Ok(serde_json::Value::Null);
        };

        let response = handle_completion(engine, &params, &path, &text, &language_id);

        serde_json::to_value(response).map_err(|e| e.to_string())
    }

    /// Handle the textDocument/definition request.
    fn handle_goto_definition_request(
        &self,
        req: lsp_server::Request,
    ) -> Result<serde_json::Value, String> {
        let params: GotoDefinitionParams =
            serde_json::from_value(req.params).map_err(|e| e.to_string())?;

        let Some(engine) = &self.engine else {
            return Ok(serde_json::Value::Null);
        };

        let uri = &params.text_document_position_params.text_document.uri;
        let Some((path, text, language_id)) = self.document_for(uri) else {
            return Ok(serde_json::Value::Null);
        };

        let response = handle_goto_definition(engine, &params, &path, &text, &language_id);

        serde_json::to_value(response).map_err(|e| e.to_string())
    }

    /// Handle an LSP notification (no response expected).
    fn handle_notification(&mut self, notif: lsp_server::Notification) {
        match notif.method.as_str() {
            DidOpenTextDocument::METHOD => {
                if let Ok(params) =
                    serde_json::from_value::<lsp_types::DidOpenTextDocumentParams>(notif.params)
                {
                    self.on_did_open(params);
                }
            }
            DidChangeTextDocument::METHOD => {
                if let Ok(params) =
                    serde_json::from_value::<lsp_types::DidChangeTextDocumentParams>(notif.params)
                {
                    self.on_did_change(params);
                }
            }
            DidCloseTextDocument::METHOD => {
                if let Ok(params) =
                    serde_json::from_value::<lsp_types::DidCloseTextDocumentParams>(notif.params)
                {
                    self.on_did_close(params);
                }
            }
            "initialized" => {
                tracing::info!("Client initialized");
            }
            "exit" => {
                tracing::info!("Exit notification received");
                std::process::exit(i32::from(!self.shutdown_requested));
            }
            _ => {
                tracing::debug!("Unhandled notification: {}", notif.method);
            }
        }
    }

    /// Handle textDocument/didOpen notification.
    fn on_did_open(&mut self, params: lsp_types::DidOpenTextDocumentParams) {
        let doc = params.text_document;
        tracing::info!("Document opened: {}", doc.uri.as_str());

        if let Some(path) = uri_to_path(&doc.uri) {
            self.vfs
                .write()
                .open(path, doc.text, doc.version, doc.language_id);
        }
    }

    /// Handle textDocument/didChange notification.
    fn on_did_change(&mut self, params: lsp_types::DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // For full sync, the last change carries the full content.
        if let Some(change) = params.content_changes.into_iter().last() {
            tracing::debug!("Document changed: {}", uri.as_str());
            if let Some(path) = uri_to_path(&uri) {
                self.vfs.write().update(&path, change.text, version);
            }
        }
    }

    /// Handle textDocument/didClose notification.
    fn on_did_close(&mut self, params: lsp_types::DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::info!("Document closed: {}", uri.as_str());

        if let Some(path) = uri_to_path(&uri) {
            self.vfs.write().close(&path);
        }
    }

    /// Send a message to the client.
    fn send(&self, msg: lsp_server::Message) {
        if let Err(e) = self.sender.send(msg) {
            tracing::error!("Failed to send message: {}", e);
        }
    }
}

/// Run the main event loop.
pub fn run_main_loop(
    receiver: Receiver<lsp_server::Message>,
    sender: Sender<lsp_server::Message>,
    engine: Option<Arc<Engine>>,
) {
    let mut state = MainLoopState::new(sender, engine);

    tracing::info!("Main loop started");

    for msg in receiver {
        match msg {
            lsp_server::Message::Request(req) => state.handle_request(req),
            lsp_server::Message::Notification(notif) => state.handle_notification(notif),
            lsp_server::Message::Response(_) => {
                // We don't currently send requests to the client.
            }
        }
    }

    tracing::info!("Main loop ended");
}
