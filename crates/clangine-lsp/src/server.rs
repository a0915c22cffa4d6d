//! Main LSP server implementation.

use crate::main_loop::run_main_loop;
use clangine_engine::{Config, Engine, Frontend};
use lsp_server::Connection;
use lsp_types::InitializeParams;
use std::sync::Arc;

/// The LSP server.
pub struct Server {
    /// Connection to the LSP client.
    connection: Connection,
    /// Initialize parameters from client.
    init_params: InitializeParams,
    /// The engine, or `None` when configuration failed.
    engine: Option<Arc<Engine>>,
}

impl Server {
    /// Create a new LSP server from a connection.
    pub fn new(
        connection: Connection,
        init_params: InitializeParams,
        engine: Option<Arc<Engine>>,
    ) -> Self {
        Self {
            connection,
            init_params,
            engine,
        }
    }

    /// Run the server's main loop.
    pub fn run(self) {
        tracing::info!("Starting clangine language server v{}", crate::VERSION);

        if let Some(folders) = &self.init_params.workspace_folders {
            if let Some(folder) = folders.first() {
                tracing::info!("Workspace root: {}", folder.uri.as_str());
            }
        }

        let (sender, receiver) = (self.connection.sender, self.connection.receiver);
        run_main_loop(receiver, sender, self.engine);

        tracing::info!("Server shutdown complete");
    }
}

/// Initialize logging to stderr; stdout carries the LSP channel.
///
/// The filter is read from `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Start the LSP server using stdio transport.
///
/// The embedder supplies the compiler front-end. Engine configuration is
/// read from the client's `initializationOptions`; a configuration that
/// cannot be honored (broken compilation database) disables analysis but
/// keeps the server responsive, so the client sees the error instead of a
/// dead process.
pub fn start_stdio(
    frontend: Arc<dyn Frontend>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("Starting LSP server on stdio");

    let (connection, io_threads) = Connection::stdio();

    // Wait for initialize request
    let (id, params) = connection.initialize_start()?;
    let init_params: InitializeParams = serde_json::from_value(params)?;

    let config = match &init_params.initialization_options {
        Some(options) => match serde_json::from_value::<Config>(options.clone()) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "invalid initializationOptions; using defaults");
                Config::default()
            }
        },
        None => Config::default(),
    };

    let engine = match Engine::new(frontend, &config) {
        Ok(engine) => Some(Arc::new(engine)),
        Err(err) => {
            tracing::error!(error = %err, "engine initialization failed; analysis disabled");
            None
        }
    };

    // Build server capabilities
    let capabilities = lsp_types::ServerCapabilities {
        text_document_sync: Some(lsp_types::TextDocumentSyncCapability::Kind(
            lsp_types::TextDocumentSyncKind::FULL,
        )),
        completion_provider: Some(lsp_types::CompletionOptions {
            trigger_characters: Some(vec![
                ".".to_string(), // Member access
                ">".to_string(), // Arrow (a->b)
                ":".to_string(), // Scope (a::b)
            ]),
            ..Default::default()
        }),
        definition_provider: Some(lsp_types::OneOf::Left(true)),
        ..Default::default()
    };

    let server_info = lsp_types::ServerInfo {
        name: "clangine-lsp".to_string(),
        version: Some(crate::VERSION.to_string()),
    };

    let init_result = lsp_types::InitializeResult {
        capabilities,
        server_info: Some(server_info),
    };

    // Complete initialization handshake
    connection.initialize_finish(id, serde_json::to_value(init_result)?)?;

    tracing::info!("LSP initialized successfully");

    let server = Server::new(connection, init_params, engine);
    server.run();

    // Wait for IO threads to finish
    io_threads.join()?;

    Ok(())
}
