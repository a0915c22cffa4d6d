//! Language Server Protocol adapter for the clangine completion engine.
//!
//! Exposes the engine's completion and go-to-definition over LSP:
//! - **Main loop**: handles LSP messages, applies document changes
//!   synchronously, dispatches requests to the engine
//! - **VFS**: in-memory state of open documents; completion always runs
//!   against the unsaved buffer
//! - **Handlers**: translate between LSP positions/items and engine
//!   requests/results
//!
//! The crate is a library: the embedder supplies the compiler front-end
//! (anything implementing [`clangine_engine::Frontend`]) and calls
//! [`start_stdio`] from its own binary.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     clangine_lsp::init_logging();
//!     let frontend = Arc::new(MyLibclangFrontend::load()?);
//!     clangine_lsp::start_stdio(frontend)
//! }
//! ```

pub mod handlers;
pub mod main_loop;

mod server;
mod vfs;

pub use main_loop::run_main_loop;
pub use server::{Server, init_logging, start_stdio};
pub use vfs::Vfs;

/// LSP server version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
