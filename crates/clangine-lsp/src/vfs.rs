//! Virtual File System for document management.
//!
//! The VFS maintains the in-memory state of all open documents. Every
//! engine request reads the buffer from here, never from disk.

use ropey::Rope;
use std::collections::HashMap;
use std::path::PathBuf;

/// A document in the virtual file system.
#[derive(Debug)]
pub struct Document {
    /// The document content as a rope for efficient editing.
    content: Rope,
    /// The document version (incremented on each change).
    version: i32,
    /// The language id the client opened the document with (`c`, `cpp`,
    /// `objective-c`, `objective-cpp`).
    language_id: String,
}

impl Document {
    /// Create a new document with the given content.
    pub fn new(content: String, version: i32, language_id: String) -> Self {
        Self {
            content: Rope::from_str(&content),
            version,
            language_id,
        }
    }

    /// Get the document content as a string.
    pub fn text(&self) -> String {
        self.content.to_string()
    }

    /// Get the document version.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// The client's language id for this document.
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Update the document content. The language id is fixed at open.
    pub fn update(&mut self, content: String, version: i32) {
        self.content = Rope::from_str(&content);
        self.version = version;
    }
}

/// Virtual file system for managing open documents.
#[derive(Debug, Default)]
pub struct Vfs {
    /// Open documents indexed by path.
    documents: HashMap<PathBuf, Document>,
}

impl Vfs {
    /// Create a new empty VFS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document in the VFS.
    pub fn open(&mut self, path: PathBuf, content: String, version: i32, language_id: String) {
        self.documents
            .insert(path, Document::new(content, version, language_id));
    }

    /// Close a document in the VFS.
    pub fn close(&mut self, path: &PathBuf) {
        self.documents.remove(path);
    }

    /// Get a document by path.
    pub fn get(&self, path: &PathBuf) -> Option<&Document> {
        self.documents.get(path)
    }

    /// Get document content as a string.
    pub fn get_content(&self, path: &PathBuf) -> Option<String> {
        self.documents.get(path).map(Document::text)
    }

    /// Update a document's content.
    pub fn update(&mut self, path: &PathBuf, content: String, version: i32) {
        if let Some(doc) = self.documents.get_mut(path) {
            doc.update(content, version);
        }
    }

    /// Get all open document paths.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.documents.keys()
    }
}
