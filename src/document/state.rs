//! Open dump-log documents.

use std::sync::Arc;

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

use super::text::LineIndex;

/// State for a single document.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Line access for the fold classifier.
    pub line_index: LineIndex,
    /// Document version from the client.
    pub version: i32,
}

impl DocumentState {
    pub fn new(source: String, version: i32) -> Self {
        Self {
            line_index: LineIndex::new(source),
            version,
        }
    }
}

/// Thread-safe storage for open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Arc<DocumentState>>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Open a document, replacing any previous state for the URI.
    pub fn open(&self, uri: Url, source: String, version: i32) -> Arc<DocumentState> {
        let state = Arc::new(DocumentState::new(source, version));
        self.documents.insert(uri, Arc::clone(&state));
        state
    }

    /// Replace the text of an open document.
    ///
    /// Returns `None` if the document was never opened here.
    pub fn update(&self, uri: &Url, source: String, version: i32) -> Option<Arc<DocumentState>> {
        let mut entry = self.documents.get_mut(uri)?;
        let state = Arc::new(DocumentState::new(source, version));
        *entry = Arc::clone(&state);
        Some(state)
    }

    /// Close a document.
    pub fn close(&self, uri: &Url) -> Option<Arc<DocumentState>> {
        self.documents.remove(uri).map(|(_, state)| state)
    }

    /// Get a document's state.
    pub fn get(&self, uri: &Url) -> Option<Arc<DocumentState>> {
        self.documents.get(uri).map(|r| Arc::clone(&r))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
