//! Persistence bridge
//!
//! Serializes the document tree to a generic string key-value store under a
//! single key. Load failures are recoverable: malformed stored state is
//! reported as an error and never replaces the live document.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::document::Node;

/// Store key holding the serialized document.
pub const DOC_KEY: &str = "editorContent";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("stored document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A string key-value store with get/set semantics.
pub trait StringStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory store, the process-wide single shared slot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StringStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.slots.insert(key.to_string(), value);
    }
}

/// Serialize the document into the store.
pub fn save(store: &mut dyn StringStore, doc: &Node) -> Result<(), PersistError> {
    let json = serde_json::to_string(doc)?;
    debug!(bytes = json.len(), "document saved");
    store.set(DOC_KEY, json);
    Ok(())
}

/// Load the document from the store. `Ok(None)` when nothing is stored.
pub fn load(store: &dyn StringStore) -> Result<Option<Node>, PersistError> {
    match store.get(DOC_KEY) {
        None => Ok(None),
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> Node {
        Node::doc(vec![Node::paragraph(vec![
            Node::text("Dear "),
            Node::variable(Some("name"), "{{name}}"),
            Node::text("\u{a0}, hello"),
        ])])
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = MemoryStore::new();
        let doc = sample_doc();
        save(&mut store, &doc).unwrap();
        let loaded = load(&store).unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::new();
        assert!(load(&store).unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_state() {
        let mut store = MemoryStore::new();
        store.set(DOC_KEY, "{not json".to_string());
        assert!(matches!(load(&store), Err(PersistError::Malformed(_))));
    }

    #[test]
    fn test_persistence_idempotence() {
        let mut store = MemoryStore::new();
        let doc = sample_doc();
        save(&mut store, &doc).unwrap();

        // load → dump → save → load must reproduce an attribute-equal tree
        let first = load(&store).unwrap().unwrap();
        save(&mut store, &first).unwrap();
        let second = load(&store).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(second, doc);
    }

    #[test]
    fn test_empty_document_round_trips() {
        let mut store = MemoryStore::new();
        let doc = Node::doc(vec![Node::paragraph(vec![])]);
        save(&mut store, &doc).unwrap();
        assert_eq!(load(&store).unwrap().unwrap(), doc);
    }

    #[test]
    fn test_dangling_id_round_trips() {
        // A token whose id no longer matches any catalog entry still
        // round-trips on its captured value.
        let mut store = MemoryStore::new();
        let doc = Node::doc(vec![Node::paragraph(vec![Node::variable(
            Some("retired"),
            "{{retired}}",
        )])]);
        save(&mut store, &doc).unwrap();
        assert_eq!(load(&store).unwrap().unwrap(), doc);
    }
}
