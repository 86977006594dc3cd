//! # Varspan - Inline Variable Tokens for Rich-Text Documents
//!
//! Varspan is the core of an in-document "variable token" authoring feature:
//! typing a trigger character opens a filtered suggestion session, keyboard
//! or pointer commit atomically replaces the typed span with an opaque inline
//! token, and tokens round-trip through markup and a string store.
//!
//! ## Quick Start
//!
//! ```rust
//! use crossterm::event::KeyCode;
//! use varspan::{Editor, VariableCatalog};
//!
//! let mut editor = Editor::new(VariableCatalog::default());
//! for c in "Dear {na".chars() {
//!     editor.handle_key(KeyCode::Char(c));
//! }
//! assert!(editor.session().is_open());
//! assert_eq!(editor.session().query(), "na");
//!
//! // Commit the highlighted candidate; the trigger span becomes a token.
//! editor.handle_key(KeyCode::Enter);
//! assert!(!editor.session().is_open());
//! assert!(editor.render_markup().contains(r#"data-id="name""#));
//! ```

pub mod catalog;
pub mod document;
pub mod editor;
pub mod markup;
pub mod persist;
pub mod suggestion;

pub use catalog::{Variable, VariableCatalog};
pub use document::{Node, VariableAttrs};
pub use editor::{Caret, CaretLayout, DocumentMutator, EditError, Editor, GridLayout, Range};
pub use persist::{MemoryStore, PersistError, StringStore, DOC_KEY};
pub use suggestion::{filter_candidates, find_trigger, AnchorRect, KeyOutcome, Session, TriggerSpan};
