//! Editor state and commands
//!
//! Owns the document tree, the caret, and the suggestion session, and routes
//! key events between the session and normal text input. All document
//! mutation funnels through `replace_range`, which validates and applies a
//! whole replacement in one step: a rejected mutation leaves the document
//! untouched.

use crossterm::event::KeyCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::{Variable, VariableCatalog};
use crate::document::{self, Node};
use crate::markup;
use crate::persist::{self, PersistError, StringStore};
use crate::suggestion::{filter_candidates, find_trigger, AnchorRect, KeyOutcome, Session};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no active editable context")]
    NoContext,
    #[error("range {from}..{to} out of bounds for block of length {len}")]
    OutOfBounds { from: usize, to: usize, len: usize },
}

/// Caret position: block index plus inline offset in position units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub block: usize,
    pub offset: usize,
}

/// Half-open inline range `[from, to)` within one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub from: usize,
    pub to: usize,
}

/// The mutation entry points used by the insertion machinery. A host binding
/// implements this to route mutations through its own transaction mechanism;
/// [`Editor`] provides the built-in implementation.
pub trait DocumentMutator {
    fn replace_range(&mut self, block: usize, range: Range, nodes: Vec<Node>)
        -> Result<(), EditError>;
    fn select(&mut self, block: usize, range: Range);
}

/// Maps a caret to the screen-space rectangle that anchors the suggestion
/// popup. Positioning math is the embedder's business; the default is a
/// fixed-pitch grid.
pub trait CaretLayout {
    fn caret_rect(&self, caret: Caret) -> AnchorRect;
}

/// Fixed-pitch fallback layout: one cell per position unit, one row per block.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub cell_width: u16,
    pub line_height: u16,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: 8,
            line_height: 16,
        }
    }
}

impl CaretLayout for GridLayout {
    fn caret_rect(&self, caret: Caret) -> AnchorRect {
        let col = u16::try_from(caret.offset).unwrap_or(u16::MAX);
        let row = u16::try_from(caret.block).unwrap_or(u16::MAX);
        AnchorRect {
            x: col.saturating_mul(self.cell_width),
            y: row.saturating_mul(self.line_height),
            width: self.cell_width,
            height: self.line_height,
        }
    }
}

/// A rich-text editor core with variable-token support.
pub struct Editor {
    doc: Node,
    caret: Caret,
    selection: Option<Range>,
    session: Session,
    catalog: VariableCatalog,
    layout: Box<dyn CaretLayout>,
}

impl Editor {
    pub fn new(catalog: VariableCatalog) -> Self {
        Self::with_doc(catalog, Node::doc(vec![Node::paragraph(vec![])]))
    }

    pub fn with_doc(catalog: VariableCatalog, doc: Node) -> Self {
        Self {
            doc,
            caret: Caret { block: 0, offset: 0 },
            selection: None,
            session: Session::new(),
            catalog,
            layout: Box::new(GridLayout::default()),
        }
    }

    pub fn with_layout(mut self, layout: Box<dyn CaretLayout>) -> Self {
        self.layout = layout;
        self
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Catalog entries matching the live query, in catalog order. Empty when
    /// no session is open.
    pub fn candidates(&self) -> Vec<&Variable> {
        if !self.session.is_open() {
            return Vec::new();
        }
        filter_candidates(self.session.query(), &self.catalog)
    }

    /// Render the whole document to markup.
    pub fn render_markup(&self) -> String {
        markup::render_doc(&self.doc)
    }

    /// Replace the document wholesale from markup, resetting caret, selection,
    /// and session.
    pub fn set_content_markup(&mut self, markup: &str) {
        self.doc = markup::parse_doc(markup);
        self.caret = Caret { block: 0, offset: 0 };
        self.selection = None;
        self.session.close();
    }

    /// Offer a key event to the editor. Returns whether the suggestion layer
    /// consumed it; pass-through keys are applied as normal text input.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let count = self.candidates().len();
        match self.session.handle_key(key, count) {
            KeyOutcome::Consumed => true,
            KeyOutcome::Commit => {
                if let Err(err) = self.commit_highlighted() {
                    debug!(%err, "commit failed");
                }
                true
            }
            KeyOutcome::PassThrough => {
                self.apply_key(key);
                false
            }
        }
    }

    fn apply_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                if let Err(err) = self.insert_text(&c.to_string()) {
                    debug!(%err, "text insert rejected");
                }
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Enter => self.split_block(),
            KeyCode::Left => self.move_caret(-1),
            KeyCode::Right => self.move_caret(1),
            KeyCode::Up => self.move_caret_block(-1),
            KeyCode::Down => self.move_caret_block(1),
            _ => {}
        }
    }

    /// Insert text at the caret, replacing any active selection.
    pub fn insert_text(&mut self, text: &str) -> Result<(), EditError> {
        let block = self.caret.block;
        let range = self.selection.take().unwrap_or(Range {
            from: self.caret.offset,
            to: self.caret.offset,
        });
        self.replace_range(block, range, vec![Node::text(text)])?;
        self.caret.offset = range.from + text.chars().count();
        self.sync_session();
        Ok(())
    }

    fn backspace(&mut self) {
        let range = match self.selection.take() {
            Some(sel) => sel,
            None if self.caret.offset > 0 => Range {
                from: self.caret.offset - 1,
                to: self.caret.offset,
            },
            None => return,
        };
        let block = self.caret.block;
        if self.replace_range(block, range, vec![]).is_ok() {
            self.caret.offset = range.from;
        }
        self.sync_session();
    }

    fn split_block(&mut self) {
        let content: Vec<Node> = match self.doc.blocks().get(self.caret.block) {
            Some(block) => block.inline().to_vec(),
            None => return,
        };
        let len = document::inline_len(&content);
        let before = document::splice(&content, self.caret.offset, len, vec![]);
        let after = document::splice(&content, 0, self.caret.offset, vec![]);
        let idx = self.caret.block;
        let blocks = self.doc.blocks_mut();
        blocks[idx] = Node::paragraph(before);
        blocks.insert(idx + 1, Node::paragraph(after));
        self.caret = Caret {
            block: idx + 1,
            offset: 0,
        };
        self.selection = None;
        self.sync_session();
    }

    fn move_caret(&mut self, delta: isize) {
        let len = self.current_len();
        let offset = self.caret.offset as isize + delta;
        self.caret.offset = offset.clamp(0, len as isize) as usize;
        self.selection = None;
        self.sync_session();
    }

    fn move_caret_block(&mut self, delta: isize) {
        let blocks = self.doc.blocks().len();
        if blocks == 0 {
            return;
        }
        let block = (self.caret.block as isize + delta).clamp(0, blocks as isize - 1) as usize;
        self.caret.block = block;
        self.caret.offset = self.caret.offset.min(self.current_len());
        self.selection = None;
        self.sync_session();
    }

    /// Place the caret, clamped to valid positions. Atomic nodes occupy a
    /// single position unit, so a caret can never land inside one.
    pub fn set_caret(&mut self, caret: Caret) {
        let blocks = self.doc.blocks().len();
        self.caret.block = caret.block.min(blocks.saturating_sub(1));
        self.caret.offset = caret.offset.min(self.current_len());
        self.selection = None;
        self.sync_session();
    }

    fn current_len(&self) -> usize {
        self.doc
            .blocks()
            .get(self.caret.block)
            .map(|b| document::inline_len(b.inline()))
            .unwrap_or(0)
    }

    /// Re-derive the session from the text before the caret: open on a fresh
    /// trigger, update while the span persists, close when the caret leaves
    /// it. The session object is the single authority for suggestion state.
    fn sync_session(&mut self) {
        let trigger = self.doc.blocks().get(self.caret.block).and_then(|block| {
            let (run_start, run) = document::text_before(block.inline(), self.caret.offset);
            find_trigger(&run, run_start)
        });

        match trigger {
            Some(span) => {
                let anchor = self.layout.caret_rect(self.caret);
                if self.session.is_at(self.caret.block, span.from) {
                    self.session.update(&span.query, anchor);
                } else {
                    self.session.close();
                    self.session
                        .open(self.caret.block, span.from, &span.query, anchor);
                }
                let count = self.candidates().len();
                self.session.clamp_highlight(count);
            }
            None => self.session.close(),
        }
    }

    /// Commit the highlighted candidate (keyboard pathway). A no-op with the
    /// session left open when the filtered list is empty.
    pub fn commit_highlighted(&mut self) -> Result<(), EditError> {
        let chosen = self
            .candidates()
            .get(self.session.highlighted())
            .map(|v| (*v).clone());
        match chosen {
            Some(var) => self.commit(&var),
            None => {
                debug!("commit with empty candidate list is a no-op");
                Ok(())
            }
        }
    }

    /// Commit a candidate by id (pointer pathway). Resolves to the same
    /// token insertion as the keyboard pathway.
    pub fn commit_candidate(&mut self, id: &str) -> Result<(), EditError> {
        let var = match self.catalog.find(id) {
            Some(v) => v.clone(),
            None => {
                debug!(id, "unknown candidate id; commit skipped");
                return Ok(());
            }
        };
        self.commit(&var)
    }

    fn commit(&mut self, var: &Variable) -> Result<(), EditError> {
        if !self.session.is_open() {
            // A second commit in the same event turn lands here.
            return Ok(());
        }
        let block = self.caret.block;
        let span = Range {
            from: self.session.span_from(),
            to: self.caret.offset,
        };
        let nodes = vec![
            Node::variable(Some(&var.id), &var.value),
            Node::text(markup::SEPARATOR.to_string()),
        ];
        self.replace_range(block, span, nodes)?;
        self.caret.offset = span.from + 2;
        self.selection = None;
        self.session.close();
        debug!(id = %var.id, "variable token committed");
        Ok(())
    }

    /// Insert a variable token at the current selection, replacing it, and
    /// leave the caret after the token's separator.
    pub fn insert_variable(&mut self, id: Option<&str>, value: &str) -> Result<(), EditError> {
        let block = self.caret.block;
        let range = self.selection.take().unwrap_or(Range {
            from: self.caret.offset,
            to: self.caret.offset,
        });
        let nodes = vec![
            Node::variable(id, value),
            Node::text(markup::SEPARATOR.to_string()),
        ];
        self.replace_range(block, range, nodes)?;
        self.caret.offset = range.from + 2;
        self.session.close();
        Ok(())
    }

    /// Pointer activation at a document position. Clicking a token selects
    /// exactly its span and deletes it in one operation; clicking elsewhere
    /// just places the caret. Returns whether a token was removed.
    pub fn click_at(&mut self, block: usize, offset: usize) -> Result<bool, EditError> {
        let content = self
            .doc
            .blocks()
            .get(block)
            .ok_or(EditError::NoContext)?
            .inline();
        let hit = document::node_at(content, offset)
            .and_then(|(start, node)| node.is_atomic().then_some(start));

        match hit {
            Some(start) => {
                let span = Range {
                    from: start,
                    to: start + 1,
                };
                self.replace_range(block, span, vec![])?;
                self.selection = None;
                self.caret = Caret {
                    block,
                    offset: start,
                };
                self.session.close();
                debug!(position = start, "token removed by pointer");
                Ok(true)
            }
            None => {
                self.set_caret(Caret { block, offset });
                Ok(false)
            }
        }
    }

    /// Save the document tree into the store.
    pub fn save_to(&self, store: &mut dyn StringStore) -> Result<(), PersistError> {
        persist::save(store, &self.doc)
    }

    /// Replace the live document from the store. The current document is
    /// kept untouched when nothing is stored or the stored state is
    /// malformed.
    pub fn load_from(&mut self, store: &dyn StringStore) -> Result<bool, PersistError> {
        match persist::load(store) {
            Ok(Some(doc)) => {
                self.doc = doc;
                self.caret = Caret { block: 0, offset: 0 };
                self.selection = None;
                self.session.close();
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                warn!(%err, "loading stored document failed; keeping current document");
                Err(err)
            }
        }
    }
}

impl DocumentMutator for Editor {
    /// Validate and apply a whole inline replacement in one step.
    fn replace_range(
        &mut self,
        block: usize,
        range: Range,
        nodes: Vec<Node>,
    ) -> Result<(), EditError> {
        let blocks = self.doc.blocks();
        let content = blocks.get(block).ok_or(EditError::NoContext)?.inline();
        let len = document::inline_len(content);
        if range.from > range.to || range.to > len {
            return Err(EditError::OutOfBounds {
                from: range.from,
                to: range.to,
                len,
            });
        }
        let new_content = document::splice(content, range.from, range.to, nodes);
        self.doc.blocks_mut()[block] = Node::paragraph(new_content);
        Ok(())
    }

    fn select(&mut self, block: usize, range: Range) {
        let blocks = self.doc.blocks().len();
        self.caret = Caret {
            block: block.min(blocks.saturating_sub(1)),
            offset: range.to,
        };
        self.selection = Some(range);
        self.sync_session();
    }
}

// Inherent forwarding so callers need not import the trait.
impl Editor {
    pub fn replace_range(
        &mut self,
        block: usize,
        range: Range,
        nodes: Vec<Node>,
    ) -> Result<(), EditError> {
        DocumentMutator::replace_range(self, block, range, nodes)
    }

    pub fn select(&mut self, block: usize, range: Range) {
        DocumentMutator::select(self, block, range)
    }
}
