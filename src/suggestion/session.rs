//! Suggestion session state machine
//!
//! One session object per editor, either closed or open. While open it tracks
//! the live query, the caret anchor rectangle for popup placement, and the
//! highlighted candidate index. Navigation wraps modulo the candidate count;
//! the count is guarded so an empty list never divides by zero.

use crossterm::event::KeyCode;
use tracing::debug;

/// Screen-space rectangle of the caret, used to anchor the suggestion popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Disposition of a key event offered to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Consumed by the session; no further handling
    Consumed,
    /// Commit the highlighted candidate, then close
    Commit,
    /// Not the session's concern; route to normal text input
    PassThrough,
}

/// Ephemeral suggestion state. At most one session is open at a time.
#[derive(Debug, Clone, Default)]
pub struct Session {
    open: bool,
    query: String,
    anchor: AnchorRect,
    highlighted: usize,
    block: usize,
    span_from: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn anchor(&self) -> AnchorRect {
        self.anchor
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Block holding the trigger span
    pub fn block(&self) -> usize {
        self.block
    }

    /// Inline position of the trigger character within its block
    pub fn span_from(&self) -> usize {
        self.span_from
    }

    /// Whether an open session's trigger span is the one at `(block, span_from)`.
    /// Both components matter: equal inline offsets in different blocks are
    /// distinct spans.
    pub fn is_at(&self, block: usize, span_from: usize) -> bool {
        self.open && self.block == block && self.span_from == span_from
    }

    /// Open a session at a freshly detected trigger.
    pub fn open(&mut self, block: usize, span_from: usize, query: &str, anchor: AnchorRect) {
        self.open = true;
        self.block = block;
        self.span_from = span_from;
        self.query = query.to_string();
        self.anchor = anchor;
        self.highlighted = 0;
        debug!(block, span_from, query, "suggestion session opened");
    }

    /// Refresh the query and anchor while the session stays open. The
    /// highlighted index is kept and clamped separately once the new
    /// candidate count is known.
    pub fn update(&mut self, query: &str, anchor: AnchorRect) {
        self.query = query.to_string();
        self.anchor = anchor;
    }

    /// Keep `highlighted` a valid index into the current candidate list.
    pub fn clamp_highlight(&mut self, count: usize) {
        if count == 0 {
            self.highlighted = 0;
        } else if self.highlighted >= count {
            self.highlighted = count - 1;
        }
    }

    pub fn close(&mut self) {
        if self.open {
            debug!("suggestion session closed");
        }
        self.open = false;
        self.query.clear();
        self.highlighted = 0;
    }

    /// Advance the highlight, wrapping past the end. Count may be zero.
    pub fn next(&mut self, count: usize) {
        self.highlighted = (self.highlighted + 1) % count.max(1);
    }

    /// Retreat the highlight, wrapping past the start. Count may be zero.
    pub fn previous(&mut self, count: usize) {
        let n = count.max(1);
        self.highlighted = (self.highlighted + n - 1) % n;
    }

    /// Offer a key event to the session. Arrow keys navigate and are
    /// consumed; Enter requests a commit; everything else passes through.
    /// A closed session passes everything through.
    pub fn handle_key(&mut self, key: KeyCode, candidate_count: usize) -> KeyOutcome {
        if !self.open {
            return KeyOutcome::PassThrough;
        }
        match key {
            KeyCode::Down => {
                self.next(candidate_count);
                KeyOutcome::Consumed
            }
            KeyCode::Up => {
                self.previous(candidate_count);
                KeyOutcome::Consumed
            }
            KeyCode::Enter => KeyOutcome::Commit,
            _ => KeyOutcome::PassThrough,
        }
    }
}
