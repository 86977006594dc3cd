//! Suggestion subsystem for variable tokens
//!
//! Coordinates three pieces:
//! - trigger detection (`{` plus the query typed so far)
//! - the open/closed session state machine with keyboard navigation
//! - catalog filtering by the live query

mod filter;
mod session;
mod trigger;

pub use filter::filter_candidates;
pub use session::{AnchorRect, KeyOutcome, Session};
pub use trigger::{find_trigger, TriggerSpan, TRIGGER_CHAR};
