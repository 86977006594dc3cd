//! Trigger detection
//!
//! Scans the text immediately before the caret for an open trigger span: the
//! trigger character followed by the query typed so far. The span must not
//! contain whitespace, and an atomic node between the trigger and the caret
//! breaks it (callers pass only the contiguous text run before the caret).

/// Character that opens a suggestion session.
pub const TRIGGER_CHAR: char = '{';

/// An active trigger span ending at the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSpan {
    /// Position of the trigger character
    pub from: usize,
    /// Position of the caret (one past the last query character)
    pub to: usize,
    /// Text typed since the trigger character
    pub query: String,
}

/// Find a trigger span in the text run ending at the caret.
///
/// `text` is the contiguous text immediately before the caret and `run_start`
/// is the document position of its first character. Returns the innermost
/// span when several trigger characters are present.
pub fn find_trigger(text: &str, run_start: usize) -> Option<TriggerSpan> {
    for (byte_idx, ch) in text.char_indices().rev() {
        if ch.is_whitespace() {
            return None;
        }
        if ch == TRIGGER_CHAR {
            let from = run_start + text[..byte_idx].chars().count();
            let query = text[byte_idx + TRIGGER_CHAR.len_utf8()..].to_string();
            let to = from + 1 + query.chars().count();
            return Some(TriggerSpan { from, to, query });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_trigger() {
        let span = find_trigger("{", 0).unwrap();
        assert_eq!(span.from, 0);
        assert_eq!(span.to, 1);
        assert_eq!(span.query, "");
    }

    #[test]
    fn test_trigger_with_query() {
        let span = find_trigger("Dear {na", 0).unwrap();
        assert_eq!(span.from, 5);
        assert_eq!(span.to, 8);
        assert_eq!(span.query, "na");
    }

    #[test]
    fn test_run_start_offsets_positions() {
        let span = find_trigger("{em", 10).unwrap();
        assert_eq!(span.from, 10);
        assert_eq!(span.to, 13);
    }

    #[test]
    fn test_whitespace_breaks_span() {
        assert!(find_trigger("{a b", 0).is_none());
        assert!(find_trigger("{ ", 0).is_none());
    }

    #[test]
    fn test_space_before_trigger_is_allowed() {
        let span = find_trigger("hello {x", 0).unwrap();
        assert_eq!(span.from, 6);
        assert_eq!(span.query, "x");
    }

    #[test]
    fn test_innermost_trigger_wins() {
        let span = find_trigger("{a{b", 0).unwrap();
        assert_eq!(span.from, 2);
        assert_eq!(span.query, "b");
    }

    #[test]
    fn test_no_trigger() {
        assert!(find_trigger("plain text", 0).is_none());
        assert!(find_trigger("", 0).is_none());
    }

    #[test]
    fn test_multibyte_text_positions() {
        let span = find_trigger("héllo {é", 0).unwrap();
        assert_eq!(span.from, 6);
        assert_eq!(span.to, 8);
        assert_eq!(span.query, "é");
    }
}
