//! Markup rendering and parsing
//!
//! The token's wire form is fixed:
//! `<span class="mention" data-id="{id}" contenteditable="false">{value}</span>`
//! followed by a non-breaking-space separator in the document text. Parsing
//! accepts any `span` element whose class list contains `mention`, reading
//! `id` from `data-id` and `value` from the element's text content. Render
//! and parse are exact inverses over the attribute set.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::document::{normalize_inline, Node, VariableAttrs};

/// Separator inserted after every committed token.
pub const SEPARATOR: char = '\u{a0}';

lazy_static! {
    static ref SPAN_RE: Regex = Regex::new(r"<span\b([^>]*)>([^<]*)</span>").unwrap();
    static ref CLASS_RE: Regex = Regex::new(r#"class="([^"]*)""#).unwrap();
    static ref DATA_ID_RE: Regex = Regex::new(r#"data-id="([^"]*)""#).unwrap();
    static ref P_RE: Regex = Regex::new(r"(?s)<p>(.*?)</p>").unwrap();
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            SEPARATOR => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&nbsp;", "\u{a0}")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Render a variable token to its markup form.
pub fn render_token(attrs: &VariableAttrs) -> String {
    match &attrs.id {
        Some(id) => format!(
            r#"<span class="mention" data-id="{}" contenteditable="false">{}</span>"#,
            escape(id),
            escape(&attrs.value)
        ),
        None => format!(
            r#"<span class="mention" contenteditable="false">{}</span>"#,
            escape(&attrs.value)
        ),
    }
}

/// Extract token attributes from a span element's attribute list and text
/// content, if its class list contains `mention`.
fn span_attrs(caps: &Captures) -> Option<VariableAttrs> {
    let attr_text = caps.get(1).map_or("", |m| m.as_str());
    let classes = CLASS_RE.captures(attr_text)?;
    if !classes[1].split_whitespace().any(|c| c == "mention") {
        return None;
    }
    let id = DATA_ID_RE
        .captures(attr_text)
        .map(|c| unescape(&c[1]));
    let value = unescape(caps.get(2).map_or("", |m| m.as_str()));
    Some(VariableAttrs { id, value })
}

/// Parse a single token element. Returns `None` unless the whole input is one
/// recognized `span.mention` element.
pub fn parse_token(markup: &str) -> Option<VariableAttrs> {
    let caps = SPAN_RE.captures(markup)?;
    if caps.get(0)?.as_str() != markup {
        return None;
    }
    span_attrs(&caps)
}

fn push_text(out: &mut Vec<Node>, raw: &str) {
    let stripped = TAG_RE.replace_all(raw, "");
    let text = unescape(&stripped);
    if !text.is_empty() {
        out.push(Node::text(text));
    }
}

/// Parse a stretch of inline markup into text runs and variable tokens.
/// Unrecognized tags are stripped; span elements without the `mention` class
/// contribute their text content only.
pub fn parse_inline(markup: &str) -> Vec<Node> {
    let mut out = Vec::new();
    let mut last = 0usize;
    for caps in SPAN_RE.captures_iter(markup) {
        let whole = caps.get(0).unwrap();
        push_text(&mut out, &markup[last..whole.start()]);
        match span_attrs(&caps) {
            Some(attrs) => out.push(Node::Variable { attrs }),
            None => push_text(&mut out, caps.get(2).map_or("", |m| m.as_str())),
        }
        last = whole.end();
    }
    push_text(&mut out, &markup[last..]);
    normalize_inline(out)
}

fn render_inline(content: &[Node]) -> String {
    let mut out = String::new();
    for node in content {
        match node {
            Node::Text { text } => out.push_str(&escape(text)),
            Node::Variable { attrs } => out.push_str(&render_token(attrs)),
            other => out.push_str(&render_doc(other)),
        }
    }
    out
}

/// Render a document tree to markup.
pub fn render_doc(node: &Node) -> String {
    match node {
        Node::Doc { content } => content.iter().map(render_doc).collect(),
        Node::Paragraph { content } => format!("<p>{}</p>", render_inline(content)),
        Node::Text { text } => escape(text),
        Node::Variable { attrs } => render_token(attrs),
    }
}

/// Parse markup into a document tree. Input without `<p>` elements is treated
/// as a single paragraph; non-whitespace content found between `<p>` elements
/// becomes a paragraph of its own rather than being dropped.
pub fn parse_doc(markup: &str) -> Node {
    let mut blocks = Vec::new();
    let mut last = 0usize;
    for caps in P_RE.captures_iter(markup) {
        let whole = caps.get(0).unwrap();
        push_stray(&mut blocks, &markup[last..whole.start()]);
        blocks.push(Node::paragraph(parse_inline(&caps[1])));
        last = whole.end();
    }
    push_stray(&mut blocks, &markup[last..]);
    if blocks.is_empty() {
        blocks.push(Node::paragraph(parse_inline(markup)));
    }
    Node::doc(blocks)
}

fn push_stray(blocks: &mut Vec<Node>, raw: &str) {
    if raw.trim().is_empty() {
        return;
    }
    blocks.push(Node::paragraph(parse_inline(raw)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(id: Option<&str>, value: &str) -> VariableAttrs {
        VariableAttrs {
            id: id.map(|s| s.to_string()),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_render_token_markup() {
        let markup = render_token(&attrs(Some("name"), "{{name}}"));
        assert_eq!(
            markup,
            r#"<span class="mention" data-id="name" contenteditable="false">{{name}}</span>"#
        );
    }

    #[test]
    fn test_round_trip_law() {
        let cases = vec![
            attrs(Some("name"), "{{name}}"),
            attrs(Some("email"), "{{email}}"),
            attrs(None, ""),
            attrs(None, "plain value"),
            attrs(Some("odd id"), "a < b & c > \"d\""),
        ];
        for a in cases {
            let parsed = parse_token(&render_token(&a)).unwrap();
            assert_eq!(parsed, a);
        }
    }

    #[test]
    fn test_parse_accepts_extra_classes() {
        let markup = r#"<span class="mention bg-blue-100 rounded" data-id="name">{{name}}</span>"#;
        let parsed = parse_token(markup).unwrap();
        assert_eq!(parsed, attrs(Some("name"), "{{name}}"));
    }

    #[test]
    fn test_parse_rejects_non_mention_span() {
        let markup = r#"<span class="highlight">hello</span>"#;
        assert!(parse_token(markup).is_none());
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        let markup = r#"<span class="mention">v</span>extra"#;
        assert!(parse_token(markup).is_none());
    }

    #[test]
    fn test_parse_inline_mixed() {
        let markup = concat!(
            "Hello ",
            r#"<span class="mention" data-id="name" contenteditable="false">{{name}}</span>"#,
            "&nbsp;world"
        );
        let nodes = parse_inline(markup);
        assert_eq!(
            nodes,
            vec![
                Node::text("Hello "),
                Node::variable(Some("name"), "{{name}}"),
                Node::text("\u{a0}world"),
            ]
        );
    }

    #[test]
    fn test_parse_inline_strips_unknown_tags() {
        let nodes = parse_inline("Type <strong>{</strong> to insert");
        assert_eq!(nodes, vec![Node::text("Type { to insert")]);
    }

    #[test]
    fn test_parse_inline_plain_span_becomes_text() {
        let nodes = parse_inline(r#"a <span class="x">b</span> c"#);
        assert_eq!(nodes, vec![Node::text("a b c")]);
    }

    #[test]
    fn test_doc_round_trip() {
        let doc = Node::doc(vec![
            Node::paragraph(vec![
                Node::text("Dear "),
                Node::variable(Some("name"), "{{name}}"),
                Node::text("\u{a0},"),
            ]),
            Node::paragraph(vec![Node::text("regards")]),
        ]);
        let markup = render_doc(&doc);
        assert_eq!(parse_doc(&markup), doc);
    }

    #[test]
    fn test_parse_doc_keeps_stray_text_between_paragraphs() {
        let doc = parse_doc("intro<p>a</p>between<p>b</p>tail");
        assert_eq!(
            doc,
            Node::doc(vec![
                Node::paragraph(vec![Node::text("intro")]),
                Node::paragraph(vec![Node::text("a")]),
                Node::paragraph(vec![Node::text("between")]),
                Node::paragraph(vec![Node::text("b")]),
                Node::paragraph(vec![Node::text("tail")]),
            ])
        );
    }

    #[test]
    fn test_parse_doc_ignores_whitespace_between_paragraphs() {
        let doc = parse_doc("<p>a</p>\n  <p>b</p>\n");
        assert_eq!(
            doc,
            Node::doc(vec![
                Node::paragraph(vec![Node::text("a")]),
                Node::paragraph(vec![Node::text("b")]),
            ])
        );
    }

    #[test]
    fn test_parse_doc_without_paragraphs() {
        let doc = parse_doc("just text");
        assert_eq!(doc, Node::doc(vec![Node::paragraph(vec![Node::text("just text")])]));
    }

    #[test]
    fn test_escape_round_trip() {
        let text = "a < b & \"c\" >\u{a0}d";
        assert_eq!(unescape(&escape(text)), text);
    }
}
