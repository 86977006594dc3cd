//! Document tree model
//!
//! A small ProseMirror-shaped tree: a `doc` root holding `paragraph` blocks,
//! each holding inline `text` runs and atomic `variable` tokens. Inline
//! positions count one unit per text character and one unit per atomic node,
//! so a token is always addressed as a single indivisible unit.

use serde::{Deserialize, Serialize};

/// Attributes carried by a variable token node.
///
/// `id` references a catalog entry and may be absent (or dangling, if the
/// catalog changed since insertion); `value` is the literal text captured at
/// insertion time and is never re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariableAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub value: String,
}

/// A node in the document tree, serialized as an attribute-tagged tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Doc {
        #[serde(default)]
        content: Vec<Node>,
    },
    Paragraph {
        #[serde(default)]
        content: Vec<Node>,
    },
    Text {
        text: String,
    },
    Variable {
        #[serde(default)]
        attrs: VariableAttrs,
    },
}

impl Node {
    pub fn doc(content: Vec<Node>) -> Node {
        Node::Doc { content }
    }

    pub fn paragraph(content: Vec<Node>) -> Node {
        Node::Paragraph { content }
    }

    pub fn text(text: impl Into<String>) -> Node {
        Node::Text { text: text.into() }
    }

    pub fn variable(id: Option<&str>, value: &str) -> Node {
        Node::Variable {
            attrs: VariableAttrs {
                id: id.map(|s| s.to_string()),
                value: value.to_string(),
            },
        }
    }

    /// Whether this node is an atomic inline leaf (non-splittable, no inline
    /// editing of its content).
    pub fn is_atomic(&self) -> bool {
        matches!(self, Node::Variable { .. })
    }

    /// Inline size in position units: characters for text runs, one unit for
    /// atomic nodes, zero for blocks.
    pub fn size(&self) -> usize {
        match self {
            Node::Text { text } => text.chars().count(),
            Node::Variable { .. } => 1,
            _ => 0,
        }
    }

    /// Child blocks of a `doc` node.
    pub fn blocks(&self) -> &[Node] {
        match self {
            Node::Doc { content } => content,
            _ => &[],
        }
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Node::Doc { content } => content,
            _ => panic!("blocks_mut on non-doc node"),
        }
    }

    /// Inline children of a `paragraph` node.
    pub fn inline(&self) -> &[Node] {
        match self {
            Node::Paragraph { content } => content,
            _ => &[],
        }
    }
}

/// Total inline length of a paragraph's content, in position units.
pub fn inline_len(content: &[Node]) -> usize {
    content.iter().map(|n| n.size()).sum()
}

/// Merge adjacent text runs and drop empty ones.
pub fn normalize_inline(content: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(content.len());
    for node in content {
        match node {
            Node::Text { text } if text.is_empty() => {}
            Node::Text { text } => {
                if let Some(Node::Text { text: prev }) = out.last_mut() {
                    prev.push_str(&text);
                } else {
                    out.push(Node::Text { text });
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Replace the inline range `[from, to)` with `replacement`, splitting text
/// runs at the boundaries. Atomic nodes are either fully inside or fully
/// outside the range; they are never split. Bounds must be validated by the
/// caller.
pub fn splice(content: &[Node], from: usize, to: usize, replacement: Vec<Node>) -> Vec<Node> {
    let mut prefix: Vec<Node> = Vec::new();
    let mut suffix: Vec<Node> = Vec::new();
    let mut pos = 0usize;

    for node in content {
        let size = node.size();
        let start = pos;
        let end = pos + size;
        pos = end;

        if start < from {
            if end <= from {
                prefix.push(node.clone());
            } else if let Node::Text { text } = node {
                let keep: String = text.chars().take(from - start).collect();
                prefix.push(Node::text(keep));
            }
        }
        if end > to {
            if start >= to {
                suffix.push(node.clone());
            } else if let Node::Text { text } = node {
                let tail: String = text.chars().skip(to - start).collect();
                suffix.push(Node::text(tail));
            }
        }
    }

    let mut out = prefix;
    out.extend(replacement);
    out.extend(suffix);
    normalize_inline(out)
}

/// Find the node covering position `pos`, returning its start position.
pub fn node_at(content: &[Node], pos: usize) -> Option<(usize, &Node)> {
    let mut start = 0usize;
    for node in content {
        let size = node.size();
        if pos >= start && pos < start + size {
            return Some((start, node));
        }
        start += size;
    }
    None
}

/// The contiguous text immediately before `pos`, stopping at the nearest
/// atomic node or paragraph start. Returns the run's start position and its
/// text up to `pos`.
pub fn text_before(content: &[Node], pos: usize) -> (usize, String) {
    let mut start = 0usize;
    let mut run_start = 0usize;
    let mut run = String::new();

    for node in content {
        let size = node.size();
        if start >= pos {
            break;
        }
        match node {
            Node::Text { text } => {
                if run.is_empty() {
                    run_start = start;
                }
                if pos < start + size {
                    let take = pos - start;
                    run.extend(text.chars().take(take));
                    return (run_start, run);
                }
                run.push_str(text);
            }
            _ => {
                run.clear();
                run_start = start + size;
            }
        }
        start += size;
    }

    (run_start, run)
}
