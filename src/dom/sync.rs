use crate::model::MentionUserAvatarLookup;
use crate::parse::{Segment, parse_token, split_segments};

use super::node::{Badge, Node};

/// The editable tree derived from a plain-string value.
///
/// The string is authoritative: the tree is rebuilt from it with
/// [`EditorDom::from_value`] and read back with [`EditorDom::extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorDom {
    pub(crate) children: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanKind {
    Text,
    Break,
    Badge,
    Block,
}

/// Where a node's contribution sits in the extracted string
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeSpan {
    pub path: Vec<usize>,
    pub kind: SpanKind,
    /// Start including a block's implicit separator
    pub outer_start: usize,
    pub start: usize,
    pub end: usize,
}

/// Extracted string plus spans for every node in document (pre-)order
pub(crate) struct Layout {
    pub text: String,
    pub spans: Vec<NodeSpan>,
}

impl Layout {
    pub fn span(&self, path: &[usize]) -> Option<&NodeSpan> {
        self.spans.iter().find(|s| s.path == path)
    }
}

impl EditorDom {
    pub fn from_nodes(children: Vec<Node>) -> Self {
        EditorDom { children }
    }

    /// Build the tree for `value`: text runs with `Break`s for newlines,
    /// one badge per valid token. Token-shaped text that fails to parse
    /// stays literal.
    pub fn from_value(value: &str, avatars: Option<&MentionUserAvatarLookup>) -> Self {
        let mut children: Vec<Node> = Vec::new();
        for segment in split_segments(value) {
            match segment {
                Segment::Token(raw) => match parse_token(raw) {
                    Some(token) => children.push(Node::Badge(Badge::new(raw, token, avatars))),
                    None => push_text(&mut children, raw),
                },
                Segment::Text(text) => {
                    for (i, line) in text.split('\n').enumerate() {
                        if i > 0 {
                            children.push(Node::Break);
                        }
                        if !line.is_empty() {
                            push_text(&mut children, line);
                        }
                    }
                }
            }
        }
        EditorDom { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Read the value back. Badges give back their stored token text, not
    /// the visible label.
    pub fn extract(&self) -> String {
        self.layout().text
    }

    /// Length of the extracted value in bytes
    pub fn value_len(&self) -> usize {
        self.layout().text.len()
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for &i in rest {
            node = match node {
                Node::Block(children) => children.get(i)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Children of the root (empty path) or of a block
    pub(crate) fn children_at(&self, path: &[usize]) -> Option<&Vec<Node>> {
        if path.is_empty() {
            return Some(&self.children);
        }
        match self.node_at(path)? {
            Node::Block(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for &i in path {
            children = match children.get_mut(i)? {
                Node::Block(inner) => inner,
                _ => return None,
            };
        }
        Some(children)
    }

    pub(crate) fn layout(&self) -> Layout {
        let mut layout = Layout {
            text: String::new(),
            spans: Vec::new(),
        };
        let mut path = Vec::new();
        layout_nodes(&self.children, &mut path, &mut layout);
        layout
    }
}

fn push_text(children: &mut Vec<Node>, s: &str) {
    if let Some(Node::Text(last)) = children.last_mut() {
        last.push_str(s);
    } else {
        children.push(Node::Text(s.to_string()));
    }
}

fn layout_nodes(nodes: &[Node], path: &mut Vec<usize>, out: &mut Layout) {
    for (i, node) in nodes.iter().enumerate() {
        path.push(i);
        let outer_start = out.text.len();
        match node {
            Node::Text(t) => {
                out.text.push_str(t);
                out.spans.push(leaf(path, SpanKind::Text, outer_start, out.text.len()));
            }
            Node::Break => {
                out.text.push('\n');
                out.spans.push(leaf(path, SpanKind::Break, outer_start, out.text.len()));
            }
            Node::Badge(badge) => {
                out.text.push_str(&badge.token_text);
                out.spans.push(leaf(path, SpanKind::Badge, outer_start, out.text.len()));
            }
            Node::Block(children) => {
                if !out.text.is_empty() && !out.text.ends_with('\n') {
                    out.text.push('\n');
                }
                let idx = out.spans.len();
                out.spans.push(NodeSpan {
                    path: path.clone(),
                    kind: SpanKind::Block,
                    outer_start,
                    start: out.text.len(),
                    end: out.text.len(),
                });
                layout_nodes(children, path, out);
                out.spans[idx].end = out.text.len();
            }
        }
        path.pop();
    }
}

fn leaf(path: &[usize], kind: SpanKind, start: usize, end: usize) -> NodeSpan {
    NodeSpan {
        path: path.to_vec(),
        kind,
        outer_start: start,
        start,
        end,
    }
}
