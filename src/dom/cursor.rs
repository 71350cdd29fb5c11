use crate::parse::floor_char_boundary;
use crate::util::unicode;

use super::node::{Badge, Node};
use super::sync::{EditorDom, SpanKind};

/// A boundary point in the tree, shaped like a DOM range boundary.
///
/// `path` names the container node from the root (empty = root). Inside a
/// text node `offset` is a byte index into its text; inside the root or a
/// block it is a child index. Badges and breaks host no caret: offset 0
/// means before them, anything else after.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomPosition {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl DomPosition {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        DomPosition { path, offset }
    }

    /// Child index `offset` of the root
    pub fn root(offset: usize) -> Self {
        DomPosition {
            path: Vec::new(),
            offset,
        }
    }

    /// Position just before the node at `path`
    pub fn before(path: &[usize]) -> Self {
        match path.split_last() {
            Some((&idx, parent)) => DomPosition::new(parent.to_vec(), idx),
            None => DomPosition::root(0),
        }
    }

    /// Position just after the node at `path`
    pub fn after(path: &[usize]) -> Self {
        match path.split_last() {
            Some((&idx, parent)) => DomPosition::new(parent.to_vec(), idx + 1),
            None => DomPosition::root(0),
        }
    }
}

impl EditorDom {
    /// Offset into the extracted value for a caret.
    ///
    /// No selection (focus is elsewhere) or a path that no longer exists
    /// gives 0.
    pub fn cursor_offset(&self, selection: Option<&DomPosition>) -> usize {
        match selection {
            Some(pos) => self.offset_of(pos).unwrap_or(0),
            None => 0,
        }
    }

    fn offset_of(&self, pos: &DomPosition) -> Option<usize> {
        let layout = self.layout();
        if pos.path.is_empty() {
            return Some(match self.children.get(pos.offset) {
                Some(_) => layout.span(&[pos.offset])?.outer_start,
                None => layout.text.len(),
            });
        }

        let span = layout.span(&pos.path)?;
        match (self.node_at(&pos.path)?, span.kind) {
            (Node::Text(t), _) => Some(span.start + floor_char_boundary(t, pos.offset)),
            (Node::Block(children), _) => {
                if pos.offset < children.len() {
                    let mut child = pos.path.clone();
                    child.push(pos.offset);
                    Some(layout.span(&child)?.outer_start)
                } else {
                    Some(span.end)
                }
            }
            (_, SpanKind::Badge | SpanKind::Break) if pos.offset == 0 => Some(span.start),
            _ => Some(span.end),
        }
    }

    /// Caret position for a value offset.
    ///
    /// Badges cannot hold a caret, so an offset strictly inside a badge or at
    /// its end resolves to just after the badge.
    pub fn position_at(&self, offset: usize) -> DomPosition {
        let layout = self.layout();
        let k = floor_char_boundary(&layout.text, offset);
        for span in &layout.spans {
            match span.kind {
                SpanKind::Block => {
                    if span.outer_start < span.start && k == span.outer_start {
                        return DomPosition::before(&span.path);
                    }
                }
                SpanKind::Text => {
                    if k <= span.end {
                        return DomPosition::new(span.path.clone(), k.saturating_sub(span.start));
                    }
                }
                SpanKind::Break => {
                    if k == span.start {
                        return DomPosition::before(&span.path);
                    }
                }
                SpanKind::Badge => {
                    if k == span.start {
                        return DomPosition::before(&span.path);
                    }
                    if k <= span.end {
                        return DomPosition::after(&span.path);
                    }
                }
            }
        }
        DomPosition::root(self.children.len())
    }

    /// Offset one step left of `offset`, crossing a badge in one step.
    pub fn step_left(&self, offset: usize) -> usize {
        let layout = self.layout();
        let k = floor_char_boundary(&layout.text, offset);
        if let Some(span) = layout
            .spans
            .iter()
            .find(|s| s.kind == SpanKind::Badge && s.start < k && k <= s.end)
        {
            return span.start;
        }
        unicode::prev_grapheme_boundary(&layout.text, k).unwrap_or(0)
    }

    /// Offset one step right of `offset`, crossing a badge in one step.
    pub fn step_right(&self, offset: usize) -> usize {
        let layout = self.layout();
        let k = floor_char_boundary(&layout.text, offset);
        if let Some(span) = layout
            .spans
            .iter()
            .find(|s| s.kind == SpanKind::Badge && s.start <= k && k < s.end)
        {
            return span.end;
        }
        unicode::next_grapheme_boundary(&layout.text, k).unwrap_or(layout.text.len())
    }

    /// Walk up from `target` towards the root and return the first badge.
    pub fn badge_ancestor(&self, target: &[usize]) -> Option<(Vec<usize>, &Badge)> {
        (1..=target.len()).rev().find_map(|len| {
            let path = &target[..len];
            match self.node_at(path)? {
                Node::Badge(badge) => Some((path.to_vec(), badge)),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dom(s: &str) -> EditorDom {
        EditorDom::from_value(s, None)
    }

    #[test]
    fn test_no_selection_reads_zero() {
        let d = dom("hello");
        assert_eq!(d.cursor_offset(None), 0);
    }

    #[test]
    fn test_stale_path_reads_zero() {
        let d = dom("hello");
        assert_eq!(d.cursor_offset(Some(&DomPosition::new(vec![4, 2], 1))), 0);
    }

    #[test]
    fn test_offset_in_text_after_badge() {
        // "Hi " + badge(11) + " there"
        let d = dom("Hi @[user:Sam] there");
        let pos = DomPosition::new(vec![2], 3);
        assert_eq!(d.cursor_offset(Some(&pos)), 3 + 11 + 3);
    }

    #[test]
    fn test_badge_counts_encoded_length() {
        let d = dom("@[task:Ship it]x");
        assert_eq!(d.cursor_offset(Some(&DomPosition::root(1))), 15);
        assert_eq!(d.cursor_offset(Some(&DomPosition::new(vec![0], 1))), 15);
        assert_eq!(d.cursor_offset(Some(&DomPosition::new(vec![0], 0))), 0);
    }

    #[test]
    fn test_position_inside_badge_snaps_after() {
        let d = dom("a@[task:T]b");
        // badge spans 1..10
        for k in 2..=10 {
            let pos = d.position_at(k);
            assert_eq!(d.cursor_offset(Some(&pos)), 10, "offset {}", k);
        }
        assert_eq!(d.position_at(10), DomPosition::root(2));
        // at the badge start the caret stays at the end of "a"
        assert_eq!(d.position_at(1), DomPosition::new(vec![0], 1));
    }

    #[test]
    fn test_cursor_symmetry_outside_badges() {
        let s = "Hi @[user:Sam]\n\nline @[file:x.md]";
        let d = dom(s);
        let layout = d.layout();
        let inside = |k: usize| {
            layout
                .spans
                .iter()
                .any(|sp| sp.kind == SpanKind::Badge && sp.start < k && k < sp.end)
        };
        for k in 0..=s.len() {
            if inside(k) {
                continue;
            }
            let pos = d.position_at(k);
            assert_eq!(d.cursor_offset(Some(&pos)), k, "offset {}", k);
        }
    }

    #[test]
    fn test_cursor_symmetry_with_blocks() {
        let d = EditorDom::from_nodes(vec![
            Node::text("ab"),
            Node::Block(vec![Node::text("cd")]),
            Node::Block(vec![]),
            Node::Block(vec![Node::Break, Node::text("e")]),
        ]);
        let text = d.extract();
        assert_eq!(text, "ab\ncd\n\ne");
        for k in 0..=text.len() {
            let pos = d.position_at(k);
            assert_eq!(d.cursor_offset(Some(&pos)), k, "offset {}", k);
        }
    }

    #[test]
    fn test_offset_past_end_places_at_root_end() {
        let d = dom("ab\n");
        assert_eq!(d.position_at(99), DomPosition::root(2));
        assert_eq!(d.cursor_offset(Some(&DomPosition::root(99))), 3);
    }

    #[test]
    fn test_step_over_badge() {
        let d = dom("a@[task:T]b");
        assert_eq!(d.step_right(1), 10);
        assert_eq!(d.step_left(10), 1);
        assert_eq!(d.step_left(1), 0);
        assert_eq!(d.step_right(10), 11);
        assert_eq!(d.step_right(11), 11);
        assert_eq!(d.step_left(0), 0);
    }

    #[test]
    fn test_badge_ancestor() {
        let d = EditorDom::from_nodes(vec![
            Node::text("x"),
            Node::Block(vec![Node::text("y")]),
        ]);
        assert!(d.badge_ancestor(&[1, 0]).is_none());

        let d = dom("x @[user:Ana]");
        let (path, badge) = d.badge_ancestor(&[1]).unwrap();
        assert_eq!(path, vec![1]);
        assert_eq!(badge.label(), "Ana");
    }
}
