use crate::parse::floor_char_boundary;
use crate::util::unicode;

use super::cursor::DomPosition;
use super::node::Node;
use super::sync::EditorDom;

/// A caret normalized to one of the two places text can go
#[derive(Debug, Clone, PartialEq, Eq)]
enum Caret {
    InText { path: Vec<usize>, offset: usize },
    Between { parent: Vec<usize>, index: usize },
}

impl Caret {
    fn into_position(self) -> DomPosition {
        match self {
            Caret::InText { path, offset } => DomPosition::new(path, offset),
            Caret::Between { parent, index } => DomPosition::new(parent, index),
        }
    }
}

fn child_path(parent: &[usize], index: usize) -> Vec<usize> {
    let mut path = parent.to_vec();
    path.push(index);
    path
}

// In-place edits. Typed text is never turned into badges here; only a
// rebuild from a value does that.
impl EditorDom {
    /// Insert `text` at `pos`; line breaks become `Break` nodes.
    /// Returns the caret after the inserted text, or None if `pos` is stale.
    pub fn insert_text(&mut self, pos: &DomPosition, text: &str) -> Option<DomPosition> {
        let mut caret = self.normalize(pos)?;
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                caret = self.break_at(caret)?;
            }
            if !line.is_empty() {
                caret = self.str_at(caret, line)?;
            }
        }
        Some(caret.into_position())
    }

    /// Insert a line break at `pos`
    pub fn insert_break(&mut self, pos: &DomPosition) -> Option<DomPosition> {
        let caret = self.normalize(pos)?;
        Some(self.break_at(caret)?.into_position())
    }

    /// Delete one grapheme, break or badge before `pos`
    pub fn delete_backward(&mut self, pos: &DomPosition) -> Option<DomPosition> {
        let caret = self.normalize(pos)?;
        Some(self.backward_at(caret)?.into_position())
    }

    /// Delete one grapheme, break or badge after `pos`
    pub fn delete_forward(&mut self, pos: &DomPosition) -> Option<DomPosition> {
        let caret = self.normalize(pos)?;
        Some(self.forward_at(caret)?.into_position())
    }

    fn normalize(&self, pos: &DomPosition) -> Option<Caret> {
        if pos.path.is_empty() {
            return Some(Caret::Between {
                parent: Vec::new(),
                index: pos.offset.min(self.children.len()),
            });
        }
        match self.node_at(&pos.path)? {
            Node::Text(t) => Some(Caret::InText {
                path: pos.path.clone(),
                offset: floor_char_boundary(t, pos.offset),
            }),
            Node::Block(children) => Some(Caret::Between {
                parent: pos.path.clone(),
                index: pos.offset.min(children.len()),
            }),
            Node::Badge(_) | Node::Break => {
                let (&idx, parent) = pos.path.split_last()?;
                Some(Caret::Between {
                    parent: parent.to_vec(),
                    index: if pos.offset == 0 { idx } else { idx + 1 },
                })
            }
        }
    }

    fn text_mut(&mut self, path: &[usize]) -> Option<&mut String> {
        let (&idx, parent) = path.split_last()?;
        match self.children_at_mut(parent)?.get_mut(idx)? {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    fn str_at(&mut self, caret: Caret, s: &str) -> Option<Caret> {
        match caret {
            Caret::InText { path, offset } => {
                let t = self.text_mut(&path)?;
                t.insert_str(offset, s);
                Some(Caret::InText {
                    path,
                    offset: offset + s.len(),
                })
            }
            Caret::Between { parent, index } => {
                let children = self.children_at_mut(&parent)?;
                if index > 0
                    && let Some(Node::Text(t)) = children.get_mut(index - 1)
                {
                    t.push_str(s);
                    let offset = t.len();
                    return Some(Caret::InText {
                        path: child_path(&parent, index - 1),
                        offset,
                    });
                }
                if let Some(Node::Text(t)) = children.get_mut(index) {
                    t.insert_str(0, s);
                } else {
                    children.insert(index, Node::text(s));
                }
                Some(Caret::InText {
                    path: child_path(&parent, index),
                    offset: s.len(),
                })
            }
        }
    }

    fn break_at(&mut self, caret: Caret) -> Option<Caret> {
        match caret {
            Caret::InText { path, offset } => {
                let (&idx, parent) = path.split_last()?;
                let children = self.children_at_mut(parent)?;
                let Some(Node::Text(t)) = children.get_mut(idx) else {
                    return None;
                };
                let tail = t.split_off(offset);
                let mut at = idx + 1;
                if t.is_empty() {
                    children.remove(idx);
                    at = idx;
                }
                children.insert(at, Node::Break);
                if tail.is_empty() {
                    Some(Caret::Between {
                        parent: parent.to_vec(),
                        index: at + 1,
                    })
                } else {
                    children.insert(at + 1, Node::Text(tail));
                    Some(Caret::InText {
                        path: child_path(parent, at + 1),
                        offset: 0,
                    })
                }
            }
            Caret::Between { parent, index } => {
                let children = self.children_at_mut(&parent)?;
                children.insert(index, Node::Break);
                Some(Caret::Between {
                    parent,
                    index: index + 1,
                })
            }
        }
    }

    fn backward_at(&mut self, caret: Caret) -> Option<Caret> {
        let (parent, index) = match caret {
            Caret::InText { path, offset } if offset > 0 => {
                let t = self.text_mut(&path)?;
                let prev = unicode::prev_grapheme_boundary(t, offset).unwrap_or(0);
                t.replace_range(prev..offset, "");
                return Some(self.drop_if_empty(path, prev));
            }
            Caret::InText { path, .. } => {
                let (&idx, parent) = path.split_last()?;
                (parent.to_vec(), idx)
            }
            Caret::Between { parent, index } => (parent, index),
        };

        if index == 0 {
            // At the start of a block: remove the line break in front of it
            if parent.is_empty() {
                return Some(Caret::Between { parent, index });
            }
            let had_separator = self.has_separator(&parent);
            let caret = self.unwrap_block(&parent)?;
            return if had_separator {
                Some(caret)
            } else {
                self.backward_at(caret)
            };
        }

        let children = self.children_at_mut(&parent)?;
        match children.get_mut(index - 1)? {
            Node::Text(t) => {
                let end = t.len();
                let prev = unicode::prev_grapheme_boundary(t, end).unwrap_or(0);
                if end == 0 {
                    children.remove(index - 1);
                    return self.backward_at(Caret::Between {
                        parent,
                        index: index - 1,
                    });
                }
                t.truncate(prev);
                Some(self.drop_if_empty(child_path(&parent, index - 1), prev))
            }
            Node::Break | Node::Badge(_) => {
                children.remove(index - 1);
                Some(Caret::Between {
                    parent,
                    index: index - 1,
                })
            }
            Node::Block(inner) => {
                let len = inner.len();
                self.backward_at(Caret::Between {
                    parent: child_path(&parent, index - 1),
                    index: len,
                })
            }
        }
    }

    fn forward_at(&mut self, caret: Caret) -> Option<Caret> {
        let (parent, index) = match caret {
            Caret::InText { path, offset } => {
                let t = self.text_mut(&path)?;
                if offset < t.len() {
                    let next = unicode::next_grapheme_boundary(t, offset).unwrap_or(t.len());
                    t.replace_range(offset..next, "");
                    return Some(self.drop_if_empty(path, offset));
                }
                let (&idx, parent) = path.split_last()?;
                (parent.to_vec(), idx + 1)
            }
            Caret::Between { parent, index } => (parent, index),
        };

        let len = self.children_at(&parent)?.len();
        if index >= len {
            if parent.is_empty() {
                return Some(Caret::Between { parent, index });
            }
            // At the end of a block: continue after it
            let (bidx, grand) = match parent.split_last() {
                Some((&b, g)) => (b, g.to_vec()),
                None => return None,
            };
            let after = Caret::Between {
                parent: grand,
                index: bidx + 1,
            };
            let out = self.forward_at(after.clone())?;
            // Nothing was deleted past the block; keep the caret inside it
            return Some(if out == after {
                Caret::Between { parent, index }
            } else {
                out
            });
        }

        let block_path = child_path(&parent, index);
        let has_separator = self.has_separator(&block_path);
        let children = self.children_at_mut(&parent)?;
        match children.get_mut(index)? {
            Node::Text(t) => {
                if t.is_empty() {
                    children.remove(index);
                    return self.forward_at(Caret::Between { parent, index });
                }
                let next = unicode::next_grapheme_boundary(t, 0).unwrap_or(t.len());
                t.replace_range(0..next, "");
                Some(self.drop_if_empty(block_path, 0))
            }
            Node::Break | Node::Badge(_) => {
                children.remove(index);
                Some(Caret::Between { parent, index })
            }
            Node::Block(_) => {
                if has_separator {
                    self.unwrap_block(&block_path)
                } else {
                    self.forward_at(Caret::Between {
                        parent: block_path,
                        index: 0,
                    })
                }
            }
        }
    }

    /// After an edit, remove a text node that became empty.
    fn drop_if_empty(&mut self, path: Vec<usize>, offset: usize) -> Caret {
        let empty = matches!(self.node_at(&path), Some(Node::Text(t)) if t.is_empty());
        if empty && let Some((&idx, parent)) = path.split_last() {
            if let Some(children) = self.children_at_mut(parent) {
                children.remove(idx);
            }
            return Caret::Between {
                parent: parent.to_vec(),
                index: idx,
            };
        }
        Caret::InText { path, offset }
    }

    /// Whether the block at `path` is preceded by an implicit line break
    fn has_separator(&self, path: &[usize]) -> bool {
        self.layout()
            .span(path)
            .is_some_and(|s| s.outer_start < s.start)
    }

    /// Replace the block at `path` with its children.
    fn unwrap_block(&mut self, path: &[usize]) -> Option<Caret> {
        let (&idx, parent) = path.split_last()?;
        let children = self.children_at_mut(parent)?;
        let Node::Block(inner) = children.remove(idx) else {
            return None;
        };
        for (i, node) in inner.into_iter().enumerate() {
            children.insert(idx + i, node);
        }
        Some(Caret::Between {
            parent: parent.to_vec(),
            index: idx,
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

    /// Apply an edit at a value offset and return (value, caret offset)
    fn edit_at<F>(s: &str, offset: usize, f: F) -> (String, usize)
    where
        F: FnOnce(&mut EditorDom, &DomPosition) -> Option<DomPosition>,
    {
        let mut d = dom(s);
        let pos = d.position_at(offset);
        let caret = f(&mut d, &pos).expect("position is valid");
        let at = d.cursor_offset(Some(&caret));
        (d.extract(), at)
    }

    #[test]
    fn test_insert_text_in_middle() {
        let (v, at) = edit_at("Hello world", 5, |d, p| d.insert_text(p, ","));
        assert_eq!(v, "Hello, world");
        assert_eq!(at, 6);
    }

    #[test]
    fn test_insert_after_badge_creates_text() {
        let (v, at) = edit_at("@[task:T]", 9, |d, p| d.insert_text(p, "!"));
        assert_eq!(v, "@[task:T]!");
        assert_eq!(at, 10);
    }

    #[test]
    fn test_insert_into_empty_dom() {
        let (v, at) = edit_at("", 0, |d, p| d.insert_text(p, "hi"));
        assert_eq!(v, "hi");
        assert_eq!(at, 2);
    }

    #[test]
    fn test_insert_multiline_text() {
        let (v, at) = edit_at("ab", 1, |d, p| d.insert_text(p, "x\r\ny\n"));
        assert_eq!(v, "ax\ny\nb");
        assert_eq!(at, 5);
    }

    #[test]
    fn test_typed_token_stays_text() {
        let mut d = dom("");
        let pos = d.position_at(0);
        d.insert_text(&pos, "@[task:T]").unwrap();
        assert_eq!(d.children(), &[Node::text("@[task:T]")]);
    }

    #[test]
    fn test_insert_break_splits_text() {
        let (v, at) = edit_at("abcd", 2, |d, p| d.insert_break(p));
        assert_eq!(v, "ab\ncd");
        assert_eq!(at, 3);
    }

    #[test]
    fn test_insert_break_at_text_start_and_end() {
        let (v, at) = edit_at("ab", 0, |d, p| d.insert_break(p));
        assert_eq!(v, "\nab");
        assert_eq!(at, 1);
        let (v, at) = edit_at("ab", 2, |d, p| d.insert_break(p));
        assert_eq!(v, "ab\n");
        assert_eq!(at, 3);
    }

    #[test]
    fn test_backspace_removes_badge_atomically() {
        let (v, at) = edit_at("a @[user:Sam] b", 13, |d, p| d.delete_backward(p));
        assert_eq!(v, "a  b");
        assert_eq!(at, 2);
    }

    #[test]
    fn test_backspace_grapheme_and_break() {
        let (v, at) = edit_at("ae\u{301}", 4, |d, p| d.delete_backward(p));
        assert_eq!(v, "a");
        assert_eq!(at, 1);
        let (v, at) = edit_at("a\nb", 2, |d, p| d.delete_backward(p));
        assert_eq!(v, "ab");
        assert_eq!(at, 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let (v, at) = edit_at("abc", 0, |d, p| d.delete_backward(p));
        assert_eq!(v, "abc");
        assert_eq!(at, 0);
    }

    #[test]
    fn test_backspace_at_block_start_merges() {
        let mut d = EditorDom::from_nodes(vec![
            Node::text("ab"),
            Node::Block(vec![Node::text("cd")]),
        ]);
        let caret = d.delete_backward(&DomPosition::new(vec![1, 0], 0)).unwrap();
        assert_eq!(d.extract(), "abcd");
        assert_eq!(d.cursor_offset(Some(&caret)), 2);
    }

    #[test]
    fn test_delete_forward() {
        let (v, at) = edit_at("a@[file:x]b", 1, |d, p| d.delete_forward(p));
        assert_eq!(v, "ab");
        assert_eq!(at, 1);
        let (v, at) = edit_at("ab\ncd", 2, |d, p| d.delete_forward(p));
        assert_eq!(v, "abcd");
        assert_eq!(at, 2);
        let (v, at) = edit_at("abc", 3, |d, p| d.delete_forward(p));
        assert_eq!(v, "abc");
        assert_eq!(at, 3);
    }

    #[test]
    fn test_delete_forward_into_block() {
        let mut d = EditorDom::from_nodes(vec![
            Node::text("ab"),
            Node::Block(vec![Node::text("cd")]),
        ]);
        let caret = d.delete_forward(&DomPosition::new(vec![0], 2)).unwrap();
        assert_eq!(d.extract(), "abcd");
        assert_eq!(d.cursor_offset(Some(&caret)), 2);
    }

    #[test]
    fn test_stale_position_is_rejected() {
        let mut d = dom("abc");
        assert_eq!(d.insert_text(&DomPosition::new(vec![7], 0), "x"), None);
        assert_eq!(d.extract(), "abc");
    }
}
