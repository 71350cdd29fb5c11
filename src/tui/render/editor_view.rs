use std::time::Instant;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_segmentation::UnicodeSegmentation;

use crate::dom::Node;
use crate::editor::MentionEditor;
use crate::parse::floor_char_boundary;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, to_cells};

use super::badge::{badge_spans, badge_width};

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeHit {
    row: u16,
    col_start: u16,
    col_end: u16,
    path: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextRun {
    row: u16,
    col_start: u16,
    offset: usize,
    text: String,
}

/// The composer's tree laid out as terminal lines, plus what is needed to
/// map cells back to nodes and value offsets.
#[derive(Debug, Clone, Default)]
pub struct EditorView {
    pub lines: Vec<Line<'static>>,
    /// (column, row) of the caret when focused
    pub cursor: Option<(u16, u16)>,
    badges: Vec<NodeHit>,
    runs: Vec<TextRun>,
    /// Value offset at the end of each row
    row_ends: Vec<usize>,
}

impl EditorView {
    /// Path of the badge under a cell
    pub fn badge_at(&self, col: u16, row: u16) -> Option<&[usize]> {
        self.badges
            .iter()
            .find(|h| h.row == row && col >= h.col_start && col < h.col_end)
            .map(|h| h.path.as_slice())
    }

    /// Value offset for a click on a cell that is not a badge
    pub fn offset_at(&self, col: u16, row: u16) -> Option<usize> {
        if self.badge_at(col, row).is_some() {
            return None;
        }
        let last_row = self.row_ends.len().checked_sub(1)?;
        let row = (row as usize).min(last_row) as u16;
        for run in self.runs.iter().filter(|r| r.row == row && col >= r.col_start) {
            let mut at = run.col_start as usize;
            for (i, g) in run.text.grapheme_indices(true) {
                let w = display_width(g);
                if (col as usize) < at + w {
                    return Some(run.offset + i);
                }
                at += w;
            }
        }
        Some(self.row_ends[row as usize])
    }
}

struct Walker<'t> {
    theme: &'t Theme,
    pulse: Option<&'t [usize]>,
    caret: Option<usize>,
    view: EditorView,
    current: Vec<Span<'static>>,
    row: u16,
    col: usize,
    offset: usize,
    line_start: usize,
}

impl Walker<'_> {
    fn caret_here(&mut self, at: usize) {
        if self.view.cursor.is_none() && self.caret == Some(at) {
            self.view.cursor = Some((to_cells(self.col), self.row));
        }
    }

    fn newline(&mut self) {
        self.view.lines.push(Line::from(std::mem::take(&mut self.current)));
        self.view.row_ends.push(self.offset);
        self.offset += 1;
        self.line_start = self.offset;
        self.row = self.row.saturating_add(1);
        self.col = 0;
    }

    fn walk(&mut self, nodes: &[Node], path: &mut Vec<usize>) {
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);
            match node {
                Node::Text(text) => {
                    if self.view.cursor.is_none()
                        && let Some(k) = self.caret
                        && k >= self.offset
                        && k <= self.offset + text.len()
                    {
                        let head = &text[..floor_char_boundary(text, k - self.offset)];
                        self.view.cursor = Some((to_cells(self.col + display_width(head)), self.row));
                    }
                    self.view.runs.push(TextRun {
                        row: self.row,
                        col_start: to_cells(self.col),
                        offset: self.offset,
                        text: text.clone(),
                    });
                    self.current
                        .push(Span::styled(text.clone(), Style::default().fg(self.theme.text)));
                    self.col += display_width(text);
                    self.offset += text.len();
                }
                Node::Break => {
                    self.caret_here(self.offset);
                    self.newline();
                }
                Node::Badge(badge) => {
                    self.caret_here(self.offset);
                    let pulsing = self.pulse == Some(path.as_slice());
                    let width = badge_width(&badge.token, &badge.visual);
                    self.current
                        .extend(badge_spans(&badge.token, &badge.visual, self.theme, pulsing));
                    self.view.badges.push(NodeHit {
                        row: self.row,
                        col_start: to_cells(self.col),
                        col_end: to_cells(self.col + width),
                        path: path.clone(),
                    });
                    self.col += width;
                    self.offset += badge.token_text.len();
                }
                Node::Block(children) => {
                    if self.offset > self.line_start {
                        self.caret_here(self.offset);
                        self.newline();
                    }
                    self.walk(children, path);
                }
            }
            path.pop();
        }
    }
}

/// Lay out the editor's tree. Without focus there is no caret.
pub fn layout_editor(editor: &MentionEditor, theme: &Theme, now: Instant) -> EditorView {
    let mut walker = Walker {
        theme,
        pulse: editor.pulse_path(now),
        caret: editor.is_focused().then(|| editor.cursor_offset()),
        view: EditorView::default(),
        current: Vec::new(),
        row: 0,
        col: 0,
        offset: 0,
        line_start: 0,
    };
    let mut path = Vec::new();
    walker.walk(editor.dom().children(), &mut path);

    walker.caret_here(walker.offset);
    let mut view = walker.view;
    view.lines.push(Line::from(walker.current));
    view.row_ends.push(walker.offset);
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomPosition, EditorDom};
    use crate::model::{MentionItem, MentionKind};
    use pretty_assertions::assert_eq;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn focused_at(value: &str, offset: usize) -> MentionEditor {
        let mut ed = MentionEditor::new(value, vec![MentionItem::new(MentionKind::User, "u", "Sam")]);
        ed.focus();
        ed.set_cursor(offset);
        ed
    }

    #[test]
    fn test_lines_and_caret() {
        let ed = focused_at("Hi @[user:Sam]\nok", 17);
        let view = layout_editor(&ed, &Theme::default(), Instant::now());
        assert_eq!(view.lines.len(), 2);
        assert_eq!(line_text(&view.lines[0]), "Hi S Sam");
        assert_eq!(line_text(&view.lines[1]), "ok");
        assert_eq!(view.cursor, Some((2, 1)));
    }

    #[test]
    fn test_caret_after_badge() {
        let ed = focused_at("Hi @[user:Sam]", 14);
        let view = layout_editor(&ed, &Theme::default(), Instant::now());
        assert_eq!(view.cursor, Some((8, 0)));
    }

    #[test]
    fn test_unfocused_has_no_caret() {
        let ed = MentionEditor::new("abc", vec![]);
        let view = layout_editor(&ed, &Theme::default(), Instant::now());
        assert_eq!(view.cursor, None);
    }

    #[test]
    fn test_hit_testing() {
        let ed = focused_at("Hi @[user:Sam] yo\nline two", 0);
        let view = layout_editor(&ed, &Theme::default(), Instant::now());
        assert_eq!(view.badge_at(3, 0), Some(&[1usize][..]));
        assert_eq!(view.badge_at(8, 0), None);
        assert_eq!(view.offset_at(1, 0), Some(1));
        assert_eq!(view.offset_at(3, 0), None);
        // " yo" starts at column 8, right after the badge
        assert_eq!(view.offset_at(9, 0), Some(15));
        assert_eq!(view.offset_at(40, 0), Some(17));
        assert_eq!(view.offset_at(2, 1), Some(20));
        assert_eq!(view.offset_at(2, 9), Some(20));
    }

    #[test]
    fn test_blocks_start_new_rows() {
        let dom = EditorDom::from_nodes(vec![
            Node::text("one"),
            Node::Block(vec![Node::text("two")]),
        ]);
        assert_eq!(dom.extract(), "one\ntwo");
        let theme = Theme::default();
        let mut walker = Walker {
            theme: &theme,
            pulse: None,
            caret: Some(dom.cursor_offset(Some(&DomPosition::new(vec![1, 0], 1)))),
            view: EditorView::default(),
            current: Vec::new(),
            row: 0,
            col: 0,
            offset: 0,
            line_start: 0,
        };
        walker.walk(dom.children(), &mut Vec::new());
        // the block's separator closed the first row
        assert_eq!(walker.view.lines.len(), 1);
        assert_eq!(line_text(&walker.view.lines[0]), "one");
        assert_eq!(walker.view.row_ends, vec![3]);
        assert_eq!(walker.view.cursor, Some((1, 1)));
    }
}
