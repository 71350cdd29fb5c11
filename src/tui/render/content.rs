//! Read-only rendering of stored comment content.

use std::fmt;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::dom::badge_visual;
use crate::model::{MentionToken, MentionUserAvatarLookup};
use crate::parse::{Segment, has_mentions, parse_token, split_segments};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, to_cells};

use super::badge::{badge_spans, badge_width};

/// Called with the token of a clicked badge
pub type MentionClickHandler<'a> = Box<dyn FnMut(&MentionToken) + 'a>;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// Avatar URLs for user badges
    pub avatars: Option<&'a MentionUserAvatarLookup>,
    pub theme: Option<&'a Theme>,
}

/// Screen cells covered by one badge, relative to the content's origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeHit {
    pub row: u16,
    pub col_start: u16,
    pub col_end: u16,
    pub token: MentionToken,
}

impl BadgeHit {
    fn contains(&self, col: u16, row: u16) -> bool {
        row == self.row && col >= self.col_start && col < self.col_end
    }
}

pub struct RichContent<'a> {
    pub lines: Vec<Line<'static>>,
    pub hits: Vec<BadgeHit>,
    on_click: Option<MentionClickHandler<'a>>,
}

impl fmt::Debug for RichContent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichContent")
            .field("lines", &self.lines)
            .field("hits", &self.hits)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub enum RenderedContent<'a> {
    /// No tokens: the content, untouched
    Plain(&'a str),
    Rich(RichContent<'a>),
}

impl<'a> RenderedContent<'a> {
    pub fn as_plain(&self) -> Option<&'a str> {
        match self {
            RenderedContent::Plain(s) => Some(*s),
            RenderedContent::Rich(_) => None,
        }
    }

    /// Lines ready for a `Paragraph`
    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        match self {
            RenderedContent::Plain(s) => s
                .split('\n')
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text))))
                .collect(),
            RenderedContent::Rich(rich) => rich.lines.clone(),
        }
    }

    /// Badge under a cell, if any
    pub fn hit_at(&self, col: u16, row: u16) -> Option<&MentionToken> {
        match self {
            RenderedContent::Plain(_) => None,
            RenderedContent::Rich(rich) => rich
                .hits
                .iter()
                .find(|h| h.contains(col, row))
                .map(|h| &h.token),
        }
    }

    /// Run the click handler for the badge under a cell. Returns true if a
    /// handler ran.
    pub fn click_at(&mut self, col: u16, row: u16) -> bool {
        let RenderedContent::Rich(rich) = self else {
            return false;
        };
        let Some(hit) = rich.hits.iter().find(|h| h.contains(col, row)) else {
            return false;
        };
        match rich.on_click.as_mut() {
            Some(handler) => {
                handler(&hit.token);
                true
            }
            None => false,
        }
    }
}

/// Render stored content for display.
///
/// Content with no tokens comes back as [`RenderedContent::Plain`].
/// Otherwise literal text is kept (newlines start new lines) and each valid
/// token becomes a badge; token-shaped text that does not parse stays
/// literal.
pub fn render_comment_content<'a>(
    content: &'a str,
    on_click: Option<MentionClickHandler<'a>>,
    options: Option<RenderOptions<'_>>,
) -> RenderedContent<'a> {
    if !has_mentions(content) {
        return RenderedContent::Plain(content);
    }
    let options = options.unwrap_or_default();
    let default_theme;
    let theme = match options.theme {
        Some(theme) => theme,
        None => {
            default_theme = Theme::default();
            &default_theme
        }
    };
    let text_style = Style::default().fg(theme.text);

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut col = 0usize;
    let mut hits = Vec::new();

    for segment in split_segments(content) {
        let token = match segment {
            Segment::Token(raw) => parse_token(raw),
            Segment::Text(_) => None,
        };
        match token {
            Some(token) => {
                let visual = badge_visual(&token, options.avatars);
                let width = badge_width(&token, &visual);
                current.extend(badge_spans(&token, &visual, theme, false));
                hits.push(BadgeHit {
                    row: to_cells(lines.len()),
                    col_start: to_cells(col),
                    col_end: to_cells(col + width),
                    token,
                });
                col += width;
            }
            None => push_text(segment.as_str(), text_style, &mut current, &mut col, &mut lines),
        }
    }
    lines.push(Line::from(current));

    RenderedContent::Rich(RichContent {
        lines,
        hits,
        on_click,
    })
}

fn push_text(
    text: &str,
    style: Style,
    current: &mut Vec<Span<'static>>,
    col: &mut usize,
    lines: &mut Vec<Line<'static>>,
) {
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            lines.push(Line::from(std::mem::take(current)));
            *col = 0;
        }
        if !part.is_empty() {
            current.push(Span::styled(part.to_string(), style));
            *col += display_width(part);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AvatarEntry, MentionKind};
    use crate::tui::render::badge::{AVATAR_MARK, TASK_ICON};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_plain_passthrough() {
        let out = render_comment_content("no mentions here", None, None);
        assert_eq!(out.as_plain(), Some("no mentions here"));
    }

    #[test]
    fn test_invalid_token_only_is_plain() {
        let out = render_comment_content("see @[task:]", None, None);
        assert_eq!(out.as_plain(), Some("see @[task:]"));
    }

    #[test]
    fn test_badges_and_lines() {
        let out = render_comment_content("Ping @[user:Alex Kim]\nabout @[task:Ship it] ok", None, None);
        let RenderedContent::Rich(rich) = &out else {
            panic!("expected rich content");
        };
        assert_eq!(rich.lines.len(), 2);
        assert_eq!(line_text(&rich.lines[0]), "Ping AK Alex Kim");
        assert_eq!(line_text(&rich.lines[1]), format!("about {} Ship it ok", TASK_ICON));
        assert_eq!(
            rich.hits[0],
            BadgeHit {
                row: 0,
                col_start: 5,
                col_end: 16,
                token: MentionToken::new(MentionKind::User, "Alex Kim"),
            }
        );
        assert_eq!(rich.hits[1].row, 1);
        assert_eq!(rich.hits[1].col_start, 6);
    }

    #[test]
    fn test_label_with_line_break_stays_on_one_row() {
        let out = render_comment_content("@[user:Sam\nLee] after", None, None);
        let RenderedContent::Rich(rich) = &out else {
            panic!("expected rich content");
        };
        assert_eq!(rich.lines.len(), 1);
        assert_eq!(line_text(&rich.lines[0]), "SL Sam Lee after");
        assert!(rich.lines[0].spans.iter().all(|s| !s.content.contains('\n')));
        assert_eq!(rich.hits[0].col_start, 0);
        assert_eq!(rich.hits[0].col_end, 10);
        assert_eq!(out.hit_at(10, 0), None);
        assert_eq!(rich.hits[0].token.label, "Sam\nLee");
    }

    #[test]
    fn test_hit_columns_saturate_on_long_lines() {
        let content = format!("{}@[task:Ship it]", "x".repeat(70_000));
        let out = render_comment_content(&content, None, None);
        let RenderedContent::Rich(rich) = &out else {
            panic!("expected rich content");
        };
        assert_eq!(rich.hits[0].col_start, u16::MAX);
        assert_eq!(rich.hits[0].col_end, u16::MAX);
        assert_eq!(out.hit_at(4_464, 0), None);
    }

    #[test]
    fn test_malformed_token_stays_literal_among_badges() {
        let out = render_comment_content("@[task: ] and @[file:a.md]", None, None);
        let lines = out.lines(&Theme::default());
        assert!(line_text(&lines[0]).starts_with("@[task: ] and "));
    }

    #[test]
    fn test_avatar_lookup_is_used() {
        let entries = [AvatarEntry::new("Sam", "https://x/sam.png")];
        let lookup = MentionUserAvatarLookup::build(entries.iter());
        let options = RenderOptions {
            avatars: Some(&lookup),
            theme: None,
        };
        let out = render_comment_content("@[user:sam]", None, Some(options));
        let lines = out.lines(&Theme::default());
        assert_eq!(line_text(&lines[0]), format!("{} sam", AVATAR_MARK));
    }

    #[test]
    fn test_click_runs_handler() {
        let clicked = RefCell::new(Vec::new());
        let handler: MentionClickHandler = Box::new(|t: &MentionToken| clicked.borrow_mut().push(t.clone()));
        let mut out = render_comment_content("hi @[file:Brief.pdf]", Some(handler), None);
        assert!(!out.click_at(0, 0));
        assert!(out.click_at(4, 0));
        drop(out);
        assert_eq!(
            clicked.into_inner(),
            vec![MentionToken::new(MentionKind::File, "Brief.pdf")]
        );
    }

    #[test]
    fn test_click_without_handler_is_noop() {
        let mut out = render_comment_content("hi @[file:Brief.pdf]", None, None);
        assert!(!out.click_at(4, 0));
        assert!(out.hit_at(4, 0).is_some());
    }
}
