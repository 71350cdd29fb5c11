use std::borrow::Cow;

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::dom::BadgeVisual;
use crate::model::{MentionKind, MentionToken};
use crate::tui::theme::Theme;
use crate::util::unicode::display_width;

pub const TASK_ICON: &str = "\u{25C7}"; // ◇
pub const FILE_ICON: &str = "\u{25A4}"; // ▤
pub const AVATAR_MARK: &str = "\u{25C9}"; // ◉

/// The glyph shown in front of a badge label
pub fn badge_marker(visual: &BadgeVisual) -> &str {
    match visual {
        BadgeVisual::Icon(MentionKind::Task) => TASK_ICON,
        BadgeVisual::Icon(MentionKind::File) => FILE_ICON,
        // a terminal cannot draw the image itself
        BadgeVisual::Icon(MentionKind::User) | BadgeVisual::Avatar(_) => AVATAR_MARK,
        BadgeVisual::Initials(initials) => initials,
    }
}

/// The label as drawn. Line breaks would escape the badge's row, so they
/// show as spaces; the stored token text is untouched.
pub fn visible_label(label: &str) -> Cow<'_, str> {
    if label.contains(['\n', '\r']) {
        Cow::Owned(label.replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(label)
    }
}

/// Spans for one badge: marker, a space, then the bold label.
pub fn badge_spans(
    token: &MentionToken,
    visual: &BadgeVisual,
    theme: &Theme,
    pulsing: bool,
) -> Vec<Span<'static>> {
    let bg = if pulsing { theme.pulse_bg } else { theme.badge_bg };
    let marker_fg = if pulsing {
        theme.background
    } else {
        theme.badge_color(token.kind)
    };
    vec![
        Span::styled(
            badge_marker(visual).to_string(),
            Style::default().fg(marker_fg).bg(bg),
        ),
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            visible_label(&token.label).into_owned(),
            Style::default()
                .fg(if pulsing { theme.background } else { theme.text_bright })
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]
}

/// Cells a badge occupies
pub fn badge_width(token: &MentionToken, visual: &BadgeVisual) -> usize {
    display_width(badge_marker(visual)) + 1 + display_width(&visible_label(&token.label))
}
