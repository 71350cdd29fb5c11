use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::editor::SuggestionsView;
use crate::model::{MentionItem, MentionKind};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

use super::badge::{AVATAR_MARK, FILE_ICON, TASK_ICON};

/// One row of the dropdown body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row<'a> {
    Header(MentionKind),
    Entry(usize, &'a MentionItem),
}

fn rows<'a>(view: &SuggestionsView<'a>) -> Vec<Row<'a>> {
    let mut out = Vec::new();
    for group in &view.groups {
        out.push(Row::Header(group.kind));
        out.extend(group.entries.iter().map(|&(flat, item)| Row::Entry(flat, item)));
    }
    out
}

/// Height the dropdown wants, borders included
pub fn dropdown_height(view: &SuggestionsView, max_visible: usize) -> u16 {
    (rows(view).len().min(max_visible.max(1)) + 2) as u16
}

/// First row to show so the selected entry stays visible
fn scroll_start(rows: &[Row], selected: usize, visible: usize) -> usize {
    let sel_row = rows
        .iter()
        .position(|r| matches!(r, Row::Entry(flat, _) if *flat == selected))
        .unwrap_or(0);
    if sel_row >= visible {
        sel_row + 1 - visible
    } else {
        0
    }
}

fn item_icon(item: &MentionItem) -> &'static str {
    match item.kind {
        MentionKind::Task => TASK_ICON,
        MentionKind::File => FILE_ICON,
        MentionKind::User => AVATAR_MARK,
    }
}

/// Render the suggestion list into `area` and return the screen row of each
/// visible entry with its flat index, for mouse selection.
pub fn render_dropdown(
    frame: &mut Frame,
    view: &SuggestionsView,
    area: Rect,
    theme: &Theme,
) -> Vec<(u16, usize)> {
    if area.height < 3 || area.width < 6 {
        return Vec::new();
    }
    let bg = theme.background;
    let inner_w = area.width.saturating_sub(2) as usize;
    let visible = area.height.saturating_sub(2) as usize;

    let all = rows(view);
    let start = scroll_start(&all, view.selected, visible);

    let mut lines: Vec<Line> = Vec::new();
    let mut hits = Vec::new();
    for (i, row) in all.iter().skip(start).take(visible).enumerate() {
        let line = match *row {
            Row::Header(kind) => Line::from(Span::styled(
                format!(" {}", kind.group_title()),
                Style::default()
                    .fg(theme.dim)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )),
            Row::Entry(flat, item) => {
                hits.push((area.y + 1 + i as u16, flat));
                entry_line(item, flat == view.selected, inner_w, theme)
            }
        };
        lines.push(line);
    }

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        area,
    );
    hits
}

fn entry_line(item: &MentionItem, selected: bool, width: usize, theme: &Theme) -> Line<'static> {
    let bg = if selected { theme.selection_bg } else { theme.background };
    let base = if selected {
        Style::default()
            .fg(theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(bg)
    };
    let label_style = if item.completed {
        base.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else {
        base
    };

    let prefix = if selected { " \u{25B8} " } else { "   " };
    let icon = format!("{} ", item_icon(item));
    let meta = match (&item.meta, item.completed) {
        (Some(meta), true) => format!("\u{2713} {} ", meta),
        (Some(meta), false) => format!("{} ", meta),
        (None, true) => "\u{2713} ".to_string(),
        (None, false) => String::new(),
    };

    let fixed = display_width(prefix) + display_width(&icon) + display_width(&meta);
    let label_room = width.saturating_sub(fixed);
    let label = truncate_to_width(&item.label, label_room);
    let pad = label_room.saturating_sub(display_width(&label));

    Line::from(vec![
        Span::styled(prefix, base),
        Span::styled(icon, base.fg(theme.badge_color(item.kind))),
        Span::styled(label, label_style),
        Span::styled(" ".repeat(pad), base),
        Span::styled(meta, Style::default().fg(theme.dim).bg(bg)),
    ])
}
