use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::to_cells;

use super::dropdown::{dropdown_height, render_dropdown};
use super::editor_view::layout_editor;

const PLACEHOLDER: &str = "Write a comment, @ to mention";

/// Rows the composer would like: its lines plus the border
pub fn wanted_height(app: &App) -> u16 {
    let view = layout_editor(&app.composer, &app.theme, Instant::now());
    to_cells(view.lines.len()).saturating_add(2)
}

pub fn render_composer(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let border = if app.composer.is_focused() {
        app.theme.selection_border
    } else {
        app.theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Comment ")
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    app.composer_frame = Some(area);
    app.composer_area = Some(inner);

    let view = layout_editor(&app.composer, &app.theme, Instant::now());

    // Keep the caret row on screen
    if let Some((_, row)) = view.cursor {
        if row < app.composer_scroll {
            app.composer_scroll = row;
        } else if inner.height > 0 && row >= app.composer_scroll + inner.height {
            app.composer_scroll = row + 1 - inner.height;
        }
    }

    let lines = if app.composer.dom().is_empty() {
        vec![Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(app.theme.dim).bg(bg),
        ))]
    } else {
        view.lines.clone()
    };
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(bg))
            .scroll((app.composer_scroll, 0)),
        area,
    );

    if let Some((col, row)) = view.cursor
        && row >= app.composer_scroll
    {
        let x = inner.x + col.min(inner.width.saturating_sub(1));
        let y = inner.y + row - app.composer_scroll;
        frame.set_cursor_position(Position::new(x, y));
    }
    app.editor_view = view;
}

/// Place and draw the suggestion dropdown against the composer. An empty
/// list keeps the session open but draws nothing.
pub fn render_suggestions(frame: &mut Frame, app: &mut App, viewport: Rect) {
    app.dropdown_rows.clear();
    app.dropdown_area = None;
    let Some(editor_area) = app.composer_frame else {
        return;
    };
    let max_visible = app.config.editor.max_visible;
    let Some(height) = app
        .composer
        .suggestions()
        .filter(|view| view.total > 0)
        .map(|view| dropdown_height(&view, max_visible))
    else {
        return;
    };

    app.composer.record_dropdown_height(height);
    let Some(placement) = app.composer.dropdown_frame(editor_area, viewport) else {
        return;
    };
    if let Some(view) = app.composer.suggestions() {
        app.dropdown_rows = render_dropdown(frame, &view, placement.area, &app.theme);
        app.dropdown_area = Some(placement.area);
    }
}
