use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::editor::EditorState;
use crate::tui::app::App;

const IDLE_HINTS: &str = "Enter send  Alt+Enter newline  @ mention  Esc quit";
const SUGGEST_HINTS: &str = "\u{2191}\u{2193} choose  Enter/Tab insert  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let line = if let Some(ref status) = app.status {
        Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ))
    } else if app.config.ui.show_key_hints {
        let hints = match app.composer.state() {
            EditorState::Idle => IDLE_HINTS,
            EditorState::Suggesting => SUGGEST_HINTS,
        };
        Line::from(Span::styled(
            format!(" {}", hints),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
