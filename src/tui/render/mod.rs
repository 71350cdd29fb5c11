pub mod badge;
pub mod composer;
pub mod content;
pub mod dropdown;
pub mod editor_view;
pub mod status_row;
pub mod thread_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Rows the composer takes, border included
const COMPOSER_MIN: u16 = 3;
const COMPOSER_MAX: u16 = 8;

/// Main render function — dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let composer_rows = composer::wanted_height(app).clamp(COMPOSER_MIN, COMPOSER_MAX);

    // Layout: thread | composer | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(composer_rows),
            Constraint::Length(1),
        ])
        .split(area);

    thread_view::render_thread(frame, app, chunks[0]);
    composer::render_composer(frame, app, chunks[1]);

    // Suggestion dropdown (rendered on top of everything but the status row)
    composer::render_suggestions(frame, app, area);

    status_row::render_status_row(frame, app, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string, sample_app};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            crate::tui::input::handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_empty_screen() {
        let mut app = sample_app();
        app.config.ui.show_key_hints = true;
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), TERM_H as usize);
        assert_eq!(lines[0], " No comments yet");
        assert_eq!(lines[12], format!("\u{250C} Comment {}\u{2510}", "\u{2500}".repeat(49)));
        assert_eq!(lines[13], format!("\u{2502}{:<58}\u{2502}", "Write a comment, @ to mention"));
        assert_eq!(lines[15], " Enter send  Alt+Enter newline  @ mention  Esc quit");
        assert_eq!(app.composer_area, Some(ratatui::layout::Rect::new(1, 13, 58, 1)));
    }

    #[test]
    fn test_dropdown_opens_above_composer() {
        let mut app = sample_app();
        type_str(&mut app, "ping @s");
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        // "s" matches the task "Ship it" and the member "Sam Lee"
        assert!(output.contains("Ship it"));
        assert!(output.contains("Sam Lee"));
        assert!(!output.contains("Brief.pdf"));
        assert!(app.dropdown_area.is_some_and(|a| a.y + a.height <= app.composer_frame.unwrap().y));
        assert_eq!(app.dropdown_rows.len(), 2);
    }

    #[test]
    fn test_no_dropdown_without_matches() {
        let mut app = sample_app();
        type_str(&mut app, "ping @zzz");
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert_eq!(app.composer.state(), crate::editor::EditorState::Suggesting);
        assert_eq!(app.dropdown_area, None);
        assert!(app.dropdown_rows.is_empty());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], " No comments yet");
        assert!(lines[1..12].iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_submitted_comment_shows_badges() {
        let mut app = sample_app();
        app.composer.paste("see @[file:Brief.pdf]");
        app.submit();
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.contains("you"));
        assert!(output.contains("see \u{25A4} Brief.pdf"));
        assert_eq!(app.thread_hits.len(), 1);
    }
}
