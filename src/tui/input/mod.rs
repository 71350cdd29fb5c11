mod common;

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::editor::{ClickOutcome, EditorState, KeyDisposition};

use super::app::App;
use common::{clipboard_get, normalize_key};

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    let key = normalize_key(key);

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        app.should_quit = true;
        return;
    }

    // The open dropdown gets first look
    if let KeyDisposition::Consumed(_) = app.composer.key_down(key) {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            if app.composer.state() == EditorState::Suggesting {
                app.composer.click_outside();
            } else if app.status.is_some() {
                app.status = None;
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Enter if key.modifiers.is_empty() => {
            app.submit();
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => insert_newline(app),
        KeyCode::Char('j') if ctrl => insert_newline(app),
        KeyCode::Char('v') if ctrl => match clipboard_get() {
            Some(text) => handle_paste(app, &text),
            None => tracing::warn!("clipboard is empty or unavailable"),
        },
        _ => {
            app.composer.apply_default(key);
        }
    }
}

fn insert_newline(app: &mut App) {
    app.composer
        .apply_default(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
}

/// Handle a bracketed paste event (terminal sends pasted text as a single string).
pub fn handle_paste(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    app.composer.paste(text);
}

/// Handle a mouse event: picks in the dropdown, badge clicks, caret placement.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
            app.composer.viewport_changed();
        }
        MouseEventKind::Down(MouseButton::Left) => click(app, mouse.column, mouse.row, now),
        _ => {}
    }
}

fn click(app: &mut App, col: u16, row: u16, now: Instant) {
    let at = Position::new(col, row);

    if let Some(area) = app.dropdown_area
        && area.contains(at)
    {
        if let Some(&(_, flat)) = app.dropdown_rows.iter().find(|(y, _)| *y == row) {
            app.composer.select(flat);
        }
        return;
    }

    if let Some(area) = app.composer_area
        && area.contains(at)
    {
        let rel_col = col - area.x;
        let rel_row = row - area.y + app.composer_scroll;
        if let Some(path) = app.editor_view.badge_at(rel_col, rel_row).map(<[usize]>::to_vec) {
            if let ClickOutcome::Mention(token) = app.composer.click(&path, now) {
                app.show_mention(&token);
            }
            return;
        }
        if let Some(offset) = app.editor_view.offset_at(rel_col, rel_row) {
            app.composer.focus();
            app.composer.set_cursor(offset);
        }
        return;
    }

    app.composer.click_outside();
    if let Some(token) = app
        .thread_hits
        .iter()
        .find(|h| h.row == row && col >= h.col_start && col < h.col_end)
        .map(|h| h.token.clone())
    {
        app.show_mention(&token);
    }
}
