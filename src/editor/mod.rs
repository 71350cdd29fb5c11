//! The live mention editor.
//!
//! [`MentionEditor`] wraps an [`EditorDom`] and drives the `@`-suggestion
//! session on top of it. The host feeds it key, paste, composition and
//! click events and receives the new value whenever one should be emitted;
//! it pushes values back in with [`MentionEditor::sync_value`].

pub mod dropdown;
pub mod suggest;

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use crate::dom::{DomPosition, EditorDom};
use crate::model::{EditorConfig, MentionItem, MentionToken, MentionUserAvatarLookup};
use crate::parse::{detect_mention_query, floor_char_boundary};
use crate::util::unicode;

pub use dropdown::{DropdownPlacement, DropdownSide, DropdownTracker, place_dropdown};
pub use suggest::{SuggestionGroup, SuggestionSession, filter_items, group_suggestions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Suggesting,
}

/// What the editor did with a key while suggestions were up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Handled; carries the new value when the key changed it
    Consumed(Option<String>),
    /// Not ours; the host should run its own handling
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Mention(MentionToken),
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pulse {
    path: Vec<usize>,
    until: Instant,
}

/// Read-only view of the open suggestion list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionsView<'a> {
    pub query: &'a str,
    pub groups: Vec<SuggestionGroup<'a>>,
    pub selected: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct MentionEditor {
    dom: EditorDom,
    /// None while focus is elsewhere
    selection: Option<DomPosition>,
    items: Vec<MentionItem>,
    avatars: Option<MentionUserAvatarLookup>,
    config: EditorConfig,
    last_emitted: String,
    last_cursor: usize,
    session: Option<SuggestionSession>,
    filtered: Vec<usize>,
    composing: bool,
    pulse: Option<Pulse>,
    dropdown: DropdownTracker,
    focus_requested: bool,
}

impl MentionEditor {
    pub fn new(value: impl Into<String>, items: Vec<MentionItem>) -> Self {
        let value = value.into();
        MentionEditor {
            dom: EditorDom::from_value(&value, None),
            selection: None,
            items,
            avatars: None,
            config: EditorConfig::default(),
            last_cursor: value.len(),
            last_emitted: value,
            session: None,
            filtered: Vec::new(),
            composing: false,
            pulse: None,
            dropdown: DropdownTracker::default(),
            focus_requested: false,
        }
    }

    pub fn with_avatars(mut self, avatars: MentionUserAvatarLookup) -> Self {
        self.avatars = Some(avatars);
        self.rebuild(self.dom.extract());
        self
    }

    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn value(&self) -> String {
        self.dom.extract()
    }

    pub fn dom(&self) -> &EditorDom {
        &self.dom
    }

    pub fn items(&self) -> &[MentionItem] {
        &self.items
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&DomPosition> {
        self.selection.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.selection.is_some()
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn state(&self) -> EditorState {
        if self.session.is_some() {
            EditorState::Suggesting
        } else {
            EditorState::Idle
        }
    }

    pub fn session(&self) -> Option<&SuggestionSession> {
        self.session.as_ref()
    }

    /// Caret offset into the value; 0 without focus
    pub fn cursor_offset(&self) -> usize {
        self.dom.cursor_offset(self.selection.as_ref())
    }

    /// The caret if focused, otherwise where it was last seen
    fn caret_or_last(&self) -> usize {
        match self.selection {
            Some(_) => self.cursor_offset(),
            None => self.last_cursor,
        }
    }

    // Focus

    pub fn focus(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(self.dom.position_at(self.last_cursor));
        }
    }

    pub fn blur(&mut self) {
        if self.selection.is_some() {
            self.last_cursor = self.cursor_offset();
            self.selection = None;
        }
        self.close_session();
    }

    /// Deferred re-focus after a commit. Returns true once per request.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Replace the raw selection, e.g. when the host reports one.
    pub fn set_selection(&mut self, selection: Option<DomPosition>) {
        if self.selection.is_some() {
            self.last_cursor = self.cursor_offset();
        }
        self.selection = selection;
        self.revalidate_session();
    }

    /// Move the caret to a value offset (snapping out of badges).
    pub fn set_cursor(&mut self, offset: usize) {
        let pos = self.dom.position_at(offset);
        self.selection = Some(pos);
        self.last_cursor = self.cursor_offset();
        self.revalidate_session();
    }

    // Value

    /// Push a value in from outside.
    ///
    /// Ignored while composing or when it is the value this editor last
    /// emitted; otherwise the tree is rebuilt and the caret kept at the same
    /// offset where possible. Returns true if the tree was rebuilt.
    pub fn sync_value(&mut self, value: &str) -> bool {
        if self.composing || value == self.last_emitted {
            return false;
        }
        let caret = self.caret_or_last().min(value.len());
        self.rebuild(value.to_string());
        self.last_emitted = value.to_string();
        self.last_cursor = floor_char_boundary(value, caret);
        if self.selection.is_some() {
            self.selection = Some(self.dom.position_at(self.last_cursor));
        }
        self.close_session();
        tracing::trace!(len = value.len(), "value synced from host");
        true
    }

    pub fn set_items(&mut self, items: Vec<MentionItem>) {
        self.items = items;
        if let Some(session) = &self.session {
            self.filtered = filter_items(&self.items, &session.query);
            let len = self.filtered.len();
            if let Some(session) = &mut self.session {
                session.selected = session.selected.min(len.saturating_sub(1));
            }
        }
    }

    fn rebuild(&mut self, value: String) {
        self.dom = EditorDom::from_value(&value, self.avatars.as_ref());
    }

    // Input

    /// The tree changed through an edit. Emits the new value unless a
    /// composition is in progress, and rescans for a mention query.
    pub fn input(&mut self) -> Option<String> {
        if self.composing {
            return None;
        }
        let value = self.dom.extract();
        self.last_emitted = value.clone();
        if self.selection.is_some() {
            self.last_cursor = self.cursor_offset();
        }
        self.rescan(&value);
        Some(value)
    }

    fn rescan(&mut self, value: &str) {
        let cursor = self.caret_or_last();
        match detect_mention_query(value, cursor) {
            Some(found) => {
                let changed = self
                    .session
                    .as_ref()
                    .is_none_or(|s| s.query != found.query || s.anchor != found.anchor);
                if !changed {
                    return;
                }
                self.filtered = filter_items(&self.items, &found.query);
                if self.session.is_none() {
                    tracing::debug!(anchor = found.anchor, query = %found.query, "suggestion session opened");
                    self.dropdown.open();
                } else {
                    // the list may have a new height
                    self.dropdown.viewport_changed();
                }
                self.session = Some(SuggestionSession::new(found.anchor, found.query));
            }
            None => self.close_session(),
        }
    }

    /// After caret motion: keep the session only if the caret is still in
    /// the same query. Motion never opens a session.
    fn revalidate_session(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let anchor = session.anchor;
        let value = self.dom.extract();
        match detect_mention_query(&value, self.caret_or_last()) {
            Some(found) if found.anchor == anchor => {
                if found.query != session.query {
                    self.filtered = filter_items(&self.items, &found.query);
                    self.session = Some(SuggestionSession::new(found.anchor, found.query));
                }
            }
            _ => self.close_session(),
        }
    }

    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(query = %session.query, "suggestion session closed");
        }
        self.filtered.clear();
        self.dropdown.close();
    }

    /// Keyboard while suggestions may be up.
    ///
    /// With a non-empty list: Down/Up cycle, Enter (no modifiers) or Tab
    /// commits, Esc cancels. Everything else is forwarded.
    pub fn key_down(&mut self, key: KeyEvent) -> KeyDisposition {
        let Some(session) = &mut self.session else {
            return KeyDisposition::Forward;
        };
        let len = self.filtered.len();
        if len == 0 {
            return KeyDisposition::Forward;
        }
        match key.code {
            KeyCode::Down => {
                session.move_down(len);
                KeyDisposition::Consumed(None)
            }
            KeyCode::Up => {
                session.move_up(len);
                KeyDisposition::Consumed(None)
            }
            KeyCode::Enter if key.modifiers.is_empty() => {
                let selected = session.selected;
                KeyDisposition::Consumed(self.select(selected))
            }
            KeyCode::Tab => {
                let selected = session.selected;
                KeyDisposition::Consumed(self.select(selected))
            }
            KeyCode::Esc => {
                self.close_session();
                KeyDisposition::Consumed(None)
            }
            _ => KeyDisposition::Forward,
        }
    }

    /// Commit the suggestion at flat index `index`.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let item_index = *self.filtered.get(index)?;
        let item = self.items.get(item_index)?.clone();
        self.commit(&item)
    }

    fn commit(&mut self, item: &MentionItem) -> Option<String> {
        let anchor = self.session.as_ref()?.anchor;
        let value = self.dom.extract();
        let cursor = floor_char_boundary(&value, self.caret_or_last());
        if anchor > cursor || !value.is_char_boundary(anchor) {
            tracing::warn!(anchor, cursor, "suggestion anchor is past the caret, dropping session");
            self.close_session();
            return None;
        }

        let encoded = item.token().encode();
        let mut next = String::with_capacity(value.len() + encoded.len() + 1);
        next.push_str(&value[..anchor]);
        next.push_str(&encoded);
        next.push(' ');
        next.push_str(&value[cursor..]);
        let caret = anchor + encoded.len() + 1;

        self.close_session();
        self.rebuild(next.clone());
        self.selection = Some(self.dom.position_at(caret));
        self.last_cursor = caret;
        self.last_emitted = next.clone();
        self.focus_requested = true;
        tracing::debug!(token = %encoded, id = %item.id, "mention committed");
        Some(next)
    }

    /// Native editing for keys the editor did not consume. Returns the new
    /// value if the key changed it.
    pub fn apply_default(&mut self, key: KeyEvent) -> Option<String> {
        let pos = self.selection.clone()?;
        let text_key = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let edited = match key.code {
            KeyCode::Char(c) if text_key => self.dom.insert_text(&pos, &c.to_string()),
            KeyCode::Enter => self.dom.insert_break(&pos),
            KeyCode::Backspace => self.dom.delete_backward(&pos),
            KeyCode::Delete => self.dom.delete_forward(&pos),
            KeyCode::Left => return self.move_to(self.dom.step_left(self.cursor_offset())),
            KeyCode::Right => return self.move_to(self.dom.step_right(self.cursor_offset())),
            KeyCode::Home => {
                let value = self.dom.extract();
                return self.move_to(unicode::line_start(&value, self.cursor_offset()));
            }
            KeyCode::End => {
                let value = self.dom.extract();
                return self.move_to(unicode::line_end(&value, self.cursor_offset()));
            }
            KeyCode::Up => return self.move_to(self.vertical_target(true)),
            KeyCode::Down => return self.move_to(self.vertical_target(false)),
            _ => return None,
        };
        match edited {
            Some(next) => {
                self.selection = Some(next);
                self.input()
            }
            None => {
                tracing::trace!(?pos, "edit at stale position ignored");
                None
            }
        }
    }

    fn move_to(&mut self, offset: usize) -> Option<String> {
        self.set_cursor(offset);
        None
    }

    /// Same byte column on the previous or next line, clamped to its end
    fn vertical_target(&self, up: bool) -> usize {
        let value = self.dom.extract();
        let cursor = self.cursor_offset();
        let start = unicode::line_start(&value, cursor);
        let column = cursor - start;
        if up {
            if start == 0 {
                return 0;
            }
            let prev = unicode::line_start(&value, start - 1);
            (prev + column).min(start - 1)
        } else {
            let end = unicode::line_end(&value, cursor);
            if end == value.len() {
                return value.len();
            }
            let next = end + 1;
            (next + column).min(unicode::line_end(&value, next))
        }
    }

    // Paste and composition

    /// Insert pasted text at the caret. Without a caret in the editor the
    /// text is spliced into the value at the last known cursor offset and
    /// the tree rebuilt.
    pub fn paste(&mut self, text: &str) -> Option<String> {
        if let Some(pos) = self.selection.clone()
            && let Some(next) = self.dom.insert_text(&pos, text)
        {
            self.selection = Some(next);
            return self.input();
        }

        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let value = self.dom.extract();
        let at = floor_char_boundary(&value, self.last_cursor);
        tracing::warn!(at, "no caret in editor, splicing paste at last cursor");
        let mut next = String::with_capacity(value.len() + text.len());
        next.push_str(&value[..at]);
        next.push_str(&text);
        next.push_str(&value[at..]);

        self.rebuild(next.clone());
        self.last_cursor = at + text.len();
        self.selection = Some(self.dom.position_at(self.last_cursor));
        self.input()
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    /// Composed text lands in the tree but is not emitted yet.
    pub fn composition_update(&mut self, text: &str) {
        if let Some(pos) = self.selection.clone()
            && let Some(next) = self.dom.insert_text(&pos, text)
        {
            self.selection = Some(next);
        }
    }

    pub fn composition_end(&mut self) -> Option<String> {
        self.composing = false;
        self.input()
    }

    // Clicks

    /// A click on the node at `target`. A badge at or above it starts a
    /// pulse and yields its token.
    pub fn click(&mut self, target: &[usize], now: Instant) -> ClickOutcome {
        match self.dom.badge_ancestor(target) {
            Some((path, badge)) => {
                let token = badge.token.clone();
                tracing::debug!(token = %token, "mention clicked");
                self.pulse = Some(Pulse {
                    path,
                    until: now + Duration::from_millis(self.config.pulse_ms),
                });
                ClickOutcome::Mention(token)
            }
            None => ClickOutcome::Passthrough,
        }
    }

    /// Path of the badge currently pulsing
    pub fn pulse_path(&self, now: Instant) -> Option<&[usize]> {
        self.pulse
            .as_ref()
            .filter(|p| now < p.until)
            .map(|p| p.path.as_slice())
    }

    /// Expire the pulse. Returns true when something needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.pulse.as_ref().is_some_and(|p| now >= p.until) {
            self.pulse = None;
            return true;
        }
        false
    }

    pub fn click_outside(&mut self) {
        self.close_session();
    }

    // Dropdown

    pub fn suggestions(&self) -> Option<SuggestionsView<'_>> {
        let session = self.session.as_ref()?;
        Some(SuggestionsView {
            query: &session.query,
            groups: group_suggestions(&self.items, &self.filtered),
            selected: session.selected,
            total: self.filtered.len(),
        })
    }

    /// Run any pending dropdown frame against the editor and viewport areas.
    pub fn dropdown_frame(&mut self, editor: Rect, viewport: Rect) -> Option<DropdownPlacement> {
        self.session.as_ref()?;
        self.dropdown
            .run_frame(editor, viewport, self.config.dropdown_estimate)
    }

    pub fn viewport_changed(&mut self) -> bool {
        self.dropdown.viewport_changed()
    }

    pub fn record_dropdown_height(&mut self, height: u16) {
        self.dropdown.record_height(height);
    }

    pub fn dropdown(&self) -> &DropdownTracker {
        &self.dropdown
    }
}
