use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::editor::MentionEditor;
use crate::model::{Catalog, Config, MentionToken, MentionUserAvatarLookup};
use crate::parse::extract_mentions;

use super::input;
use super::render;
use super::render::editor_view::EditorView;
use super::theme::Theme;

/// A submitted comment in the thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub content: String,
}

/// A badge drawn in the thread, in screen coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadHit {
    pub row: u16,
    pub col_start: u16,
    pub col_end: u16,
    pub token: MentionToken,
}

/// Main application state
pub struct App {
    pub theme: Theme,
    pub config: Config,
    pub avatars: MentionUserAvatarLookup,
    pub author: String,
    pub comments: Vec<Comment>,
    pub composer: MentionEditor,
    pub status: Option<String>,
    pub should_quit: bool,
    /// Composer text area (inside the border), set during render
    pub composer_area: Option<Rect>,
    /// Composer outer area; the dropdown is placed against it
    pub composer_frame: Option<Rect>,
    pub composer_scroll: u16,
    pub editor_view: EditorView,
    /// Screen row and flat index of each visible dropdown entry
    pub dropdown_rows: Vec<(u16, usize)>,
    pub dropdown_area: Option<Rect>,
    pub thread_hits: Vec<ThreadHit>,
}

impl App {
    pub fn new(catalog: &Catalog, config: Config, author: impl Into<String>) -> Self {
        let avatars = catalog.avatar_lookup();
        let mut composer = MentionEditor::new("", catalog.mention_items())
            .with_avatars(avatars.clone())
            .with_config(config.editor.clone());
        composer.focus();
        App {
            theme: Theme::from_config(&config.ui),
            config,
            avatars,
            author: author.into(),
            comments: Vec::new(),
            composer,
            status: None,
            should_quit: false,
            composer_area: None,
            composer_frame: None,
            composer_scroll: 0,
            editor_view: EditorView::default(),
            dropdown_rows: Vec::new(),
            dropdown_area: None,
            thread_hits: Vec::new(),
        }
    }

    /// Post the composer's content to the thread and clear it.
    /// Blank content is ignored.
    pub fn submit(&mut self) -> bool {
        let content = self.composer.value();
        if content.trim().is_empty() {
            return false;
        }
        tracing::info!(
            len = content.len(),
            mentions = extract_mentions(&content).len(),
            "comment submitted"
        );
        self.comments.push(Comment {
            author: self.author.clone(),
            content,
        });
        self.composer.sync_value("");
        self.composer.focus();
        self.status = None;
        true
    }

    /// Show a clicked mention in the status row
    pub fn show_mention(&mut self, token: &MentionToken) {
        self.status = Some(format!("{} \u{2192} {}", token.kind, token.label));
    }
}

/// Run the composer until the user quits. Returns the submitted comments.
pub fn run(
    catalog: &Catalog,
    config: Config,
    author: String,
    initial: &str,
) -> Result<Vec<Comment>, Box<dyn std::error::Error>> {
    let mut app = App::new(catalog, config, author);
    if !initial.is_empty() {
        app.composer.sync_value(initial);
        app.composer.set_cursor(initial.len());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    tracing::info!("composer started");
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;
    Ok(app.comments)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse, Instant::now()),
                Event::Resize(_, _) => {
                    app.composer.viewport_changed();
                }
                _ => {}
            }
        }

        app.composer.tick(Instant::now());
        if app.composer.take_focus_request() {
            app.composer.focus();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
