use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{Catalog, Config, FileEntry, MemberEntry, TaskEntry};
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 16;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A small catalog with one of each kind plus a second task.
pub fn sample_catalog() -> Catalog {
    Catalog {
        tasks: vec![
            TaskEntry {
                id: "t1".into(),
                title: "Ship it".into(),
                status: Some("In progress".into()),
                completed: false,
            },
            TaskEntry {
                id: "t2".into(),
                title: "Write brief".into(),
                status: Some("Done".into()),
                completed: true,
            },
        ],
        files: vec![FileEntry {
            id: "f1".into(),
            name: "Brief.pdf".into(),
            size: Some(1250),
        }],
        members: vec![MemberEntry {
            id: "u1".into(),
            name: "Sam Lee".into(),
            role: Some("Designer".into()),
            avatar_url: Some("https://example.com/sam.png".into()),
        }],
    }
}

pub fn sample_app() -> App {
    App::new(&sample_catalog(), Config::default(), "you")
}
