use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, ThreadHit};
use crate::util::unicode::to_cells;

use super::content::{RenderOptions, RenderedContent, render_comment_content};

/// Render submitted comments, newest at the bottom. Records where each
/// badge landed so clicks can find it.
pub fn render_thread(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    app.thread_hits.clear();

    if app.comments.is_empty() {
        let line = Line::from(Span::styled(
            " No comments yet",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    let options = RenderOptions {
        avatars: Some(&app.avatars),
        theme: Some(&app.theme),
    };
    let mut lines: Vec<Line> = Vec::new();
    let mut hits: Vec<ThreadHit> = Vec::new();
    for (i, comment) in app.comments.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            comment.author.clone(),
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )));
        let rendered = render_comment_content(&comment.content, None, Some(options));
        if let RenderedContent::Rich(rich) = &rendered {
            let top = to_cells(lines.len());
            hits.extend(rich.hits.iter().map(|h| ThreadHit {
                row: top.saturating_add(h.row),
                col_start: h.col_start,
                col_end: h.col_end,
                token: h.token.clone(),
            }));
        }
        lines.extend(rendered.lines(&app.theme));
    }

    // Bottom-align: skip whatever does not fit
    let skip = to_cells(lines.len().saturating_sub(area.height as usize));
    for hit in hits {
        if hit.row >= skip {
            app.thread_hits.push(ThreadHit {
                row: area.y.saturating_add(hit.row - skip),
                col_start: area.x + hit.col_start,
                col_end: area.x + hit.col_end,
                token: hit.token,
            });
        }
    }
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(bg))
            .scroll((skip, 0)),
        area,
    );
}
