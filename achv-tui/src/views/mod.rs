//! View rendering dispatch.

pub mod form;
pub mod results;

use crate::state::{App, Focus};
use crate::widgets::StatusIndicator;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of the form panel, borders included.
const FORM_HEIGHT: u16 = 7;

pub fn render_app(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    if app.form_visible {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
            .split(layout[1]);
        form::render(f, app, body[0]);
        results::render(f, app, body[1]);
    } else {
        results::render(f, app, layout[1]);
    }

    render_footer(f, app, layout[2]);
}

/// Border style for a panel, highlighted when it has focus.
pub(crate) fn panel_border(app: &App, panel: Focus) -> Style {
    if app.focus == panel {
        Style::default().fg(app.palette.border_focus)
    } else {
        Style::default().fg(app.palette.border)
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let subject = app
        .results
        .request
        .as_ref()
        .map(|request| request.identity.to_string())
        .unwrap_or_else(|| "no lookup yet".to_string());
    let filter = if app.hide_completed {
        "completed hidden"
    } else {
        "showing all"
    };
    let title = Line::from(vec![
        Span::styled(
            "achv",
            Style::default()
                .fg(app.palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" | {} | {}", subject, filter),
            Style::default().fg(app.palette.text_dim),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.palette.border))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let status = StatusIndicator {
        label: "Looking up progress...",
        busy: app.is_loading(),
        tick: app.ticks,
        style: Style::default().fg(app.palette.info),
    };
    status.render(f, inner);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match app.focus {
        Focus::Form => "Tab/Shift-Tab field • ←/→ cycle • Enter look up • Esc results • Ctrl-C quit",
        Focus::Results => {
            "j/k move • Space/Enter fold • c hide completed • m export • f form • Esc form • q quit"
        }
    };
    let (text, style) = match app.notifications.last() {
        Some(note) => {
            let color = match note.level {
                crate::notifications::NotificationLevel::Info => app.palette.info,
                crate::notifications::NotificationLevel::Warning => app.palette.warning,
                crate::notifications::NotificationLevel::Error => app.palette.error,
                crate::notifications::NotificationLevel::Success => app.palette.success,
            };
            (
                format!("{}: {}", note.level.label(), note.message),
                Style::default().fg(color),
            )
        }
        None => (help.to_string(), Style::default().fg(app.palette.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.palette.border)),
        )
        .style(style);
    f.render_widget(footer, area);
}
