//! Lookup form panel.

use crate::state::{App, Focus, FormField};
use crate::views::panel_border;
use crate::widgets::ChoiceRow;
use achv_core::Region;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let lines: Vec<Line> = FormField::all()
        .iter()
        .map(|&field| field_line(app, field))
        .collect();

    let block = Block::default()
        .title(" Lookup ")
        .borders(Borders::ALL)
        .border_style(panel_border(app, Focus::Form));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(app: &App, field: FormField) -> Line<'static> {
    let focused = app.focus == Focus::Form && app.form.focused == field;
    let label_style = if focused {
        Style::default()
            .fg(app.palette.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.palette.text_dim)
    };
    let cursor = if focused { "›" } else { " " };
    let mut spans = vec![Span::styled(
        format!("{} {:<12}", cursor, field.label()),
        label_style,
    )];

    match field {
        FormField::Region => {
            let names: Vec<&str> = Region::all().iter().map(Region::as_str).collect();
            let row = ChoiceRow {
                choices: &names,
                selected: ChoiceRow::position_of(&names, app.form.region.as_str()),
                selected_style: Style::default()
                    .fg(app.palette.bg)
                    .bg(app.palette.primary),
                style: Style::default().fg(app.palette.text_dim),
            };
            spans.extend(row.spans());
        }
        FormField::Realm => {
            spans.push(value_span(app, &app.form.realm, focused));
            let known = app
                .realms
                .position(app.form.region, &app.form.realm)
                .is_some();
            if !app.form.realm.is_empty() && !known {
                spans.push(Span::styled(
                    "  (not in realm list)",
                    Style::default().fg(app.palette.warning),
                ));
            }
        }
        FormField::Character => spans.push(value_span(app, &app.form.character, focused)),
        FormField::Achievement => {
            spans.push(value_span(app, &app.form.achievement, focused));
            let hint = match app.form.suggestion_name() {
                Some(name) => format!("  {}", name),
                None if app.form.achievement.trim().is_empty() => {
                    "  (optional, ←/→ for suggestions)".to_string()
                }
                None => String::new(),
            };
            spans.push(Span::styled(hint, Style::default().fg(app.palette.text_dim)));
        }
    }
    Line::from(spans)
}

fn value_span(app: &App, value: &str, focused: bool) -> Span<'static> {
    let text = if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    };
    Span::styled(text, Style::default().fg(app.palette.text))
}
