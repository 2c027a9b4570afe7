//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, String)>,
    /// Lines shown under the fields, such as criteria lists.
    pub extra: Vec<Line<'a>>,
    pub label_style: Style,
    pub border: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let width = self
            .fields
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}  ", label, width = width), self.label_style),
                    Span::raw(value.clone()),
                ])
            })
            .collect();
        if !self.extra.is_empty() {
            lines.push(Line::default());
            lines.extend(self.extra.iter().cloned());
        }

        let widget = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
