//! Loading indicator widget.

use ratatui::{layout::Rect, style::Style, text::Span, widgets::Paragraph, Frame};

const SPINNER: &[&str] = &["|", "/", "-", "\\"];

pub struct StatusIndicator<'a> {
    pub label: &'a str,
    pub busy: bool,
    pub tick: u64,
    pub style: Style,
}

impl<'a> StatusIndicator<'a> {
    pub fn text(&self) -> String {
        if self.busy {
            let frame = SPINNER[(self.tick % SPINNER.len() as u64) as usize];
            format!("{} {}", frame, self.label)
        } else {
            String::new()
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(Span::styled(self.text(), self.style));
        f.render_widget(paragraph, area);
    }
}
