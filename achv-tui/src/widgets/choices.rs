//! A row of mutually exclusive choices with the current one highlighted.

use ratatui::{style::Style, text::Span};

pub struct ChoiceRow<'a> {
    pub choices: &'a [&'a str],
    pub selected: Option<usize>,
    pub selected_style: Style,
    pub style: Style,
}

impl<'a> ChoiceRow<'a> {
    /// Index of `value` among the choices, ignoring case.
    pub fn position_of(choices: &[&str], value: &str) -> Option<usize> {
        choices.iter().position(|c| c.eq_ignore_ascii_case(value))
    }

    pub fn spans(&self) -> Vec<Span<'static>> {
        self.choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                if Some(i) == self.selected {
                    Span::styled(format!(" {} ", choice), self.selected_style)
                } else {
                    Span::styled(format!(" {} ", choice), self.style)
                }
            })
            .collect()
    }
}
