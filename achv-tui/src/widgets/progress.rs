//! Progress gauge for count/total criteria.

use crate::theme::{progress_color, Palette};
use achv_core::Progress;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
    Frame,
};

pub struct ProgressBar<'a> {
    pub title: &'a str,
    pub count: u64,
    pub total: u64,
    pub palette: &'a Palette,
}

impl<'a> ProgressBar<'a> {
    pub fn from_progress(title: &'a str, progress: Progress, palette: &'a Palette) -> Self {
        Self {
            title,
            count: progress.count,
            total: progress.total,
            palette,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.count as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let ratio = self.ratio();
        let gauge = Gauge::default()
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .gauge_style(Style::default().fg(progress_color(ratio, self.palette)))
            .label(format!("{}/{}", self.count, self.total))
            .ratio(ratio);
        f.render_widget(gauge, area);
    }
}
