//! Color palettes and status color helpers.

use ratatui::style::Color;

/// Theme names accepted by `theme.name` in the config file.
pub const THEME_NAMES: &[&str] = &["midnight", "daylight"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Palette {
    /// Look up a palette by config name, case-insensitively.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "midnight" => Some(Self::midnight()),
            "daylight" => Some(Self::daylight()),
            _ => None,
        }
    }

    pub fn midnight() -> Self {
        Self {
            bg: Color::Rgb(12, 14, 20),
            bg_highlight: Color::Rgb(40, 44, 58),
            primary: Color::Rgb(255, 196, 0),
            primary_dim: Color::Rgb(140, 108, 0),
            secondary: Color::Rgb(120, 170, 255),
            success: Color::Rgb(30, 255, 0),
            warning: Color::Rgb(255, 200, 60),
            error: Color::Rgb(255, 70, 70),
            info: Color::Rgb(120, 170, 255),
            text: Color::Rgb(235, 235, 235),
            text_dim: Color::Rgb(130, 130, 140),
            border: Color::Rgb(70, 74, 90),
            border_focus: Color::Rgb(255, 196, 0),
        }
    }

    pub fn daylight() -> Self {
        Self {
            bg: Color::Rgb(250, 250, 245),
            bg_highlight: Color::Rgb(225, 228, 235),
            primary: Color::Rgb(150, 90, 0),
            primary_dim: Color::Rgb(190, 150, 80),
            secondary: Color::Rgb(20, 80, 170),
            success: Color::Rgb(20, 130, 20),
            warning: Color::Rgb(170, 110, 0),
            error: Color::Rgb(190, 20, 20),
            info: Color::Rgb(20, 80, 170),
            text: Color::Rgb(20, 20, 25),
            text_dim: Color::Rgb(110, 110, 120),
            border: Color::Rgb(180, 180, 190),
            border_focus: Color::Rgb(150, 90, 0),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::midnight()
    }
}

/// Row color for a node given its propagated completion state.
pub fn completion_color(effective_done: bool, palette: &Palette) -> Color {
    if effective_done {
        palette.success
    } else {
        palette.text
    }
}

/// Gauge color for a partially completed criterion.
pub fn progress_color(ratio: f64, palette: &Palette) -> Color {
    if ratio >= 1.0 {
        palette.success
    } else if ratio >= 0.5 {
        palette.primary
    } else {
        palette.warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_name_resolves() {
        for name in THEME_NAMES {
            assert!(Palette::named(name).is_some(), "{name}");
        }
        assert_eq!(Palette::named(" MIDNIGHT "), Some(Palette::midnight()));
        assert!(Palette::named("synthwave").is_none());
    }

    #[test]
    fn test_progress_color_thresholds() {
        let palette = Palette::default();
        assert_eq!(progress_color(0.1, &palette), palette.warning);
        assert_eq!(progress_color(0.5, &palette), palette.primary);
        assert_eq!(progress_color(1.0, &palette), palette.success);
        assert_eq!(completion_color(true, &palette), palette.success);
    }
}
