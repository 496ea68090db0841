//! Terminal styles.
use anstyle::Color;
use anstyle::RgbColor;
use anstyle::Style;

/// Styles.
pub struct Styles {
    /// Classification label.
    pub label: Style,
    /// Disposal instructions and answers.
    pub answer: Style,
    /// Progress messages.
    pub status: Style,
    /// Retrieved sources.
    pub source: Style,
    /// Errors.
    pub error: Style,
    /// Dialogue prompt.
    pub prompt: Style,
}

impl Styles {

    /// Load styles; all plain when `color` is false.
    pub fn new(color: bool) -> Self {
        if !color {
            return Self {
                label: Style::new(),
                answer: Style::new(),
                status: Style::new(),
                source: Style::new(),
                error: Style::new(),
                prompt: Style::new(),
            };
        }

        let green = Color::Rgb(RgbColor(64, 128, 64));
        let blue = Color::Rgb(RgbColor(64, 96, 160));
        let red = Color::Rgb(RgbColor(192, 32, 32));
        let white = Color::Rgb(RgbColor(255, 255, 255));

        Self {
            label: Style::new().bold(),
            answer: Style::new().fg_color(Some(blue)),
            status: Style::new().dimmed(),
            source: Style::new().dimmed().italic(),
            error: Style::new().bold().fg_color(Some(red)),
            prompt: Style::new().bold().bg_color(Some(green)).fg_color(Some(white)),
        }
    }
}
