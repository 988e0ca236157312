//! Color palette - Monochrome grayscale theme

use ratatui::style::Color;

/// Monochrome grayscale palette
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,
    pub accent: Color,
    pub border: Color,
}

impl Palette {
    /// Monochrome palette - white for what matters, grays for the rest
    pub const MONO: Self = Self {
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff white
        fg_secondary: Color::Rgb(200, 200, 200), // #c8c8c8 light gray
        fg_muted: Color::Rgb(110, 110, 110),     // #6e6e6e gray, sung lines
        accent: Color::Rgb(255, 255, 255),       // #ffffff white
        border: Color::Rgb(64, 64, 64),          // #404040 dark gray
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::MONO
    }
}
