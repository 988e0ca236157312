//! Theme configuration - Monochrome grayscale

pub mod palette;

pub use palette::Palette;
use ratatui::symbols::border;

/// Active theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn new() -> Self {
        Self {
            palette: Palette::MONO,
        }
    }

    /// Rounded corners everywhere
    pub fn border_set(&self) -> border::Set<'static> {
        border::ROUNDED
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the theme (always Mono)
pub fn get_theme() -> Theme {
    Theme::new()
}
