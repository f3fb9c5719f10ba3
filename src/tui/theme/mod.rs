//! Theme selection follows the background's visual mode.

pub mod palette;

use crate::background::VisualMode;
pub use palette::Palette;
use ratatui::symbols::border;

#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn for_mode(mode: VisualMode) -> Self {
        let palette = match mode {
            VisualMode::Animated => Palette::PARTY,
            VisualMode::Static => Palette::MONO,
        };
        Self { palette }
    }

    pub fn border_set(&self) -> border::Set<'static> {
        border::ROUNDED
    }
}
