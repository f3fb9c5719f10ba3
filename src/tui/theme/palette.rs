//! Color palettes, one per visual mode.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub accent: Color,
    pub button_bg: Color,
    pub button_fg: Color,
    pub border: Color,
    pub error: Color,
}

impl Palette {
    /// Loud colors while the animated background is on.
    pub const PARTY: Self = Self {
        bg: Color::Rgb(24, 6, 32),             // #180620 deep purple
        fg_primary: Color::Rgb(255, 255, 255), // #ffffff white
        fg_secondary: Color::Rgb(214, 170, 230), // #d6aae6 lilac
        accent: Color::Rgb(255, 92, 184),      // #ff5cb8 hot pink
        button_bg: Color::Rgb(255, 92, 184),   // #ff5cb8 hot pink
        button_fg: Color::Rgb(24, 6, 32),      // #180620 deep purple
        border: Color::Rgb(124, 58, 160),      // #7c3aa0 violet
        error: Color::Rgb(255, 120, 120),      // #ff7878 salmon
    };

    /// Monochrome for the static mode.
    pub const MONO: Self = Self {
        bg: Color::Rgb(0, 0, 0),                 // #000000 pure black
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff white
        fg_secondary: Color::Rgb(136, 136, 136), // #888888 medium gray
        accent: Color::Rgb(200, 200, 200),       // #c8c8c8 light gray
        button_bg: Color::Rgb(48, 48, 48),       // #303030 dark gray
        button_fg: Color::Rgb(255, 255, 255),   // #ffffff white
        border: Color::Rgb(64, 64, 64),          // #404040 dark gray
        error: Color::Rgb(255, 255, 255),        // #ffffff white
    };
}
