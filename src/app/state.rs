use crate::background::{BackgroundSurface, VisualMode};
use crate::player::PlayerState;
use ratatui::layout::Rect;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// Everything the screen shows.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub should_quit: bool,
    pub background: Option<String>,
    pub visual_mode: VisualMode,
    /// 1-based position counter shown under the button.
    pub index_counter: Option<usize>,
    pub playlist_len: usize,
    pub now_playing: Option<String>,
    pub player_state: Option<PlayerState>,
    pub ready: bool,
    pub cooling_down: bool,
    pub status: String,
    pub toast: Option<Toast>,
    /// Where the button was last drawn, for mouse hit-testing.
    pub button_area: Rect,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            status: "Loading playlist...".into(),
            ..Self::default()
        }
    }

    pub fn button_hit(&self, column: u16, row: u16) -> bool {
        let a = self.button_area;
        column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
    }
}

impl BackgroundSurface for AppState {
    fn set_background(&mut self, asset: Option<&str>) {
        self.background = asset.map(str::to_string);
    }

    fn set_visual_mode(&mut self, mode: VisualMode) {
        self.visual_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_hit() {
        let mut s = AppState::new();
        s.button_area = Rect::new(10, 5, 20, 3);
        assert!(s.button_hit(10, 5));
        assert!(s.button_hit(29, 7));
        assert!(!s.button_hit(30, 7));
        assert!(!s.button_hit(15, 8));
    }
}
