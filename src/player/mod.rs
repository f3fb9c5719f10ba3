pub mod mpv;

use serde::{Deserialize, Serialize};

/// Discrete player states, numbered the way embed players report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Error,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    pub fn code(self) -> i8 {
        match self {
            PlayerState::Error => -1,
            PlayerState::Ended => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
            PlayerState::Buffering => 3,
            PlayerState::Cued => 5,
        }
    }

    /// Negative codes are errors; unknown positive codes have no state.
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            c if c < 0 => Some(PlayerState::Error),
            0 => Some(PlayerState::Ended),
            1 => Some(PlayerState::Playing),
            2 => Some(PlayerState::Paused),
            3 => Some(PlayerState::Buffering),
            5 => Some(PlayerState::Cued),
            _ => None,
        }
    }

    /// Whether this state should move the playlist on.
    pub fn triggers_advance(self) -> bool {
        matches!(self, PlayerState::Ended | PlayerState::Error)
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerState::Error => "error",
            PlayerState::Ended => "ended",
            PlayerState::Playing => "playing",
            PlayerState::Paused => "paused",
            PlayerState::Buffering => "buffering",
            PlayerState::Cued => "cued",
        }
    }
}

/// Suggested playback quality, by embed-player name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Small,
    Medium,
    #[default]
    Large,
    Hd720,
    Hd1080,
    Highres,
    Default,
}

impl Quality {
    pub fn max_height(self) -> Option<u32> {
        match self {
            Quality::Small => Some(240),
            Quality::Medium => Some(360),
            Quality::Large => Some(480),
            Quality::Hd720 => Some(720),
            Quality::Hd1080 => Some(1080),
            Quality::Highres | Quality::Default => None,
        }
    }

    /// yt-dlp format selector honouring the height cap.
    pub fn ytdl_format(self) -> String {
        match self.max_height() {
            Some(h) => format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]/best"),
            None => "bestvideo+bestaudio/best".to_string(),
        }
    }
}

/// Construction parameters for a player instance.
#[derive(Debug, Clone)]
pub struct PlayerParams {
    pub height: u32,
    pub width: u32,
    pub video_id: String,
    pub quality: Quality,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Operations the playback controller needs from a video player.
pub trait VideoPlayer {
    fn load_video_by_id(
        &mut self,
        video_id: &str,
        start_seconds: f64,
        quality: Quality,
    ) -> anyhow::Result<()>;

    fn get_player_state(&self) -> PlayerState;

    fn play_video(&mut self) -> anyhow::Result<()>;
}

/// A player backend that is up and can build a player cued on one video.
pub trait PlayerApi {
    type Player: VideoPlayer;

    fn create_player(self, params: &PlayerParams) -> anyhow::Result<Self::Player>;
}
