//! Join point for the two things playback needs before the first video:
//! the shuffled playlist and a player API to build the player from.

use crate::config::PlayerConfig;
use crate::playback::PlaybackController;
use crate::playback::cooldown::Clock;
use crate::player::{PlayerApi, PlayerParams, VideoPlayer};
use crate::playlist::Playlist;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupPhase {
    Uninitialized,
    Loading,
    Ready,
    Failed(String),
}

/// What `begin` asks the caller to start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requests {
    pub playlist: bool,
    pub api: bool,
}

#[derive(Debug)]
pub struct Startup<A> {
    phase: StartupPhase,
    playlist: Option<Playlist>,
    api: Option<A>,
    playlist_pending: bool,
    api_pending: bool,
}

impl<A> Default for Startup<A> {
    fn default() -> Self {
        Self {
            phase: StartupPhase::Uninitialized,
            playlist: None,
            api: None,
            playlist_pending: false,
            api_pending: false,
        }
    }
}

impl<A> Startup<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &StartupPhase {
        &self.phase
    }

    /// Enter `Loading` and mark whatever is neither delivered nor in flight
    /// as requested. Anything already delivered is kept for the retry.
    pub fn begin(&mut self) -> Requests {
        if self.phase == StartupPhase::Ready {
            return Requests::default();
        }
        self.phase = StartupPhase::Loading;
        let requests = Requests {
            playlist: self.needs_playlist(),
            api: self.needs_api(),
        };
        self.playlist_pending |= requests.playlist;
        self.api_pending |= requests.api;
        requests
    }

    pub fn needs_playlist(&self) -> bool {
        self.phase != StartupPhase::Ready && self.playlist.is_none() && !self.playlist_pending
    }

    pub fn needs_api(&self) -> bool {
        self.phase != StartupPhase::Ready && self.api.is_none() && !self.api_pending
    }

    /// Late arrivals after `Ready` are dropped.
    pub fn playlist_loaded(&mut self, playlist: Playlist) -> Option<(Playlist, A)> {
        self.playlist_pending = false;
        if self.phase == StartupPhase::Ready {
            return None;
        }
        self.playlist = Some(playlist);
        self.try_complete()
    }

    pub fn api_ready(&mut self, api: A) -> Option<(Playlist, A)> {
        self.api_pending = false;
        if self.phase == StartupPhase::Ready {
            return None;
        }
        self.api = Some(api);
        self.try_complete()
    }

    pub fn playlist_failed(&mut self, reason: impl Into<String>) {
        self.playlist_pending = false;
        self.fail(reason);
    }

    pub fn api_failed(&mut self, reason: impl Into<String>) {
        self.api_pending = false;
        self.fail(reason);
    }

    /// Fail after both parts were handed out, e.g. when building the player.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.phase = StartupPhase::Failed(reason.into());
    }

    fn try_complete(&mut self) -> Option<(Playlist, A)> {
        if self.playlist.is_none() || self.api.is_none() {
            return None;
        }
        let playlist = self.playlist.take()?;
        let api = self.api.take()?;
        self.phase = StartupPhase::Ready;
        Some((playlist, api))
    }
}

/// Build the player cued on the first entry of the shuffled playlist and hand
/// both to the controller.
pub fn launch_player<A, C, R>(
    api: A,
    playlist: Playlist,
    cfg: &PlayerConfig,
    controller: &mut PlaybackController<A::Player, C, R>,
) -> anyhow::Result<()>
where
    A: PlayerApi,
    C: Clock,
    R: Rng,
{
    let params = PlayerParams {
        height: cfg.height,
        width: cfg.width,
        video_id: playlist.first().video_id().to_string(),
        quality: cfg.quality,
    };
    let player = api.create_player(&params)?;
    controller.initialize(playlist, player);
    Ok(())
}

/// Start the cued video once the player reports ready. Returns false when
/// there is no player yet.
pub fn autoplay<P, C, R>(controller: &mut PlaybackController<P, C, R>) -> anyhow::Result<bool>
where
    P: VideoPlayer,
    C: Clock,
    R: Rng,
{
    match controller.player_mut() {
        Some(player) => {
            player.play_video()?;
            Ok(true)
        }
        None => Ok(false),
    }
}
