//! Playlist cycling: owns the shuffled playlist, the current position and the
//! player, and turns clicks and end-of-video signals into video loads.
//!
//! `advance` runs as one step (read index, reshuffle if exhausted, maybe load,
//! write index). Callers serialize it by owning the controller on a single
//! event loop.

pub mod cooldown;

use crate::player::{PlayerState, Quality, VideoPlayer};
use crate::playlist::Playlist;
use anyhow::Context;
use cooldown::{Clock, Cooldown, SystemClock};
use rand::Rng;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy)]
pub struct PlaybackOptions {
    pub quality: Quality,
    pub start_seconds: f64,
    /// Start at index 1 so the first click does not reload the entry the
    /// player autoplayed on startup.
    pub skip_autoplayed: bool,
    /// Drop index bookkeeping as well as the load while cooling down.
    pub gate_index_on_cooldown: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            quality: Quality::Large,
            start_seconds: 0.0,
            skip_autoplayed: false,
            gate_index_on_cooldown: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready { current_index: usize },
    CooldownActive { current_index: usize },
}

/// Result of a single advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// No playlist or player yet.
    NotReady,
    /// A player state that does not move the playlist.
    Ignored,
    /// Entry `index` was sent to the player.
    Played { index: usize, reshuffled: bool },
    /// Cooldown suppressed the load; the index still moved past `index`.
    Suppressed { index: usize, reshuffled: bool },
    /// Cooldown dropped the request entirely.
    Dropped,
}

#[derive(Debug)]
struct Loaded<P> {
    playlist: Playlist,
    player: P,
}

#[derive(Debug)]
pub struct PlaybackController<P, C = SystemClock, R = StdRng> {
    loaded: Option<Loaded<P>>,
    current_index: usize,
    cooldown: Cooldown<C>,
    rng: R,
    options: PlaybackOptions,
}

impl<P, C, R> PlaybackController<P, C, R>
where
    P: VideoPlayer,
    C: Clock,
    R: Rng,
{
    pub fn new(options: PlaybackOptions, cooldown: Cooldown<C>, rng: R) -> Self {
        Self {
            loaded: None,
            current_index: 0,
            cooldown,
            rng,
            options,
        }
    }

    /// Take ownership of the shuffled playlist and the player.
    pub fn initialize(&mut self, playlist: Playlist, player: P) {
        self.current_index = if self.options.skip_autoplayed { 1 } else { 0 };
        tracing::info!(
            len = playlist.len(),
            start = self.current_index,
            "playback controller ready"
        );
        self.loaded = Some(Loaded { playlist, player });
    }

    /// Next position to play, 0-based.
    pub fn current_index(&self) -> Option<usize> {
        self.loaded.as_ref().map(|_| self.current_index)
    }

    /// The 1-based counter shown to the user.
    pub fn display_index(&self) -> Option<usize> {
        self.current_index().map(|i| i + 1)
    }

    pub fn phase(&self) -> Phase {
        match &self.loaded {
            None => Phase::Uninitialized,
            Some(_) if self.cooldown.is_active() => Phase::CooldownActive {
                current_index: self.current_index,
            },
            Some(_) => Phase::Ready {
                current_index: self.current_index,
            },
        }
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.loaded.as_ref().map(|l| &l.playlist)
    }

    pub fn player(&self) -> Option<&P> {
        self.loaded.as_ref().map(|l| &l.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut P> {
        self.loaded.as_mut().map(|l| &mut l.player)
    }

    /// Play the entry at the current index, reshuffling and wrapping first
    /// when the playlist is exhausted.
    ///
    /// While cooling down the load is skipped but the index still moves on,
    /// unless `gate_index_on_cooldown` is set.
    pub fn advance(&mut self) -> anyhow::Result<Advance> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(Advance::NotReady);
        };

        let acquired = self.cooldown.try_acquire();
        if !acquired && self.options.gate_index_on_cooldown {
            tracing::debug!("advance dropped during cooldown");
            return Ok(Advance::Dropped);
        }

        let mut index = self.current_index;
        let mut reshuffled = false;
        if index >= loaded.playlist.len() {
            loaded.playlist.shuffle(&mut self.rng);
            index = 0;
            reshuffled = true;
            tracing::info!(len = loaded.playlist.len(), "playlist exhausted, reshuffled");
        }
        self.current_index = index + 1;

        if !acquired {
            tracing::debug!(index, "load suppressed during cooldown");
            return Ok(Advance::Suppressed { index, reshuffled });
        }

        let entry = loaded
            .playlist
            .get(index)
            .context("playlist index out of range")?;
        tracing::info!(index, video_id = entry.video_id(), "loading video");
        loaded
            .player
            .load_video_by_id(entry.video_id(), self.options.start_seconds, self.options.quality)
            .with_context(|| format!("load video {}", entry.video_id()))?;

        Ok(Advance::Played { index, reshuffled })
    }

    /// React to a player state report. Ended and error codes advance.
    pub fn on_state_change(&mut self, code: i8) -> anyhow::Result<Advance> {
        match PlayerState::from_code(code) {
            Some(state) if state.triggers_advance() => {
                tracing::debug!(state = state.label(), "player finished, advancing");
                self.advance()
            }
            _ => Ok(Advance::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cooldown::testing::ManualClock;
    use super::*;
    use crate::playlist::PlaylistEntry;
    use rand::SeedableRng;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct FakePlayer {
        loads: Vec<String>,
        fail: bool,
    }

    impl VideoPlayer for FakePlayer {
        fn load_video_by_id(
            &mut self,
            video_id: &str,
            start_seconds: f64,
            quality: Quality,
        ) -> anyhow::Result<()> {
            assert_eq!(start_seconds, 0.0);
            assert_eq!(quality, Quality::Large);
            if self.fail {
                anyhow::bail!("player gone");
            }
            self.loads.push(video_id.to_string());
            Ok(())
        }

        fn get_player_state(&self) -> PlayerState {
            PlayerState::Playing
        }

        fn play_video(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    type TestController = PlaybackController<FakePlayer, ManualClock, StdRng>;

    fn playlist(ids: &[&str]) -> Playlist {
        let entries = ids
            .iter()
            .map(|id| PlaylistEntry::from_url(format!("https://y.test/watch?v={id}")).unwrap())
            .collect();
        Playlist::new(entries).unwrap()
    }

    fn ids(p: &Playlist) -> Vec<String> {
        p.iter().map(|e| e.video_id().to_string()).collect()
    }

    fn controller(options: PlaybackOptions, clock: &ManualClock, ids: &[&str]) -> TestController {
        let cooldown = Cooldown::new(cooldown::DEFAULT_WINDOW, clock.clone());
        let mut c = PlaybackController::new(options, cooldown, StdRng::seed_from_u64(17));
        c.initialize(playlist(ids), FakePlayer::default());
        c
    }

    const ABC: [&str; 3] = ["AAAAAAAAAAA", "BBBBBBBBBBB", "CCCCCCCCCCC"];
    const GAP: Duration = Duration::from_millis(600);

    #[test]
    fn test_not_ready_before_initialize() {
        let clock = ManualClock::new();
        let cooldown = Cooldown::new(cooldown::DEFAULT_WINDOW, clock);
        let mut c: TestController =
            PlaybackController::new(PlaybackOptions::default(), cooldown, StdRng::seed_from_u64(1));
        assert_eq!(c.phase(), Phase::Uninitialized);
        assert_eq!(c.current_index(), None);
        assert_eq!(c.advance().unwrap(), Advance::NotReady);
    }

    #[test]
    fn test_initialize_starts_at_zero_and_shows_one() {
        let clock = ManualClock::new();
        let c = controller(PlaybackOptions::default(), &clock, &ABC);
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.display_index(), Some(1));
        assert_eq!(c.phase(), Phase::Ready { current_index: 0 });
    }

    #[test]
    fn test_visits_every_index_once_then_reshuffles() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &ABC);
        let order = ids(c.playlist().unwrap());

        for i in 0..3 {
            assert_eq!(
                c.advance().unwrap(),
                Advance::Played { index: i, reshuffled: false }
            );
            clock.advance(GAP);
        }
        assert_eq!(c.player().unwrap().loads, order);
        assert_eq!(c.current_index(), Some(3));

        assert_eq!(
            c.advance().unwrap(),
            Advance::Played { index: 0, reshuffled: true }
        );
        assert_eq!(c.current_index(), Some(1));

        let reshuffled = ids(c.playlist().unwrap());
        assert_eq!(c.player().unwrap().loads[3], reshuffled[0]);
        let mut sorted = reshuffled.clone();
        sorted.sort();
        assert_eq!(sorted, ABC.to_vec());
    }

    #[test]
    fn test_wraparound_trace_from_last_index() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &ABC);
        // Walk to currentIndex = 2.
        c.advance().unwrap();
        clock.advance(GAP);
        c.advance().unwrap();
        clock.advance(GAP);
        assert_eq!(c.current_index(), Some(2));
        let third = ids(c.playlist().unwrap())[2].clone();

        // Player reports "ended": loads the third entry, index moves to 3.
        assert_eq!(
            c.on_state_change(0).unwrap(),
            Advance::Played { index: 2, reshuffled: false }
        );
        assert_eq!(c.player().unwrap().loads.last(), Some(&third));
        assert_eq!(c.current_index(), Some(3));
        clock.advance(GAP);

        // 3 >= 3: reshuffle, play new first entry, index 1.
        assert_eq!(
            c.on_state_change(0).unwrap(),
            Advance::Played { index: 0, reshuffled: true }
        );
        let first = ids(c.playlist().unwrap())[0].clone();
        assert_eq!(c.player().unwrap().loads.last(), Some(&first));
        assert_eq!(c.current_index(), Some(1));
    }

    #[test]
    fn test_double_trigger_in_cooldown_loads_once() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &ABC);

        assert!(matches!(c.advance().unwrap(), Advance::Played { index: 0, .. }));
        assert!(matches!(c.phase(), Phase::CooldownActive { .. }));
        clock.advance(Duration::from_millis(100));
        assert!(matches!(c.advance().unwrap(), Advance::Suppressed { index: 1, .. }));

        assert_eq!(c.player().unwrap().loads.len(), 1);
        // The counter moves even though the second load was suppressed.
        assert_eq!(c.current_index(), Some(2));

        clock.advance(cooldown::DEFAULT_WINDOW);
        assert!(matches!(c.advance().unwrap(), Advance::Played { index: 2, .. }));
        assert_eq!(c.player().unwrap().loads.len(), 2);
    }

    #[test]
    fn test_gated_cooldown_keeps_index() {
        let clock = ManualClock::new();
        let options = PlaybackOptions {
            gate_index_on_cooldown: true,
            ..PlaybackOptions::default()
        };
        let mut c = controller(options, &clock, &ABC);

        c.advance().unwrap();
        assert_eq!(c.advance().unwrap(), Advance::Dropped);
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.player().unwrap().loads.len(), 1);
    }

    #[test]
    fn test_suppressed_trigger_can_still_reshuffle() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &["AAAAAAAAAAA"]);
        assert!(matches!(c.advance().unwrap(), Advance::Played { index: 0, reshuffled: false }));
        assert_eq!(
            c.advance().unwrap(),
            Advance::Suppressed { index: 0, reshuffled: true }
        );
        assert_eq!(c.current_index(), Some(1));
    }

    #[test]
    fn test_skip_autoplayed_starts_after_first_entry() {
        let clock = ManualClock::new();
        let options = PlaybackOptions {
            skip_autoplayed: true,
            ..PlaybackOptions::default()
        };
        let mut c = controller(options, &clock, &ABC);
        let order = ids(c.playlist().unwrap());

        assert_eq!(c.display_index(), Some(2));
        c.advance().unwrap();
        assert_eq!(c.player().unwrap().loads, vec![order[1].clone()]);
    }

    #[test]
    fn test_non_terminal_states_are_ignored() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &ABC);
        for code in [1, 2, 3, 5, 4] {
            assert_eq!(c.on_state_change(code).unwrap(), Advance::Ignored);
        }
        assert!(c.player().unwrap().loads.is_empty());
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn test_error_state_advances() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &ABC);
        assert!(matches!(c.on_state_change(-1).unwrap(), Advance::Played { index: 0, .. }));
    }

    #[test]
    fn test_player_failure_still_moves_index() {
        let clock = ManualClock::new();
        let mut c = controller(PlaybackOptions::default(), &clock, &ABC);
        c.player_mut().unwrap().fail = true;
        assert!(c.advance().is_err());
        assert_eq!(c.current_index(), Some(1));
    }
}
