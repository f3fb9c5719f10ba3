pub mod actions;
pub mod events;
pub mod startup;
pub mod state;

use crate::background;
use crate::config::Config;
use crate::input;
use crate::player::mpv::{MpvApi, MpvPlayer};
use crate::player::VideoPlayer;
use crate::playback::cooldown::{Cooldown, SystemClock};
use crate::playback::{Advance, PlaybackController, Phase};
use crate::playlist::{Playlist, PlaylistLoader, PlaylistSource};
use crate::storage::Storage;
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, NetworkEvent, PlayerEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use startup::{Startup, StartupPhase, autoplay, launch_player};
use state::{AppState, Toast};
use tokio::sync::mpsc;

pub struct App {
    cfg: Config,
    state: AppState,
    storage: Storage,
    loader: PlaylistLoader,
    startup: Startup<MpvApi>,
    controller: PlaybackController<MpvPlayer>,
    rng: StdRng,
}

impl App {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let storage = Storage::open(&cfg.storage_path())?;
        let loader = PlaylistLoader::new(PlaylistSource::parse(&cfg.playlist.source))?;
        let controller = PlaybackController::new(
            cfg.playback_options(),
            Cooldown::new(cfg.playback.cooldown(), SystemClock),
            StdRng::from_os_rng(),
        );

        Ok(Self {
            cfg,
            state: AppState::new(),
            storage,
            loader,
            startup: Startup::new(),
            controller,
            rng: StdRng::from_os_rng(),
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.cfg.input.mouse);

        if let Err(e) =
            background::apply_random_background(&self.storage, &mut self.state, &mut self.rng)
        {
            tracing::warn!("background selection failed: {e:#}");
        }
        self.start_loading(&tx);

        // First draw
        tui::draw(terminal, &mut self.state)?;

        // Every state change below happens on this loop, one event at a time.
        let mut tick = tokio::time::interval(std::time::Duration::from_millis(250));
        loop {
            tokio::select! {
                ev = rx.recv() => {
                    let Some(ev) = ev else { break };
                    match ev {
                        Event::Input(input_ev) => {
                            let action = input::map_input_to_action(&self.state, input_ev);
                            if let Some(action) = action {
                                self.handle_action(action, &tx);
                            }
                        }
                        Event::Player(pe) => self.handle_player(pe),
                        Event::Network(ne) => self.handle_network(ne),
                    }
                }
                // Expire toasts and the cooldown highlight.
                _ = tick.tick() => self.sync_playback(),
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        Ok(())
    }

    fn start_loading(&mut self, tx: &mpsc::Sender<Event>) {
        let requests = self.startup.begin();
        if requests.playlist {
            self.spawn_playlist_load(tx);
        }
        if requests.api {
            self.spawn_player_api(tx);
        }
        self.state.status = "Loading playlist...".into();
    }

    fn spawn_playlist_load(&self, tx: &mpsc::Sender<Event>) {
        let loader = self.loader.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let ev = match loader.load(&mut rng).await {
                Ok(playlist) => NetworkEvent::PlaylistLoaded(playlist),
                Err(e) => {
                    tracing::error!(source = %loader.source(), "playlist load failed: {e}");
                    NetworkEvent::PlaylistFailed(e.to_string())
                }
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn spawn_player_api(&self, tx: &mpsc::Sender<Event>) {
        let cfg = self.cfg.player.clone();
        let log_file = self.cfg.paths.data_dir.join("mpv.log");
        let limit = std::time::Duration::from_secs(cfg.api_timeout_secs);
        let tx = tx.clone();
        tokio::spawn(async move {
            let spawn = MpvApi::spawn(tx.clone(), &cfg, Some(&log_file));
            let ev = match tokio::time::timeout(limit, spawn).await {
                Ok(Ok(api)) => PlayerEvent::ApiReady(api),
                Ok(Err(e)) => PlayerEvent::ApiUnavailable(format!("{e:#}")),
                Err(_) => PlayerEvent::ApiUnavailable(format!(
                    "mpv did not come up within {}s",
                    cfg.api_timeout_secs
                )),
            };
            let _ = tx.send(Event::Player(ev)).await;
        });
    }

    fn finish_startup(&mut self, playlist: Playlist, api: MpvApi) {
        let label = playlist.first().label().to_string();
        let len = playlist.len();

        match launch_player(api, playlist, &self.cfg.player, &mut self.controller) {
            Ok(()) => {
                self.state.playlist_len = len;
                self.state.ready = true;
                self.state.now_playing = Some(label);
                self.state.status = "Press the button for the next video".into();
            }
            Err(e) => {
                tracing::error!("create player: {e:#}");
                self.startup.fail(format!("{e:#}"));
                self.state.status = format!("Player failed: {e:#} (r to retry)");
            }
        }
        self.sync_playback();
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Click => {
                let result = self.controller.advance();
                self.apply_advance(result);
            }
            Action::ToggleAnimation => {
                match background::toggle_animation_preference(
                    &self.storage,
                    &mut self.state,
                    &mut self.rng,
                ) {
                    Ok(true) => self.state.toast = Some(Toast::success("Animation on")),
                    Ok(false) => self.state.toast = Some(Toast::success("Animation off")),
                    Err(e) => {
                        tracing::error!("toggle animation: {e:#}");
                        self.state.toast = Some(Toast::error(format!("{e:#}")));
                    }
                }
            }
            Action::Retry => {
                if matches!(self.startup.phase(), StartupPhase::Failed(_)) {
                    tracing::info!("retrying startup");
                    self.start_loading(tx);
                }
            }
            Action::Resize => {}
        }
    }

    fn handle_player(&mut self, ev: PlayerEvent) {
        match ev {
            PlayerEvent::ApiReady(api) => {
                if let Some((playlist, api)) = self.startup.api_ready(api) {
                    self.finish_startup(playlist, api);
                }
            }
            PlayerEvent::ApiUnavailable(reason) => {
                tracing::error!("player unavailable: {reason}");
                self.state.status = format!("Player unavailable: {reason} (r to retry)");
                self.startup.api_failed(reason);
            }
            PlayerEvent::Ready => {
                if let Err(e) = autoplay(&mut self.controller) {
                    tracing::error!("autoplay: {e:#}");
                    self.state.toast = Some(Toast::error(format!("{e:#}")));
                }
            }
            PlayerEvent::StateChange(code) => {
                let result = self.controller.on_state_change(code);
                self.apply_advance(result);
            }
            PlayerEvent::Message(m) => {
                self.state.toast = Some(Toast::error(m));
            }
        }
    }

    fn handle_network(&mut self, ev: NetworkEvent) {
        match ev {
            NetworkEvent::PlaylistLoaded(playlist) => {
                self.state.status = format!("Loaded {} videos, starting player...", playlist.len());
                if let Some((playlist, api)) = self.startup.playlist_loaded(playlist) {
                    self.finish_startup(playlist, api);
                }
            }
            NetworkEvent::PlaylistFailed(reason) => {
                self.state.status = format!("Couldn't load playlist: {reason} (r to retry)");
                self.state.toast = Some(Toast::error("Playlist unavailable"));
                self.startup.playlist_failed(reason);
            }
        }
    }

    fn apply_advance(&mut self, result: anyhow::Result<Advance>) {
        match result {
            Ok(Advance::Played { index, reshuffled }) => {
                let label = self
                    .controller
                    .playlist()
                    .and_then(|p| p.get(index))
                    .map(|e| e.label().to_string());
                self.state.now_playing = label;
                self.state.status = format!("Playing {}/{}", index + 1, self.state.playlist_len);
                if reshuffled {
                    self.state.toast = Some(Toast::success("Reshuffled the playlist"));
                }
            }
            Ok(Advance::Suppressed { .. } | Advance::Dropped) => {
                self.state.status = "Slow down!".into();
            }
            Ok(Advance::NotReady) => {
                if !matches!(self.startup.phase(), StartupPhase::Failed(_)) {
                    self.state.status = "Still loading...".into();
                }
            }
            Ok(Advance::Ignored) => {}
            Err(e) => {
                tracing::error!("advance: {e:#}");
                self.state.toast = Some(Toast::error(format!("{e:#}")));
            }
        }
        self.sync_playback();
    }

    fn sync_playback(&mut self) {
        self.state.index_counter = self.controller.display_index();
        self.state.cooling_down = matches!(self.controller.phase(), Phase::CooldownActive { .. });
        self.state.player_state = self
            .controller
            .player()
            .map(|p| p.get_player_state());
    }
}
