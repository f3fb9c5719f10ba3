use super::{PlayerApi, PlayerParams, PlayerState, Quality, VideoPlayer, watch_url};
use crate::app::events::{Event, PlayerEvent};
use crate::config::PlayerConfig;
use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI8, AtomicU64, Ordering};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    process::{Child, Command},
    sync::mpsc,
};

/// A running mpv with a live IPC connection, before any video is cued.
#[derive(Debug)]
pub struct MpvApi {
    child: Child,
    socket_path: PathBuf,
    cmd_tx: mpsc::UnboundedSender<serde_json::Value>,
    state: Arc<AtomicI8>,
}

impl MpvApi {
    /// Start mpv and wait for its IPC socket. Callers bound this with a timeout.
    pub async fn spawn(
        event_tx: mpsc::Sender<Event>,
        cfg: &PlayerConfig,
        log_file: Option<&std::path::Path>,
    ) -> anyhow::Result<Self> {
        let socket_path =
            std::env::temp_dir().join(format!("kpop-button-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new("mpv");
        cmd.args([
            "--idle=yes",
            "--pause=yes",
            "--force-window=no",
            "--input-terminal=no",
            "--really-quiet",
            "--title=kpop-button",
        ]);
        if let Some(dev) = cfg.audio_device.as_deref() {
            cmd.arg(format!("--audio-device={dev}"));
        }
        if let Some(p) = log_file {
            cmd.arg(format!("--log-file={}", p.display()));
        }
        let child = cmd
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("spawn mpv")?;

        let stream = connect_with_retry(&socket_path).await?;
        let (reader, writer) = tokio::io::split(stream);

        let state = Arc::new(AtomicI8::new(PlayerState::Cued.code()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(read_events_loop(reader, event_tx, state.clone()));
        tokio::spawn(write_commands_loop(writer, cmd_rx));

        let api = Self {
            child,
            socket_path,
            cmd_tx,
            state,
        };
        api.send(json!({"command":["request_log_messages", "error"]}))?;
        api.send(json!({"command":["observe_property", 1, "pause"]}))?;
        tracing::info!("mpv ipc connected");
        Ok(api)
    }

    fn send(&self, v: serde_json::Value) -> anyhow::Result<()> {
        self.cmd_tx
            .send(v)
            .map_err(|_| anyhow::anyhow!("mpv ipc writer closed"))
    }
}

impl PlayerApi for MpvApi {
    type Player = MpvPlayer;

    /// Build a player cued (paused) on `params.video_id`. mpv reports
    /// `PlayerEvent::Ready` once that first file is loaded.
    fn create_player(self, params: &PlayerParams) -> anyhow::Result<MpvPlayer> {
        let geometry = format!("{}x{}", params.width, params.height);
        self.send(json!({"command":["set_property", "geometry", geometry]}))?;
        let format = params.quality.ytdl_format();
        self.send(json!({"command":["set_property", "ytdl-format", format]}))?;
        self.send(json!({"command":["set_property", "pause", true]}))?;
        self.send(json!({"command":["loadfile", watch_url(&params.video_id), "replace"]}))?;
        tracing::info!(video_id = %params.video_id, "player created");
        Ok(MpvPlayer {
            api: self,
            request_id: AtomicU64::new(1),
        })
    }
}

impl Drop for MpvApi {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

#[derive(Debug)]
pub struct MpvPlayer {
    api: MpvApi,
    request_id: AtomicU64,
}

impl MpvPlayer {
    fn command(&self, mut v: serde_json::Value) -> anyhow::Result<()> {
        // Tag requests so we can get structured errors back on the IPC stream.
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        if let serde_json::Value::Object(ref mut o) = v {
            o.insert("request_id".to_string(), serde_json::Value::from(id));
        }
        self.api.send(v)
    }
}

impl VideoPlayer for MpvPlayer {
    fn load_video_by_id(
        &mut self,
        video_id: &str,
        start_seconds: f64,
        quality: Quality,
    ) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "ytdl-format", quality.ytdl_format()]}))?;
        self.command(json!({"command":["set_property", "start", format!("{start_seconds}")]}))?;
        self.command(json!({"command":["loadfile", watch_url(video_id), "replace"]}))?;
        self.command(json!({"command":["set_property", "pause", false]}))
    }

    fn get_player_state(&self) -> PlayerState {
        PlayerState::from_code(self.api.state.load(Ordering::Relaxed)).unwrap_or(PlayerState::Cued)
    }

    fn play_video(&mut self) -> anyhow::Result<()> {
        self.command(json!({"command":["set_property", "pause", false]}))
    }
}

async fn connect_with_retry(path: &std::path::Path) -> anyhow::Result<UnixStream> {
    loop {
        match UnixStream::connect(path).await {
            Ok(s) => return Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(e).with_context(|| format!("connect to mpv ipc {}", path.display()));
            }
            Err(_) => tokio::time::sleep(std::time::Duration::from_millis(50)).await,
        }
    }
}

async fn write_commands_loop(
    mut writer: tokio::io::WriteHalf<UnixStream>,
    mut rx: mpsc::UnboundedReceiver<serde_json::Value>,
) {
    while let Some(v) = rx.recv().await {
        let mut line = match serde_json::to_vec(&v) {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!("encode mpv json: {e}");
                continue;
            }
        };
        line.push(b'\n');
        if let Err(e) = writer.write_all(&line).await {
            tracing::warn!("write mpv ipc: {e}");
            break;
        }
        let _ = writer.flush().await;
    }
}

/// What a single mpv IPC message means for us.
#[derive(Debug, Clone, PartialEq)]
enum MpvSignal {
    Paused(bool),
    FileLoaded,
    State(PlayerState),
    Message(String),
}

async fn read_events_loop(
    reader: tokio::io::ReadHalf<UnixStream>,
    event_tx: mpsc::Sender<Event>,
    state: Arc<AtomicI8>,
) {
    let mut lines = BufReader::new(reader).lines();
    let mut paused = true;
    let mut ready_sent = false;

    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(&line) else {
            continue;
        };
        let Some(signal) = map_mpv_event(&v) else {
            continue;
        };

        let new_state = match signal {
            MpvSignal::Paused(p) => {
                paused = p;
                let current = PlayerState::from_code(state.load(Ordering::Relaxed));
                if current == Some(PlayerState::Ended) {
                    None
                } else {
                    Some(if p { PlayerState::Paused } else { PlayerState::Playing })
                }
            }
            MpvSignal::FileLoaded => {
                if !ready_sent {
                    ready_sent = true;
                    if event_tx.send(Event::Player(PlayerEvent::Ready)).await.is_err() {
                        break;
                    }
                }
                Some(if paused { PlayerState::Cued } else { PlayerState::Playing })
            }
            MpvSignal::State(s) => Some(s),
            MpvSignal::Message(m) => {
                tracing::warn!("{m}");
                let _ = event_tx.send(Event::Player(PlayerEvent::Message(m))).await;
                None
            }
        };

        if let Some(s) = new_state {
            state.store(s.code(), Ordering::Relaxed);
            if event_tx
                .send(Event::Player(PlayerEvent::StateChange(s.code())))
                .await
                .is_err()
            {
                break;
            }
        }
    }
    tracing::debug!("mpv event stream closed");
}

fn map_mpv_event(v: &serde_json::Value) -> Option<MpvSignal> {
    // mpv command replies: {"request_id":..., "error":"..."}
    if let (Some(_rid), Some(err)) = (v.get("request_id"), v.get("error"))
        && let Some(err_s) = err.as_str()
        && err_s != "success"
    {
        return Some(MpvSignal::Message(format!("mpv ipc error: {err_s}")));
    }

    match v.get("event")?.as_str()? {
        "property-change" => match v.get("name")?.as_str()? {
            "pause" => Some(MpvSignal::Paused(v.get("data")?.as_bool().unwrap_or(false))),
            _ => None,
        },
        "start-file" => Some(MpvSignal::State(PlayerState::Buffering)),
        "file-loaded" => Some(MpvSignal::FileLoaded),
        "end-file" => match v.get("reason").and_then(|x| x.as_str()).unwrap_or("") {
            "eof" => Some(MpvSignal::State(PlayerState::Ended)),
            "error" => {
                let err = v.get("file_error").or_else(|| v.get("error"));
                let err = err.and_then(|x| x.as_str()).unwrap_or("unknown");
                tracing::warn!("mpv end-file error: {err}");
                Some(MpvSignal::State(PlayerState::Error))
            }
            // "stop" means another loadfile replaced the current one.
            _ => None,
        },
        "log-message" => {
            let level = v.get("level")?.as_str().unwrap_or("info");
            let text = v.get("text")?.as_str().unwrap_or("").trim();
            if level == "error" && !text.is_empty() {
                Some(MpvSignal::Message(format!("mpv {level}: {text}")))
            } else {
                None
            }
        }
        _ => None,
    }
}
