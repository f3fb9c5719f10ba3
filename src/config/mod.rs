use crate::player::Quality;
use crate::playback::{PlaybackOptions, cooldown};
use crate::reddit::TimeSpan;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub input: InputConfig,
    pub playlist: PlaylistConfig,
    pub player: PlayerConfig,
    pub playback: PlaybackConfig,
    pub update: UpdateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// `http(s)://` URL or a local file path.
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub height: u32,
    pub width: u32,
    pub quality: Quality,
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Give up on the player if mpv's IPC socket isn't up by then.
    pub api_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub cooldown_ms: u64,
    pub skip_autoplayed: bool,
    pub gate_index_on_cooldown: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub subreddit: String,
    pub time: TimeSpan,
    pub score_threshold: i64,
    pub crawl_delay_secs: u64,
    pub mv_flair: String,
    pub user_agent: String,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "kpop-button", "kpop-button");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("kpop-button"));
        Self { data_dir }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            source: "top-all-time.json".to_string(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            height: 566,
            width: 960,
            quality: Quality::Large,
            audio_device: None,
            api_timeout_secs: 10,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: cooldown::DEFAULT_WINDOW.as_millis() as u64,
            skip_autoplayed: false,
            gate_index_on_cooldown: false,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            subreddit: "kpop".to_string(),
            time: TimeSpan::All,
            score_threshold: 5,
            crawl_delay_secs: 2,
            mv_flair: "[MV]".to_string(),
            user_agent: "Kpopbot/0.1".to_string(),
            output: PathBuf::from("top-all-time.json"),
        }
    }
}

impl PlaybackConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Config {
    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            quality: self.player.quality,
            start_seconds: 0.0,
            skip_autoplayed: self.playback.skip_autoplayed,
            gate_index_on_cooldown: self.playback.gate_index_on_cooldown,
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.paths.data_dir.join("preferences.sqlite3")
    }

    pub fn log_path(&self) -> PathBuf {
        self.paths.data_dir.join("kpop-button.log")
    }
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "kpop-button", "kpop-button")
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg, &path).context("write default config")?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[playlist]
source = "https://example.com/top-all-time.json"

[playback]
cooldown_ms = 250

[player]
quality = "hd720"
"#,
        )
        .unwrap();
        assert_eq!(cfg.playlist.source, "https://example.com/top-all-time.json");
        assert_eq!(cfg.playback.cooldown(), Duration::from_millis(250));
        assert!(!cfg.playback.skip_autoplayed);
        assert_eq!(cfg.player.quality, Quality::Hd720);
        assert_eq!(cfg.player.width, 960);
        assert_eq!(cfg.update.time, TimeSpan::All);
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = std::env::temp_dir()
            .join(format!("kpop-button-cfg-{}", std::process::id()))
            .join("config.toml");
        let _ = fs::remove_file(&path);

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.playback.cooldown_ms, 500);

        let again = load(Some(&path)).unwrap();
        assert_eq!(again.update.mv_flair, "[MV]");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
