mod app;
mod background;
mod config;
mod input;
mod player;
mod playback;
mod playlist;
mod preferences;
mod random;
mod reddit;
mod storage;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Parser)]
#[command(name = "kpop-button", version, about = "One button, endless K-pop music videos")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive button (default).
    Tui,
    /// Load and shuffle the playlist, print it to stdout (headless).
    Playlist,
    /// Show or change the animated-background preference.
    Animation {
        #[command(subcommand)]
        cmd: AnimationCommand,
    },
    /// Rebuild the playlist JSON from the subreddit's top MV posts.
    Update {
        /// Listing time span (defaults to the config value).
        #[arg(long, value_enum)]
        time: Option<reddit::TimeSpan>,
        /// Output file (defaults to the config value).
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum AnimationCommand {
    Show,
    On,
    Off,
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let command = cli.command.unwrap_or(Command::Tui);

    init_logging(&cfg, matches!(command, Command::Tui))?;

    match command {
        Command::Tui => {
            let mut terminal =
                tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
            let mut app = app::App::new(cfg)?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Playlist => {
            let source = playlist::PlaylistSource::parse(&cfg.playlist.source);
            let loader = playlist::PlaylistLoader::new(source)?;
            let playlist = loader.load(&mut StdRng::from_os_rng()).await?;
            for (i, e) in playlist.iter().enumerate() {
                println!("{:03}. {}  {}", i + 1, e.label(), e.source_url());
            }
        }
        Command::Animation { cmd } => {
            let store = storage::Storage::open(&cfg.storage_path())?;
            let enabled = match cmd {
                AnimationCommand::Show => preferences::get_animation_preference(&store)?,
                AnimationCommand::On => {
                    preferences::set_animation_preference(&store, true)?;
                    true
                }
                AnimationCommand::Off => {
                    preferences::set_animation_preference(&store, false)?;
                    false
                }
                AnimationCommand::Toggle => {
                    let enabled = !preferences::get_animation_preference(&store)?;
                    preferences::set_animation_preference(&store, enabled)?;
                    enabled
                }
            };
            println!("Animation {}", if enabled { "on" } else { "off" });
        }
        Command::Update { time, out } => {
            let span = time.unwrap_or(cfg.update.time);
            let out = out.unwrap_or_else(|| cfg.update.output.clone());
            let client = reddit::RedditClient::new(&cfg.update.user_agent)?;
            let videos = client.top_videos(span, &cfg.update).await?;
            println!("Got a total of {} videos.", videos.len());
            reddit::write_playlist(&out, &videos)?;
            println!("Saved JSON to {}", out.display());
        }
    }

    Ok(())
}

/// The TUI owns the terminal, so its logs go to a file in the data dir.
fn init_logging(cfg: &config::Config, to_file: bool) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_target(false).with_level(true);

    if to_file {
        let path = cfg.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}
