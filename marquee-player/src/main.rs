use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Target};
use log::{LevelFilter, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use marquee_metadata::{
    ContentDetails, MediaType, MetadataProvider, SourceKind, SourceOrigin, TmdbProvider,
};
use marquee_player::host::PlayerHost;
use marquee_player::keyboard::{FocusTarget, Key, bind};
use marquee_player::runtime::{self, PlayerHandle};
use marquee_player::simulated::{SimulatedClip, SimulatedMedia};
use marquee_player::{
    BarRect, Command, ControlLayout, ControlsView, Notification, PlaybackController,
    PlaybackError, PlayerConfig, SourceDescriptor,
};

/// Width of the terminal "bars"; `seek 50` is the middle of the progress bar.
const BAR_WIDTH: f64 = 100.0;
const TRAILER_SECONDS: f64 = 150.0;

#[derive(Debug, Parser)]
#[command(name = "marquee", version, about = "Play a title's video in a simulated player")]
struct Args {
    /// TMDB id of the title
    #[arg(long)]
    id: u64,

    /// Catalogue of the title (movie or tv)
    #[arg(long = "type", default_value = "movie")]
    media_type: MediaType,

    /// Video to play (trailer or full)
    #[arg(long, default_value = "trailer")]
    video: SourceKind,

    /// TOML file with player settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not substitute a sample clip for titles without a trailer
    #[arg(long)]
    no_sample: bool,

    /// Make the first load fail, to exercise the trailer fallback
    #[arg(long, value_enum)]
    fail_first: Option<SimulatedFailure>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SimulatedFailure {
    Network,
    Unsupported,
}

impl From<SimulatedFailure> for PlaybackError {
    fn from(failure: SimulatedFailure) -> Self {
        match failure {
            SimulatedFailure::Network => PlaybackError::NetworkFailure,
            SimulatedFailure::Unsupported => PlaybackError::UnsupportedSource,
        }
    }
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("marquee_player", LevelFilter::Debug)
        .filter_module("marquee_metadata", LevelFilter::Debug)
        .filter_module("marquee", LevelFilter::Debug)
        .init();
}

/// Host for a terminal session: fullscreen is confirmed immediately and
/// fallback sources are resolved from the metadata provider.
struct TerminalHost {
    handle: PlayerHandle,
    provider: Arc<dyn MetadataProvider>,
    id: u64,
    media_type: MediaType,
}

impl PlayerHost for TerminalHost {
    fn request_fullscreen(&mut self) {
        let _ = self.handle.send(Command::FullscreenChanged(true));
    }

    fn exit_fullscreen(&mut self) {
        let _ = self.handle.send(Command::FullscreenChanged(false));
    }

    fn request_fallback(&mut self, kind: SourceKind) {
        let handle = self.handle.clone();
        let provider = Arc::clone(&self.provider);
        let (id, media_type) = (self.id, self.media_type);

        tokio::spawn(async move {
            match provider.fetch_playable_source(id, media_type, kind).await {
                Ok(Some(source)) => {
                    let _ = handle.send(Command::Load(SourceDescriptor::new(source.url, source.kind)));
                }
                Ok(None) => {
                    let _ = handle.send(Command::FallbackUnavailable);
                }
                Err(err) => {
                    warn!("Failed to resolve {} source: {}", kind, err);
                    let _ = handle.send(Command::FallbackUnavailable);
                }
            }
        });
    }

    fn on_terminal_error(&mut self, reason: PlaybackError) {
        report_unavailable(reason);
        println!("Type 'r' to retry.");
    }

    fn notify(&mut self, notification: &Notification) {
        println!("» {}", notification.message);
    }
}

fn report_unavailable(reason: PlaybackError) {
    println!("Unable to load video ({}).", reason);
}

fn print_header(details: &ContentDetails, kind: SourceKind) {
    println!("{}", details.display_title(kind));
    let labels: Vec<String> = [
        details.runtime_label(),
        details.release_year.map(|year| year.to_string()),
        details.rating_label(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !labels.is_empty() {
        println!("{}", labels.join("  ·  "));
    }
}

fn print_view(view: &ControlsView) {
    let filled = (view.progress * 20.0).round() as usize;
    println!(
        "[{}] {} / {} [{}{}] vol {:.0}% ({:?}){}{}",
        view.phase,
        view.elapsed,
        view.total,
        "#".repeat(filled),
        ".".repeat(20 - filled.min(20)),
        view.volume * 100.0,
        view.volume_band,
        if view.overlay_visible { "" } else { "  (controls hidden)" },
        view.notification
            .as_deref()
            .map(|message| format!("  » {message}"))
            .unwrap_or_default(),
    );
}

fn print_help() {
    println!(
        "space play/pause · left/right seek · up/down volume · m mute · f fullscreen · \
         esc exit fullscreen · seek N / vol N (0-100) · r retry · s status · q quit"
    );
}

/// Map one line of input to a player command. `None` for unknown input.
fn parse_input(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let key = match words.next().unwrap_or("space") {
        "space" | "k" => Key::Space,
        "left" | "j" => Key::ArrowLeft,
        "right" | "l" => Key::ArrowRight,
        "up" => Key::ArrowUp,
        "down" => Key::ArrowDown,
        "m" => Key::KeyM,
        "f" => Key::KeyF,
        "esc" => Key::Escape,
        "r" => return Some(Command::Retry),
        "seek" => {
            let x = words.next()?.parse().ok()?;
            return Some(Command::ProgressClicked { x });
        }
        "vol" => {
            let x = words.next()?.parse().ok()?;
            return Some(Command::VolumeClicked { x });
        }
        _ => return None,
    };
    bind(key, FocusTarget::Player).map(Command::Key)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let args = Args::parse();
    let config = PlayerConfig::load(args.config.as_deref()).context("Failed to load player config")?;

    let provider: Arc<dyn MetadataProvider> = Arc::new(
        TmdbProvider::from_env()
            .context("Failed to create TMDB provider")?
            .with_sample_fallback(!args.no_sample),
    );

    let details = match provider.fetch_details(args.id, args.media_type).await {
        Ok(details) => details,
        Err(err) => {
            warn!("Failed to fetch details for {} {}: {}", args.media_type, args.id, err);
            report_unavailable(PlaybackError::NoPlayableSource);
            return Ok(());
        }
    };
    print_header(&details, args.video);

    let source = match provider
        .fetch_playable_source(args.id, args.media_type, args.video)
        .await
        .context("Failed to resolve a playable source")?
    {
        Some(source) => source,
        None => {
            report_unavailable(PlaybackError::NoPlayableSource);
            return Ok(());
        }
    };
    if source.origin == SourceOrigin::Sample {
        println!("No trailer listed; playing a sample clip.");
    }

    match provider.fetch_similar(args.id, args.media_type).await {
        Ok(related) if !related.is_empty() => {
            let titles: Vec<&str> = related.iter().map(|title| title.title.as_str()).collect();
            println!("Related: {}", titles.join(", "));
        }
        Ok(_) => {}
        Err(err) => warn!("Failed to fetch related titles: {}", err),
    }

    let (handle, inbox) = runtime::channel();

    let clip = SimulatedClip {
        duration: match args.video {
            SourceKind::Full => details.duration_seconds.unwrap_or(TRAILER_SECONDS),
            SourceKind::Trailer => TRAILER_SECONDS,
        },
        ..SimulatedClip::default()
    };
    let mut media = SimulatedMedia::new(handle.clone(), clip);
    if let Some(failure) = args.fail_first {
        media = media.fail_next(failure.into());
    }

    let host = TerminalHost {
        handle: handle.clone(),
        provider,
        id: args.id,
        media_type: args.media_type,
    };
    let layout = ControlLayout {
        progress_bar: BarRect::new(0.0, BAR_WIDTH),
        volume_slider: BarRect::new(0.0, BAR_WIDTH),
    };

    let controller = PlaybackController::new(config, media, host, layout);
    let player = tokio::spawn(runtime::run(controller, inbox));

    handle
        .attach(SourceDescriptor::new(source.url, source.kind))
        .context("Player stopped before attaching")?;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        match line {
            "q" | "quit" => break,
            "s" | "status" => {
                let view = handle.snapshot().await.context("Player stopped")?;
                print_view(&view);
            }
            "?" | "help" => print_help(),
            _ => match parse_input(line) {
                Some(command) => handle.send(command).context("Player stopped")?,
                None => println!("Unknown command '{}'; type ? for help", line),
            },
        }
    }

    handle.shutdown().context("Player stopped")?;
    player.await.context("Player task panicked")?;
    Ok(())
}
