// src/main.rs
//! GPX Timelapse - replay GPS tracks in accelerated time

use anyhow::{bail, Context};
use clap::Parser;
use gpx_timelapse::{
    config::PlaybackConfig,
    display::{should_use_terminal, DisplayMode, PathRecorder, PlainDisplay, StatsDisplay, TerminalDisplay},
    Player, Playlist, StopSignal,
};
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gpx-timelapse", version, about = "Replay GPX tracks as a timelapse")]
struct Cli {
    /// GPX files to play, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Recorded seconds replayed per real second
    #[arg(short, long)]
    speed: Option<f64>,

    /// Statistics display: terminal or plain
    #[arg(long)]
    display: Option<String>,

    /// Move the file at position FROM to position TO (1-based, repeatable)
    #[arg(long = "move", value_name = "FROM:TO")]
    moves: Vec<String>,

    /// Drop the file at this position (1-based, repeatable, applied after moves)
    #[arg(long = "remove", value_name = "INDEX")]
    removals: Vec<usize>,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,

    /// Persist the effective speed and display as new defaults
    #[arg(long)]
    save_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<gpx_timelapse::TimelapseError>()
                .is_some_and(|err| err.is_aborted())
            {
                eprintln!("\nPlayback stopped.");
                ExitCode::from(130)
            } else {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PlaybackConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring configuration: {}", e);
        PlaybackConfig::default()
    });

    if let Some(speed) = cli.speed {
        config.update_speed(speed)?;
    }
    if let Some(ref display) = cli.display {
        match DisplayMode::parse(display) {
            Some(mode) => config.update_display(mode),
            None => bail!("unknown display '{}' (expected 'terminal' or 'plain')", display),
        }
    }
    if cli.save_config {
        config.save().context("saving configuration")?;
    }

    let playlist = build_playlist(&cli)?;
    let tracks = playlist.load_tracks().context("loading GPX files")?;

    let stop = StopSignal::new();
    stop.stop_on_ctrl_c();
    let player = Player::with_stop_signal(config.speed_multiplier, stop)?;
    let mut renderer = PathRecorder::with_draw_delay(Duration::from_millis(config.render_delay_ms));

    let mode = match config.display_mode()? {
        DisplayMode::Terminal if !should_use_terminal() => DisplayMode::Plain,
        mode => mode,
    };
    let mut display: Box<dyn StatsDisplay> = match mode {
        DisplayMode::Terminal => Box::new(TerminalDisplay::new(config.speed_multiplier)),
        DisplayMode::Plain => Box::new(PlainDisplay::new()),
    };

    let summary = player
        .run(&tracks, &mut renderer, display.as_mut())
        .await?;
    drop(display);

    if let Some(view) = renderer.view_extent() {
        let (lat, lon) = view.center();
        tracing::info!(
            "Final view centred on {:.5}, {:.5} ({:.5} x {:.5} deg)",
            lat,
            lon,
            view.max_lat - view.min_lat,
            view.max_lon - view.min_lon
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn build_playlist(cli: &Cli) -> anyhow::Result<Playlist> {
    let mut playlist = Playlist::new();
    playlist.extend(cli.files.iter().cloned());

    for arg in &cli.moves {
        let (from, to) = parse_move(arg)?;
        playlist.rearrange(from, to)?;
    }

    let mut removals = cli.removals.clone();
    // Highest first so earlier positions keep their meaning
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for position in removals {
        let index = position
            .checked_sub(1)
            .with_context(|| format!("file positions start at 1, got {}", position))?;
        playlist.remove(index)?;
    }

    Ok(playlist)
}

/// Parse `FROM:TO` (1-based) into 0-based indices.
fn parse_move(arg: &str) -> anyhow::Result<(usize, usize)> {
    let (from, to) = arg
        .split_once(':')
        .with_context(|| format!("expected FROM:TO, got '{}'", arg))?;
    let from: usize = from.trim().parse().with_context(|| format!("bad position in '{}'", arg))?;
    let to: usize = to.trim().parse().with_context(|| format!("bad position in '{}'", arg))?;
    if from == 0 || to == 0 {
        bail!("file positions start at 1, got '{}'", arg);
    }
    Ok((from - 1, to - 1))
}
