mod config;
mod display;
mod record;
mod source;
mod writer;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, DisplayConfig};
use display::backend::HttpBackend;
use display::terminal::TerminalSurface;
use display::{DisplaySession, DisplayTiming, RefreshOutcome};
use source::{FileSource, TaggedTrack};
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use writer::{NowPlayingWriter, StopReason, WriteOutcome};

#[derive(Parser)]
#[command(name = "now-playing")]
#[command(about = "Now-playing file writer and polling display", version)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync the now-playing file when the player starts
    Start {
        /// File currently playing, if any
        #[arg(long)]
        playing: Option<PathBuf>,
    },
    /// A new track started playing
    NewTrack {
        file: PathBuf,
    },
    /// Playback stopped
    Stop {
        #[arg(long, value_enum, conflicts_with = "code")]
        reason: Option<StopReason>,

        /// Host stop code (0 user, 1 end of file, 2 starting another, 3 shutdown)
        #[arg(long)]
        code: Option<u32>,
    },
    /// Poll the server and show what is playing
    Display {
        /// Override the configured server URL
        #[arg(long)]
        server_url: Option<String>,
    },
    /// Print the config path, creating a default file if missing
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };
    let config = Config::load_from(&config_path)?;

    match args.command {
        Command::Start { playing } => {
            let writer = writer_from(&config);
            report(&writer, writer.start(&FileSource::new(playing)));
        }
        Command::NewTrack { file } => {
            let writer = writer_from(&config);
            let track = TaggedTrack::load(&file);
            report(&writer, writer.on_new_track(Some(&track)));
        }
        Command::Stop { reason, code } => {
            let reason = match (reason, code) {
                (Some(reason), _) => reason,
                (None, Some(code)) => StopReason::from_code(code)
                    .with_context(|| format!("Unknown stop code {}", code))?,
                (None, None) => StopReason::User,
            };
            let writer = writer_from(&config);
            report(&writer, writer.on_playback_stop(reason));
        }
        Command::Display { server_url } => {
            let mut display = config.display.clone();
            if let Some(url) = server_url {
                display.server_url = url;
            }
            run_display(&display)?;
        }
        Command::Config => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

fn writer_from(config: &Config) -> NowPlayingWriter {
    NowPlayingWriter::new(config.writer.output_path.clone(), config.writer.enabled)
}

fn report(writer: &NowPlayingWriter, outcome: WriteOutcome) {
    log::debug!("{:?}: {:?}", writer.output_path(), outcome);
}

/// Refresh on a fixed interval, firing display timers and the marquee in between
fn run_display(config: &DisplayConfig) -> Result<()> {
    let backend = HttpBackend::new(&config.server_url, config.request_timeout());
    let surface = TerminalSurface::new(config.title_width);
    let mut session = DisplaySession::new(backend, surface, DisplayTiming::from(config));
    let mut stdout = io::stdout();

    log::info!(
        "Polling {} every {}ms",
        config.server_url,
        config.refresh_interval_ms
    );

    let mut next_step = Instant::now() + config.marquee_step();

    loop {
        let cycle_start = Instant::now();
        if session.refresh_cycle(cycle_start) == RefreshOutcome::Cleared {
            log::debug!("Nothing playing");
        }
        let next_cycle = cycle_start + config.refresh_interval();

        loop {
            let now = Instant::now();
            session.run_due_timers(now);
            if now >= next_step {
                session.surface_mut().step_marquee();
                next_step = now + config.marquee_step();
            }
            session.surface().draw(&mut stdout)?;

            if now >= next_cycle {
                break;
            }

            let wake = [Some(next_cycle), Some(next_step), session.next_deadline()]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(next_cycle);
            thread::sleep(wake.saturating_duration_since(Instant::now()));
        }
    }
}
