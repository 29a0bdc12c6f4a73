//! Headless splice driver.
//!
//! Runs one session against simulated players, standing in for the surface
//! provider and the media clocks, and logs every orchestrator event.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use splice_engine::create_orchestrator;
use splice_ipc::{event_channel, PlaybackCommand, PlaybackConfig, PlaybackEvent, SurfaceHandle};
use splice_player::sim::{SimulatedPlayer, SimulatedStreamingEngine};

const CLOCK_STEP: Duration = Duration::from_millis(50);

/// splice - dual-source playback orchestrator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session configuration (JSON); defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Simulated media seconds per wall-clock second
    #[arg(short, long, default_value = "1.0")]
    speed: f64,

    /// Main content duration in seconds
    #[arg(long, default_value = "30.0")]
    main_duration: f64,

    /// Ad content duration in seconds
    #[arg(long, default_value = "20.0")]
    ad_duration: f64,

    /// Override the reconciliation tick period
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Delay before the video surface becomes available
    #[arg(long, value_name = "MS", default_value = "500")]
    surface_delay_ms: u64,

    /// Give up if the session has not finished after this many seconds
    #[arg(long, value_name = "SECS", default_value = "300")]
    timeout: u64,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "splice=info,splice_engine=debug,splice_player=info,splice_ipc=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(args: &Args) -> Result<PlaybackConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => PlaybackConfig::default(),
    };

    if let Some(tick_ms) = args.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    config.validate().context("Invalid playback configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    info!("splice v{} starting", env!("CARGO_PKG_VERSION"));

    if !(args.speed.is_finite() && args.speed > 0.0) {
        bail!("--speed must be a positive number");
    }
    let config = load_config(&args)?;

    let main_player = SimulatedPlayer::new("main");
    let ad_player = SimulatedPlayer::new("ad");
    let engine = SimulatedStreamingEngine::new(config.streaming.clone());
    let (main_clock, ad_clock) = (main_player.handle(), ad_player.handle());
    main_clock.set_duration(Some(args.main_duration));
    ad_clock.set_duration(Some(args.ad_duration));

    let (event_tx, event_rx) = event_channel();
    let (mut orchestrator, handle) = create_orchestrator(
        Box::new(main_player),
        Box::new(ad_player),
        Box::new(engine),
        event_tx,
    );

    let worker = thread::spawn(move || orchestrator.run());

    handle.start(config)?;

    let surface_at = Instant::now() + Duration::from_millis(args.surface_delay_ms);
    let deadline = Instant::now() + Duration::from_secs(args.timeout);
    let mut surface_sent = false;
    let mut timed_out = false;
    let step = CLOCK_STEP.as_secs_f64() * args.speed;

    loop {
        match event_rx.recv_timeout(CLOCK_STEP) {
            Ok(event) => {
                let json = serde_json::to_string(&event).unwrap_or_default();
                match event {
                    PlaybackEvent::Error { recoverable, message } => {
                        error!(recoverable, %message, "Orchestrator error");
                    }
                    PlaybackEvent::Finished { ref reason, .. } => {
                        info!(reason = %reason.message(), %json, "Session finished");
                        handle.shutdown()?;
                    }
                    PlaybackEvent::Shutdown => {
                        info!("Orchestrator shut down");
                        break;
                    }
                    _ => info!(%json, "Event"),
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if !surface_sent && Instant::now() >= surface_at {
                    info!("Surface available");
                    handle.surface_created(SurfaceHandle::new("surface-0"))?;
                    handle.send(PlaybackCommand::CaptionSurfaceCreated(
                        SurfaceHandle::new("captions-0"),
                    ))?;
                    surface_sent = true;
                }

                main_clock.advance(step);
                ad_clock.advance(step);
                debug!(
                    main = main_clock.current_time(),
                    ad = ad_clock.current_time(),
                    "Clock step"
                );

                if !timed_out && Instant::now() >= deadline {
                    warn!("Session did not finish in time, shutting down");
                    handle.shutdown()?;
                    timed_out = true;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Event channel closed");
                break;
            }
        }
    }

    if worker.join().is_err() {
        bail!("Orchestrator thread panicked");
    }

    info!("splice stopped");
    Ok(())
}
