//! Aircon session simulator: host entry point.
//!
//! Drives one [`SessionController`] from the wall clock and the console.
//!
//! ```text
//! ┌──────────────┐ ControlMsg ┌───────────────────────────────┐
//! │ console      │───────────▶│ control loop                  │
//! │ (stdin)      │  channel   │  drain → advance(lap) → sleep │
//! └──────────────┘            └───────────────┬───────────────┘
//!                                             │ AppEvent
//!                                   LogEventSink / JsonEventSink
//! ```
#![deny(unused_must_use)]

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use aircon::adapters::channels::{self, ControlMsg, CONTROL_CHANNEL};
use aircon::adapters::config_file::JsonConfigFile;
use aircon::adapters::console::spawn_console_reader;
use aircon::adapters::json_sink::JsonEventSink;
use aircon::adapters::log_sink::LogEventSink;
use aircon::adapters::time::MonotonicClock;
use aircon::{AppEvent, ConfigPort, EventSink, Phase, SessionConfig, SessionController};

/// Longest control loop sleep, so console input stays responsive.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Largest accepted `--time-scale`.
const MAX_TIME_SCALE: f64 = 1e6;

#[derive(Parser, Debug)]
#[command(name = "aircon-sim", version, about = "Simulated air-conditioner remote session")]
struct Cli {
    /// JSON config file (missing file means defaults)
    #[arg(short, long, default_value = "aircon.json")]
    config: PathBuf,

    /// Requested session length in minutes
    #[arg(long)]
    minutes: Option<u32>,

    /// Delay before the start request is acknowledged
    #[arg(long)]
    ack_delay_ms: Option<u64>,

    /// Countdown tick period
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Count the first minute as already elapsed when the session starts
    /// (true/false, overrides the config file)
    #[arg(long, value_name = "BOOL")]
    first_tick_elapsed: Option<bool>,

    /// Multiply wall-clock time (e.g. 60 runs a minute per second)
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Send `start` immediately
    #[arg(long)]
    auto_start: bool,

    /// Exit once the session has run and returned to idle
    #[arg(long)]
    once: bool,

    /// Emit events as JSON lines on stdout instead of log lines
    #[arg(long)]
    json: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SessionConfig) {
        if let Some(minutes) = self.minutes {
            config.requested_duration_minutes = minutes;
        }
        if let Some(ms) = self.ack_delay_ms {
            config.request_ack_delay_ms = ms;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        if let Some(elapsed) = self.first_tick_elapsed {
            config.first_tick_already_elapsed = elapsed;
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.time_scale > 0.0 && self.time_scale <= MAX_TIME_SCALE) {
            bail!(
                "--time-scale must be in (0, {}], got {}",
                MAX_TIME_SCALE,
                self.time_scale
            );
        }
        Ok(())
    }
}

// ── Clock helpers ─────────────────────────────────────────────

/// Wall-clock time converted to session time.
fn to_session_time(wall: Duration, time_scale: f64) -> Duration {
    Duration::try_from_secs_f64(wall.as_secs_f64() * time_scale).unwrap_or(Duration::MAX)
}

/// How long the control loop may sleep: until the next timer deadline in
/// wall-clock terms, capped at [`POLL_INTERVAL`].
fn sleep_budget(session: &SessionController, time_scale: f64) -> Duration {
    let timers = session.timers();
    let Some(deadline) = timers.next_deadline() else {
        return POLL_INTERVAL;
    };
    let session_wait = deadline.saturating_sub(timers.now());
    Duration::try_from_secs_f64(session_wait.as_secs_f64() / time_scale)
        .map_or(POLL_INTERVAL, |wall| wall.min(POLL_INTERVAL))
}

// ── Output sink ───────────────────────────────────────────────

enum OutputSink {
    Log(LogEventSink),
    Json(JsonEventSink<Stdout>),
}

impl EventSink for OutputSink {
    fn emit(&mut self, event: &AppEvent) {
        match self {
            Self::Log(sink) => sink.emit(event),
            Self::Json(sink) => sink.emit(event),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    cli.validate()?;

    // ── 1. Configuration ──────────────────────────────────────
    let store = JsonConfigFile::new(&cli.config);
    let mut config = store
        .load()
        .with_context(|| format!("loading {}", store.path().display()))?;
    cli.apply_overrides(&mut config);

    // ── 2. Core ───────────────────────────────────────────────
    let mut session = SessionController::new(config).context("invalid session config")?;
    let mut sink = if cli.json {
        OutputSink::Json(JsonEventSink::new(io::stdout()))
    } else {
        OutputSink::Log(LogEventSink::new())
    };
    info!(
        "Session ready: {} min, ack {}ms, tick {}ms, x{}",
        session.config().requested_duration_minutes,
        session.config().request_ack_delay_ms,
        session.config().tick_interval_ms,
        cli.time_scale
    );

    // ── 3. Input ──────────────────────────────────────────────
    let _console = spawn_console_reader(&CONTROL_CHANNEL).context("spawning console reader")?;
    if cli.auto_start {
        session.start(&mut sink);
    }

    // ── 4. Control loop ───────────────────────────────────────
    let mut clock = MonotonicClock::new();
    let mut has_run = session.phase() != Phase::Idle;
    'control: loop {
        let mut quit = false;
        channels::drain(&CONTROL_CHANNEL, |msg| match msg {
            ControlMsg::Session(cmd) => session.handle_command(cmd, &mut sink),
            ControlMsg::Quit => quit = true,
        });
        if quit {
            break 'control;
        }

        session.advance(to_session_time(clock.lap(), cli.time_scale), &mut sink);

        if session.phase() != Phase::Idle {
            has_run = true;
        } else if cli.once && has_run {
            info!("Session finished");
            break 'control;
        }

        thread::sleep(sleep_budget(&session, cli.time_scale));
    }

    session.teardown(&mut sink);
    if session.timers().armed_count() != 0 {
        warn!("Timers still armed after teardown");
    }
    info!("Shutdown after {:.1}s", clock.uptime().as_secs_f64());
    Ok(())
}
