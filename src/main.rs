use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use clap::Parser;
use tracing::warn;

use schedule_countdown::clock::{AnchoredClock, Clock, SystemClock, TICK_PERIOD, run_ticker};
use schedule_countdown::config::{AppConfig, load_app_config};
use schedule_countdown::display::{schedule_lines, status_lines};
use schedule_countdown::parse_time_of_day;
use schedule_countdown::session::Session;
use schedule_countdown::store::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "schedule-countdown",
    version,
    about = "Live countdown for the active item of a CSV day schedule"
)]
struct Cli {
    #[arg(long, default_value = "schedule-store.json")]
    store: PathBuf,

    /// JSON settings file with the column layout and store key.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delimited schedule to import; the first line is a header.
    #[arg(long)]
    import: Option<PathBuf>,

    #[arg(long)]
    clear: bool,

    #[arg(long)]
    list: bool,

    /// Start the clock at this local time (H:MM or HH:MM[:SS]) instead of now.
    #[arg(long, value_name = "TIME")]
    at: Option<String>,

    #[arg(long, conflicts_with = "once")]
    ticks: Option<u64>,

    #[arg(long)]
    once: bool,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schedule_countdown=warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_app_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::default(),
    };
    let start_at = cli.at.as_deref().map(parse_start_time).transpose()?;

    let mut session = Session::open(
        Box::new(FileStore::new(&cli.store)),
        config.store_key,
        config.layout,
    );

    if cli.clear {
        session.clear();
    }

    let mut stdout = io::stdout().lock();
    if let Some(path) = &cli.import {
        match session.import_file(path) {
            Ok(summary) => writeln!(
                stdout,
                "Imported {} item(s), dropped {} row(s)",
                summary.accepted, summary.dropped
            )?,
            Err(err) => warn!(error = %err, "import failed, keeping previous schedule"),
        }
    }

    if cli.list {
        for line in schedule_lines(session.schedule()) {
            writeln!(stdout, "{line}")?;
        }
        return Ok(());
    }

    let clock: Box<dyn Clock> = match start_at {
        Some(time) => Box::new(AnchoredClock::starting_at(time)),
        None => Box::new(SystemClock),
    };
    let max_ticks = if cli.once { Some(1) } else { cli.ticks };
    writeln!(stdout, "Clock      {}", clock.label())?;

    let mut first = true;
    run_ticker(&*clock, &session, TICK_PERIOD, max_ticks, |status| {
        if !first {
            writeln!(stdout)?;
        }
        first = false;
        for line in status_lines(status) {
            writeln!(stdout, "{line}")?;
        }
        stdout.flush()?;
        Ok(ControlFlow::Continue(()))
    })?;
    Ok(())
}

fn parse_start_time(text: &str) -> Result<NaiveTime> {
    let seconds = parse_time_of_day(text).with_context(|| format!("invalid --at time '{text}'"))?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .ok_or_else(|| anyhow!("invalid --at time '{text}'"))
}
