use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveTime};

use crate::schedule::countdown::CountdownStatus;
use crate::schedule::time_codec::seconds_since_midnight;
use crate::session::Session;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Local wall-clock source for query instants.
pub trait Clock {
    fn now(&self) -> Result<NaiveTime>;
    fn label(&self) -> &'static str;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<NaiveTime> {
        Ok(Local::now().time())
    }

    fn label(&self) -> &'static str {
        "LOCAL"
    }
}

/// Starts at a chosen wall time and advances with the monotonic clock.
pub struct AnchoredClock {
    wall_anchor: NaiveTime,
    monotonic_anchor: Instant,
}

impl AnchoredClock {
    pub fn starting_at(wall_anchor: NaiveTime) -> Self {
        Self {
            wall_anchor,
            monotonic_anchor: Instant::now(),
        }
    }
}

impl Clock for AnchoredClock {
    fn now(&self) -> Result<NaiveTime> {
        let elapsed = chrono::Duration::from_std(self.monotonic_anchor.elapsed())?;
        let (time, _wrapped_days) = self.wall_anchor.overflowing_add_signed(elapsed);
        Ok(time)
    }

    fn label(&self) -> &'static str {
        "ANCHORED"
    }
}

pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> Result<NaiveTime> {
        Ok(self.0)
    }

    fn label(&self) -> &'static str {
        "FIXED"
    }
}

/// Calls `on_tick` once per `period` with a status derived from the clock.
///
/// Deadlines advance by `period` from the first tick, so a slow callback does
/// not push later ticks back. Returns the number of ticks delivered.
pub fn run_ticker<F>(
    clock: &dyn Clock,
    session: &Session,
    period: Duration,
    max_ticks: Option<u64>,
    mut on_tick: F,
) -> Result<u64>
where
    F: FnMut(&CountdownStatus) -> Result<ControlFlow<()>>,
{
    let mut ticks = 0_u64;
    let mut next_tick = Instant::now();
    loop {
        if max_ticks.is_some_and(|limit| ticks >= limit) {
            break;
        }
        sleep_until(next_tick);
        let query_sec = seconds_since_midnight(clock.now()?);
        let status = session.status(query_sec);
        ticks += 1;
        if on_tick(&status)?.is_break() {
            break;
        }

        next_tick += period;
        let now = Instant::now();
        if next_tick < now {
            // Missed ticks are skipped rather than replayed.
            let behind = now.saturating_duration_since(next_tick).as_nanos();
            let skipped = behind / period.as_nanos().max(1) + 1;
            next_tick += period * u32::try_from(skipped).unwrap_or(u32::MAX);
        }
    }
    Ok(ticks)
}

pub fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }
    std::thread::sleep(deadline.saturating_duration_since(now));
}
