use chrono::{NaiveTime, Timelike};

use crate::schedule::model::ScheduleError;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Parses `H:MM`, `HH:MM` or either with a trailing `:SS` into seconds since midnight.
pub fn parse_time_of_day(text: &str) -> Result<u32, ScheduleError> {
    let trimmed = text.trim();
    let malformed = || ScheduleError::MalformedTime(trimmed.to_string());

    let mut parts = trimmed.split(':');
    let hour = parts.next().ok_or_else(malformed)?;
    let minute = parts.next().ok_or_else(malformed)?;
    let second = parts.next();
    if parts.next().is_some() {
        return Err(malformed());
    }

    let hour = numeric_component(hour, 1..=2).ok_or_else(malformed)?;
    let minute = numeric_component(minute, 2..=2).ok_or_else(malformed)?;
    let second = match second {
        Some(raw) => numeric_component(raw, 2..=2).ok_or_else(malformed)?,
        None => 0,
    };

    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(malformed)?;
    Ok(time.num_seconds_from_midnight())
}

fn numeric_component(raw: &str, digits: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !digits.contains(&raw.len()) || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Countdown text. Non-positive input floors to `00:00:00`.
pub fn format_duration(total_seconds: i64) -> String {
    if total_seconds <= 0 {
        return "00:00:00".to_string();
    }
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn seconds_since_midnight(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

pub fn format_time_of_day(seconds: u32) -> String {
    let seconds = seconds % SECONDS_PER_DAY;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
