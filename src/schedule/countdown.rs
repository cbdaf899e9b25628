use crate::schedule::index::{EngineState, locate};
use crate::schedule::model::{Schedule, ScheduleItem};
use crate::schedule::time_codec::format_duration;

/// Seconds left in `active` at `query_sec`, or zero when nothing is running.
pub fn remaining(active: Option<&ScheduleItem>, query_sec: u32) -> i64 {
    match active {
        Some(item) => i64::from(item.end_sec()) - i64::from(query_sec),
        None => 0,
    }
}

/// Everything the display needs for one tick, derived from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownStatus {
    pub query_sec: u32,
    pub state: EngineState,
    pub active: Option<ScheduleItem>,
    pub next: Option<ScheduleItem>,
    pub remaining_secs: i64,
    pub remaining_text: String,
}

impl CountdownStatus {
    pub fn at(schedule: &Schedule, query_sec: u32) -> Self {
        let location = locate(schedule, query_sec);
        let remaining_secs = remaining(location.active, query_sec);
        Self {
            query_sec,
            state: EngineState::of(schedule, &location),
            active: location.active.cloned(),
            next: location.next.cloned(),
            remaining_secs,
            remaining_text: format_duration(remaining_secs),
        }
    }
}
