use crate::schedule::model::{Schedule, ScheduleItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location<'a> {
    pub active: Option<&'a ScheduleItem>,
    pub next: Option<&'a ScheduleItem>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EngineState {
    Empty,
    NoActive,
    Active,
}

impl EngineState {
    pub fn of(schedule: &Schedule, location: &Location<'_>) -> Self {
        if schedule.is_empty() {
            EngineState::Empty
        } else if location.active.is_some() {
            EngineState::Active
        } else {
            EngineState::NoActive
        }
    }
}

/// Finds the item running at `query_sec` and the first one starting after it.
///
/// Overlapping items resolve to the earliest-starting match, so at most one
/// item is ever active. `next` only depends on start times.
pub fn locate(schedule: &Schedule, query_sec: u32) -> Location<'_> {
    let active = schedule.iter().find(|item| item.contains(query_sec));
    let next = schedule.iter().find(|item| item.start_sec() > query_sec);
    Location { active, next }
}
