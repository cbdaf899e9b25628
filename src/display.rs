use crate::schedule::countdown::CountdownStatus;
use crate::schedule::index::EngineState;
use crate::schedule::model::{Schedule, ScheduleItem};
use crate::schedule::time_codec::format_time_of_day;

const IDLE_LABEL: &str = "Free Time";
const NO_NEXT_LABEL: &str = "No more tasks";
const NO_NEXT_HINT: &str = "Enjoy your rest!";

pub fn status_lines(status: &CountdownStatus) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!("Now        {}", format_time_of_day(status.query_sec)));

    match (&status.active, status.state) {
        (Some(active), _) => lines.push(format!(
            "Current    {}  until {}",
            describe(active),
            active.end_text()
        )),
        (None, EngineState::Empty) => {
            lines.push(format!("Current    {IDLE_LABEL}  (no schedule loaded)"))
        }
        (None, _) => lines.push(format!("Current    {IDLE_LABEL}  --:--")),
    }

    lines.push(format!("Remaining  {}", status.remaining_text));

    match &status.next {
        Some(next) => lines.push(format!(
            "Up next    {}  {} - {}",
            describe(next),
            next.start_text(),
            next.end_text()
        )),
        None => lines.push(format!("Up next    {NO_NEXT_LABEL}  {NO_NEXT_HINT}")),
    }
    lines
}

pub fn schedule_lines(schedule: &Schedule) -> Vec<String> {
    if schedule.is_empty() {
        return vec!["(schedule is empty)".to_string()];
    }
    schedule
        .iter()
        .map(|item| {
            format!(
                "{:>8} - {:<8}  {}",
                item.start_text(),
                item.end_text(),
                describe(item)
            )
        })
        .collect()
}

fn describe(item: &ScheduleItem) -> String {
    let extras = item
        .details()
        .iter()
        .filter(|detail| !detail.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>();
    if extras.is_empty() {
        item.label().to_string()
    } else {
        format!("{} [{}]", item.label(), extras.join(" | "))
    }
}
