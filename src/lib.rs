pub mod clock;
pub mod config;
pub mod display;
pub mod schedule;
pub mod session;
pub mod store;

pub use schedule::countdown::{CountdownStatus, remaining};
pub use schedule::index::{EngineState, Location, locate};
pub use schedule::model::{ColumnLayout, DetailColumn, Schedule, ScheduleError, ScheduleItem};
pub use schedule::parser::{ParseOutcome, parse, to_delimited};
pub use schedule::time_codec::{format_duration, parse_time_of_day, seconds_since_midnight};
