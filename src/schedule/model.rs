use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::time_codec::parse_time_of_day;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("malformed time '{0}', expected H:MM, HH:MM or HH:MM:SS")]
    MalformedTime(String),
    #[error("row {line} is malformed: {reason}")]
    MalformedRow { line: usize, reason: String },
    #[error("end time {end} is not after start time {start}")]
    InvertedRange { start: String, end: String },
    #[error("invalid column layout: {0}")]
    InvalidLayout(String),
    #[error("unable to read schedule file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One labeled activity bounded by two wall-clock times on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    label: String,
    #[serde(default)]
    details: Vec<String>,
    start_text: String,
    end_text: String,
    start_sec: u32,
    end_sec: u32,
}

impl ScheduleItem {
    pub fn new(
        label: impl Into<String>,
        details: Vec<String>,
        start_text: impl Into<String>,
        end_text: impl Into<String>,
    ) -> Result<Self, ScheduleError> {
        let start_text = start_text.into().trim().to_string();
        let end_text = end_text.into().trim().to_string();
        let start_sec = parse_time_of_day(&start_text)?;
        let end_sec = parse_time_of_day(&end_text)?;
        if end_sec <= start_sec {
            return Err(ScheduleError::InvertedRange {
                start: start_text,
                end: end_text,
            });
        }
        Ok(Self {
            label: label.into().trim().to_string(),
            details,
            start_text,
            end_text,
            start_sec,
            end_sec,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn start_text(&self) -> &str {
        &self.start_text
    }

    pub fn end_text(&self) -> &str {
        &self.end_text
    }

    pub fn start_sec(&self) -> u32 {
        self.start_sec
    }

    pub fn end_sec(&self) -> u32 {
        self.end_sec
    }

    pub fn contains(&self, query_sec: u32) -> bool {
        query_sec >= self.start_sec && query_sec < self.end_sec
    }
}

/// Items ordered ascending by start time. Overlaps are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    items: Vec<ScheduleItem>,
}

impl Schedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items(mut items: Vec<ScheduleItem>) -> Self {
        // `sort_by_key` is stable, equal starts keep input order.
        items.sort_by_key(ScheduleItem::start_sec);
        Self { items }
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleItem;
    type IntoIter = std::slice::Iter<'a, ScheduleItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailColumn {
    pub name: String,
    pub column: usize,
}

/// Positional mapping from delimited columns to item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    delimiter: u8,
    label: usize,
    start: usize,
    end: usize,
    details: Vec<DetailColumn>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            delimiter: b',',
            label: 0,
            start: 1,
            end: 2,
            details: Vec::new(),
        }
    }
}

impl ColumnLayout {
    pub fn new(
        delimiter: char,
        label: usize,
        start: usize,
        end: usize,
        details: Vec<DetailColumn>,
    ) -> Result<Self, ScheduleError> {
        if !delimiter.is_ascii() || matches!(delimiter, '"' | '\r' | '\n') {
            return Err(ScheduleError::InvalidLayout(format!(
                "delimiter {delimiter:?} must be a single ASCII character other than a quote or line break"
            )));
        }
        if label == start || label == end || start == end {
            return Err(ScheduleError::InvalidLayout(format!(
                "label ({label}), start ({start}) and end ({end}) columns must differ"
            )));
        }
        for detail in &details {
            if detail.column == start || detail.column == end {
                return Err(ScheduleError::InvalidLayout(format!(
                    "detail column '{}' reuses time column {}",
                    detail.name, detail.column
                )));
            }
        }
        Ok(Self {
            delimiter: delimiter as u8,
            label,
            start,
            end,
            details,
        })
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn label_column(&self) -> usize {
        self.label
    }

    pub fn start_column(&self) -> usize {
        self.start
    }

    pub fn end_column(&self) -> usize {
        self.end
    }

    pub fn details(&self) -> &[DetailColumn] {
        &self.details
    }

    /// Number of positional fields needed to hold every mapped column.
    pub fn width(&self) -> usize {
        self.details
            .iter()
            .map(|detail| detail.column)
            .chain([self.label, self.start, self.end])
            .max()
            .unwrap_or(0)
            + 1
    }
}
