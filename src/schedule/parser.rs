use std::borrow::Cow;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::schedule::model::{ColumnLayout, Schedule, ScheduleError, ScheduleItem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub schedule: Schedule,
    pub dropped: usize,
}

/// Parses delimited text into a start-ordered schedule.
///
/// The first physical line is always treated as a header and skipped. Every
/// following non-empty line is one row; quoting never spans a line break.
/// Rows that miss a required field, carry an unreadable time, or end before
/// they start are dropped and counted; parsing itself never fails.
pub fn parse(raw_text: &str, layout: &ColumnLayout) -> ParseOutcome {
    let body = match raw_text.split_once('\n') {
        Some((_header, rest)) => rest,
        None => "",
    };

    let mut items = Vec::new();
    let mut dropped = 0;
    // Line 1 is the header.
    for (line, text) in (2..).zip(body.lines()) {
        if text.is_empty() {
            continue;
        }
        match parse_row(text, layout, line) {
            Ok(item) => items.push(item),
            Err(err) => {
                debug!(line, error = %err, "dropping schedule row");
                dropped += 1;
            }
        }
    }

    ParseOutcome {
        schedule: Schedule::from_items(items),
        dropped,
    }
}

fn parse_row(
    text: &str,
    layout: &ColumnLayout,
    line: usize,
) -> Result<ScheduleItem, ScheduleError> {
    let record = split_fields(text, layout).map_err(|err| ScheduleError::MalformedRow {
        line,
        reason: err.to_string(),
    })?;
    let label = required_field(&record, layout.label_column(), "label", line)?;
    let start = required_field(&record, layout.start_column(), "start", line)?;
    let end = required_field(&record, layout.end_column(), "end", line)?;
    let details = layout
        .details()
        .iter()
        .map(|detail| field(&record, detail.column).map(Cow::into_owned).unwrap_or_default())
        .collect();
    ScheduleItem::new(label, details, start, end)
}

/// Splits one physical line; an unclosed quote runs to the end of that line only.
fn split_fields(text: &str, layout: &ColumnLayout) -> Result<ByteRecord, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(layout.delimiter())
        .from_reader(text.as_bytes());
    let mut record = ByteRecord::new();
    reader.read_byte_record(&mut record)?;
    Ok(record)
}

fn field(record: &ByteRecord, column: usize) -> Option<Cow<'_, str>> {
    let raw = record.get(column)?;
    Some(match String::from_utf8_lossy(raw) {
        Cow::Borrowed(text) => Cow::Borrowed(text.trim()),
        Cow::Owned(text) => Cow::Owned(text.trim().to_string()),
    })
}

fn required_field<'r>(
    record: &'r ByteRecord,
    column: usize,
    name: &str,
    line: usize,
) -> Result<Cow<'r, str>, ScheduleError> {
    match field(record, column) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(ScheduleError::MalformedRow {
            line,
            reason: format!("{name} field (column {column}) is empty"),
        }),
        None => Err(ScheduleError::MalformedRow {
            line,
            reason: format!("{name} field (column {column}) is missing"),
        }),
    }
}

/// Writes the schedule back out in `layout`, header line first.
pub fn to_delimited(schedule: &Schedule, layout: &ColumnLayout) -> Result<String, csv::Error> {
    let width = layout.width();
    let mut writer = WriterBuilder::new()
        .delimiter(layout.delimiter())
        .from_writer(Vec::new());

    let mut header = vec![String::new(); width];
    header[layout.label_column()] = "label".to_string();
    header[layout.start_column()] = "start".to_string();
    header[layout.end_column()] = "end".to_string();
    for detail in layout.details() {
        if header[detail.column].is_empty() {
            header[detail.column] = detail.name.clone();
        }
    }
    writer.write_record(&header)?;

    for item in schedule {
        let mut row = vec![""; width];
        for (detail, value) in layout.details().iter().zip(item.details()) {
            row[detail.column] = value.as_str();
        }
        row[layout.label_column()] = item.label();
        row[layout.start_column()] = item.start_text();
        row[layout.end_column()] = item.end_text();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
