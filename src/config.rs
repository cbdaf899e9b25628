use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::schedule::model::{ColumnLayout, DetailColumn};
use crate::store::DEFAULT_STORE_KEY;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_key: String,
    pub layout: ColumnLayout,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_key: DEFAULT_STORE_KEY.to_string(),
            layout: ColumnLayout::default(),
        }
    }
}

pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read settings file {}", path.display()))?;
    parse_app_config_text(&content)
}

pub fn parse_app_config_text(content: &str) -> Result<AppConfig> {
    let raw = serde_json::from_str::<AppConfigFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != 1 {
        bail!(
            "unsupported settings version {}; expected version 1",
            raw.version
        );
    }

    let store_key = raw.store_key.trim().to_string();
    if store_key.is_empty() {
        bail!("store_key must not be empty");
    }

    let mut delimiter_chars = raw.layout.delimiter.chars();
    let delimiter = match (delimiter_chars.next(), delimiter_chars.next()) {
        (Some(ch), None) => ch,
        _ => bail!(
            "delimiter '{}' must be exactly one character",
            raw.layout.delimiter
        ),
    };

    let layout = ColumnLayout::new(
        delimiter,
        raw.layout.label,
        raw.layout.start,
        raw.layout.end,
        raw.layout.details,
    )?;

    Ok(AppConfig { store_key, layout })
}

#[derive(Debug, Deserialize)]
struct AppConfigFile {
    version: u32,
    #[serde(default = "default_store_key")]
    store_key: String,
    #[serde(default)]
    layout: LayoutFile,
}

#[derive(Debug, Deserialize)]
struct LayoutFile {
    #[serde(default = "default_delimiter")]
    delimiter: String,
    #[serde(default)]
    label: usize,
    #[serde(default = "default_start_column")]
    start: usize,
    #[serde(default = "default_end_column")]
    end: usize,
    #[serde(default)]
    details: Vec<DetailColumn>,
}

impl Default for LayoutFile {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            label: 0,
            start: default_start_column(),
            end: default_end_column(),
            details: Vec::new(),
        }
    }
}

fn default_store_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_start_column() -> usize {
    1
}

fn default_end_column() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_race_weekend_layout() {
        let json = r#"
{
  "version": 1,
  "store_key": "race-weekend",
  "layout": {
    "delimiter": ";",
    "label": 1,
    "start": 2,
    "end": 3,
    "details": [
      { "name": "series", "column": 0 },
      { "name": "circuit", "column": 4 }
    ]
  }
}
"#;
        let config = parse_app_config_text(json).expect("valid settings");
        assert_eq!(config.store_key, "race-weekend");
        assert_eq!(config.layout.delimiter(), b';');
        assert_eq!(config.layout.label_column(), 1);
        assert_eq!(config.layout.details().len(), 2);
        assert_eq!(config.layout.details()[1].name, "circuit");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = parse_app_config_text(r#"{ "version": 1 }"#).expect("valid settings");
        assert_eq!(config.store_key, DEFAULT_STORE_KEY);
        assert_eq!(config.layout, ColumnLayout::default());

        let partial = parse_app_config_text(r#"{ "version": 1, "layout": { "delimiter": "\t" } }"#)
            .expect("valid settings");
        assert_eq!(partial.layout.delimiter(), b'\t');
        assert_eq!(partial.layout.end_column(), 2);
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = parse_app_config_text(r#"{ "version": 2 }"#).expect_err("version 2");
        assert!(err.to_string().contains("unsupported settings version 2"));
    }

    #[test]
    fn rejects_invalid_json_with_position() {
        let err = parse_app_config_text("{ not-json").expect_err("invalid json");
        assert!(err.to_string().contains("invalid JSON at line 1"));
    }

    #[test]
    fn rejects_bad_delimiter_and_layout() {
        let err = parse_app_config_text(r#"{ "version": 1, "layout": { "delimiter": ";;" } }"#)
            .expect_err("two-char delimiter");
        assert!(err.to_string().contains("exactly one character"));

        let err = parse_app_config_text(r#"{ "version": 1, "layout": { "start": 2, "end": 2 } }"#)
            .expect_err("shared column");
        assert!(err.to_string().contains("invalid column layout"));
    }
}
