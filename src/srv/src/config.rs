//! Roster settings, read from a TOML file.
//!
//! ```toml
//! epoch = "2019-01-01"
//! rows_per_day = 6
//!
//! [analysis]
//! emit_ideal_met = false
//!
//! [log]
//! filter = "info,roster=debug"
//! ```
//!
//! Every field is optional. `days` is either absent or lists all seven days.

use crate::data::{DAYS_PER_WEEK, SlotKind};
use chrono::{Datelike, NaiveDate, Weekday};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::{
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Upper limit on [`RosterConfig::rows_per_day`].
pub const MAX_ROWS_PER_DAY: usize = 64;

/// Error while loading a [`RosterConfig`].
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("could not read config file {}", path.display())]
    #[diagnostic(help("make sure the file can be read, or remove it to use the defaults"))]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML, or does not match the expected layout.
    #[error("invalid config: {message}")]
    #[diagnostic(help("dates are quoted, e.g. `epoch = \"2019-01-01\"`"))]
    Parse {
        /// What went wrong.
        message: String,
        /// The config text.
        #[source_code]
        src: NamedSource<String>,
        /// Where it went wrong, when known.
        #[label("here")]
        span: Option<SourceSpan>,
    },

    /// `days` does not describe a whole week.
    #[error("expected {} day templates, found {}", DAYS_PER_WEEK, .0)]
    #[diagnostic(help("list every day of the week under `[[days]]`, starting with the epoch's weekday"))]
    DayCount(usize),

    /// Weeks start on Tuesday.
    #[error("epoch {} is a {}, not a Tuesday", .0, .0.weekday())]
    #[diagnostic(help("pick the Tuesday that starts any roster week"))]
    EpochWeekday(NaiveDate),

    /// `rows_per_day` is beyond [`MAX_ROWS_PER_DAY`].
    #[error("{} rows per day is more than the limit of {}", .0, MAX_ROWS_PER_DAY)]
    TooManyRows(usize),
}

/// Layout of one day in a freshly provisioned week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTemplate {
    /// Display name.
    pub name: String,

    /// Display colour of the day's block.
    pub colour: String,

    /// Slot kinds of every row, in display order.
    #[serde(default = "standard_kinds")]
    pub kinds: Vec<SlotKind>,
}

fn standard_kinds() -> Vec<SlotKind> {
    SlotKind::STANDARD.to_vec()
}

/// Analyzer switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Report staff exactly at their ideal shift count.
    pub emit_ideal_met: bool,
}

/// Logging switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Everything configurable about rostering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// First day of week zero. Must be a Tuesday.
    pub epoch: NaiveDate,

    /// Rows given to each day of a new week.
    pub rows_per_day: usize,

    /// One template per day of the week, starting at the epoch's weekday.
    pub days: Vec<DayTemplate>,

    /// See [`AnalysisConfig`].
    pub analysis: AnalysisConfig,

    /// See [`LogConfig`].
    pub log: LogConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        const NAMES: [&str; DAYS_PER_WEEK] = [
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
            "Monday",
        ];
        Self {
            epoch: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            rows_per_day: 6,
            days: NAMES
                .iter()
                .enumerate()
                .map(|(i, name)| DayTemplate {
                    name: (*name).to_string(),
                    colour: if i % 2 == 0 { "#ffffff" } else { "#f2f2f2" }.to_string(),
                    kinds: standard_kinds(),
                })
                .collect(),
            analysis: AnalysisConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Parse and validate TOML text. `name` labels the source in diagnostics.
    pub fn from_toml_str(name: &str, text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.message().to_string(),
            span: e.span().map(SourceSpan::from),
            src: NamedSource::new(name, text.to_string()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&path.display().to_string(), &text)
    }

    /// Like [`RosterConfig::load`], but a missing file gives the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Check the invariants deserialization cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.days.len() != DAYS_PER_WEEK {
            return Err(ConfigError::DayCount(self.days.len()));
        }
        if self.epoch.weekday() != Weekday::Tue {
            return Err(ConfigError::EpochWeekday(self.epoch));
        }
        if self.rows_per_day > MAX_ROWS_PER_DAY {
            return Err(ConfigError::TooManyRows(self.rows_per_day));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date;

    #[test]
    fn test_defaults() {
        let config = RosterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.epoch, date!(1/1/2019));
        assert_eq!(config.rows_per_day, 6);
        assert_eq!(config.days[0].name, "Tuesday");
        assert_eq!(config.days[6].name, "Monday");
        assert_eq!(config.days[0].colour, "#ffffff");
        assert_eq!(config.days[1].colour, "#f2f2f2");
        assert!(!config.analysis.emit_ideal_met);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_empty_text_is_default() {
        assert_eq!(
            RosterConfig::from_toml_str("roster.toml", "").unwrap(),
            RosterConfig::default()
        );
    }

    #[test]
    fn test_partial_override() {
        let config = RosterConfig::from_toml_str(
            "roster.toml",
            r#"
                epoch = "2024-01-02"
                rows_per_day = 4

                [analysis]
                emit_ideal_met = true
            "#,
        )
        .unwrap();
        assert_eq!(config.epoch, date!(1/2/2024));
        assert_eq!(config.rows_per_day, 4);
        assert!(config.analysis.emit_ideal_met);
        assert_eq!(config.days, RosterConfig::default().days);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_day_templates() {
        let mut text = String::new();
        for name in ["Tu", "We", "Th", "Fr", "Sa", "Su", "Mo"] {
            text.push_str(&format!("[[days]]\nname = \"{name}\"\ncolour = \"#000000\"\n"));
        }
        text.push_str("kinds = [\"early\", \"late\", \"amelia\"]\n");

        let config = RosterConfig::from_toml_str("roster.toml", &text).unwrap();
        assert_eq!(config.days[0].kinds, SlotKind::STANDARD);
        assert_eq!(
            config.days[6].kinds,
            [SlotKind::Early, SlotKind::Late, SlotKind::Amelia]
        );
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            RosterConfig::from_toml_str("roster.toml", "epoch = \"2019-01-02\""),
            Err(ConfigError::EpochWeekday(_))
        ));
        assert!(matches!(
            RosterConfig::from_toml_str("roster.toml", "rows_per_day = 65"),
            Err(ConfigError::TooManyRows(65))
        ));
        assert!(matches!(
            RosterConfig::from_toml_str("roster.toml", "[[days]]\nname = \"x\"\ncolour = \"y\""),
            Err(ConfigError::DayCount(1))
        ));
        assert!(matches!(
            RosterConfig::from_toml_str("roster.toml", "rows_per_day = \"six\""),
            Err(ConfigError::Parse { span: Some(_), .. })
        ));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.toml");
        assert_eq!(
            RosterConfig::load_or_default(&path).unwrap(),
            RosterConfig::default()
        );
        assert!(matches!(
            RosterConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));

        std::fs::write(&path, "rows_per_day = 2\n[log]\nfilter = \"debug\"\n").unwrap();
        let config = RosterConfig::load_or_default(&path).unwrap();
        assert_eq!(config.rows_per_day, 2);
        assert_eq!(config.log.filter, "debug");
    }
}
