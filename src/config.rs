use crate::settings::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, DEFAULT_UTC_OFFSET_MINUTES};
use chrono::{FixedOffset, Offset, Utc};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serialization(SerdeJsonError),
    InvalidPattern {
        field: &'static str,
        pattern: String,
    },
    InvalidOffset(i32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "io error: {err}"),
            ConfigError::Serialization(err) => write!(f, "config parse error: {err}"),
            ConfigError::InvalidPattern { field, pattern } => {
                write!(f, "{field} '{pattern}' is not a valid format pattern")
            }
            ConfigError::InvalidOffset(minutes) => write!(
                f,
                "utc offset of {minutes} minutes is outside the supported range"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SerdeJsonError> for ConfigError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

/// Construction options for a [`ScheduleStore`](crate::ScheduleStore).
///
/// Every key is optional when loaded from JSON; missing keys fall back to
/// the values in [`crate::settings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleStoreConfig {
    pub date_format: String,
    pub time_format: String,
    /// Offset given to inputs without one (naive date-times, bare dates, bare times).
    pub utc_offset_minutes: i32,
}

impl Default for ScheduleStoreConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl ScheduleStoreConfig {
    pub fn new(date_format: impl Into<String>, time_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            time_format: time_format.into(),
            ..Self::default()
        }
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: ScheduleStoreConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_pattern("dateFormat", &self.date_format)?;
        Self::validate_pattern("timeFormat", &self.time_format)?;
        if self.utc_offset_minutes.unsigned_abs() >= MINUTES_PER_DAY {
            return Err(ConfigError::InvalidOffset(self.utc_offset_minutes));
        }
        Ok(())
    }

    fn validate_pattern(field: &'static str, pattern: &str) -> Result<(), ConfigError> {
        let broken = pattern.trim().is_empty()
            || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
        if broken {
            return Err(ConfigError::InvalidPattern {
                field,
                pattern: pattern.to_string(),
            });
        }
        Ok(())
    }

    /// Offset for offset-less inputs. Falls back to UTC if the configured
    /// value was never validated and is out of range.
    pub(crate) fn fallback_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }
}
