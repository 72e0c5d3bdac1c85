use std::fmt;

/// Why a write was rejected. Every variant leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    InvalidTimestamp { field: &'static str, value: String },
    /// Standard hours need exactly `Operating` or `Closed`.
    InvalidStatus(String),
    /// Special hours may not reuse a standard status as their label.
    ReservedLabel(String),
    Format { pattern: String },
    DateOutOfRange,
}

impl ScheduleError {
    pub fn field(&self) -> &'static str {
        match self {
            ScheduleError::InvalidTimestamp { field, .. } => *field,
            ScheduleError::InvalidStatus(_) | ScheduleError::ReservedLabel(_) => "scheduleType",
            ScheduleError::Format { .. } => "format",
            ScheduleError::DateOutOfRange => "date",
        }
    }
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::InvalidTimestamp { field, value } => {
                write!(f, "invalid {field}: '{value}' is not a recognizable date or time")
            }
            ScheduleError::InvalidStatus(status) => write!(
                f,
                "invalid scheduleType '{status}' for standard hours (expected Operating or Closed)"
            ),
            ScheduleError::ReservedLabel(label) => write!(
                f,
                "scheduleType '{label}' is reserved for standard hours and cannot label special hours"
            ),
            ScheduleError::Format { pattern } => {
                write!(f, "could not format timestamp with pattern '{pattern}'")
            }
            ScheduleError::DateOutOfRange => write!(f, "date is outside the supported calendar range"),
        }
    }
}

impl std::error::Error for ScheduleError {}
