use crate::timestamp::DateTimeInput;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a day's standard hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Operating,
    Closed,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Operating => "Operating",
            ScheduleStatus::Closed => "Closed",
        }
    }

    /// True when `label` is one of the two standard statuses.
    pub fn is_reserved(label: &str) -> bool {
        label.parse::<ScheduleStatus>().is_ok()
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Operating" => Ok(ScheduleStatus::Operating),
            "Closed" => Ok(ScheduleStatus::Closed),
            other => Err(format!("unknown schedule status '{other}'")),
        }
    }
}

/// Opening and closing times plus the kind of record they produce.
///
/// `schedule_type` stays a plain string so that the store, not the type
/// system, decides whether it fits the standard or special slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hours {
    pub open: DateTimeInput,
    pub close: DateTimeInput,
    pub special_hours: bool,
    pub schedule_type: String,
}

impl Hours {
    /// Standard `Operating` hours.
    pub fn new(open: impl Into<DateTimeInput>, close: impl Into<DateTimeInput>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            special_hours: false,
            schedule_type: ScheduleStatus::Operating.as_str().to_string(),
        }
    }

    pub fn closed(open: impl Into<DateTimeInput>, close: impl Into<DateTimeInput>) -> Self {
        Self::new(open, close).with_schedule_type(ScheduleStatus::Closed.as_str())
    }

    pub fn special(
        open: impl Into<DateTimeInput>,
        close: impl Into<DateTimeInput>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            special_hours: true,
            ..Self::new(open, close).with_schedule_type(label)
        }
    }

    pub fn with_schedule_type(mut self, schedule_type: impl Into<String>) -> Self {
        self.schedule_type = schedule_type.into();
        self
    }

    pub fn with_special_hours(mut self, special_hours: bool) -> Self {
        self.special_hours = special_hours;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StandardEntry {
    pub(crate) date: String,
    pub(crate) open: String,
    pub(crate) close: String,
    pub(crate) status: ScheduleStatus,
    pub(crate) opens_at: DateTime<FixedOffset>,
    pub(crate) closes_at: DateTime<FixedOffset>,
}

/// One supplementary block of hours (an event, extended opening) for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEntry {
    pub open: String,
    pub close: String,
    pub schedule_type: String,
    #[serde(skip)]
    opens_at: DateTime<FixedOffset>,
    #[serde(skip)]
    closes_at: DateTime<FixedOffset>,
}

impl SpecialEntry {
    pub(crate) fn new(
        open: String,
        close: String,
        label: String,
        opens_at: DateTime<FixedOffset>,
        closes_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            open,
            close,
            schedule_type: label,
            opens_at,
            closes_at,
        }
    }

    pub fn opens_at(&self) -> DateTime<FixedOffset> {
        self.opens_at
    }

    /// Closing instant after midnight rollover.
    pub fn closes_at(&self) -> DateTime<FixedOffset> {
        self.closes_at
    }
}

/// A day's schedule as returned by reads. Always a detached copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: String,
    pub open: String,
    pub close: String,
    pub schedule_type: ScheduleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<Vec<SpecialEntry>>,
    #[serde(skip)]
    opens_at: DateTime<FixedOffset>,
    #[serde(skip)]
    closes_at: DateTime<FixedOffset>,
}

impl DaySchedule {
    pub(crate) fn from_entry(entry: &StandardEntry, special: Option<&Vec<SpecialEntry>>) -> Self {
        Self {
            date: entry.date.clone(),
            open: entry.open.clone(),
            close: entry.close.clone(),
            schedule_type: entry.status,
            special: special.filter(|list| !list.is_empty()).cloned(),
            opens_at: entry.opens_at,
            closes_at: entry.closes_at,
        }
    }

    pub fn opens_at(&self) -> DateTime<FixedOffset> {
        self.opens_at
    }

    /// Closing instant after midnight rollover.
    pub fn closes_at(&self) -> DateTime<FixedOffset> {
        self.closes_at
    }

    pub fn special_entries(&self) -> &[SpecialEntry] {
        self.special.as_deref().unwrap_or_default()
    }
}
