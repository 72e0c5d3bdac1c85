use crate::config::{ConfigError, ScheduleStoreConfig};
use crate::error::ScheduleError;
use crate::hours::{DaySchedule, Hours, ScheduleStatus, SpecialEntry, StandardEntry};
use crate::timestamp::{self, DateTimeInput};
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Calendar-indexed store of standard and special opening hours.
///
/// Both maps are keyed by the local day number from [`timestamp::date_to_day`].
/// A day holds at most one standard entry (the latest write) and any number
/// of special entries in write order. Nothing is ever removed.
///
/// The store does no locking of its own; share it behind a single lock when
/// several threads need it.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    config: ScheduleStoreConfig,
    standard: HashMap<i64, StandardEntry>,
    special: HashMap<i64, Vec<SpecialEntry>>,
}

/// Normalized timestamps for one write, ready to format.
struct ResolvedHours {
    day: i64,
    date: DateTime<FixedOffset>,
    opens_at: DateTime<FixedOffset>,
    closes_at: DateTime<FixedOffset>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScheduleStoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            standard: HashMap::new(),
            special: HashMap::new(),
        })
    }

    pub fn config(&self) -> &ScheduleStoreConfig {
        &self.config
    }

    /// Normalize `input`, logging `field` and the raw value when it cannot be read.
    pub fn parse_date_time(
        &self,
        field: &'static str,
        input: &DateTimeInput,
    ) -> Option<DateTime<FixedOffset>> {
        match self.resolve(field, input) {
            Ok(ts) => Some(ts),
            Err(err) => {
                warn!(field = field, value = %input, "{err}");
                None
            }
        }
    }

    fn resolve(
        &self,
        field: &'static str,
        input: &DateTimeInput,
    ) -> Result<DateTime<FixedOffset>, ScheduleError> {
        timestamp::parse_timestamp(input, &self.config).ok_or_else(|| {
            ScheduleError::InvalidTimestamp {
                field,
                value: input.to_string(),
            }
        })
    }

    /// Record `hours` on the date taken from the opening time.
    pub fn set_hours(&mut self, hours: &Hours) -> bool {
        self.set_date(DateTimeInput::Missing, hours)
    }

    /// Record `hours` on `date`. Returns `false`, logs, and leaves the store
    /// untouched when any input is unreadable or the schedule type does not
    /// fit the standard/special slot.
    pub fn set_date(&mut self, date: impl Into<DateTimeInput>, hours: &Hours) -> bool {
        self.try_set_date(date, hours).is_ok()
    }

    /// Like [`set_date`](Self::set_date) but also hands back the rejection
    /// reason. The rejection is logged either way.
    pub fn try_set_date(
        &mut self,
        date: impl Into<DateTimeInput>,
        hours: &Hours,
    ) -> Result<(), ScheduleError> {
        self.apply(date.into(), hours).inspect_err(|err| {
            warn!(field = err.field(), "{err}");
        })
    }

    fn apply(&mut self, date: DateTimeInput, hours: &Hours) -> Result<(), ScheduleError> {
        let date = if date.is_missing() {
            DateTimeInput::Timestamp(self.resolve("open", &hours.open)?)
        } else {
            date
        };
        let resolved = self.resolve_hours(&date, hours)?;

        if hours.special_hours {
            if ScheduleStatus::is_reserved(&hours.schedule_type) {
                return Err(ScheduleError::ReservedLabel(hours.schedule_type.clone()));
            }
            let entry = SpecialEntry::new(
                self.format_time(&resolved.opens_at)?,
                self.format_time(&resolved.closes_at)?,
                hours.schedule_type.clone(),
                resolved.opens_at,
                resolved.closes_at,
            );
            let entries = self.special.entry(resolved.day).or_default();
            entries.push(entry);
            debug!(
                day = resolved.day,
                label = %hours.schedule_type,
                count = entries.len(),
                "special hours added"
            );
        } else {
            let status = hours
                .schedule_type
                .parse::<ScheduleStatus>()
                .map_err(|_| ScheduleError::InvalidStatus(hours.schedule_type.clone()))?;
            let entry = StandardEntry {
                date: self.format_date(&resolved.date)?,
                open: self.format_time(&resolved.opens_at)?,
                close: self.format_time(&resolved.closes_at)?,
                status,
                opens_at: resolved.opens_at,
                closes_at: resolved.closes_at,
            };
            debug!(day = resolved.day, %status, "standard hours set");
            self.standard.insert(resolved.day, entry);
        }
        Ok(())
    }

    fn resolve_hours(
        &self,
        date: &DateTimeInput,
        hours: &Hours,
    ) -> Result<ResolvedHours, ScheduleError> {
        let date = self.resolve("date", date)?;
        let open = self.resolve("open", &hours.open)?;
        let close = self.resolve("close", &hours.close)?;

        // The date argument decides the calendar day; open/close only contribute a time.
        let day_of = date.date_naive();
        let opens_at = timestamp::with_date(&open, day_of).ok_or(ScheduleError::DateOutOfRange)?;
        let mut closes_at =
            timestamp::with_date(&close, day_of).ok_or(ScheduleError::DateOutOfRange)?;
        if closes_at < opens_at {
            closes_at = closes_at
                .checked_add_days(Days::new(1))
                .ok_or(ScheduleError::DateOutOfRange)?;
        }

        Ok(ResolvedHours {
            day: timestamp::date_to_day(&date),
            date,
            opens_at,
            closes_at,
        })
    }

    /// Apply the same hours to every day from `start` to `end` inclusive.
    pub fn set_range(
        &mut self,
        start: impl Into<DateTimeInput>,
        end: impl Into<DateTimeInput>,
        hours: &Hours,
    ) -> bool {
        let Some(open) = self.parse_date_time("open", &hours.open) else {
            return false;
        };
        let Some(close) = self.parse_date_time("close", &hours.close) else {
            return false;
        };
        let normalized = Hours {
            open: open.into(),
            close: close.into(),
            ..hours.clone()
        };
        self.set_range_by(start, end, |_| normalized.clone())
    }

    /// Write each day from `start` to `end` inclusive with the hours returned
    /// by `hours_for`.
    ///
    /// Every day is attempted even after a failure; days that succeed stay
    /// written. The result is `true` only if all days succeeded.
    pub fn set_range_by<F>(
        &mut self,
        start: impl Into<DateTimeInput>,
        end: impl Into<DateTimeInput>,
        mut hours_for: F,
    ) -> bool
    where
        F: FnMut(NaiveDate) -> Hours,
    {
        let Some(start) = self.parse_date_time("start", &start.into()) else {
            return false;
        };
        let Some(end) = self.parse_date_time("end", &end.into()) else {
            return false;
        };

        let last = end.date_naive();
        let mut current = start;
        let mut all_ok = true;
        while current.date_naive() <= last {
            let hours = hours_for(current.date_naive());
            all_ok &= self.set_date(current, &hours);
            match current.checked_add_days(Days::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        all_ok
    }

    /// The standard schedule for `date`, with any special hours attached.
    /// `None` when the date is unreadable or has no standard entry.
    pub fn get_date(&self, date: impl Into<DateTimeInput>) -> Option<DaySchedule> {
        let date = self.parse_date_time("date", &date.into())?;
        self.day_schedule(timestamp::date_to_day(&date))
    }

    fn day_schedule(&self, day: i64) -> Option<DaySchedule> {
        let entry = self.standard.get(&day)?;
        Some(DaySchedule::from_entry(entry, self.special.get(&day)))
    }

    /// Schedules for every day from `start` to `end` inclusive, in date
    /// order, skipping days without a standard entry.
    pub fn get_date_range(
        &self,
        start: impl Into<DateTimeInput>,
        end: impl Into<DateTimeInput>,
    ) -> Vec<DaySchedule> {
        let Some(start) = self.parse_date_time("start", &start.into()) else {
            return Vec::new();
        };
        let Some(end) = self.parse_date_time("end", &end.into()) else {
            return Vec::new();
        };

        let last = end.date_naive();
        let mut schedules = Vec::new();
        let mut current = start;
        while current.date_naive() <= last {
            if let Some(schedule) = self.day_schedule(timestamp::date_to_day(&current)) {
                schedules.push(schedule);
            }
            match current.checked_add_days(Days::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        schedules
    }

    fn format_date(&self, ts: &DateTime<FixedOffset>) -> Result<String, ScheduleError> {
        Self::format_with(ts, &self.config.date_format)
    }

    fn format_time(&self, ts: &DateTime<FixedOffset>) -> Result<String, ScheduleError> {
        Self::format_with(ts, &self.config.time_format)
    }

    fn format_with(ts: &DateTime<FixedOffset>, pattern: &str) -> Result<String, ScheduleError> {
        timestamp::format_timestamp(ts, pattern).ok_or_else(|| ScheduleError::Format {
            pattern: pattern.to_string(),
        })
    }
}
