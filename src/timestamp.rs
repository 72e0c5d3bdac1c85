use crate::config::ScheduleStoreConfig;
use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use std::fmt::{self, Write};

const SECONDS_PER_DAY: i64 = 86_400;

/// ISO-8601 shapes carrying a numeric offset, tried after RFC 3339.
const ISO_OFFSET_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// ISO-8601 shapes without an offset. With a trailing `Z` they are read as UTC.
const ISO_NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const PLAIN_DATE_FORMAT: &str = "%Y-%m-%d";

/// Anything a caller may hand to the store where a date or time is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeInput {
    Timestamp(DateTime<FixedOffset>),
    /// A bare calendar date, read as midnight at the configured offset.
    Date(NaiveDate),
    Text(String),
    Missing,
}

impl DateTimeInput {
    pub fn is_missing(&self) -> bool {
        matches!(self, DateTimeInput::Missing)
    }
}

impl fmt::Display for DateTimeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeInput::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            DateTimeInput::Date(date) => write!(f, "{date}"),
            DateTimeInput::Text(text) => write!(f, "{text}"),
            DateTimeInput::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<DateTime<FixedOffset>> for DateTimeInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<DateTime<Utc>> for DateTimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value.fixed_offset())
    }
}

impl From<NaiveDate> for DateTimeInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<&str> for DateTimeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateTimeInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for DateTimeInput {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl<T: Into<DateTimeInput>> From<Option<T>> for DateTimeInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DateTimeInput::Missing)
    }
}

/// Resolve an input into an offset-aware timestamp.
///
/// Strings are tried against strict ISO-8601, then the configured time
/// pattern, then the configured date pattern, then `YYYY-MM-DD`. The first
/// successful parse wins.
pub fn parse_timestamp(
    input: &DateTimeInput,
    config: &ScheduleStoreConfig,
) -> Option<DateTime<FixedOffset>> {
    let offset = config.fallback_offset();
    match input {
        DateTimeInput::Timestamp(ts) => Some(*ts),
        DateTimeInput::Date(date) => at_offset(date.and_time(NaiveTime::MIN), offset),
        DateTimeInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            parse_iso(text, offset)
                .or_else(|| parse_with_pattern(text, &config.time_format, offset))
                .or_else(|| parse_with_pattern(text, &config.date_format, offset))
                .or_else(|| parse_with_pattern(text, PLAIN_DATE_FORMAT, offset))
        }
        DateTimeInput::Missing => None,
    }
}

fn parse_iso(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }
    if let Some(ts) = ISO_OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(ts);
    }
    match text.strip_suffix(['Z', 'z']) {
        Some(utc) => parse_iso_naive(utc).and_then(|naive| at_offset(naive, Utc.fix())),
        None => parse_iso_naive(text).and_then(|naive| at_offset(naive, offset)),
    }
}

fn parse_iso_naive(text: &str) -> Option<NaiveDateTime> {
    ISO_NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn parse_with_pattern(
    text: &str,
    pattern: &str,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_str(text, pattern) {
        return Some(ts);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
        return at_offset(naive, offset);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, pattern) {
        return at_offset(date.and_time(NaiveTime::MIN), offset);
    }
    // A bare time of day lands on today's date.
    if let Ok(time) = NaiveTime::parse_from_str(text, pattern) {
        let today = Utc::now().with_timezone(&offset).date_naive();
        return at_offset(today.and_time(time), offset);
    }
    None
}

fn at_offset(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    offset.from_local_datetime(&naive).single()
}

/// Whole local calendar days since 1970-01-01, bucketed by the timestamp's
/// own offset rather than by UTC.
pub fn date_to_day(ts: &DateTime<FixedOffset>) -> i64 {
    let local_seconds = ts.timestamp() + i64::from(ts.offset().local_minus_utc());
    local_seconds.div_euclid(SECONDS_PER_DAY)
}

/// Same wall-clock time and offset as `ts`, moved onto `date`.
pub(crate) fn with_date(
    ts: &DateTime<FixedOffset>,
    date: NaiveDate,
) -> Option<DateTime<FixedOffset>> {
    at_offset(date.and_time(ts.time()), *ts.offset())
}

pub(crate) fn format_timestamp(ts: &DateTime<FixedOffset>, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", ts.format(pattern)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScheduleStoreConfig {
        ScheduleStoreConfig::default()
    }

    #[test]
    fn timestamps_pass_through_unchanged() {
        let ts = DateTime::parse_from_rfc3339("2024-06-01T08:15:00+02:00").unwrap();
        let parsed = parse_timestamp(&DateTimeInput::from(ts), &config()).unwrap();
        assert_eq!(parsed, ts);
        assert_eq!(parsed.offset(), ts.offset());
    }

    #[test]
    fn iso_without_offset_uses_configured_offset() {
        let cfg = config().with_utc_offset_minutes(-300);
        let parsed = parse_timestamp(&"2024-06-01T08:15".into(), &cfg).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), -300 * 60);
        assert_eq!(parsed.to_rfc3339(), "2024-06-01T08:15:00-05:00");
    }

    #[test]
    fn iso_shapes_with_and_without_offsets() {
        let cfg = config().with_utc_offset_minutes(60);
        let cases = [
            ("2024-06-01T08:15+02:00", "2024-06-01T08:15:00+02:00"),
            ("2024-06-01T08:15+0200", "2024-06-01T08:15:00+02:00"),
            ("2024-06-01T08:15:00+0200", "2024-06-01T08:15:00+02:00"),
            ("2024-06-01T08:15:30.5-0330", "2024-06-01T08:15:30.500-03:30"),
            ("2024-06-01 08:15:00+02:00", "2024-06-01T08:15:00+02:00"),
            ("2024-06-01T08:15Z", "2024-06-01T08:15:00+00:00"),
            ("2024-06-01 08:15Z", "2024-06-01T08:15:00+00:00"),
            ("2024-06-01T08:15:00.123Z", "2024-06-01T08:15:00.123+00:00"),
            ("2024-06-01 08:15:00", "2024-06-01T08:15:00+01:00"),
            ("2024-06-01 08:15", "2024-06-01T08:15:00+01:00"),
            ("2024-06-01T08:15", "2024-06-01T08:15:00+01:00"),
        ];
        for (input, expected) in cases {
            let parsed = parse_timestamp(&input.into(), &cfg)
                .unwrap_or_else(|| panic!("{input} should parse"));
            assert_eq!(parsed.to_rfc3339(), expected, "input {input}");
        }
    }

    #[test]
    fn configured_date_pattern_is_tried_before_plain_dates() {
        let cfg = ScheduleStoreConfig::new("%d/%m/%Y", "%H:%M");
        let parsed = parse_timestamp(&"25/12/2023".into(), &cfg).unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());

        let plain = parse_timestamp(&"2023-12-25".into(), &cfg).unwrap();
        assert_eq!(plain.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 25).unwrap());
    }

    #[test]
    fn bare_time_parses_with_time_pattern() {
        let parsed = parse_timestamp(&"21:45".into(), &config()).unwrap();
        assert_eq!(parsed.time(), NaiveTime::from_hms_opt(21, 45, 0).unwrap());
    }

    #[test]
    fn garbage_and_missing_inputs_fail() {
        assert!(parse_timestamp(&"not a date".into(), &config()).is_none());
        assert!(parse_timestamp(&"".into(), &config()).is_none());
        assert!(parse_timestamp(&DateTimeInput::Missing, &config()).is_none());
        assert!(parse_timestamp(&None::<&str>.into(), &config()).is_none());
    }

    #[test]
    fn day_key_counts_from_unix_epoch() {
        let epoch = DateTime::parse_from_rfc3339("1970-01-01T00:00:00Z").unwrap();
        assert_eq!(date_to_day(&epoch), 0);
        let before = DateTime::parse_from_rfc3339("1969-12-31T23:59:59Z").unwrap();
        assert_eq!(date_to_day(&before), -1);
        let new_year = DateTime::parse_from_rfc3339("2023-01-01T12:00:00Z").unwrap();
        assert_eq!(date_to_day(&new_year), 19_358);
    }

    #[test]
    fn with_date_keeps_time_and_offset() {
        let ts = DateTime::parse_from_rfc3339("2020-05-05T09:30:00+01:00").unwrap();
        let moved = with_date(&ts, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).unwrap();
        assert_eq!(moved.to_rfc3339(), "2024-02-29T09:30:00+01:00");
    }
}
