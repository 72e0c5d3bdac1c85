//! Process-wide defaults used when a store is built without explicit formats.

/// chrono strftime pattern for the formatted `date` field.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// chrono strftime pattern for the formatted `open`/`close` fields.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Offset applied to inputs that carry no offset of their own.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 0;
