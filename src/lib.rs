pub mod config;
pub mod error;
pub mod hours;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod import;
pub mod settings;
pub mod store;
pub mod timestamp;

pub use config::{ConfigError, ScheduleStoreConfig};
pub use error::ScheduleError;
pub use hours::{DaySchedule, Hours, ScheduleStatus, SpecialEntry};
pub use import::{
    ImportError, ImportSummary, import_assignments_from_csv, import_assignments_from_reader,
};
pub use store::ScheduleStore;
pub use timestamp::{DateTimeInput, date_to_day, parse_timestamp};
