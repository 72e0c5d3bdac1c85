use schedule_hours::settings::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
use schedule_hours::{ConfigError, Hours, ScheduleStore, ScheduleStoreConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_come_from_settings() {
    let config = ScheduleStoreConfig::default();
    assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    assert_eq!(config.time_format, DEFAULT_TIME_FORMAT);
    assert_eq!(config.utc_offset_minutes, 0);
    assert_eq!(ScheduleStore::new().config(), &config);
}

#[test]
fn json_config_overrides_only_given_keys() {
    let file = write_config(r#"{ "timeFormat": "%I:%M %p" }"#);
    let config = ScheduleStoreConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
    assert_eq!(config.time_format, "%I:%M %p");

    let mut store = ScheduleStore::with_config(config).unwrap();
    assert!(store.set_date("2024-03-08", &Hours::new("2024-03-08T13:30:00Z", "2024-03-08T22:00:00Z")));
    assert_eq!(store.get_date("2024-03-08").unwrap().open, "01:30 PM");
}

#[test]
fn broken_patterns_are_rejected() {
    let config = ScheduleStoreConfig::new("%Y-%m-%Q", DEFAULT_TIME_FORMAT);
    match ScheduleStore::with_config(config) {
        Err(ConfigError::InvalidPattern { field, pattern }) => {
            assert_eq!(field, "dateFormat");
            assert_eq!(pattern, "%Y-%m-%Q");
        }
        other => panic!("expected invalid pattern, got {other:?}"),
    }

    let blank = ScheduleStoreConfig::new(DEFAULT_DATE_FORMAT, "  ");
    assert!(matches!(
        blank.validate(),
        Err(ConfigError::InvalidPattern { field: "timeFormat", .. })
    ));
}

#[test]
fn out_of_range_offset_is_rejected() {
    let config = ScheduleStoreConfig::default().with_utc_offset_minutes(24 * 60);
    assert!(matches!(config.validate(), Err(ConfigError::InvalidOffset(1440))));
    assert!(ScheduleStoreConfig::default()
        .with_utc_offset_minutes(-(23 * 60 + 59))
        .validate()
        .is_ok());
}

#[test]
fn configured_offset_applies_to_offsetless_inputs() {
    let config = ScheduleStoreConfig::default().with_utc_offset_minutes(120);
    let mut store = ScheduleStore::with_config(config).unwrap();
    assert!(store.set_date("2023-01-02", &Hours::new("09:00", "17:00")));

    let schedule = store.get_date("2023-01-02").unwrap();
    assert_eq!(schedule.opens_at().to_rfc3339(), "2023-01-02T09:00:00+02:00");
    // An explicit offset in the input wins over the configured one.
    assert!(store.get_date("2023-01-01T23:30:00Z").is_none());
    assert!(store.get_date("2023-01-02T01:30:00+02:00").is_some());
}

#[test]
fn malformed_config_files_surface_errors() {
    let file = write_config("{ not json");
    assert!(matches!(
        ScheduleStoreConfig::from_json_file(file.path()),
        Err(ConfigError::Serialization(_))
    ));
    assert!(matches!(
        ScheduleStoreConfig::from_json_file("/definitely/not/here.json"),
        Err(ConfigError::Io(_))
    ));
}
