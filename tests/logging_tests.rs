use std::io;
use std::sync::{Arc, Mutex};

use schedule_hours::{DateTimeInput, Hours, ScheduleStore};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_captured_logs<T>(run: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, run);
    (result, logs.contents())
}

#[test]
fn unreadable_close_time_is_logged_with_its_field() {
    let mut store = ScheduleStore::new();
    let (ok, logs) =
        with_captured_logs(|| store.set_date("2024-04-01", &Hours::new("09:00", "late")));

    assert!(!ok);
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("field=\"close\""), "logs: {logs}");
    assert!(logs.contains("late"), "logs: {logs}");
}

#[test]
fn reserved_special_label_is_logged_as_schedule_type() {
    let mut store = ScheduleStore::new();
    let (ok, logs) = with_captured_logs(|| {
        store.set_date("2024-04-01", &Hours::special("09:00", "17:00", "Operating"))
    });

    assert!(!ok);
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("field=\"scheduleType\""), "logs: {logs}");
}

#[test]
fn rejections_returned_to_the_caller_are_still_logged() {
    let mut store = ScheduleStore::new();
    let hours = Hours::new("09:00", "17:00").with_schedule_type("Holiday");
    let (result, logs) = with_captured_logs(|| store.try_set_date("2024-04-02", &hours));

    assert!(result.is_err());
    assert!(logs.contains("field=\"scheduleType\""), "logs: {logs}");
    assert!(logs.contains("Holiday"), "logs: {logs}");
}

#[test]
fn omitted_date_with_missing_opening_time_names_open() {
    let mut store = ScheduleStore::new();
    let hours = Hours::new(DateTimeInput::Missing, "16:00");

    let (result, logs) =
        with_captured_logs(|| store.try_set_date(DateTimeInput::Missing, &hours));
    assert_eq!(result.unwrap_err().field(), "open");
    assert!(logs.contains("field=\"open\""), "logs: {logs}");

    assert!(!store.set_hours(&hours));
}

#[test]
fn successful_writes_log_nothing_at_warn() {
    let mut store = ScheduleStore::new();
    let (ok, logs) =
        with_captured_logs(|| store.set_date("2024-04-03", &Hours::new("09:00", "17:00")));

    assert!(ok);
    assert!(logs.is_empty(), "logs: {logs}");
}
