use crate::hours::{Hours, ScheduleStatus};
use crate::store::ScheduleStore;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ImportError {
    Io(io::Error),
    Csv(csv::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "io error: {err}"),
            ImportError::Csv(err) => write!(f, "csv error: {err}"),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<io::Error> for ImportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Outcome of an import. `failed_rows` holds 1-based data row numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub applied: usize,
    pub failed_rows: Vec<usize>,
}

impl ImportSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut summary = format!("rows={}, applied={}", self.rows, self.applied);
        if !self.failed_rows.is_empty() {
            let failed = self
                .failed_rows
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            summary.push_str(&format!(", failed={failed}"));
        }
        summary
    }
}

#[derive(Debug, Default, Deserialize)]
struct AssignmentCsvRecord {
    #[serde(default)]
    date: String,
    #[serde(default)]
    end_date: String,
    open: String,
    close: String,
    #[serde(default)]
    special_hours: String,
    #[serde(default)]
    schedule_type: String,
}

impl AssignmentCsvRecord {
    fn special_hours(&self) -> Option<bool> {
        match self.special_hours.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "0" | "no" => Some(false),
            "true" | "1" | "yes" => Some(true),
            _ => None,
        }
    }

    fn hours(&self, special_hours: bool) -> Hours {
        let schedule_type = match self.schedule_type.trim() {
            "" => ScheduleStatus::Operating.as_str(),
            other => other,
        };
        Hours::new(self.open.trim(), self.close.trim())
            .with_special_hours(special_hours)
            .with_schedule_type(schedule_type)
    }

    fn apply(&self, store: &mut ScheduleStore, row: usize) -> bool {
        let Some(special_hours) = self.special_hours() else {
            warn!(row = row, value = %self.special_hours, "special_hours must be true or false");
            return false;
        };
        let hours = self.hours(special_hours);
        let date = self.date.trim();
        let end_date = self.end_date.trim();
        if end_date.is_empty() {
            let date = (!date.is_empty()).then_some(date);
            store.set_date(date, &hours)
        } else {
            store.set_range(date, end_date, &hours)
        }
    }
}

/// Apply every assignment row in the CSV file at `path` to `store`.
pub fn import_assignments_from_csv<P: AsRef<Path>>(
    store: &mut ScheduleStore,
    path: P,
) -> Result<ImportSummary, ImportError> {
    let file = File::open(path)?;
    import_assignments_from_reader(store, file)
}

/// Rows the store rejects are counted in the summary; malformed CSV aborts
/// the import, keeping the rows applied so far.
pub fn import_assignments_from_reader<R: Read>(
    store: &mut ScheduleStore,
    reader: R,
) -> Result<ImportSummary, ImportError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
    let mut summary = ImportSummary::default();
    for (idx, record) in reader.deserialize::<AssignmentCsvRecord>().enumerate() {
        let record = record?;
        let row = idx + 1;
        summary.rows += 1;
        if record.apply(store, row) {
            summary.applied += 1;
        } else {
            summary.failed_rows.push(row);
        }
    }
    info!(
        rows = summary.rows,
        applied = summary.applied,
        failed = summary.failed_rows.len(),
        "assignment import finished"
    );
    Ok(summary)
}
