//! CSV export of test records.
//!
//! Each export is a full snapshot: the file is rewritten through a temp file
//! in the same directory and renamed into place, so running it twice never
//! duplicates rows.

use crate::{Error, Result, TestRecord};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    student_id: String,
    test_type: crate::TestType,
    test_date: String,
    distance: f64,
    duration: f64,
    heart_rate: u32,
    weight: f64,
    temperature: Option<f64>,
    humidity: Option<f64>,
    vo2_max: String,
    classification: crate::Classification,
    observations: String,
}

impl From<&TestRecord> for CsvRow {
    fn from(record: &TestRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            student_id: record.student_id.to_string(),
            test_type: record.test_type,
            test_date: record.test_date.to_rfc3339(),
            distance: record.distance,
            duration: record.duration,
            heart_rate: record.heart_rate,
            weight: record.weight,
            temperature: record.temperature,
            humidity: record.humidity,
            vo2_max: format!("{:.2}", record.vo2_max),
            classification: record.classification,
            observations: record.observations.clone(),
        }
    }
}

/// Write `records` to `csv_path`, replacing any earlier export
///
/// Returns how many rows were written. With no records nothing is touched.
pub fn export_records(records: &[TestRecord], csv_path: &Path) -> Result<usize> {
    if records.is_empty() {
        tracing::info!("No test records to export");
        return Ok(0);
    }

    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file());
        for record in records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} test records to {:?}", records.len(), csv_path);
    Ok(records.len())
}
