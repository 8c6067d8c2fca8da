use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;

use crate::models::VaccinationRecord;

/// What the normalizer produced from one source file.
pub struct IngestOutcome {
    pub records: Vec<VaccinationRecord>,
    /// Source rows dropped for lacking a due date.
    pub skipped: usize,
}

/// Reads vaccination-due events from a headered CSV file.
///
/// Expected columns: district, facility, unit, dose_number, due_date,
/// completed_date. Dates are ISO (YYYY-MM-DD). A missing dose number
/// defaults to 1; a row without a due date is discarded and counted.
pub fn load_records(csv_path: &Path) -> anyhow::Result<IngestOutcome> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        district: String,
        facility: String,
        unit: String,
        dose_number: Option<u32>,
        due_date: Option<NaiveDate>,
        completed_date: Option<NaiveDate>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result.context("malformed CSV row")?;
        let Some(due_date) = row.due_date else {
            skipped += 1;
            continue;
        };
        records.push(VaccinationRecord {
            district: row.district,
            facility: row.facility,
            unit: row.unit,
            dose_number: row.dose_number.unwrap_or(1),
            due_date,
            completed_date: row.completed_date,
        });
    }

    Ok(IngestOutcome { records, skipped })
}
