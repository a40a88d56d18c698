//! CSV persistence of the accumulated listing history.
//!
//! The history is one flat CSV file with a header row, read in full at the
//! start of a run and written back in full at the end. There is no primary
//! key column; duplicate identity is computed from the record fields at
//! merge time. The file is also the manual annotation surface: the user
//! flips `read_flag` and `wants_detail` cells in a spreadsheet between
//! runs, so loading tolerates missing flag columns (older files) and
//! ignores columns it does not know.
//!
//! One run is the only writer. Concurrent runs against the same file need
//! external mutual exclusion; the store does no locking of its own.

use std::error::Error;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::models::JobRecord;

/// Load the history, or an empty one when the file does not exist yet.
///
/// # Errors
///
/// Fails on unreadable files and on rows that do not parse; a corrupt
/// history should stop the run rather than be silently truncated.
pub fn load(path: &Path) -> Result<Vec<JobRecord>, Box<dyn Error>> {
    if !path.exists() {
        info!(path = %path.display(), "No history file yet; starting empty");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }

    info!(path = %path.display(), count = records.len(), "Loaded history");
    Ok(records)
}

/// Write the history back, replacing the previous file.
///
/// # Errors
///
/// Fails when the parent directory cannot be created or the file cannot
/// be written.
pub fn save(path: &Path, records: &[JobRecord]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = records.len(), "Wrote history");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("job_scout_store_{}_{}", std::process::id(), name))
    }

    fn record(title: &str) -> JobRecord {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        JobRecord::from_listing(
            Listing {
                title: title.to_string(),
                link: format!("https://jobs.example/rc/clk?t={title}"),
                company: "acme".to_string(),
                city: "paris".to_string(),
                posted: "il y a 2 jours".to_string(),
                description: "build models".to_string(),
            },
            date,
        )
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let path = temp_path("missing.csv");
        let history = load(&path).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_records() {
        let path = temp_path("round_trip.csv");
        let mut annotated = record("data scientist");
        annotated.read_flag = true;
        annotated.wants_detail = true;
        let history = vec![annotated, record("research engineer")];

        save(&path, &history).unwrap();
        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, history);
    }

    #[test]
    fn test_manual_cell_edits_survive_load() {
        let path = temp_path("manual_edit.csv");
        save(&path, &[record("data scientist")]).unwrap();

        // Flip wants_detail by hand the way a spreadsheet edit would.
        let text = fs::read_to_string(&path).unwrap();
        let edited = text.replacen("false,true,false,false", "false,true,true,false", 1);
        assert_ne!(edited, text);
        fs::write(&path, edited).unwrap();

        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(loaded[0].wants_detail);
        assert!(!loaded[0].read_flag);
    }

    #[test]
    fn test_file_without_flag_columns_loads_with_defaults() {
        let path = temp_path("old_format.csv");
        let text = "title,company,link,city,posted,description,scrape_date\n\
                    data scientist,acme,https://jobs.example/1,paris,il y a 2 jours,build models,2026-07-01\n";
        fs::write(&path, text).unwrap();

        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert!(!loaded[0].is_new);
        assert!(!loaded[0].wants_detail);
        assert_eq!(loaded[0].full_description, None);
        assert_eq!(
            loaded[0].scrape_date,
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_corrupt_row_is_an_error_not_a_truncation() {
        let path = temp_path("corrupt.csv");
        let text = "title,company,link,city,posted,description,scrape_date\n\
                    data scientist,acme,https://jobs.example/1,paris,il y a 2 jours,build models,not-a-date\n";
        fs::write(&path, text).unwrap();

        let outcome = load(&path);
        fs::remove_file(&path).unwrap();

        assert!(outcome.is_err());
    }
}
