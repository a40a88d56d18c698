//! Reconciling a crawled batch with the persisted history.
//!
//! Yesterday's "new" rows become old, the incoming batch is appended, and
//! duplicates collapse onto their first occurrence. Because history comes
//! first in the concatenation, an already-known listing keeps its old row,
//! and with it whatever `read_flag` or `wants_detail` annotations the user
//! made by hand. A listing whose description text changed has a different
//! identity and lands as a separate row; the old row is never rewritten.

use itertools::Itertools;
use tracing::info;

use crate::models::JobRecord;

/// Merge a filtered batch into the history, returning the next history.
///
/// Deduplicates on the case-normalized (title, company, city, description)
/// identity, keeping the first occurrence in history-then-incoming order.
/// Running the same merge twice is a no-op: by then every incoming record
/// is a duplicate of a row that is already there.
pub fn merge(mut history: Vec<JobRecord>, incoming: Vec<JobRecord>) -> Vec<JobRecord> {
    let known = history.len();
    for record in &mut history {
        record.is_new = false;
    }
    history.extend(incoming);

    let merged: Vec<JobRecord> = history
        .into_iter()
        .unique_by(|record| record.identity())
        .collect();

    let added = merged.len().saturating_sub(known);
    info!(known, added, total = merged.len(), "Merged batch into history");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;
    use chrono::NaiveDate;

    fn record(title: &str, company: &str, city: &str, description: &str) -> JobRecord {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        JobRecord::from_listing(
            Listing {
                title: title.to_string(),
                link: format!("https://jobs.example/rc/clk?t={title}"),
                company: company.to_string(),
                city: city.to_string(),
                posted: "il y a 2 jours".to_string(),
                description: description.to_string(),
            },
            date,
        )
    }

    #[test]
    fn test_known_record_keeps_old_row_and_annotations() {
        let mut old = record("a", "x", "paris", "d1");
        old.read_flag = true;
        old.wants_detail = true;
        old.posted = "il y a 12 jours".to_string();

        let merged = merge(
            vec![old],
            vec![record("a", "x", "paris", "d1"), record("b", "y", "lyon", "d2")],
        );

        assert_eq!(merged.len(), 2);
        // The old row wins: annotations survive, freshness is gone.
        assert!(merged[0].read_flag);
        assert!(merged[0].wants_detail);
        assert!(!merged[0].is_new);
        assert_eq!(merged[0].posted, "il y a 12 jours");
        // The genuinely new record keeps its freshness flag.
        assert_eq!(merged[1].title, "b");
        assert!(merged[1].is_new);
    }

    #[test]
    fn test_dedup_ignores_case() {
        let merged = merge(
            vec![record("Data Scientist", "Acme", "Paris", "d1")],
            vec![record("data scientist", "acme", "paris", "d1")],
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Data Scientist");
    }

    #[test]
    fn test_changed_description_is_a_new_row() {
        let merged = merge(
            vec![record("a", "x", "paris", "old text")],
            vec![record("a", "x", "paris", "new text")],
        );

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let incoming = vec![record("a", "x", "paris", "d1"), record("b", "y", "lyon", "d2")];

        let once = merge(Vec::new(), incoming.clone());
        let twice = merge(once.clone(), incoming);

        assert_eq!(twice.len(), once.len());
        for (a, b) in twice.iter().zip(&once) {
            assert_eq!(a.identity(), b.identity());
            assert_eq!(a.link, b.link);
            // The only change on the second pass is the freshness flag.
            assert!(!a.is_new);
        }
    }

    #[test]
    fn test_empty_history_takes_batch_verbatim() {
        let merged = merge(Vec::new(), vec![record("a", "x", "paris", "d1")]);

        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_new);
    }

    #[test]
    fn test_duplicates_inside_one_batch_collapse() {
        let merged = merge(
            Vec::new(),
            vec![
                record("a", "x", "paris", "d1"),
                record("a", "x", "paris", "d1"),
            ],
        );

        assert_eq!(merged.len(), 1);
    }
}
