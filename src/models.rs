//! Data models for job listings and their persisted representation.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Listing`]: A raw row extracted from one search-result page
//! - [`JobRecord`]: A listing decorated with bookkeeping flags and persisted
//!   in the CSV history across runs
//!
//! # Duplicate Identity
//!
//! Two records describe the same job when their case-normalized
//! (title, company, city, description) tuples are equal. The link is *not*
//! part of the identity: the target site hands out session-flavored URLs,
//! so the same listing can carry a different link on every crawl.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A raw listing as extracted from one search-result page.
///
/// This struct represents one row of the result list before the crawl
/// decorates it with flags and the scrape date.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// The listing title as displayed in the result list.
    pub title: String,
    /// The absolute URL of the detailed offer page.
    pub link: String,
    /// The company name label.
    pub company: String,
    /// The city label.
    pub city: String,
    /// The free-text recency string ("il y a 3 jours", "Aujourd'hui", ...),
    /// with the trailing bookmark phrase already stripped.
    pub posted: String,
    /// The short description preview shown in the result list.
    pub description: String,
}

/// One job listing as kept in the persisted history.
///
/// Rows are appended by the crawl, annotated by hand in the CSV file
/// (`read_flag`, `wants_detail`), and later completed by the detail pass.
/// Flag columns default to `false` so older history files that predate a
/// column still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    /// URL of the detailed offer page. Stable enough for the detail pass
    /// within a run, but not across runs; never used for deduplication.
    pub link: String,
    pub city: String,
    pub posted: String,
    pub description: String,
    /// Whether the listing has been read by the user. Manual column.
    #[serde(default)]
    pub read_flag: bool,
    /// Whether the listing came from the most recent crawl.
    #[serde(default)]
    pub is_new: bool,
    /// Whether the user asked for the full description. Manual column.
    #[serde(default)]
    pub wants_detail: bool,
    /// Whether the detail pass has filled `full_description`.
    #[serde(default)]
    pub detail_fetched: bool,
    /// Full offer text, fetched on demand. Stored as `-` while absent so
    /// the CSV stays readable in a spreadsheet.
    #[serde(default, with = "detail_column")]
    pub full_description: Option<String>,
    /// The date the crawl observed this listing.
    pub scrape_date: NaiveDate,
}

impl JobRecord {
    /// Decorate a freshly extracted [`Listing`] into a history record.
    ///
    /// Every record coming out of a crawl starts unread, new, and without
    /// detail, stamped with the day the crawl ran.
    pub fn from_listing(listing: Listing, scrape_date: NaiveDate) -> Self {
        JobRecord {
            title: listing.title,
            company: listing.company,
            link: listing.link,
            city: listing.city,
            posted: listing.posted,
            description: listing.description,
            read_flag: false,
            is_new: true,
            wants_detail: false,
            detail_fetched: false,
            full_description: None,
            scrape_date,
        }
    }

    /// The case-normalized identity tuple used to detect duplicates.
    ///
    /// Records with equal identity are the same job, whatever the casing
    /// of the source markup or the link of the day.
    pub fn identity(&self) -> (String, String, String, String) {
        (
            self.title.to_lowercase(),
            self.company.to_lowercase(),
            self.city.to_lowercase(),
            self.description.to_lowercase(),
        )
    }
}

/// (De)serialization of `full_description` with a `-` placeholder.
///
/// The history file keeps a dash in the column until the detail pass fills
/// it; an empty cell is treated the same way on load.
mod detail_column {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_str("-"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.trim() {
            "" | "-" => Ok(None),
            _ => Ok(Some(raw)),
        }
    }
}
