//! Extraction of one listing batch from a rendered result page.
//!
//! The result list is not a table: titles, company labels, locations,
//! metadata bars, and summaries are five independent element families that
//! only line up when the page is well-formed. Sponsored inserts and partial
//! renders break the alignment, so the five lists are collected separately
//! and zipped into listings only when their lengths agree. A page that does
//! not agree contributes nothing; a misaligned record is worse than a
//! missing one.

use itertools::izip;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

use crate::models::Listing;
use crate::session::Session;

/// Title anchors; the href is the offer link.
const TITLE_SELECTOR: &str = "a.jobtitle.turnstileLink";
const COMPANY_SELECTOR: &str = "span.company";
/// The site renders locations as a div or a span depending on the card.
const LOCATION_SELECTOR: &str = "div.location, span.location";
/// Metadata bar carrying the recency string plus bookmark boilerplate.
const POSTED_SELECTOR: &str = "div.result-link-bar";
const SUMMARY_SELECTOR: &str = "div.summary";

/// Trailing "save this job" phrase appended to every metadata bar.
static BOOKMARK_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*sauvegarder.*$").expect("bookmark suffix pattern"));

/// How many elements each selector family matched on a page.
///
/// Logged verbatim when a page is discarded, so a markup change shows up
/// as "which list went short" rather than a silent empty crawl.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCounts {
    pub titles: usize,
    pub companies: usize,
    pub cities: usize,
    pub posted: usize,
    pub summaries: usize,
}

impl FieldCounts {
    fn aligned(&self) -> bool {
        self.titles == self.companies
            && self.titles == self.cities
            && self.titles == self.posted
            && self.titles == self.summaries
    }
}

impl fmt::Display for FieldCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "titles: {}, companies: {}, cities: {}, posted: {}, summaries: {}",
            self.titles, self.companies, self.cities, self.posted, self.summaries
        )
    }
}

/// The outcome of extracting one page.
///
/// Either a batch of aligned listings, or no listings plus the field
/// counts that failed to line up.
#[derive(Debug)]
pub struct PageBatch {
    pub listings: Vec<Listing>,
    /// Present when the page was discarded for misaligned field counts.
    pub mismatch: Option<FieldCounts>,
}

impl PageBatch {
    pub fn ok(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Extract the listing batch from the session's current page.
///
/// Collects the five element families independently and zips them into
/// [`Listing`]s only when every family matched the same number of
/// elements. Never fails: a malformed page comes back as an empty batch
/// with the mismatched counts attached for the caller to log.
pub fn extract_listings(session: &impl Session) -> PageBatch {
    let titles = session.find_all(TITLE_SELECTOR);
    let companies = session.find_all(COMPANY_SELECTOR);
    let cities = session.find_all(LOCATION_SELECTOR);
    let posted = session.find_all(POSTED_SELECTOR);
    let summaries = session.find_all(SUMMARY_SELECTOR);

    let counts = FieldCounts {
        titles: titles.len(),
        companies: companies.len(),
        cities: cities.len(),
        posted: posted.len(),
        summaries: summaries.len(),
    };

    if !counts.aligned() {
        return PageBatch {
            listings: Vec::new(),
            mismatch: Some(counts),
        };
    }

    let listings = izip!(titles, companies, cities, posted, summaries)
        .map(|(title, company, city, posted, summary)| Listing {
            link: title.href.unwrap_or_default(),
            title: title.text,
            company: company.text,
            city: city.text,
            posted: BOOKMARK_SUFFIX.replace(&posted.text, "").into_owned(),
            description: summary.text,
        })
        .collect::<Vec<_>>();

    debug!(count = listings.len(), "Extracted aligned listing batch");
    PageBatch {
        listings,
        mismatch: None,
    }
}
