//! Search submission and page-by-page crawl of the result list.
//!
//! The crawl drives one session through the site the way a visitor would:
//! load the landing page, fill the search form, press the button, then
//! page through the results with a jittered pause before each step. Pages
//! whose field counts do not line up contribute nothing but do not stop
//! the crawl; a missing pagination bar ends it early.

use std::error::Error;
use std::time::Duration;

use chrono::Local;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::crawl::extract::extract_listings;
use crate::models::{JobRecord, Listing};
use crate::session::{self, Session};

/// Landing page carrying the search form.
const ENTRY_URL: &str = "https://www.indeed.fr/";

/// Links in the pagination bar. The last one is the "Suivant" control,
/// whatever page numbers precede it.
const PAGINATION_SELECTOR: &str = "div.pagination a";

/// Backspace presses used to empty the pre-populated location field.
/// The site offers no reliable clear primitive, and no location value
/// it pre-fills is longer than this.
const LOCATION_CLEAR_KEYSTROKES: usize = 15;

/// Crawl up to `max_pages` result pages for one search.
///
/// Submits `job_term` and `city_term` through the search form, extracts a
/// listing batch per page, and follows the last pagination link between
/// pages. Every returned record is stamped new, unread, detail-less, and
/// dated today.
///
/// # Arguments
///
/// * `session` - The browsing session; closed on every exit path
/// * `job_term` - Search term for the job field
/// * `city_term` - Search term for the location field
/// * `max_pages` - Upper bound on result pages to visit
/// * `delay` - Politeness pause drawn before each navigation and extraction
///
/// # Errors
///
/// Session-level failures (the landing page, the search submission, or a
/// pagination target failing to load) abort the crawl and propagate after
/// the session is released. Per-page extraction mismatches are logged and
/// absorbed instead.
pub async fn collect(
    session: &mut impl Session,
    job_term: &str,
    city_term: &str,
    max_pages: usize,
    delay: impl Fn() -> Duration,
) -> Result<Vec<JobRecord>, Box<dyn Error>> {
    let outcome = drive(session, job_term, city_term, max_pages, &delay).await;
    session.close();

    let listings = outcome?;
    let today = Local::now().date_naive();
    Ok(listings
        .into_iter()
        .map(|listing| JobRecord::from_listing(listing, today))
        .collect())
}

async fn drive(
    session: &mut impl Session,
    job_term: &str,
    city_term: &str,
    max_pages: usize,
    delay: &impl Fn() -> Duration,
) -> Result<Vec<Listing>, Box<dyn Error>> {
    info!(job_term, city_term, max_pages, "Starting search crawl");
    session.navigate(ENTRY_URL).await?;
    sleep(delay()).await;

    session.fill_field(session::JOB_FIELD, job_term);
    // The location field arrives pre-populated; empty it keystroke by
    // keystroke before typing the requested city.
    session.clear_field(session::LOCATION_FIELD, LOCATION_CLEAR_KEYSTROKES);
    session.fill_field(session::LOCATION_FIELD, city_term);
    sleep(delay()).await;

    session.click(session::SEARCH_BUTTON).await?;

    let mut collected = Vec::new();
    for page in 0..max_pages {
        sleep(delay()).await;

        let batch = extract_listings(&*session);
        match batch.mismatch {
            None => {
                info!(page, count = batch.listings.len(), "Extracted result page");
                collected.extend(batch.listings);
            }
            Some(counts) => {
                warn!(page, %counts, "Field counts misaligned; page contributes nothing");
            }
        }

        if page + 1 == max_pages {
            break;
        }

        let links = session.find_all(PAGINATION_SELECTOR);
        match links.into_iter().last().and_then(|el| el.href) {
            Some(next) => session.navigate(&next).await?,
            None => {
                info!(page, "No pagination links left; stopping early");
                break;
            }
        }
    }

    info!(count = collected.len(), "Search crawl finished");
    Ok(collected)
}
