//! Detail pass: attach full descriptions to listings flagged by hand.
//!
//! Between runs the user opens the history file and sets `wants_detail` on
//! the rows worth a closer look. This pass revisits each flagged link,
//! pulls the full offer text, and writes it back to every record carrying
//! that link. A page without the description block leaves the record
//! untouched and still eligible, so a flaky render gets retried on the
//! next run instead of being marked done empty.

use std::error::Error;
use std::time::Duration;

use itertools::Itertools;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::models::JobRecord;
use crate::session::Session;
use crate::utils::replace_separator;

/// Full offer text block on the detail page.
const DETAIL_SELECTOR: &str = "div.jobsearch-jobDescriptionText";

/// Fetch full descriptions for every record with `wants_detail` set and
/// no detail yet.
///
/// # Arguments
///
/// * `session` - The browsing session; closed on every exit path
/// * `history` - The loaded history, mutated in place
/// * `separator` - Output delimiter scrubbed from fetched text
/// * `delay` - Politeness pause drawn before each detail page
///
/// # Returns
///
/// The number of records updated.
///
/// # Errors
///
/// A page that fails to load is a session-level failure and aborts the
/// pass after the session is released; records already updated keep their
/// text, and unvisited flags stay set for the next run.
pub async fn fetch_details(
    session: &mut impl Session,
    history: &mut [JobRecord],
    separator: char,
    delay: impl Fn() -> Duration,
) -> Result<usize, Box<dyn Error>> {
    let outcome = visit_flagged(session, history, separator, &delay).await;
    session.close();
    outcome
}

async fn visit_flagged(
    session: &mut impl Session,
    history: &mut [JobRecord],
    separator: char,
    delay: &impl Fn() -> Duration,
) -> Result<usize, Box<dyn Error>> {
    let links: Vec<String> = history
        .iter()
        .filter(|record| record.wants_detail && !record.detail_fetched)
        .map(|record| record.link.clone())
        .unique()
        .collect();

    if links.is_empty() {
        info!("No records are waiting for detail");
        return Ok(0);
    }
    info!(count = links.len(), "Fetching full descriptions");

    let mut updated = 0;
    for link in links {
        session.navigate(&link).await?;
        sleep(delay()).await;

        let text = session
            .find_all(DETAIL_SELECTOR)
            .into_iter()
            .map(|el| el.text)
            .find(|text| !text.is_empty());

        let Some(text) = text else {
            // Leave the flags alone so the record is retried next run.
            warn!(%link, "Detail block absent or empty; record left pending");
            continue;
        };

        let cleaned = replace_separator(&text, separator);
        for record in history.iter_mut().filter(|r| r.link == link) {
            record.full_description = Some(cleaned.clone());
            record.detail_fetched = true;
            updated += 1;
        }
        info!(%link, bytes = cleaned.len(), "Attached full description");
    }

    info!(updated, "Detail pass finished");
    Ok(updated)
}
