//! Politeness delays and small text helpers.

use std::time::Duration;

use rand::{Rng, rng};

/// Bounded random pause between page loads, 1.0 to 3.0 seconds.
///
/// Regularly spaced requests are an easy bot signature; a jittered wait
/// before each navigation keeps the crawl looking like a person paging
/// through results. Tests inject [`no_delay`] instead.
pub fn bounded_jitter() -> Duration {
    Duration::from_millis(rng().random_range(1000..=3000))
}

/// Zero-length delay for tests.
pub fn no_delay() -> Duration {
    Duration::ZERO
}

/// Replace every occurrence of the output delimiter with a space.
///
/// Titles and descriptions routinely contain commas; scrubbing the active
/// delimiter keeps the history file parseable by anything that reads it.
pub fn replace_separator(text: &str, separator: char) -> String {
    text.replace(separator, " ")
}
