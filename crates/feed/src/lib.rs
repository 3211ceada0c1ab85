//! Location feed: a published spreadsheet exported as CSV, turned into the
//! list of points the globe shows.
//!
//! Fetch failures and malformed rows never surface to the page. A broken feed
//! degrades to an empty globe; see [`records_or_empty`].

mod error;
#[cfg(not(target_arch = "wasm32"))]
mod fetch;
mod parse;
mod record;
mod spec;

pub use error::FeedError;
#[cfg(not(target_arch = "wasm32"))]
pub use fetch::{fetch_locations, load_locations};
pub use parse::{ParsedFeed, parse_locations};
pub use record::LocationRecord;
pub use spec::{DEFAULT_SHEET_CSV_URL, FeedSpec, MAX_FEED_BYTES};

/// Collapse a feed result into the degraded-mode record list.
///
/// Errors are logged and yield an empty list; the page then shows a globe
/// without markers.
pub fn records_or_empty(url: &str, result: Result<ParsedFeed, FeedError>) -> Vec<LocationRecord> {
    match result {
        Ok(parsed) => {
            tracing::info!(
                url,
                records = parsed.records.len(),
                dropped = parsed.dropped,
                "location feed loaded"
            );
            parsed.records
        }
        Err(err) => {
            tracing::warn!(url, "location feed unavailable: {err}");
            Vec::new()
        }
    }
}
