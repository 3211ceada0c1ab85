use feed::{FeedError, FeedSpec, LocationRecord, MAX_FEED_BYTES, ParsedFeed, parse_locations, records_or_empty};
use gloo_net::http::Request;

/// Browser-side counterpart of `feed::fetch_locations`.
pub async fn fetch_locations(spec: &FeedSpec) -> Result<ParsedFeed, FeedError> {
    let url = spec.checked_url()?;

    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| FeedError::Fetch(e.to_string()))?;
    if !resp.ok() {
        return Err(FeedError::Status(resp.status()));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| FeedError::Fetch(e.to_string()))?;
    if text.len() > MAX_FEED_BYTES {
        return Err(FeedError::TooLarge {
            len: text.len(),
            max: MAX_FEED_BYTES,
        });
    }

    parse_locations(&text, spec)
}

pub async fn load_locations(spec: &FeedSpec) -> Vec<LocationRecord> {
    records_or_empty(&spec.url, fetch_locations(spec).await)
}
