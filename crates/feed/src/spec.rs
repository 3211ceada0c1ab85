use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// Published CSV export of the spreadsheet that lists the destinations.
pub const DEFAULT_SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRkDyRbDLaymHL2Ggyk6QD3qAYVLaeTu6_mbSxgY7cqOXV1wAyXCQfEgNyq_JKDbN0L88VZNXTSK1Cz/pub?gid=0&single=true&output=csv";

/// Upper bound on a feed response body.
pub const MAX_FEED_BYTES: usize = 8 * 1024 * 1024;

/// Where the feed lives and how its columns map onto a [`LocationRecord`].
///
/// [`LocationRecord`]: crate::LocationRecord
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedSpec {
    pub url: String,
    pub name_field: String,
    pub description_field: String,
    pub image_field: String,
    pub lat_field: String,
    pub lng_field: String,
    /// Data rows (after the header) to skip before parsing.
    pub skip_rows: u32,
    /// Cap on retained records; 0 keeps everything.
    pub max_rows: u32,
}

impl Default for FeedSpec {
    fn default() -> Self {
        Self {
            url: DEFAULT_SHEET_CSV_URL.to_string(),
            name_field: "name".to_string(),
            description_field: "description".to_string(),
            image_field: "image".to_string(),
            lat_field: "lat".to_string(),
            lng_field: "lng".to_string(),
            skip_rows: 0,
            max_rows: 0,
        }
    }
}

impl FeedSpec {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// The trimmed feed URL, if it is http(s).
    pub fn checked_url(&self) -> Result<&str, FeedError> {
        let url = self.url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(url)
        } else {
            Err(FeedError::InvalidUrl(url.to_string()))
        }
    }
}
