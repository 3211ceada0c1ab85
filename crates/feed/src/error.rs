/// Errors produced while fetching or parsing the location feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("only http(s) feed URLs are allowed: {0:?}")]
    InvalidUrl(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("upstream HTTP {0}")]
    Status(u16),
    #[error("feed payload too large ({len} bytes, max {max})")]
    TooLarge { len: usize, max: usize },
    #[error("feed response was not valid UTF-8")]
    NotUtf8,
    #[error("feed header has no {0:?} column")]
    MissingColumn(String),
    #[error("feed is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
}
