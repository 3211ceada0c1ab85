use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::FeedError;
use crate::record::LocationRecord;
use crate::spec::FeedSpec;

/// Result of parsing one feed body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFeed {
    /// Retained records, in source order.
    pub records: Vec<LocationRecord>,
    /// Rows rejected for a missing or non-numeric coordinate.
    pub dropped: usize,
}

/// Column positions resolved from the header row.
struct Columns {
    name: Option<usize>,
    description: Option<usize>,
    image: Option<usize>,
    lat: usize,
    lng: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord, spec: &FeedSpec) -> Result<Self, FeedError> {
        let find = |field: &str| headers.iter().position(|h| h == field);
        let required = |field: &str| find(field).ok_or_else(|| FeedError::MissingColumn(field.to_string()));

        Ok(Self {
            name: find(&spec.name_field),
            description: find(&spec.description_field),
            image: find(&spec.image_field),
            lat: required(&spec.lat_field)?,
            lng: required(&spec.lng_field)?,
        })
    }
}

fn text_field(row: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i)).unwrap_or("").to_string()
}

fn coord_field(row: &StringRecord, idx: usize) -> Option<f64> {
    let raw = row.get(idx)?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a CSV body with a header row into location records.
///
/// Rows whose latitude or longitude is absent, empty, or not a number are
/// dropped and counted. Text columns that are missing from the header read as
/// empty strings. A header without the coordinate columns is an error, since
/// no row could ever be kept.
pub fn parse_locations(text: &str, spec: &FeedSpec) -> Result<ParsedFeed, FeedError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let cols = Columns::resolve(&headers, spec)?;

    let mut parsed = ParsedFeed::default();
    for (i, row) in reader.records().enumerate() {
        if i < spec.skip_rows as usize {
            continue;
        }
        if spec.max_rows > 0 && parsed.records.len() >= spec.max_rows as usize {
            break;
        }

        let row = match row {
            Ok(row) => row,
            Err(err) => {
                tracing::debug!(row = i + 1, "skipping unreadable feed row: {err}");
                parsed.dropped += 1;
                continue;
            }
        };

        let (Some(latitude), Some(longitude)) = (coord_field(&row, cols.lat), coord_field(&row, cols.lng))
        else {
            tracing::debug!(row = i + 1, "dropping feed row without coordinates");
            parsed.dropped += 1;
            continue;
        };

        parsed.records.push(LocationRecord {
            name: text_field(&row, cols.name),
            description: text_field(&row, cols.description),
            image: text_field(&row, cols.image),
            latitude,
            longitude,
        });
    }

    Ok(parsed)
}
