use foundation::geo::LngLat;
use serde::{Deserialize, Serialize};

/// One named point on the globe, parsed from a single feed row.
///
/// Text fields are carried as-is; only the coordinates are validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub description: String,
    pub image: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRecord {
    pub fn lng_lat(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}
