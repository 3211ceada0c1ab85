use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in degrees, in the `[lng, lat]` order mapping
/// engines and GeoJSON use.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_finite(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }

    /// Same point with longitude normalized into `[-180, 180)`.
    pub fn wrapped(self) -> Self {
        Self {
            lng: wrap_lon_deg(self.lng),
            lat: self.lat,
        }
    }

    pub fn as_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

pub fn wrap_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::{LngLat, wrap_lon_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn wrap_keeps_in_range_values() {
        assert_close(wrap_lon_deg(106.6297), 106.6297, 1e-12);
        assert_close(wrap_lon_deg(-179.5), -179.5, 1e-12);
    }

    #[test]
    fn wrap_crosses_antimeridian() {
        assert_close(wrap_lon_deg(-180.5), 179.5, 1e-9);
        assert_close(wrap_lon_deg(540.0), -180.0, 1e-9);
        assert_close(wrap_lon_deg(180.0), -180.0, 1e-9);
    }

    #[test]
    fn serializes_as_named_fields() {
        let p = LngLat::new(10.0, 20.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"lng":10.0,"lat":20.0}"#);
        assert_eq!(p.as_array(), [10.0, 20.0]);
    }
}
