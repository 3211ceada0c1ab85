//! Dashed "flight route" drawn through every destination in feed order.

use feed::LocationRecord;
use serde_json::{Value, json};

pub const ROUTE_SOURCE_ID: &str = "flight-route";
pub const ROUTE_GLOW_LAYER_ID: &str = "flight-route-glow";
pub const ROUTE_LINE_LAYER_ID: &str = "flight-route-line";

const ROUTE_COLOR: &str = "#00d4ff";

/// GeoJSON source plus the line layers that style it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    pub source_id: &'static str,
    /// A GeoJSON `Feature` with a `LineString` geometry.
    pub data: Value,
    /// Layer definitions, bottom first.
    pub layers: Vec<Value>,
}

impl RouteLayer {
    /// Route through `records` in order. An empty slice gives an empty line,
    /// which clears a previously drawn route.
    pub fn through(records: &[LocationRecord]) -> Self {
        let coordinates: Vec<[f64; 2]> = records.iter().map(|r| r.lng_lat().as_array()).collect();
        let data = json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "LineString", "coordinates": coordinates }
        });

        Self {
            source_id: ROUTE_SOURCE_ID,
            data,
            layers: vec![glow_layer(), line_layer()],
        }
    }

    /// GeoJSON source definition for `addSource`.
    pub fn source(&self) -> Value {
        json!({ "type": "geojson", "data": self.data })
    }

    pub fn point_count(&self) -> usize {
        self.data["geometry"]["coordinates"]
            .as_array()
            .map_or(0, Vec::len)
    }
}

// Soft wide halo under the dashed line.
fn glow_layer() -> Value {
    json!({
        "id": ROUTE_GLOW_LAYER_ID,
        "type": "line",
        "source": ROUTE_SOURCE_ID,
        "paint": {
            "line-color": ROUTE_COLOR,
            "line-width": 6,
            "line-opacity": 0.15,
            "line-blur": 4
        }
    })
}

fn line_layer() -> Value {
    json!({
        "id": ROUTE_LINE_LAYER_ID,
        "type": "line",
        "source": ROUTE_SOURCE_ID,
        "layout": { "line-join": "round", "line-cap": "round" },
        "paint": {
            "line-color": ROUTE_COLOR,
            "line-width": 1.5,
            "line-dasharray": [2, 4],
            "line-opacity": 0.8
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{ROUTE_GLOW_LAYER_ID, ROUTE_LINE_LAYER_ID, RouteLayer};
    use feed::LocationRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(lng: f64, lat: f64) -> LocationRecord {
        LocationRecord {
            name: String::new(),
            description: String::new(),
            image: String::new(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn empty_feed_gives_empty_line() {
        let route = RouteLayer::through(&[]);
        assert_eq!(route.point_count(), 0);
        assert_eq!(route.layers.len(), 2);
    }

    #[test]
    fn line_follows_feed_order() {
        let route = RouteLayer::through(&[record(10.0, 20.0), record(30.0, 40.0)]);
        assert_eq!(
            route.data["geometry"],
            json!({ "type": "LineString", "coordinates": [[10.0, 20.0], [30.0, 40.0]] })
        );
        assert_eq!(route.point_count(), 2);
        assert_eq!(route.source()["type"], "geojson");
    }

    #[test]
    fn glow_sits_under_dashed_line() {
        let route = RouteLayer::through(&[record(0.0, 0.0)]);
        let ids: Vec<_> = route.layers.iter().map(|l| l["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec![ROUTE_GLOW_LAYER_ID, ROUTE_LINE_LAYER_ID]);
        assert_eq!(route.layers[1]["paint"]["line-dasharray"], json!([2, 4]));
    }
}
