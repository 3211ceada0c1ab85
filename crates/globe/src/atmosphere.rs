use serde::{Deserialize, Serialize};

/// Fog/atmosphere parameters, keyed the way Mapbox style layers name them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FogSettings {
    pub color: String,
    pub high_color: String,
    pub space_color: String,
    pub star_intensity: f64,
    pub horizon_blend: f64,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            color: "#1a1a2e".to_string(),
            high_color: "#000000".to_string(),
            space_color: "#000000".to_string(),
            star_intensity: 0.8,
            horizon_blend: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FogSettings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_with_mapbox_keys() {
        let v = serde_json::to_value(FogSettings::default()).unwrap();
        assert_eq!(
            v,
            json!({
                "color": "#1a1a2e",
                "high-color": "#000000",
                "space-color": "#000000",
                "star-intensity": 0.8,
                "horizon-blend": 0.05
            })
        );
    }
}
