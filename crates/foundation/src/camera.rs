use serde::{Deserialize, Serialize};

use crate::geo::LngLat;

/// Camera state as the mapping engine reports it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub center: LngLat,
    pub zoom: f64,
    /// Degrees away from straight-down.
    pub pitch: f64,
    #[serde(default)]
    pub bearing: f64,
}

impl CameraPose {
    pub fn new(center: LngLat, zoom: f64, pitch: f64) -> Self {
        Self {
            center,
            zoom,
            pitch,
            bearing: 0.0,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(LngLat::default(), 0.0, 0.0)
    }
}

/// Easing curve attached to a camera animation request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// `t -> t`; consecutive linear eases join without visible speed change.
    Linear,
    /// Whatever curve the engine uses when none is given.
    #[default]
    EngineDefault,
}

#[cfg(test)]
mod tests {
    use super::{CameraPose, Easing};
    use crate::geo::LngLat;

    #[test]
    fn easing_defaults_to_engine_curve() {
        assert_eq!(Easing::default(), Easing::EngineDefault);
        let json = serde_json::to_string(&Easing::Linear).unwrap();
        assert_eq!(json, r#""linear""#);
    }

    #[test]
    fn pose_defaults_to_north_up() {
        let pose = CameraPose::new(LngLat::new(1.0, 2.0), 3.0, 4.0);
        assert_eq!(pose.bearing, 0.0);
    }
}
