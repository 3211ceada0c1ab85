//! Page configuration.
//!
//! Defaults reproduce the published page. Overrides come from
//! environment-style keys: the process environment for native tools, values
//! baked in at compile time for the browser build.

use std::fmt::Display;
use std::str::FromStr;

use feed::FeedSpec;
use foundation::geo::LngLat;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STYLE_URL: &str = "mapbox://styles/mapbox/satellite-streets-v12";
pub const DEFAULT_BASE_PATH: &str = "/thanhsmap/";
pub const DEFAULT_PORTFOLIO_URL: &str = "https://thanhtong.xyz";

/// Every key [`GlobeConfig::apply_lookup`] reads.
pub const ENV_KEYS: &[&str] = &[
    "MAPBOX_TOKEN",
    "GLOBE_BASE_PATH",
    "GLOBE_STYLE_URL",
    "GLOBE_PORTFOLIO_URL",
    "GLOBE_SHEET_URL",
    "GLOBE_SPIN_INCREMENT_DEG",
    "GLOBE_SPIN_EASE_MS",
    "GLOBE_MAX_SPIN_ZOOM",
    "GLOBE_FLIGHT_ZOOM",
    "GLOBE_FLIGHT_PITCH",
    "GLOBE_FLIGHT_DURATION_MS",
    "GLOBE_HOME_LNG",
    "GLOBE_HOME_LAT",
    "GLOBE_HOME_ZOOM",
    "GLOBE_LOADING_HIDE_DELAY_MS",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(key: &str, value: impl Display, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Auto-rotation tuning.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpinConfig {
    /// Degrees of longitude removed per step (the globe turns eastward).
    pub increment_deg: f64,
    /// Duration of each linear ease; sets the rotation speed.
    pub ease_ms: u32,
    /// Above this zoom the globe stops spinning.
    pub max_spin_zoom: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            increment_deg: 0.5,
            ease_ms: 1000,
            max_spin_zoom: 5.0,
        }
    }
}

/// Camera target used when a marker is clicked.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlightConfig {
    pub zoom: f64,
    pub pitch: f64,
    pub duration_ms: u32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            zoom: 14.0,
            pitch: 65.0,
            duration_ms: 5000,
        }
    }
}

/// Initial view, and where "back to space" flies.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomePose {
    pub center: LngLat,
    pub zoom: f64,
    pub pitch: f64,
    pub duration_ms: u32,
}

impl Default for HomePose {
    fn default() -> Self {
        Self {
            center: LngLat::new(106.6297, 10.8231),
            zoom: 1.5,
            pitch: 0.0,
            duration_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobeConfig {
    /// Mapping engine access token.
    pub access_token: String,
    /// Sub-path the page is served under.
    pub base_path: String,
    pub style_url: String,
    pub portfolio_url: String,
    pub feed: FeedSpec,
    pub spin: SpinConfig,
    pub flight: FlightConfig,
    pub home: HomePose,
    /// Delay between the style finishing and the loading overlay fading out.
    pub loading_hide_delay_ms: u64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            style_url: DEFAULT_STYLE_URL.to_string(),
            portfolio_url: DEFAULT_PORTFOLIO_URL.to_string(),
            feed: FeedSpec::default(),
            spin: SpinConfig::default(),
            flight: FlightConfig::default(),
            home: HomePose::default(),
            loading_hide_delay_ms: 1000,
        }
    }
}

fn parse_var<T>(key: &str, raw: Option<String>, slot: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(raw) = raw {
        *slot = raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(key, &raw, e.to_string()))?;
    }
    Ok(())
}

impl GlobeConfig {
    /// Defaults overlaid with whatever `lookup` returns, then validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        cfg.apply_lookup(lookup)?;
        Ok(cfg)
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document (missing fields keep their defaults).
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = text("MAPBOX_TOKEN") {
            self.access_token = v;
        }
        if let Some(v) = text("GLOBE_BASE_PATH") {
            self.base_path = v;
        }
        if let Some(v) = text("GLOBE_STYLE_URL") {
            self.style_url = v;
        }
        if let Some(v) = text("GLOBE_PORTFOLIO_URL") {
            self.portfolio_url = v;
        }
        if let Some(v) = text("GLOBE_SHEET_URL") {
            self.feed.url = v;
        }

        parse_var("GLOBE_SPIN_INCREMENT_DEG", text("GLOBE_SPIN_INCREMENT_DEG"), &mut self.spin.increment_deg)?;
        parse_var("GLOBE_SPIN_EASE_MS", text("GLOBE_SPIN_EASE_MS"), &mut self.spin.ease_ms)?;
        parse_var("GLOBE_MAX_SPIN_ZOOM", text("GLOBE_MAX_SPIN_ZOOM"), &mut self.spin.max_spin_zoom)?;
        parse_var("GLOBE_FLIGHT_ZOOM", text("GLOBE_FLIGHT_ZOOM"), &mut self.flight.zoom)?;
        parse_var("GLOBE_FLIGHT_PITCH", text("GLOBE_FLIGHT_PITCH"), &mut self.flight.pitch)?;
        parse_var("GLOBE_FLIGHT_DURATION_MS", text("GLOBE_FLIGHT_DURATION_MS"), &mut self.flight.duration_ms)?;
        parse_var("GLOBE_HOME_LNG", text("GLOBE_HOME_LNG"), &mut self.home.center.lng)?;
        parse_var("GLOBE_HOME_LAT", text("GLOBE_HOME_LAT"), &mut self.home.center.lat)?;
        parse_var("GLOBE_HOME_ZOOM", text("GLOBE_HOME_ZOOM"), &mut self.home.zoom)?;
        parse_var("GLOBE_LOADING_HIDE_DELAY_MS", text("GLOBE_LOADING_HIDE_DELAY_MS"), &mut self.loading_hide_delay_ms)?;

        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let spin = &self.spin;
        if !spin.increment_deg.is_finite() {
            return Err(ConfigError::invalid("spin.incrementDeg", spin.increment_deg, "must be finite"));
        }
        if spin.ease_ms == 0 {
            return Err(ConfigError::invalid("spin.easeMs", spin.ease_ms, "must be at least 1"));
        }
        if !spin.max_spin_zoom.is_finite() {
            return Err(ConfigError::invalid("spin.maxSpinZoom", spin.max_spin_zoom, "must be finite"));
        }
        if !self.home.center.is_finite() || !(-90.0..=90.0).contains(&self.home.center.lat) {
            return Err(ConfigError::invalid(
                "home.center",
                format!("{:?}", self.home.center.as_array()),
                "must be a finite lng/lat with |lat| <= 90",
            ));
        }
        if !self.flight.zoom.is_finite() || !self.flight.pitch.is_finite() {
            return Err(ConfigError::invalid("flight", format!("{:?}", self.flight), "zoom and pitch must be finite"));
        }
        Ok(())
    }

    /// Base path with exactly one leading and one trailing slash.
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        }
    }

    /// Copy that is safe to print: the access token is masked.
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if !cfg.access_token.is_empty() {
            let keep: String = cfg.access_token.chars().take(4).collect();
            cfg.access_token = format!("{keep}…");
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ENV_KEYS, GlobeConfig};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_stable() {
        let cfg = GlobeConfig::default();
        assert_eq!(cfg.spin.increment_deg, 0.5);
        assert_eq!(cfg.spin.ease_ms, 1000);
        assert_eq!(cfg.spin.max_spin_zoom, 5.0);
        assert_eq!(cfg.flight.zoom, 14.0);
        assert_eq!(cfg.flight.pitch, 65.0);
        assert_eq!(cfg.flight.duration_ms, 5000);
        assert_eq!(cfg.home.center.as_array(), [106.6297, 10.8231]);
        assert_eq!(cfg.home.zoom, 1.5);
        assert_eq!(cfg.loading_hide_delay_ms, 1000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn lookup_overrides_selected_keys() {
        let cfg = GlobeConfig::from_lookup(lookup(&[
            ("MAPBOX_TOKEN", "pk.test"),
            ("GLOBE_SPIN_INCREMENT_DEG", " 1.25 "),
            ("GLOBE_FLIGHT_ZOOM", "12"),
            ("GLOBE_SHEET_URL", "https://example.com/sheet.csv"),
            ("GLOBE_BASE_PATH", ""),
        ]))
        .unwrap();
        assert_eq!(cfg.access_token, "pk.test");
        assert_eq!(cfg.spin.increment_deg, 1.25);
        assert_eq!(cfg.flight.zoom, 12.0);
        assert_eq!(cfg.feed.url, "https://example.com/sheet.csv");
        // Blank values do not override.
        assert_eq!(cfg.base_path, "/thanhsmap/");
    }

    #[test]
    fn unparsable_number_is_an_error() {
        let err = GlobeConfig::from_lookup(lookup(&[("GLOBE_SPIN_EASE_MS", "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "GLOBE_SPIN_EASE_MS"));
    }

    #[test]
    fn zero_ease_duration_is_rejected() {
        assert!(GlobeConfig::from_lookup(lookup(&[("GLOBE_SPIN_EASE_MS", "0")])).is_err());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg = GlobeConfig::from_json_str(r#"{"spin":{"incrementDeg":2.0},"home":{"zoom":2.0}}"#).unwrap();
        assert_eq!(cfg.spin.increment_deg, 2.0);
        assert_eq!(cfg.spin.ease_ms, 1000);
        assert_eq!(cfg.home.zoom, 2.0);
        assert_eq!(cfg.home.center.as_array(), [106.6297, 10.8231]);
    }

    #[test]
    fn base_path_is_normalized() {
        let mut cfg = GlobeConfig::default();
        assert_eq!(cfg.normalized_base_path(), "/thanhsmap/");
        cfg.base_path = "thanhsmap".into();
        assert_eq!(cfg.normalized_base_path(), "/thanhsmap/");
        cfg.base_path = "/".into();
        assert_eq!(cfg.normalized_base_path(), "/");
    }

    #[test]
    fn lookup_reads_exactly_the_listed_keys() {
        let asked = RefCell::new(Vec::new());
        GlobeConfig::from_lookup(|key: &str| {
            asked.borrow_mut().push(key.to_string());
            None
        })
        .unwrap();
        assert_eq!(asked.into_inner(), ENV_KEYS.to_vec());
    }

    #[test]
    fn redaction_masks_token() {
        let cfg = GlobeConfig {
            access_token: "pk.eyJ1IjoidGVzdCJ9".into(),
            ..GlobeConfig::default()
        };
        assert_eq!(cfg.redacted().access_token, "pk.e…");
        assert_eq!(GlobeConfig::default().redacted().access_token, "");
    }
}
