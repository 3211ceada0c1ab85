use foundation::camera::{CameraPose, Easing};
use foundation::geo::LngLat;
use foundation::ids::AnimationId;

use crate::atmosphere::FogSettings;
use crate::markers::MarkerSpec;
use crate::route::RouteLayer;

/// A camera animation request handed to the engine.
///
/// `None` for zoom or pitch keeps the engine's current value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraAnimation {
    pub center: LngLat,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub duration_ms: u32,
    pub easing: Easing,
    /// Run even when the user asked for reduced motion.
    pub essential: bool,
    /// Echoed back on the settle event so the caller can tell which request
    /// finished.
    pub tag: Option<AnimationId>,
}

impl CameraAnimation {
    /// Linear pan of the center only.
    pub fn pan(id: AnimationId, center: LngLat, duration_ms: u32) -> Self {
        Self {
            center,
            zoom: None,
            pitch: None,
            duration_ms,
            easing: Easing::Linear,
            essential: false,
            tag: Some(id),
        }
    }

    /// Scripted flight to a full pose.
    pub fn flight(id: AnimationId, center: LngLat, zoom: f64, pitch: f64, duration_ms: u32) -> Self {
        Self {
            center,
            zoom: Some(zoom),
            pitch: Some(pitch),
            duration_ms,
            easing: Easing::EngineDefault,
            essential: true,
            tag: Some(id),
        }
    }

    /// Pose the camera ends up in when this animation completes from `from`.
    pub fn end_pose(&self, from: CameraPose) -> CameraPose {
        CameraPose {
            center: self.center,
            zoom: self.zoom.unwrap_or(from.zoom),
            pitch: self.pitch.unwrap_or(from.pitch),
            bearing: from.bearing,
        }
    }
}

/// Everything the engine reports back into the page.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MapEvent {
    PointerDown,
    PointerUp,
    DragStart,
    DragEnd,
    TouchStart,
    TouchEnd,
    /// The camera stopped moving, after a requested or a manual change.
    /// Interrupted animations settle too. `tag` is the request's tag, `None`
    /// for gestures.
    MoveEnd { tag: Option<AnimationId> },
    /// The map style finished loading; layers and fog can be installed.
    StyleLoaded,
    /// A marker element was clicked (delivered by the page, not the engine).
    MarkerClicked { index: usize },
}

/// The interactive map the globe drives.
///
/// Calls are made from engine callbacks on a single thread and are never
/// re-entrant: an implementation must not deliver a [`MapEvent`] from inside
/// one of these methods. Events are queued and handed back by the host loop.
pub trait MapEngine {
    fn camera(&self) -> CameraPose;

    /// Start an eased camera move. Replaces any animation in progress.
    fn ease_to(&mut self, anim: &CameraAnimation);

    /// Start a zoom-out/zoom-in flight. Replaces any animation in progress.
    fn fly_to(&mut self, anim: &CameraAnimation);

    fn is_style_loaded(&self) -> bool;

    fn set_fog(&mut self, fog: &FogSettings);

    fn add_marker(&mut self, marker: &MarkerSpec);

    fn remove_marker(&mut self, index: usize);

    /// Install the route source and layers, or replace the source data if
    /// they already exist.
    fn upsert_route(&mut self, route: &RouteLayer);
}
