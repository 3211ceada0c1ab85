//! Deterministic in-memory engine.
//!
//! Animations complete only when [`SimulatedEngine::settle`] is called, which
//! hands back the `MoveEnd` event a real engine would fire. Starting an
//! animation while another is in flight settles the old one first, without
//! moving the camera, the way an interrupted ease behaves. A settled
//! animation advances the simulated clock by its duration.

use std::collections::{BTreeMap, VecDeque};

use foundation::camera::CameraPose;
use foundation::time::Time;

use crate::atmosphere::FogSettings;
use crate::engine::{CameraAnimation, MapEngine, MapEvent};
use crate::markers::MarkerSpec;
use crate::route::RouteLayer;

/// One camera request, as the engine received it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraRequest {
    Ease(CameraAnimation),
    Fly(CameraAnimation),
}

impl CameraRequest {
    pub fn animation(&self) -> &CameraAnimation {
        match self {
            CameraRequest::Ease(a) | CameraRequest::Fly(a) => a,
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulatedEngine {
    camera: CameraPose,
    clock: Time,
    style_loaded: bool,
    pending: Option<CameraAnimation>,
    interrupted: VecDeque<MapEvent>,
    requests: Vec<CameraRequest>,
    fog: Option<FogSettings>,
    markers: BTreeMap<usize, MarkerSpec>,
    route: Option<RouteLayer>,
    route_upserts: usize,
}

impl SimulatedEngine {
    pub fn new(camera: CameraPose) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    /// Mark the style as loaded and return the event the engine would fire.
    pub fn load_style(&mut self) -> MapEvent {
        self.style_loaded = true;
        MapEvent::StyleLoaded
    }

    /// Complete the oldest outstanding animation.
    ///
    /// Returns `None` when the camera is at rest.
    pub fn settle(&mut self) -> Option<MapEvent> {
        if let Some(event) = self.interrupted.pop_front() {
            return Some(event);
        }
        let anim = self.pending.take()?;
        self.clock = self.clock.plus_millis(u64::from(anim.duration_ms));
        let mut end = anim.end_pose(self.camera);
        end.center = end.center.wrapped();
        self.camera = end;
        Some(MapEvent::MoveEnd { tag: anim.tag })
    }

    pub fn now(&self) -> Time {
        self.clock
    }

    /// Let wall-clock time pass without any animation completing.
    pub fn advance(&mut self, ms: u64) {
        self.clock = self.clock.plus_millis(ms);
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some() || !self.interrupted.is_empty()
    }

    /// Marker click, if a marker with this index is on the map.
    pub fn click_marker(&self, index: usize) -> Option<MapEvent> {
        self.markers
            .contains_key(&index)
            .then_some(MapEvent::MarkerClicked { index })
    }

    pub fn requests(&self) -> &[CameraRequest] {
        &self.requests
    }

    pub fn ease_count(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| matches!(r, CameraRequest::Ease(_)))
            .count()
    }

    pub fn fly_requests(&self) -> Vec<CameraAnimation> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                CameraRequest::Fly(a) => Some(*a),
                CameraRequest::Ease(_) => None,
            })
            .collect()
    }

    pub fn last_ease(&self) -> Option<CameraAnimation> {
        self.requests.iter().rev().find_map(|r| match r {
            CameraRequest::Ease(a) => Some(*a),
            CameraRequest::Fly(_) => None,
        })
    }

    pub fn last_fly(&self) -> Option<CameraAnimation> {
        self.fly_requests().last().copied()
    }

    pub fn fog(&self) -> Option<&FogSettings> {
        self.fog.as_ref()
    }

    pub fn markers(&self) -> &BTreeMap<usize, MarkerSpec> {
        &self.markers
    }

    pub fn route(&self) -> Option<&RouteLayer> {
        self.route.as_ref()
    }

    pub fn route_upserts(&self) -> usize {
        self.route_upserts
    }

    fn start(&mut self, request: CameraRequest) {
        if let Some(old) = self.pending.take() {
            self.interrupted.push_back(MapEvent::MoveEnd { tag: old.tag });
        }
        self.pending = Some(*request.animation());
        self.requests.push(request);
    }
}

impl MapEngine for SimulatedEngine {
    fn camera(&self) -> CameraPose {
        self.camera
    }

    fn ease_to(&mut self, anim: &CameraAnimation) {
        self.start(CameraRequest::Ease(*anim));
    }

    fn fly_to(&mut self, anim: &CameraAnimation) {
        self.start(CameraRequest::Fly(*anim));
    }

    fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    fn set_fog(&mut self, fog: &FogSettings) {
        self.fog = Some(fog.clone());
    }

    fn add_marker(&mut self, marker: &MarkerSpec) {
        self.markers.insert(marker.index, marker.clone());
    }

    fn remove_marker(&mut self, index: usize) {
        self.markers.remove(&index);
    }

    fn upsert_route(&mut self, route: &RouteLayer) {
        self.route = Some(route.clone());
        self.route_upserts += 1;
    }
}
