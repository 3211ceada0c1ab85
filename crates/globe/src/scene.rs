//! Page-level orchestration around the controller.
//!
//! The scene owns the feed records and everything installed from them
//! (markers, the route layer), the atmosphere, and the loading overlay. Engine
//! events enter through [`GlobeScene::on_event`]; deferred work runs from
//! [`GlobeScene::tick`].

use feed::LocationRecord;
use foundation::ids::AnimationId;
use foundation::time::Time;
use runtime::deferred::DeferredQueue;

use crate::atmosphere::FogSettings;
use crate::config::GlobeConfig;
use crate::controller::{GlobeController, SpinOutcome};
use crate::engine::{MapEngine, MapEvent};
use crate::markers::build_markers;
use crate::route::RouteLayer;
use crate::sim::SimulatedEngine;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SceneAction {
    HideLoading,
}

#[derive(Debug)]
pub struct GlobeScene {
    controller: GlobeController,
    records: Vec<LocationRecord>,
    fog: FogSettings,
    // Route built before the style finished loading.
    pending_route: Option<RouteLayer>,
    route_drawn: bool,
    // Set once `StyleLoaded` has been seen; the engine's own flag can lag.
    style_ready: bool,
    loading_visible: bool,
    loading_hide_delay_ms: u64,
    deferred: DeferredQueue<SceneAction>,
}

impl Default for GlobeScene {
    fn default() -> Self {
        Self::new(&GlobeConfig::default())
    }
}

impl GlobeScene {
    pub fn new(cfg: &GlobeConfig) -> Self {
        Self {
            controller: GlobeController::from_config(cfg),
            records: Vec::new(),
            fog: FogSettings::default(),
            pending_route: None,
            route_drawn: false,
            style_ready: false,
            loading_visible: true,
            loading_hide_delay_ms: cfg.loading_hide_delay_ms,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn controller(&self) -> &GlobeController {
        &self.controller
    }

    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    pub fn is_loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn has_pending_route(&self) -> bool {
        self.pending_route.is_some()
    }

    /// When the next deferred action wants to run, if any.
    pub fn next_due(&self) -> Option<Time> {
        self.deferred.next_due()
    }

    /// Replace the current record set.
    ///
    /// Markers from the previous set are removed first. With a non-empty set
    /// the route is drawn (or held until the style loads) and the first
    /// rotation step is attempted, which starts the spin chain.
    pub fn set_locations<E: MapEngine + ?Sized>(
        &mut self,
        records: Vec<LocationRecord>,
        engine: &mut E,
    ) -> Option<SpinOutcome> {
        for index in 0..self.records.len() {
            engine.remove_marker(index);
        }
        self.records = records;
        tracing::info!(count = self.records.len(), "locations installed");

        if self.records.is_empty() {
            self.pending_route = None;
            if self.route_drawn {
                engine.upsert_route(&RouteLayer::through(&[]));
            }
            return None;
        }

        for marker in build_markers(&self.records) {
            engine.add_marker(&marker);
        }

        let route = RouteLayer::through(&self.records);
        if self.style_ready || engine.is_style_loaded() {
            engine.upsert_route(&route);
            self.route_drawn = true;
        } else {
            tracing::debug!("style not loaded; holding route");
            self.pending_route = Some(route);
        }

        Some(self.controller.spin_step(engine))
    }

    /// Route one engine event. `now` schedules time-based follow-ups.
    pub fn on_event<E: MapEngine + ?Sized>(
        &mut self,
        event: &MapEvent,
        engine: &mut E,
        now: Time,
    ) -> Option<SpinOutcome> {
        match *event {
            MapEvent::StyleLoaded => {
                self.style_ready = true;
                engine.set_fog(&self.fog);
                if let Some(route) = self.pending_route.take() {
                    engine.upsert_route(&route);
                    self.route_drawn = true;
                }
                self.deferred
                    .schedule_after(now, self.loading_hide_delay_ms, SceneAction::HideLoading);
                tracing::debug!(delay_ms = self.loading_hide_delay_ms, "style loaded");
                None
            }
            MapEvent::MarkerClicked { index } => {
                match self.records.get(index) {
                    Some(record) => {
                        self.controller.fly_to_location(engine, index, record);
                    }
                    None => tracing::warn!(index, "click on unknown marker"),
                }
                None
            }
            _ => self.controller.handle(event, engine),
        }
    }

    /// Run deferred actions due at `now`. Returns how many ran.
    pub fn tick(&mut self, now: Time) -> usize {
        let due = self.deferred.take_due(now);
        for action in &due {
            match action {
                SceneAction::HideLoading => {
                    if self.loading_visible {
                        tracing::debug!("hiding loading overlay");
                    }
                    self.loading_visible = false;
                }
            }
        }
        due.len()
    }

    pub fn go_home<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> AnimationId {
        self.controller.go_home(engine)
    }
}

/// Settle up to `max_events` animations on a simulated engine, feeding each
/// settle back into the scene. Returns how many settles were delivered.
///
/// The spin chain never rests on its own, so the bound is what ends a run.
pub fn drive(scene: &mut GlobeScene, engine: &mut SimulatedEngine, max_events: usize) -> usize {
    let mut delivered = 0;
    while delivered < max_events {
        let Some(event) = engine.settle() else {
            break;
        };
        delivered += 1;
        let now = engine.now();
        scene.on_event(&event, engine, now);
        scene.tick(now);
    }
    delivered
}
