//! Auto-rotation and interaction suspension.
//!
//! The globe spins by chaining short linear eases: every time the camera
//! settles, the controller decides whether to issue the next step. There is no
//! timer. Setting a flag stops the chain at the next settle; clearing it and
//! settling again restarts it.
//!
//! Every animation the controller starts is tagged. While one is running, only
//! its own settle continues the chain; settles of interrupted animations and
//! untagged gesture settles are dropped.

use feed::LocationRecord;
use foundation::geo::LngLat;
use foundation::ids::AnimationId;
use runtime::event_bus::EventBus;

use crate::config::{FlightConfig, GlobeConfig, HomePose, SpinConfig};
use crate::engine::{CameraAnimation, MapEngine, MapEvent};
use crate::interaction::{ActiveFlight, FlightKind, InteractionState, SuspendReason};

/// Result of one rotation-step attempt.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SpinOutcome {
    /// An ease from `from` to `to` was issued.
    Stepped { from: LngLat, to: LngLat },
    Suspended(SuspendReason),
}

impl SpinOutcome {
    pub fn stepped(&self) -> bool {
        matches!(self, SpinOutcome::Stepped { .. })
    }
}

#[derive(Debug)]
pub struct GlobeController {
    state: InteractionState,
    spin: SpinConfig,
    flight: FlightConfig,
    home: HomePose,
    next_id: AnimationId,
    // Tag of the animation the controller is waiting on, if any.
    in_motion: Option<AnimationId>,
    trace: EventBus,
}

impl Default for GlobeController {
    fn default() -> Self {
        Self::new(SpinConfig::default(), FlightConfig::default(), HomePose::default())
    }
}

impl GlobeController {
    pub fn new(spin: SpinConfig, flight: FlightConfig, home: HomePose) -> Self {
        Self {
            state: InteractionState::new(),
            spin,
            flight,
            home,
            next_id: AnimationId::new(1),
            in_motion: None,
            trace: EventBus::new(),
        }
    }

    pub fn from_config(cfg: &GlobeConfig) -> Self {
        Self::new(cfg.spin, cfg.flight, cfg.home)
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Tag of the controller animation still running, if any.
    pub fn in_motion(&self) -> Option<AnimationId> {
        self.in_motion
    }

    pub fn trace(&self) -> &EventBus {
        &self.trace
    }

    /// Route one engine event through the interaction state.
    ///
    /// Returns the rotation-step outcome when the event triggers an attempt.
    /// A stale settle returns `None`. `StyleLoaded` and `MarkerClicked` belong
    /// to the scene and are ignored.
    pub fn handle<E: MapEngine + ?Sized>(
        &mut self,
        event: &MapEvent,
        engine: &mut E,
    ) -> Option<SpinOutcome> {
        match *event {
            MapEvent::PointerDown | MapEvent::DragStart | MapEvent::TouchStart => {
                if !self.state.is_dragging() {
                    self.trace.emit("drag", "begin");
                }
                self.state.begin_drag();
                None
            }
            MapEvent::PointerUp | MapEvent::DragEnd | MapEvent::TouchEnd => {
                if self.state.is_dragging() {
                    self.trace.emit("drag", "end");
                }
                self.state.end_drag();
                Some(self.spin_step(engine))
            }
            MapEvent::MoveEnd { tag } => {
                if let Some(landed) = self.state.settle(tag) {
                    tracing::info!(flight = %landed.id, kind = ?landed.kind, "flight landed");
                    self.trace.emit("flight", format!("landed {} {:?}", landed.id, landed.kind));
                }
                match (self.in_motion, tag) {
                    (Some(current), Some(id)) if current == id => self.in_motion = None,
                    (None, None) => {}
                    (current, _) => {
                        tracing::trace!(?current, ?tag, "stale settle");
                        return None;
                    }
                }
                Some(self.spin_step(engine))
            }
            MapEvent::StyleLoaded | MapEvent::MarkerClicked { .. } => None,
        }
    }

    /// Attempt one rotation step.
    ///
    /// No-op while dragging, while a flight is in the air, or when zoomed in
    /// past `max_spin_zoom`. Otherwise eases the center west by
    /// `increment_deg`; longitude is left for the engine to normalize.
    pub fn spin_step<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> SpinOutcome {
        if let Some(reason) = self.state.suspension() {
            tracing::trace!(?reason, "spin suspended");
            return SpinOutcome::Suspended(reason);
        }

        let camera = engine.camera();
        if camera.zoom > self.spin.max_spin_zoom {
            tracing::trace!(zoom = camera.zoom, "spin suspended: zoomed in");
            return SpinOutcome::Suspended(SuspendReason::ZoomedIn { zoom: camera.zoom });
        }

        let from = camera.center;
        let to = LngLat::new(from.lng - self.spin.increment_deg, from.lat);
        let id = self.allocate();
        engine.ease_to(&CameraAnimation::pan(id, to, self.spin.ease_ms));

        tracing::debug!(step = %id, from = from.lng, to = to.lng, "spin step");
        self.trace.emit("spin", format!("{:.4} -> {:.4}", from.lng, to.lng));
        SpinOutcome::Stepped { from, to }
    }

    /// Start a scripted flight. Rotation stays suspended until this flight's
    /// own settle event arrives; a later flight supersedes it.
    pub fn fly_to<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        kind: FlightKind,
        center: LngLat,
        zoom: f64,
        pitch: f64,
        duration_ms: u32,
    ) -> AnimationId {
        let id = self.allocate();
        if let Some(previous) = self.state.begin_flight(ActiveFlight { id, kind }) {
            tracing::debug!(previous = %previous.id, next = %id, "flight superseded");
        }
        engine.fly_to(&CameraAnimation::flight(id, center, zoom, pitch, duration_ms));

        tracing::info!(flight = %id, ?kind, lng = center.lng, lat = center.lat, "flight started");
        self.trace.emit(
            "flight",
            format!("start {id} {kind:?} -> [{:.4}, {:.4}] z{zoom}", center.lng, center.lat),
        );
        id
    }

    /// Fly to a record at the configured close-up zoom and pitch.
    pub fn fly_to_location<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        index: usize,
        record: &LocationRecord,
    ) -> AnimationId {
        let FlightConfig {
            zoom,
            pitch,
            duration_ms,
        } = self.flight;
        self.fly_to(
            engine,
            FlightKind::Location { index },
            record.lng_lat(),
            zoom,
            pitch,
            duration_ms,
        )
    }

    /// Fly back to the home pose; rotation resumes once it lands.
    pub fn go_home<E: MapEngine + ?Sized>(&mut self, engine: &mut E) -> AnimationId {
        let HomePose {
            center,
            zoom,
            pitch,
            duration_ms,
        } = self.home;
        self.fly_to(engine, FlightKind::Home, center, zoom, pitch, duration_ms)
    }

    // Tag for the next animation; it replaces whatever was running.
    fn allocate(&mut self) -> AnimationId {
        let id = self.next_id;
        self.next_id = id.next();
        self.in_motion = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobeController, SpinOutcome};
    use crate::engine::{MapEngine, MapEvent};
    use crate::interaction::{FlightKind, SuspendReason};
    use crate::sim::SimulatedEngine;
    use feed::LocationRecord;
    use foundation::camera::{CameraPose, Easing};
    use foundation::geo::LngLat;
    use foundation::ids::AnimationId;
    use pretty_assertions::{assert_eq, assert_ne};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn engine_at(lng: f64, lat: f64, zoom: f64) -> SimulatedEngine {
        SimulatedEngine::new(CameraPose::new(LngLat::new(lng, lat), zoom, 0.0))
    }

    fn record(name: &str, lng: f64, lat: f64) -> LocationRecord {
        LocationRecord {
            name: name.into(),
            description: String::new(),
            image: String::new(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn idle_step_eases_west_linearly() {
        let mut engine = engine_at(106.0, 10.0, 1.5);
        let mut ctrl = GlobeController::default();

        let outcome = ctrl.spin_step(&mut engine);
        assert_eq!(
            outcome,
            SpinOutcome::Stepped {
                from: LngLat::new(106.0, 10.0),
                to: LngLat::new(105.5, 10.0),
            }
        );
        let ease = engine.last_ease().unwrap();
        assert_eq!(ease.easing, Easing::Linear);
        assert_eq!(ease.duration_ms, 1000);
        assert_eq!(ease.zoom, None);
    }

    #[test]
    fn step_while_dragging_leaves_camera_alone() {
        let mut engine = engine_at(20.0, 0.0, 1.5);
        let mut ctrl = GlobeController::default();

        ctrl.handle(&MapEvent::PointerDown, &mut engine);
        let outcome = ctrl.spin_step(&mut engine);
        assert_eq!(outcome, SpinOutcome::Suspended(SuspendReason::Dragging));
        assert_eq!(engine.settle(), None);
        assert_eq!(engine.camera().center, LngLat::new(20.0, 0.0));
        assert!(engine.requests().is_empty());
    }

    #[test]
    fn n_idle_steps_move_exactly_n_increments() {
        let mut engine = engine_at(10.0, 5.0, 2.0);
        let mut ctrl = GlobeController::default();
        let n = 7;

        let mut outcome = ctrl.spin_step(&mut engine);
        for _ in 1..n {
            assert!(outcome.stepped());
            let settled = engine.settle().unwrap();
            outcome = ctrl.handle(&settled, &mut engine).unwrap();
        }
        engine.settle();

        assert_close(engine.camera().center.lng, 10.0 - n as f64 * 0.5, 1e-9);
        assert_eq!(engine.ease_count(), n);
    }

    #[test]
    fn steps_wrap_across_antimeridian() {
        let mut engine = engine_at(-179.75, 0.0, 1.0);
        let mut ctrl = GlobeController::default();

        ctrl.spin_step(&mut engine);
        engine.settle();
        assert_close(engine.camera().center.lng, 179.75, 1e-9);
    }

    #[test]
    fn zoom_gate_blocks_regardless_of_flags() {
        let mut engine = engine_at(0.0, 0.0, 5.01);
        let mut ctrl = GlobeController::default();
        assert_eq!(
            ctrl.spin_step(&mut engine),
            SpinOutcome::Suspended(SuspendReason::ZoomedIn { zoom: 5.01 })
        );
        assert_eq!(engine.ease_count(), 0);

        // Exactly at the threshold still spins.
        let mut engine = engine_at(0.0, 0.0, 5.0);
        assert!(ctrl.spin_step(&mut engine).stepped());
    }

    #[test]
    fn release_resumes_spin_immediately() {
        let mut engine = engine_at(50.0, 0.0, 1.5);
        let mut ctrl = GlobeController::default();

        ctrl.handle(&MapEvent::TouchStart, &mut engine);
        assert!(!ctrl.state().is_idle());
        let outcome = ctrl.handle(&MapEvent::TouchEnd, &mut engine).unwrap();
        assert!(outcome.stepped());
        assert!(ctrl.state().is_idle());
    }

    #[test]
    fn release_during_flight_does_not_step() {
        let mut engine = engine_at(50.0, 0.0, 1.5);
        let mut ctrl = GlobeController::default();

        ctrl.go_home(&mut engine);
        ctrl.handle(&MapEvent::DragStart, &mut engine);
        let outcome = ctrl.handle(&MapEvent::DragEnd, &mut engine).unwrap();
        assert_eq!(outcome, SpinOutcome::Suspended(SuspendReason::Flying(FlightKind::Home)));
        assert_eq!(engine.ease_count(), 0);
    }

    #[test]
    fn flight_suspends_until_its_settle() {
        let mut engine = engine_at(0.0, 0.0, 3.0);
        let mut ctrl = GlobeController::default();

        let id = ctrl.go_home(&mut engine);
        assert_eq!(id, AnimationId::new(1));
        assert!(!ctrl.spin_step(&mut engine).stepped());

        // A settle that is not the flight's own does not re-arm rotation.
        assert_eq!(ctrl.handle(&MapEvent::MoveEnd { tag: None }, &mut engine), None);
        assert_eq!(engine.ease_count(), 0);

        let settled = engine.settle().unwrap();
        assert_eq!(settled, MapEvent::MoveEnd { tag: Some(id) });
        let outcome = ctrl.handle(&settled, &mut engine).unwrap();
        assert!(outcome.stepped());
        assert!(ctrl.state().is_idle());
    }

    #[test]
    fn location_flight_targets_record_with_configured_pose() {
        let mut engine = engine_at(106.6297, 10.8231, 1.5);
        let mut ctrl = GlobeController::default();

        ctrl.fly_to_location(&mut engine, 0, &record("A", 10.0, 20.0));
        let fly = engine.last_fly().unwrap();
        assert_eq!(fly.center, LngLat::new(10.0, 20.0));
        assert_eq!(fly.zoom, Some(14.0));
        assert_eq!(fly.pitch, Some(65.0));
        assert_eq!(fly.duration_ms, 5000);
        assert!(fly.essential);

        // Landing clears the flight but the close-up zoom keeps the globe still.
        let settled = engine.settle().unwrap();
        let outcome = ctrl.handle(&settled, &mut engine).unwrap();
        assert_eq!(outcome, SpinOutcome::Suspended(SuspendReason::ZoomedIn { zoom: 14.0 }));
        assert!(ctrl.state().is_idle());
    }

    #[test]
    fn superseded_flight_settle_keeps_suspension() {
        let mut engine = engine_at(0.0, 0.0, 1.5);
        let mut ctrl = GlobeController::default();

        let first = ctrl.fly_to_location(&mut engine, 0, &record("A", 10.0, 20.0));
        let second = ctrl.go_home(&mut engine);

        // The engine settles the interrupted flight first.
        let interrupted = engine.settle().unwrap();
        assert_eq!(interrupted, MapEvent::MoveEnd { tag: Some(first) });
        assert_eq!(ctrl.handle(&interrupted, &mut engine), None);
        assert_eq!(ctrl.state().flight().map(|f| f.id), Some(second));

        let landed = engine.settle().unwrap();
        assert_eq!(landed, MapEvent::MoveEnd { tag: Some(second) });
        assert!(ctrl.handle(&landed, &mut engine).unwrap().stepped());
    }

    #[test]
    fn release_mid_ease_continues_one_chain() {
        let mut engine = engine_at(40.0, 0.0, 1.5);
        let mut ctrl = GlobeController::default();

        ctrl.spin_step(&mut engine);
        let first = ctrl.in_motion().unwrap();
        ctrl.handle(&MapEvent::PointerDown, &mut engine);
        assert!(ctrl.handle(&MapEvent::PointerUp, &mut engine).unwrap().stepped());
        let second = ctrl.in_motion().unwrap();
        assert_ne!(first, second);

        // The replaced ease settles in place and must not start another step.
        let interrupted = engine.settle().unwrap();
        assert_eq!(interrupted, MapEvent::MoveEnd { tag: Some(first) });
        assert_eq!(ctrl.handle(&interrupted, &mut engine), None);
        assert_eq!(engine.ease_count(), 2);
        assert_eq!(engine.now().as_millis(), 0.0);

        let settled = engine.settle().unwrap();
        assert_eq!(settled, MapEvent::MoveEnd { tag: Some(second) });
        assert!(ctrl.handle(&settled, &mut engine).unwrap().stepped());
        assert_eq!(engine.ease_count(), 3);
        assert_eq!(engine.now().as_millis(), 1000.0);
        assert_close(engine.camera().center.lng, 39.5, 1e-9);
    }

    #[test]
    fn gesture_settle_restarts_a_stopped_chain() {
        let mut engine = engine_at(0.0, 0.0, 6.0);
        let mut ctrl = GlobeController::default();

        // Zoomed in: the step is refused and nothing is running.
        assert!(!ctrl.spin_step(&mut engine).stepped());
        assert_eq!(ctrl.in_motion(), None);

        // An untagged settle while idle is a user move and retries the step.
        let outcome = ctrl.handle(&MapEvent::MoveEnd { tag: None }, &mut engine).unwrap();
        assert_eq!(outcome, SpinOutcome::Suspended(SuspendReason::ZoomedIn { zoom: 6.0 }));
    }

    #[test]
    fn trace_records_decisions() {
        let mut engine = engine_at(0.0, 0.0, 1.5);
        let mut ctrl = GlobeController::default();
        ctrl.spin_step(&mut engine);
        ctrl.go_home(&mut engine);
        assert_eq!(ctrl.trace().count("spin"), 1);
        assert_eq!(ctrl.trace().count("flight"), 1);
    }
}
