//! Spinning-globe landing page core.
//!
//! The mapping engine (tiles, projection, input, camera animation) sits behind
//! [`engine::MapEngine`]. Everything here decides *what* to ask of it: when to
//! take the next auto-rotation step, where to fly on a marker click, which
//! layers and markers to install once the feed arrives.

pub mod atmosphere;
pub mod config;
pub mod controller;
pub mod engine;
pub mod interaction;
pub mod markers;
pub mod route;
pub mod scene;
pub mod sim;

pub use atmosphere::FogSettings;
pub use config::{ConfigError, FlightConfig, GlobeConfig, HomePose, SpinConfig};
pub use controller::{GlobeController, SpinOutcome};
pub use engine::{CameraAnimation, MapEngine, MapEvent};
pub use interaction::{ActiveFlight, FlightKind, InteractionState, SuspendReason};
pub use markers::{Anchor, MarkerSpec, PopupSpec};
pub use route::RouteLayer;
pub use scene::GlobeScene;
pub use sim::SimulatedEngine;
