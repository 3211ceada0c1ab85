pub mod camera;
pub mod geo;
pub mod ids;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use camera::*;
pub use geo::*;
pub use ids::*;
pub use time::*;
