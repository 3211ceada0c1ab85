pub mod deferred;
pub mod event_bus;

pub use deferred::*;
pub use event_bus::*;
