pub mod event_bus;
pub mod metrics;
pub mod throttle;

pub use event_bus::*;
pub use metrics::*;
pub use throttle::*;
