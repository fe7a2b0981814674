//! Interactive state around the hexagon grid: what is visible, what is
//! selected, and how events from the map UI change both.

pub mod cover;
pub mod engine;
pub mod events;
pub mod selection;
pub mod session;
pub mod style;

pub use engine::*;
pub use events::*;
pub use selection::*;
pub use session::*;
