//! Hexagonal grid layer: cell sets, zoom→resolution policies, polygon
//! enumeration, compaction and parsing of user-supplied cell identifiers.
//!
//! Cell math is delegated to `h3o`; [`h3`] is the only module that talks to it
//! directly for geometry.

pub mod cell_set;
pub mod compact;
pub mod enumerate;
pub mod h3;
pub mod resolution;
pub mod resolver;

pub use cell_set::*;
pub use compact::*;
pub use enumerate::*;
pub use h3::{GridError, cell_center, cell_resolution};
pub use resolution::*;
pub use resolver::*;

pub use h3o::CellIndex;
