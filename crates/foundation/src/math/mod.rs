pub mod geodesy;
pub mod longitude;
pub mod projection;

pub use geodesy::*;
pub use longitude::*;
pub use projection::*;
