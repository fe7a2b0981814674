//! Command-line front end for the hexagon grid core.

pub mod commands;
pub mod config;
pub mod error;

pub use config::HexConfig;
pub use error::CliError;
