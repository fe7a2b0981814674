use std::env;
use std::fmt::Display;
use std::str::FromStr;

use grid::{Containment, ResolutionPolicy};
use scene::{DEFAULT_MAX_CELLS, DEFAULT_THROTTLE_MS, EngineConfig};
use tracing::warn;

pub const ENV_THROTTLE_MS: &str = "HEXVIEW_THROTTLE_MS";
pub const ENV_POLICY: &str = "HEXVIEW_POLICY";
pub const ENV_MAX_CELLS: &str = "HEXVIEW_MAX_CELLS";
pub const ENV_CONTAINMENT: &str = "HEXVIEW_CONTAINMENT";

/// Engine settings taken from the environment. Command-line flags override
/// individual fields afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexConfig {
    pub throttle_ms: u64,
    pub policy: ResolutionPolicy,
    pub max_cells: u64,
    pub containment: Containment,
}

impl Default for HexConfig {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            policy: ResolutionPolicy::Table,
            max_cells: DEFAULT_MAX_CELLS,
            containment: Containment::Intersects,
        }
    }
}

impl HexConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or unparseable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            throttle_ms: env_var_parsed(&lookup, ENV_THROTTLE_MS, defaults.throttle_ms),
            policy: env_var_parsed(&lookup, ENV_POLICY, defaults.policy),
            max_cells: env_var_parsed(&lookup, ENV_MAX_CELLS, defaults.max_cells),
            containment: env_var_parsed(&lookup, ENV_CONTAINMENT, defaults.containment),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            throttle_ms: self.throttle_ms,
            policy: self.policy,
            containment: self.containment,
            max_cells: self.max_cells,
        }
    }
}

fn env_var_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(key, value = %raw, fallback = %default, "ignoring invalid env value");
            default
        }
    }
}
