use foundation::bounds::{GeoBounds, Ring};
use foundation::math::Viewport;
use foundation::time::Time;
use grid::{CellSet, Containment, ResolutionPolicy, cells_for_rings, finest_resolution_within};
use runtime::{Metrics, Throttle};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default coalescing window for viewport changes.
pub const DEFAULT_THROTTLE_MS: u64 = 300;

/// Default ceiling on the estimated number of visible cells.
pub const DEFAULT_MAX_CELLS: u64 = 200_000;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub throttle_ms: u64,
    pub policy: ResolutionPolicy,
    pub containment: Containment,
    /// Resolution is lowered until the estimated visible cell count fits.
    pub max_cells: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            policy: ResolutionPolicy::Table,
            containment: Containment::Intersects,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

/// Cells to paint as the background layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GridUpdate {
    pub resolution: u8,
    pub bounds: GeoBounds,
    pub cells: CellSet,
}

/// Answers "which cells are visible now, at what resolution".
///
/// Viewport changes pass through a [`Throttle`]: the first change after a
/// quiet period is computed at once, later ones are coalesced and the newest
/// is computed when [`ViewportGridEngine::poll`] is called after the window.
/// The engine knows nothing about selection; coloring is the renderer's job.
#[derive(Debug)]
pub struct ViewportGridEngine {
    config: EngineConfig,
    throttle: Throttle<Viewport>,
    resolution: u8,
    frozen: bool,
    metrics: Metrics,
}

impl ViewportGridEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            throttle: Throttle::from_millis(config.throttle_ms),
            resolution: 0,
            frozen: false,
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolution of the most recent computation.
    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// While frozen, zooming keeps the current resolution.
    pub fn set_resolution_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Feeds a viewport change. Returns an update if it ran right away.
    pub fn on_viewport_change(&mut self, now: Time, viewport: Viewport) -> Option<GridUpdate> {
        self.metrics.inc("viewport.events");
        match self.throttle.offer(now, viewport) {
            Some(vp) => Some(self.recompute(vp)),
            None => {
                debug!(at_s = now.0, "viewport change coalesced");
                None
            }
        }
    }

    /// Computes the coalesced viewport if its window has closed.
    pub fn poll(&mut self, now: Time) -> Option<GridUpdate> {
        let vp = self.throttle.poll(now)?;
        Some(self.recompute(vp))
    }

    /// When the host should call [`ViewportGridEngine::poll`] next.
    pub fn next_deadline(&self) -> Option<Time> {
        self.throttle.next_deadline()
    }

    /// Number of viewport changes superseded before being computed.
    pub fn coalesced(&self) -> u64 {
        self.throttle.coalesced()
    }

    fn recompute(&mut self, viewport: Viewport) -> GridUpdate {
        let update = self.compute(&viewport);
        self.resolution = update.resolution;
        self.metrics.inc("grid.recomputations");
        self.metrics.record("grid.cells", update.cells.len() as u64);
        debug!(
            resolution = update.resolution,
            cells = update.cells.len(),
            zoom = viewport.zoom,
            "grid recomputed"
        );
        update
    }

    /// Unthrottled pipeline: bounds, split, rings, resolution, cells.
    pub fn compute(&self, viewport: &Viewport) -> GridUpdate {
        let bounds = viewport.bounds();
        let wanted = if self.frozen {
            self.resolution
        } else {
            self.config.policy.resolution_for_zoom(viewport.zoom)
        };

        let rings: Vec<Ring> = bounds
            .split_at_antimeridian()
            .iter()
            .map(GeoBounds::to_ring)
            .collect();

        if viewport.is_empty() || bounds.is_degenerate() {
            return GridUpdate {
                resolution: wanted,
                bounds,
                cells: CellSet::new(),
            };
        }

        let resolution = finest_resolution_within(&rings, wanted, self.config.max_cells as f64);
        if resolution != wanted {
            debug!(wanted, resolution, "resolution capped by max_cells");
        }

        GridUpdate {
            resolution,
            bounds,
            cells: cells_for_rings(&rings, resolution, self.config.containment),
        }
    }
}
