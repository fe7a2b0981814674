use foundation::bounds::Ring;
use foundation::math::Viewport;
use foundation::time::Time;
use grid::{CellIndex, CellSet, resolve};
use runtime::{Event, EventBus};
use tracing::debug;

use crate::cover::{CoverOptions, cover, max_cover_resolution};
use crate::engine::{EngineConfig, GridUpdate, ViewportGridEngine};
use crate::events::SceneEvent;
use crate::selection::SelectionState;

/// Polygon drawing mode and its options.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingState {
    pub active: bool,
    /// Last completed polygon, `[lon, lat]` vertices.
    pub polygon: Option<Ring>,
    /// Replace the selection with the cells covering the polygon.
    pub cover: bool,
    pub compact: bool,
    pub cover_resolution: u8,
    /// Finest resolution the current polygon may be covered at.
    pub max_cover_resolution: u8,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            active: false,
            polygon: None,
            cover: false,
            compact: false,
            cover_resolution: 0,
            max_cover_resolution: grid::h3::MAX_RESOLUTION,
        }
    }
}

/// Result of submitting text to the selection widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOutcome {
    /// Canonical strings of the new selection.
    pub display: Vec<String>,
    pub rejected: Vec<String>,
}

/// Owns every piece of interactive state and turns UI events into
/// [`SceneEvent`]s.
///
/// Ordering contract:
/// - Events are published in the order the handlers run.
/// - A text submission publishes `SelectionChanged`, then
///   `ViewportRecentred`, then any `GridUpdated` the move produced.
#[derive(Debug)]
pub struct Session {
    viewport: Viewport,
    engine: ViewportGridEngine,
    selection: SelectionState,
    drawing: DrawingState,
    bus: EventBus<SceneEvent>,
}

impl Session {
    pub fn new(config: EngineConfig, viewport: Viewport) -> Self {
        Self {
            viewport,
            engine: ViewportGridEngine::new(config),
            selection: SelectionState::new(),
            drawing: DrawingState::default(),
            bus: EventBus::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn engine(&self) -> &ViewportGridEngine {
        &self.engine
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn events(&self) -> &[Event<SceneEvent>] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<SceneEvent>> {
        self.bus.drain()
    }

    pub fn viewport_changed(&mut self, now: Time, viewport: Viewport) {
        self.viewport = viewport;
        let update = self.engine.on_viewport_change(now, viewport);
        self.publish_grid(now, update);
    }

    /// Releases a coalesced viewport change once its window has passed.
    pub fn tick(&mut self, now: Time) {
        let update = self.engine.poll(now);
        self.publish_grid(now, update);
    }

    /// Releases every coalesced change whose deadline is at or before `now`,
    /// each stamped with its own deadline.
    pub fn advance_to(&mut self, now: Time) {
        while let Some(deadline) = self.next_deadline().filter(|d| *d <= now) {
            self.tick(deadline);
        }
    }

    /// When [`Session::tick`] should be called next.
    pub fn next_deadline(&self) -> Option<Time> {
        self.engine.next_deadline()
    }

    /// Replaces the selection with the cells found in `tokens` and frames
    /// them.
    pub fn text_submitted<I, S>(&mut self, now: Time, tokens: I) -> TextOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved = resolve(tokens);
        if !resolved.rejected.is_empty() {
            debug!(rejected = resolved.rejected.len(), "tokens without cells");
        }
        self.selection.replace(resolved.cells);
        self.publish_selection(now);

        if let Some(moved) = self.selection.recentre(&self.viewport) {
            self.bus.emit(now, SceneEvent::ViewportRecentred(moved));
            self.viewport_changed(now, moved);
        }

        TextOutcome {
            display: self.selection.display_strings(),
            rejected: resolved.rejected,
        }
    }

    /// Click on a background cell. Ignored while drawing.
    pub fn cell_clicked(&mut self, now: Time, cell: CellIndex, extend: bool) {
        if self.drawing.active {
            return;
        }
        if self.selection.click(cell, extend) {
            self.publish_selection(now);
        }
    }

    /// Click on a highlighted cell: deselects it. Ignored while drawing.
    pub fn selected_cell_clicked(&mut self, now: Time, cell: CellIndex) {
        if self.drawing.active {
            return;
        }
        if self.selection.remove([cell]) > 0 {
            self.publish_selection(now);
        }
    }

    pub fn clear_selection(&mut self, now: Time) {
        if self.selection.clear() {
            self.publish_selection(now);
        }
    }

    pub fn set_resolution_frozen(&mut self, frozen: bool) {
        self.engine.set_resolution_frozen(frozen);
    }

    /// Entering or leaving drawing mode starts from a clean slate.
    pub fn set_drawing(&mut self, active: bool) {
        self.drawing.active = active;
        self.drawing.polygon = None;
        self.drawing.cover = false;
        self.drawing.compact = false;
    }

    /// Completed polygon from the drawing tool.
    pub fn polygon_drawn(&mut self, now: Time, ring: Ring) {
        let max = max_cover_resolution(&ring);
        self.drawing.max_cover_resolution = max;
        self.drawing.cover_resolution = self.drawing.cover_resolution.min(max);
        self.drawing.polygon = Some(ring);
        self.refresh_cover(now);
    }

    pub fn set_cover(&mut self, now: Time, cover: bool) {
        self.drawing.cover = cover;
        if self.selection.clear() {
            self.publish_selection(now);
        }
        self.refresh_cover(now);
    }

    pub fn set_compact(&mut self, now: Time, compact: bool) {
        self.drawing.compact = compact;
        self.refresh_cover(now);
    }

    /// Clamped to the finest resolution the current polygon allows.
    pub fn set_cover_resolution(&mut self, now: Time, resolution: u8) {
        self.drawing.cover_resolution = resolution.min(self.drawing.max_cover_resolution);
        self.refresh_cover(now);
    }

    fn refresh_cover(&mut self, now: Time) {
        if !self.drawing.cover {
            return;
        }
        let Some(ring) = &self.drawing.polygon else {
            return;
        };
        let cells: CellSet = cover(
            ring,
            CoverOptions {
                resolution: self.drawing.cover_resolution,
                compact: self.drawing.compact,
                containment: self.engine.config().containment,
            },
        );
        debug!(
            cells = cells.len(),
            resolution = self.drawing.cover_resolution,
            compact = self.drawing.compact,
            "polygon covered"
        );
        if self.selection.replace(cells) {
            self.publish_selection(now);
        }
    }

    fn publish_grid(&mut self, now: Time, update: Option<GridUpdate>) {
        if let Some(update) = update {
            self.bus.emit(now, SceneEvent::GridUpdated(update));
        }
    }

    fn publish_selection(&mut self, now: Time) {
        let cells = self.selection.display_strings();
        self.bus.emit(now, SceneEvent::SelectionChanged { cells });
    }
}
