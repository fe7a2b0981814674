use foundation::math::Viewport;

use crate::engine::GridUpdate;

/// What the core tells the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// New background cells for the renderer.
    GridUpdated(GridUpdate),
    /// The highlighted set changed; `cells` are canonical strings in display
    /// order.
    SelectionChanged { cells: Vec<String> },
    /// The camera should move, e.g. to frame freshly entered cells.
    ViewportRecentred(Viewport),
}

impl SceneEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SceneEvent::GridUpdated(_) => "grid_updated",
            SceneEvent::SelectionChanged { .. } => "selection_changed",
            SceneEvent::ViewportRecentred(_) => "viewport_recentred",
        }
    }
}
