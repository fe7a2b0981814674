use std::io::BufRead;
use std::path::Path;

use foundation::bounds::{GeoBounds, GeoPoint, Ring};
use foundation::math::Viewport;
use foundation::time::Time;
use grid::h3::{MAX_RESOLUTION, resolution};
use grid::{CellIndex, cell_center, parse, resolve};
use scene::cover::{CoverOptions, cover, max_cover_resolution};
use scene::style::{CellInfo, HIGHLIGHT_FILL, color_of};
use scene::{SceneEvent, SelectionState, Session, ViewportGridEngine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::HexConfig;
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleOutput {
    pub resolution: u8,
    pub bounds: GeoBounds,
    pub count: usize,
    pub cells: Vec<String>,
    /// Visible cells that are also in the requested selection.
    pub highlighted: Vec<String>,
}

/// Cells on screen for one viewport, without throttling.
pub fn visible(config: &HexConfig, viewport: &Viewport, selected: &[String]) -> VisibleOutput {
    let engine = ViewportGridEngine::new(config.engine_config());
    let update = engine.compute(viewport);

    let mut selection = SelectionState::new();
    selection.replace(resolve(selected).cells);
    let highlighted = update
        .cells
        .iter()
        .filter(|cell| color_of(*cell, &selection) == HIGHLIGHT_FILL)
        .map(|cell| cell.to_string())
        .collect();

    VisibleOutput {
        resolution: update.resolution,
        bounds: update.bounds,
        count: update.cells.len(),
        cells: update.cells.to_strings(),
        highlighted,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutput {
    pub cells: Vec<String>,
    pub rejected: Vec<String>,
}

pub fn parse_tokens(tokens: &[String]) -> ParseOutput {
    let resolved = resolve(tokens);
    ParseOutput {
        cells: resolved.cells.to_strings(),
        rejected: resolved.rejected,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverOutput {
    pub resolution: u8,
    pub max_resolution: u8,
    pub compact: bool,
    pub count: usize,
    pub cells: Vec<String>,
}

/// Cells covering a JSON `[[lon, lat], ...]` ring.
///
/// Resolutions finer than the ring allows are lowered to the finest allowed
/// one.
pub fn cover_ring(
    config: &HexConfig,
    ring_json: &str,
    requested: u8,
    compact: bool,
) -> Result<CoverOutput, CliError> {
    resolution(requested)?;
    let ring: Ring = serde_json::from_str(ring_json)?;

    let max_resolution = max_cover_resolution(&ring);
    let used = requested.min(max_resolution);
    if used != requested {
        warn!(requested, used, "cover resolution lowered to keep cell count bounded");
    }

    let cells = cover(
        &ring,
        CoverOptions {
            resolution: used,
            compact,
            containment: config.containment,
        },
    );
    Ok(CoverOutput {
        resolution: used,
        max_resolution,
        compact,
        count: cells.len(),
        cells: cells.to_strings(),
    })
}

/// One line of a replay file.
#[derive(Debug, Clone, Deserialize)]
struct ReplayInput {
    t_ms: f64,
    viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    pub t_ms: f64,
    pub resolution: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub steps: Vec<ReplayStep>,
    pub coalesced: u64,
}

/// Drives a recorded stream of viewport changes through a throttled session.
///
/// Lines are `{"t_ms": .., "viewport": {..}}` with non-decreasing times. The
/// trailing coalesced change is flushed at its deadline.
pub fn replay(config: &HexConfig, input: impl BufRead, path: &Path) -> Result<ReplayReport, CliError> {
    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: ReplayInput =
            serde_json::from_str(&line).map_err(|source| CliError::ReplayLine {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        events.push(parsed);
    }

    let Some(first) = events.first() else {
        return Ok(ReplayReport {
            events: 0,
            steps: Vec::new(),
            coalesced: 0,
        });
    };
    let mut session = Session::new(config.engine_config(), first.viewport);
    for event in &events {
        let now = Time::from_millis(event.t_ms);
        session.advance_to(now);
        session.viewport_changed(now, event.viewport);
    }
    if let Some(deadline) = session.next_deadline() {
        session.advance_to(deadline);
    }

    let steps = session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event.payload {
            SceneEvent::GridUpdated(update) => Some(ReplayStep {
                t_ms: event.at.as_millis(),
                resolution: update.resolution,
                count: update.cells.len(),
            }),
            _ => None,
        })
        .collect::<Vec<_>>();

    info!(metrics = %session.engine().metrics(), "replay finished");
    Ok(ReplayReport {
        events: events.len(),
        steps,
        coalesced: session.engine().coalesced(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectOutput {
    pub cell: String,
    pub resolution: u8,
    pub center: GeoPoint,
    pub area_m2: f64,
    pub area: String,
    pub parent: Option<String>,
    pub children: u64,
    pub pentagon: bool,
}

/// Facts about one cell, given in any form the resolver accepts.
pub fn inspect(token: &str) -> Result<InspectOutput, CliError> {
    let cell: CellIndex = parse(token)
        .into_iter()
        .next()
        .ok_or_else(|| CliError::InvalidCell(token.trim().to_string()))?;
    let info = CellInfo::describe(cell);

    let parent = match info.resolution.checked_sub(1) {
        Some(r) => cell.parent(resolution(r)?).map(|p| p.to_string()),
        None => None,
    };
    let children = if info.resolution < MAX_RESOLUTION {
        cell.children_count(resolution(info.resolution + 1)?)
    } else {
        0
    };
    debug!(%cell, resolution = info.resolution, "inspected");

    Ok(InspectOutput {
        cell: cell.to_string(),
        resolution: info.resolution,
        center: cell_center(cell),
        area_m2: info.area_m2,
        area: info.area_label(),
        parent,
        children,
        pentagon: cell.is_pentagon(),
    })
}
