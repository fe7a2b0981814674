use grid::{CellIndex, cell_resolution};

use crate::selection::SelectionState;

/// RGBA, 0..=255 per channel.
pub type Rgba = [u8; 4];

pub const HIGHLIGHT_FILL: Rgba = [255, 100, 100, 150];
/// Nearly transparent, but still pickable by the renderer.
pub const BACKGROUND_FILL: Rgba = [0, 0, 0, 1];
pub const OUTLINE: Rgba = [150, 150, 150, 100];

/// Fill color for a background cell.
pub fn color_of(cell: CellIndex, selection: &SelectionState) -> Rgba {
    if selection.contains(cell) {
        HIGHLIGHT_FILL
    } else {
        BACKGROUND_FILL
    }
}

/// Above this many square meters, areas are reported in km².
const KM2_THRESHOLD_M2: f64 = 100_000.0;

/// Tooltip facts for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellInfo {
    pub cell: CellIndex,
    pub resolution: u8,
    pub area_m2: f64,
}

impl CellInfo {
    pub fn describe(cell: CellIndex) -> Self {
        Self {
            cell,
            resolution: cell_resolution(cell),
            area_m2: cell.area_m2(),
        }
    }

    /// Area with its unit, two significant digits.
    pub fn area_label(&self) -> String {
        if self.area_m2 > KM2_THRESHOLD_M2 {
            format!("{} km^2", significant(self.area_m2 / 1_000_000.0, 2))
        } else {
            format!("{} m^2", significant(self.area_m2, 2))
        }
    }

    pub fn tooltip(&self) -> String {
        format!(
            "Hex: {}\nResolution: {}\nArea: {}",
            self.cell,
            self.resolution,
            self.area_label()
        )
    }
}

/// Rounds to `digits` significant digits and formats with thousands
/// separators. Trailing fractional zeros are dropped.
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0);
    let factor = 10f64.powi(digits - 1 - magnitude);
    let rounded = (value * factor).round() / factor;
    let text = format!("{rounded:.*}", decimals as usize);

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f.trim_end_matches('0')).filter(|f| !f.is_empty())),
        None => (text.as_str(), None),
    };
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
