use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::bounds::{GeoBounds, GeoPoint};

/// Size in pixels of the whole Web-Mercator world at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude where the Web-Mercator square world ends.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// `[lon, lat]` degrees to zoom-0 world pixels (y grows southward).
///
/// Longitudes are not wrapped, so 190° maps past the east edge of the world.
pub fn lng_lat_to_world(lon: f64, lat: f64) -> [f64; 2] {
    let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let lambda = lon.to_radians();
    let phi = lat.to_radians();
    let x = TILE_SIZE * (lambda + PI) / (2.0 * PI);
    let y = TILE_SIZE * (PI - (PI / 4.0 + phi / 2.0).tan().ln()) / (2.0 * PI);
    [x, y]
}

/// Inverse of [`lng_lat_to_world`]. Returns `[lon, lat]` degrees.
pub fn world_to_lng_lat(x: f64, y: f64) -> [f64; 2] {
    let lon = x / TILE_SIZE * 360.0 - 180.0;
    let lat = (2.0 * (PI - 2.0 * PI * y / TILE_SIZE).exp().atan() - PI / 2.0).to_degrees();
    [lon, lat]
}

/// Map camera as reported by the renderer.
///
/// Bearing rotates the map clockwise (degrees). Pitch is accepted but
/// projected as a top-down view.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub pitch: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(latitude: f64, longitude: f64, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom,
            bearing: 0.0,
            pitch: 0.0,
            width,
            height,
        }
    }

    pub fn with_bearing(self, bearing: f64) -> Self {
        Self { bearing, ..self }
    }

    /// Same camera looking at `center`, at `zoom`.
    pub fn recentred(self, center: GeoPoint, zoom: f64) -> Self {
        Self {
            latitude: center.lat,
            longitude: center.lon,
            zoom,
            ..self
        }
    }

    /// True when no pixel is visible.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Screen pixels per zoom-0 world pixel.
    pub fn scale(&self) -> f64 {
        2f64.powf(self.zoom)
    }

    fn center_world(&self) -> [f64; 2] {
        let [x, y] = lng_lat_to_world(self.longitude, self.latitude);
        let s = self.scale();
        [x * s, y * s]
    }

    /// `[lon, lat]` degrees to screen pixels.
    pub fn project(&self, lon: f64, lat: f64) -> [f64; 2] {
        let s = self.scale();
        let [wx, wy] = lng_lat_to_world(lon, lat);
        let [cx, cy] = self.center_world();
        let (dx, dy) = rotate(wx * s - cx, wy * s - cy, -self.bearing.to_radians());
        [dx + self.width / 2.0, dy + self.height / 2.0]
    }

    /// Screen pixel to `[lon, lat]` degrees. Longitude is left unwrapped.
    pub fn unproject(&self, px: [f64; 2]) -> [f64; 2] {
        let s = self.scale();
        let [cx, cy] = self.center_world();
        let (dx, dy) = rotate(
            px[0] - self.width / 2.0,
            px[1] - self.height / 2.0,
            self.bearing.to_radians(),
        );
        world_to_lng_lat((cx + dx) / s, (cy + dy) / s)
    }

    /// Geographic rectangle bracketing every pixel of `[0,0]..[width,height]`.
    ///
    /// Degenerate (min == max) for an empty viewport.
    pub fn bounds(&self) -> GeoBounds {
        let w = self.width.max(0.0);
        let h = self.height.max(0.0);
        let corners = [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]].map(|px| {
            let [lon, lat] = self.unproject(px);
            GeoPoint::new(lat, lon)
        });
        // `enclosing` only fails on an empty iterator.
        GeoBounds::enclosing(corners).unwrap_or(GeoBounds::new(
            self.latitude,
            self.longitude,
            self.latitude,
            self.longitude,
        ))
    }
}

fn rotate(x: f64, y: f64, angle_rad: f64) -> (f64, f64) {
    if angle_rad == 0.0 {
        return (x, y);
    }
    let (sin, cos) = angle_rad.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}
