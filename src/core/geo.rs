use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
pub const EARTH_RADIUS: f64 = 6378137.0;
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// A geographic WGS84 coordinate in degrees, longitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    /// Creates a new LonLat coordinate
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lon.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + Self::clamp_lat(self.lat).to_radians() / 2.0)
            .tan()
            .ln())
            * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LonLat from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lon = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lon, lat)
    }

    pub fn as_point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

impl Default for LonLat {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<Point> for LonLat {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// A point in projected or geographic coordinates (x = easting/longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rounds both axes to whole units, half-way cases towards positive infinity
    pub fn round_half_up(&self) -> (i64, i64) {
        (round_half_up(self.x), round_half_up(self.y))
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Rounds like the portals do: `-2.5` becomes `-2`, `2.5` becomes `3`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
