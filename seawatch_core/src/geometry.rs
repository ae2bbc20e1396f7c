//! Planar vessel geometry in degree units.
//!
//! The simulator works directly in (latitude, longitude) degrees and treats
//! them as a flat plane. Over the few kilometres a harbour patrol covers this
//! is close enough, and it keeps the motion model exactly reproducible.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,
}

impl Position {
    /// Creates a position from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the position as a `[lat, lng]` vector.
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.lat, self.lng)
    }

    /// Builds a position from a `[lat, lng]` vector.
    pub fn from_vector(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }

    /// Euclidean distance in degree units.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Position {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Wraps a heading into `[0, 360)`.
pub fn normalize_heading(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_turn(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Bearing of a displacement, measured clockwise from north.
///
/// `offset` is `[Δlat, Δlng]`; the result is `atan2(Δlng, Δlat)` in degrees.
pub fn bearing(offset: &Vector2<f64>) -> f64 {
    offset.y.atan2(offset.x).to_degrees()
}

/// Rotates `current` toward `desired` by at most `max_rate` degrees.
///
/// When the remaining turn is smaller than `max_rate` the heading snaps to
/// `desired`. The result is normalized.
pub fn turn_toward(current: f64, desired: f64, max_rate: f64) -> f64 {
    let delta = shortest_turn(current, desired);
    if delta.abs() < max_rate {
        normalize_heading(desired)
    } else {
        normalize_heading(current + max_rate.copysign(delta))
    }
}

/// 8-point compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const ROSE: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Nearest compass point for a heading in degrees.
    pub fn from_heading(heading: f64) -> Self {
        let index = (normalize_heading(heading) / 45.0).round() as usize % 8;
        Self::ROSE[index]
    }

    /// Short label, e.g. `"NE"`.
    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
