//! Navigability policies for waypoint admission.
//!
//! A waypoint is only queued if the active [`NavigabilityPolicy`] accepts
//! it. Production runs with [`OpenWater`], which accepts everything; a
//! [`NavigableZone`] restricts the vessel to the inside of a polygon.

use crate::geometry::Position;
use geo::{Coord, LineString, Polygon};

/// Decides whether a point is safe to steer toward.
pub trait NavigabilityPolicy: Send + Sync {
    /// Returns true if the vessel may be sent to `point`.
    fn is_navigable(&self, point: Position) -> bool;
}

/// Accepts every point.
///
/// There is no bathymetry source behind the dashboard yet, so free movement
/// is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWater;

impl NavigabilityPolicy for OpenWater {
    fn is_navigable(&self, _point: Position) -> bool {
        true
    }
}

/// A polygonal safe-water zone.
///
/// Coordinates are stored geo-style (`x = lng`, `y = lat`).
#[derive(Debug, Clone)]
pub struct NavigableZone {
    boundary: Polygon<f64>,
}

impl NavigableZone {
    /// Builds a zone from its vertices in order. The ring is closed
    /// automatically.
    pub fn new(vertices: &[Position]) -> Self {
        let ring: LineString<f64> = vertices
            .iter()
            .map(|p| Coord { x: p.lng, y: p.lat })
            .collect();
        Self {
            boundary: Polygon::new(ring, Vec::new()),
        }
    }

    /// The Mumbai harbour approach channel.
    pub fn harbour_channel() -> Self {
        Self::new(&[
            Position::new(18.96, 72.80),
            Position::new(18.92, 72.82),
            Position::new(18.90, 72.85),
            Position::new(18.91, 72.90),
            Position::new(18.95, 72.90),
            Position::new(18.98, 72.86),
        ])
    }

    /// The zone's boundary polygon.
    pub fn boundary(&self) -> &Polygon<f64> {
        &self.boundary
    }

    /// True if `point` lies inside the zone.
    pub fn contains(&self, point: Position) -> bool {
        ray_cast_contains(
            self.boundary.exterior(),
            Coord { x: point.lng, y: point.lat },
        )
    }
}

impl NavigabilityPolicy for NavigableZone {
    fn is_navigable(&self, point: Position) -> bool {
        self.contains(point)
    }
}

/// Even-odd ray casting test against a closed ring.
///
/// Casts a ray toward +x and counts edge crossings. Points exactly on an
/// edge may land on either side.
pub fn ray_cast_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let mut inside = false;
    for edge in ring.lines() {
        let (a, b) = (edge.start, edge.end);
        if (a.y > point.y) != (b.y > point.y) {
            let crossing_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
    }
    inside
}
