//! Read-only view of the navigator published to presentation layers.

use crate::geometry::{CompassPoint, Position};
use crate::mission::MissionStats;
use crate::navigator::{Mode, Waypoint};
use serde::{Deserialize, Serialize};

/// Whole-tick copy of the navigator's observable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSnapshot {
    /// Ticks applied so far
    pub tick: u64,
    
    pub position: Position,
    
    /// Heading in degrees, `[0, 360)`
    pub heading_deg: f64,
    
    pub compass: CompassPoint,
    
    pub mode: Mode,
    
    pub tracking: bool,
    
    /// Oldest first
    pub wake_trail: Vec<Position>,
    
    /// Visit order
    pub pending_waypoints: Vec<Waypoint>,
    
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_target: Option<Waypoint>,
    
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_stats: Option<MissionStats>,
    
    /// Message of the live hazard alert, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hazard_alert: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::navigator::Navigator;
    use std::time::Duration;
    
    #[test]
    fn test_snapshot_serializes_for_export() {
        let mut nav = Navigator::default();
        nav.enqueue_waypoint((18.95, 72.84).into(), Duration::ZERO).unwrap();
        
        let json = serde_json::to_value(nav.snapshot(Duration::ZERO)).unwrap();
        
        assert_eq!(json["mode"], "station");
        assert_eq!(json["compass"], "NE");
        assert_eq!(json["pending_waypoints"].as_array().unwrap().len(), 1);
        assert!(json.get("active_target").is_none());
        assert!(json.get("hazard_alert").is_none());
    }
}
