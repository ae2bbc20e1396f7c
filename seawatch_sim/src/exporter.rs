//! JSON exporter for track replay.
//!
//! Exports sampled navigator snapshots so a run can be plotted offline.

use seawatch_core::{MissionStats, NavSnapshot, Position};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// A single sampled frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimFrame {
    /// Simulation time in seconds
    pub time_sec: f64,
    
    /// Tick number
    pub tick: u64,
    
    pub position: Position,
    
    pub heading_deg: f64,
    
    /// "transit" or "station"
    pub mode: String,
    
    /// Wake trail length at this frame
    pub wake_len: usize,
    
    /// Waypoints still queued
    pub pending: usize,
    
    /// Events since the previous frame (arrivals, alerts, ...)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<SimEvent>,
}

impl SimFrame {
    /// Builds a frame from a navigator snapshot.
    pub fn from_snapshot(time_sec: f64, snapshot: &NavSnapshot, events: Vec<SimEvent>) -> Self {
        Self {
            time_sec,
            tick: snapshot.tick,
            position: snapshot.position,
            heading_deg: snapshot.heading_deg,
            mode: snapshot.mode.as_str().to_string(),
            wake_len: snapshot.wake_trail.len(),
            pending: snapshot.pending_waypoints.len(),
            events,
        }
    }
}

/// Simulation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl SimEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: None,
        }
    }
    
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: Some("warn".to_string()),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,
    
    /// Seed used
    pub seed: u64,
    
    /// Duration in seconds
    pub duration_sec: f64,
    
    /// All frames
    pub frames: Vec<SimFrame>,
    
    /// Final results
    pub passed: bool,
    
    /// Mission stats if the run completed a mission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_stats: Option<MissionStats>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            duration_sec: 0.0,
            frames: Vec::new(),
            passed: false,
            mission_stats: None,
        }
    }
    
    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.duration_sec = frame.time_sec;
        self.frames.push(frame);
    }
    
    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool, stats: Option<MissionStats>) {
        self.passed = passed;
        self.mission_stats = stats;
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seawatch_core::Navigator;
    use std::time::Duration;
    
    #[test]
    fn test_frame_from_snapshot() {
        let nav = Navigator::default();
        let frame = SimFrame::from_snapshot(1.5, &nav.snapshot(Duration::ZERO), vec![SimEvent::info("start")]);
        
        assert_eq!(frame.mode, "station");
        assert_eq!(frame.wake_len, 1);
        assert_eq!(frame.pending, 0);
        
        let mut export = SimExport::new("single_leg", 42);
        export.add_frame(frame);
        assert_eq!(export.duration_sec, 1.5);
        
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["frames"][0]["events"][0]["message"], "start");
        assert!(json.get("mission_stats").is_none());
    }
}
