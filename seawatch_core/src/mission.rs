//! Mission analytics derived from the full path history.

use crate::config::NavConfig;
use crate::geometry::Position;
use serde::{Deserialize, Serialize};

/// Statistics for one completed mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionStats {
    /// Distance travelled in nautical miles
    pub distance_nm: f64,
    
    /// Estimated fuel burn in liters
    pub fuel_liters: f64,
    
    /// Mission duration in minutes (tick count × tick interval)
    pub duration_minutes: f64,
    
    /// Number of history samples the stats were derived from
    pub samples: usize,
}

impl MissionStats {
    /// Computes stats from the ordered positions visited during a mission.
    pub fn from_track(track: &[Position], config: &NavConfig) -> Self {
        let distance_nm = path_length(track) * config.nm_per_degree * config.distance_scale;
        let tick_secs = config.tick_interval().as_secs_f64();
        
        Self {
            distance_nm,
            fuel_liters: distance_nm * config.fuel_liters_per_nm,
            duration_minutes: track.len() as f64 * tick_secs / 60.0,
            samples: track.len(),
        }
    }
    
    /// Distance rounded for display, e.g. `"1.91 NM"`.
    pub fn distance_label(&self) -> String {
        format!("{:.2} NM", self.distance_nm)
    }
    
    /// Fuel rounded for display, e.g. `"29.0 L"`.
    pub fn fuel_label(&self) -> String {
        format!("{:.1} L", self.fuel_liters)
    }
    
    /// Duration for display, e.g. `"0.1m"`.
    pub fn duration_label(&self) -> String {
        format!("{:.1}m", self.duration_minutes)
    }
}

/// Sum of Euclidean distances between consecutive points.
pub fn path_length(points: &[Position]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_path_length() {
        let track = [
            Position::new(0.0, 0.0),
            Position::new(0.0, 0.003),
            Position::new(0.004, 0.003),
        ];
        assert_relative_eq!(path_length(&track), 0.007, epsilon = 1e-12);
        assert_eq!(path_length(&track[..1]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }
    
    #[test]
    fn test_stats_formulas() {
        let config = NavConfig::default();
        let track: Vec<Position> = (0..=100)
            .map(|i| Position::new(18.94 + i as f64 * 0.0001, 72.83))
            .collect();
        
        let stats = MissionStats::from_track(&track, &config);
        
        // 0.01 degrees * 60 * 1.5
        assert_relative_eq!(stats.distance_nm, 0.9, epsilon = 1e-9);
        assert_relative_eq!(stats.fuel_liters, 0.9 * 15.2, epsilon = 1e-9);
        // 101 samples * 50 ms
        assert_relative_eq!(stats.duration_minutes, 101.0 * 0.05 / 60.0, epsilon = 1e-12);
        assert_eq!(stats.samples, 101);
    }
    
    #[test]
    fn test_labels() {
        let stats = MissionStats {
            distance_nm: 1.914,
            fuel_liters: 29.0928,
            duration_minutes: 0.0583,
            samples: 70,
        };
        
        assert_eq!(stats.distance_label(), "1.91 NM");
        assert_eq!(stats.fuel_label(), "29.1 L");
        assert_eq!(stats.duration_label(), "0.1m");
    }
}
