//! Navigator configuration.
//!
//! Every tuning constant of the motion model lives here so scenarios and
//! the CLI can override them from JSON.

use crate::error::NavError;
use crate::geometry::Position;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a navigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Initial position and anchor (default: Mumbai harbour)
    pub home: Position,
    
    /// Initial heading in degrees (default: 45, NE)
    pub initial_heading_deg: f64,
    
    /// Fixed simulation step in milliseconds (default: 50)
    pub tick_interval_ms: u64,
    
    /// Distance below which the vessel snaps onto its target
    pub arrival_threshold: f64,
    
    /// Distance covered per tick while in transit
    pub step_length: f64,
    
    /// Maximum heading change per tick while in transit, degrees
    pub turn_rate_deg: f64,
    
    /// Maximum number of wake trail points
    pub wake_capacity: usize,
    
    /// Minimum spacing between consecutive wake points
    pub wake_min_spacing: f64,
    
    /// Station-keeping drift radius
    pub drift_radius: f64,
    
    /// Wall-clock milliseconds per radian of the drift pattern
    pub drift_period_ms: f64,
    
    /// Exponential smoothing factor for station-keeping heading
    pub heading_smoothing: f64,
    
    /// Amplitude of the station-keeping heading oscillation, degrees
    pub drift_heading_swing_deg: f64,
    
    /// Nautical miles per degree of travel
    pub nm_per_degree: f64,
    
    /// Extra scalar applied on top of `nm_per_degree`
    pub distance_scale: f64,
    
    /// Fuel burn in liters per nautical mile
    pub fuel_liters_per_nm: f64,
    
    /// How long a hazard alert stays visible, milliseconds
    pub alert_duration_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            home: Position::new(18.94, 72.83),
            initial_heading_deg: 45.0,
            tick_interval_ms: 50,
            arrival_threshold: 0.0005,
            step_length: 0.0002,
            turn_rate_deg: 3.0,
            wake_capacity: 150,
            wake_min_spacing: 0.0001,
            drift_radius: 0.0002,
            drift_period_ms: 2000.0,
            heading_smoothing: 0.05,
            drift_heading_swing_deg: 15.0,
            nm_per_degree: 60.0,
            distance_scale: 1.5,
            fuel_liters_per_nm: 15.2,
            alert_duration_ms: 3000,
        }
    }
}

impl NavConfig {
    /// Parses a (possibly partial) JSON override and validates it.
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let config: NavConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
    
    /// Sets the home position.
    pub fn with_home(mut self, home: Position) -> Self {
        self.home = home;
        self
    }
    
    /// Sets the tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = interval.as_millis() as u64;
        self
    }
    
    /// Sets the per-tick step length.
    pub fn with_step_length(mut self, step: f64) -> Self {
        self.step_length = step;
        self
    }
    
    /// Sets the wake trail capacity.
    pub fn with_wake_capacity(mut self, capacity: usize) -> Self {
        self.wake_capacity = capacity;
        self
    }
    
    /// Fixed simulation step.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
    
    /// Hazard alert lifetime.
    pub fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert_duration_ms)
    }
    
    /// Checks that the motion model is well-formed.
    ///
    /// The step must not exceed the arrival threshold, otherwise the vessel
    /// can jump over the capture circle and orbit its target.
    pub fn validate(&self) -> Result<(), NavError> {
        if self.tick_interval_ms == 0 {
            return Err(NavError::invalid_config("tick_interval_ms must be positive"));
        }
        if !(self.arrival_threshold > 0.0) {
            return Err(NavError::invalid_config("arrival_threshold must be positive"));
        }
        if !(self.step_length > 0.0) {
            return Err(NavError::invalid_config("step_length must be positive"));
        }
        if self.step_length > self.arrival_threshold {
            return Err(NavError::invalid_config(format!(
                "step_length {} exceeds arrival_threshold {}",
                self.step_length, self.arrival_threshold
            )));
        }
        if !(self.turn_rate_deg > 0.0) {
            return Err(NavError::invalid_config("turn_rate_deg must be positive"));
        }
        if self.wake_capacity == 0 {
            return Err(NavError::invalid_config("wake_capacity must be positive"));
        }
        if !(self.drift_period_ms > 0.0) {
            return Err(NavError::invalid_config("drift_period_ms must be positive"));
        }
        if !(0.0..=1.0).contains(&self.heading_smoothing) {
            return Err(NavError::invalid_config("heading_smoothing must be within [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_default_config_is_valid() {
        let config = NavConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.alert_duration(), Duration::from_secs(3));
    }
    
    #[test]
    fn test_partial_json_override() {
        let config = NavConfig::from_json(r#"{ "wake_capacity": 20, "home": { "lat": 1.0, "lng": 2.0 } }"#)
            .unwrap();
        
        assert_eq!(config.wake_capacity, 20);
        assert_eq!(config.home, Position::new(1.0, 2.0));
        // Untouched fields keep their defaults
        assert_eq!(config.tick_interval_ms, 50);
    }
    
    #[test]
    fn test_rejects_overshooting_step() {
        let config = NavConfig::default().with_step_length(0.001);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig(_)));
    }
    
    #[test]
    fn test_from_json_validates_values() {
        let err = NavConfig::from_json(r#"{ "arrival_threshold": 0.0 }"#).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig(_)));
    }
    
    #[test]
    fn test_rejects_malformed_json() {
        let err = NavConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, NavError::ConfigParse(_)));
    }
}
