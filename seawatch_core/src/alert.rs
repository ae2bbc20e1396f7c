//! Transient hazard advisories.

use crate::geometry::Position;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message shown when a waypoint lands on land or shallow water.
pub const HAZARD_MESSAGE: &str = "NAVIGATION HAZARD: LAND / SHALLOW WATER DETECTED";

/// A self-clearing advisory raised by a rejected waypoint.
///
/// Instants are monotonic context time, not wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardAlert {
    /// User-facing message
    pub message: String,
    
    /// The rejected point
    pub position: Position,
    
    /// When the alert was raised
    pub raised_at: Duration,
    
    /// When the alert stops being shown
    pub expires_at: Duration,
}

impl HazardAlert {
    /// Raises an alert for `position` that lives for `ttl`.
    pub fn new(position: Position, raised_at: Duration, ttl: Duration) -> Self {
        Self {
            message: HAZARD_MESSAGE.to_string(),
            position,
            raised_at,
            expires_at: raised_at + ttl,
        }
    }
    
    /// True once `now` has reached the expiry instant.
    pub fn is_expired(&self, now: Duration) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_alert_expiry() {
        let alert = HazardAlert::new(
            Position::new(19.1, 72.7),
            Duration::from_secs(10),
            Duration::from_secs(3),
        );
        
        assert!(!alert.is_expired(Duration::from_secs(10)));
        assert!(!alert.is_expired(Duration::from_millis(12_999)));
        assert!(alert.is_expired(Duration::from_secs(13)));
        assert_eq!(alert.message, HAZARD_MESSAGE);
    }
}
