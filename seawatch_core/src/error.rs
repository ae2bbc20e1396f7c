//! Error types for the navigation engine.

use crate::geometry::Position;
use thiserror::Error;

/// Errors surfaced by the navigator and its configuration.
#[derive(Debug, Error)]
pub enum NavError {
    /// The navigability policy refused a waypoint (land or shallow water)
    #[error("Navigation hazard at {0}: land or shallow water detected")]
    HazardRejected(Position),
    
    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    
    /// Configuration JSON could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl NavError {
    /// Creates an invalid-configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
    
    /// True for the advisory hazard rejection, which never mutates state.
    pub fn is_hazard(&self) -> bool {
        matches!(self, Self::HazardRejected(_))
    }
}
