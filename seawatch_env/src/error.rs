//! Error types for the Seawatch environment abstraction.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur in the environment abstraction layer.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The wall clock reads earlier than the Unix epoch
    #[error("Clock error: system time is {0:?} before the Unix epoch")]
    ClockBeforeEpoch(Duration),
}

impl EnvError {
    /// Creates a clock error.
    pub fn clock(behind: Duration) -> Self {
        Self::ClockBeforeEpoch(behind)
    }
}
