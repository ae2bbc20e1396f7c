//! Core environment context trait for Seawatch navigators.

use crate::error::EnvError;
use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

/// The central interface for Environment Interaction.
///
/// This trait abstracts the "real world" so that the navigation engine can
/// run against both a production clock (tokio) and a virtual clock
/// (simulation harness).
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`
/// - **Simulation**: `SimContext` - manually advanced virtual clock
#[async_trait]
pub trait NavContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// Used for alert expiry and duration measurements.
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;
    
    /// Returns the wall-clock time.
    ///
    /// Drives the station-keeping drift pattern.
    /// In simulation, this is derived from virtual clock + epoch offset.
    fn system_time(&self) -> SystemTime;
    
    /// Returns the wall-clock time as a duration since the Unix epoch.
    fn wall_clock(&self) -> Result<Duration, EnvError> {
        self.system_time()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| EnvError::clock(e.duration()))
    }
    
    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);
    
    /// Spawns a background task and returns its handle so the caller can
    /// cancel it.
    fn spawn<F>(&self, name: &str, future: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static;
}
