//! Seawatch Core - Waypoint Navigation Simulation Engine
//!
//! Simulates a single patrol vessel for a maritime-surveillance dashboard:
//! 1. **Transit**: steer toward queued waypoints at a fixed step with a
//!    bounded turn rate
//! 2. **Station-keeping**: figure-eight drift around the last anchor while
//!    the wake trail dissipates
//! 3. **Analytics**: distance, fuel and duration once the queue drains
//!
//! The [`Navigator`] is a pure state machine; [`NavigatorRuntime`] drives it
//! from a `seawatch_env::NavContext` clock.

pub mod alert;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mission;
pub mod navigability;
pub mod navigator;
pub mod runtime;
pub mod snapshot;

// Re-export key types for convenience
pub use alert::HazardAlert;
pub use config::NavConfig;
pub use error::NavError;
pub use geometry::{CompassPoint, Position};
pub use mission::MissionStats;
pub use navigability::{NavigabilityPolicy, NavigableZone, OpenWater};
pub use navigator::{Mode, Navigator, TickOutcome, Waypoint, WaypointId};
pub use runtime::NavigatorRuntime;
pub use snapshot::NavSnapshot;
