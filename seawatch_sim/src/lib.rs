//! Seawatch Deterministic Simulation Harness
//!
//! Runs the navigator on a virtual clock so whole missions replay
//! bit-for-bit from a seed.
//!
//! # Core Principle
//!
//! All sources of non-determinism are pinned:
//! - **Time**: a virtual clock that only moves when a tick advances it,
//!   anchored to a fixed wall-clock epoch for the station-keeping drift
//! - **Randomness**: patrol routes are drawn from a ChaCha8 stream seeded
//!   from the run seed
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               ScenarioRunner                │
//! │  ┌───────────────────────────────────────┐  │
//! │  │ SimWorld                              │  │
//! │  │   SimContext (virtual clock)          │  │
//! │  │   Navigator  (policy, queue, wake)    │  │
//! │  └───────────────────────────────────────┘  │
//! │        │                      │             │
//! │  RoutePlanner           SimExport (JSON)    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use seawatch_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::SingleLeg);
//! assert!(result.passed);
//! ```

mod context;
mod exporter;
mod route;
mod runner;
mod world;
pub mod scenarios;

pub use context::SimContext;
pub use exporter::{SimEvent, SimExport, SimFrame};
pub use route::RoutePlanner;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner};
pub use world::{SimConfig, SimWorld};
