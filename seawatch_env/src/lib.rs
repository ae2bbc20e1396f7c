//! Seawatch Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the Seawatch
//! navigator to run against both a **Production** clock (tokio) and a
//! **Simulation** clock (virtual time).
//!
//! # Core Concept
//!
//! The navigator never reads time or schedules work on its own. Every
//! timestamp and every timer goes through a [`NavContext`]:
//! - Monotonic time (`now()`) for alert expiry
//! - Wall-clock time (`system_time()`) for the station-keeping drift
//! - Timers (`sleep()`, `spawn()`) for the tick loop
//!
//! # Example
//!
//! ```ignore
//! use seawatch_env::NavContext;
//!
//! async fn tick_loop<Ctx: NavContext>(ctx: &Ctx) {
//!     loop {
//!         ctx.sleep(Duration::from_millis(50)).await;
//!         navigator.tick(ctx.wall_clock()?);
//!     }
//! }
//! ```

mod context;
mod error;
mod tokio_impl;

pub use context::NavContext;
pub use error::EnvError;
pub use tokio_impl::TokioContext;
