//! Navigator Runtime - drives a [`Navigator`] from an environment clock.
//!
//! This module is the integration layer between the pure state machine and
//! the environment abstraction (`NavContext`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     NavigatorRuntime                        │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Context: NavContext                     │   │
//! │  │  • sleep() → tick interval                           │   │
//! │  │  • system_time() → station-keeping drift             │   │
//! │  │  • now() → hazard alert expiry                       │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                              │                              │
//! │  ┌──────────────┐   ┌────────▼────────┐   ┌──────────────┐  │
//! │  │ commands     │──►│ Mutex<Navigator>│──►│ watch<Snap>  │  │
//! │  │ (sync)       │   │ tick() per 50ms │   │ subscribers  │  │
//! │  └──────────────┘   └─────────────────┘   └──────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one tick task is live. It is spawned by a successful
//! `start_mission`, exits on its own once the navigator stops tracking, and
//! is aborted by `abort_mission` or when the runtime is dropped.
//!
//! # Usage
//!
//! ```ignore
//! use seawatch_core::{Navigator, NavigatorRuntime};
//! use seawatch_env::TokioContext;
//!
//! let runtime = NavigatorRuntime::new(TokioContext::shared(), Navigator::default());
//! let mut updates = runtime.subscribe();
//!
//! runtime.enqueue_waypoint((18.95, 72.84).into())?;
//! runtime.start_mission();
//!
//! while updates.changed().await.is_ok() {
//!     render(&updates.borrow());
//! }
//! ```

use crate::error::NavError;
use crate::geometry::Position;
use crate::navigator::{Navigator, Waypoint, WaypointId};
use crate::snapshot::NavSnapshot;

use seawatch_env::NavContext;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Owns a navigator and its tick timer.
pub struct NavigatorRuntime<Ctx: NavContext> {
    /// Environment context
    context: Arc<Ctx>,

    /// The simulator; `tick()` runs entirely under this lock
    navigator: Arc<Mutex<Navigator>>,

    /// Latest snapshot, republished after every mutation
    snapshots: Arc<watch::Sender<NavSnapshot>>,

    /// The live tick task, if any
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl<Ctx: NavContext> NavigatorRuntime<Ctx> {
    /// Wraps a navigator. No timer runs until `start_mission`.
    pub fn new(context: Arc<Ctx>, navigator: Navigator) -> Self {
        let initial = navigator.snapshot(context.now());
        let (tx, _rx) = watch::channel(initial);

        Self {
            context,
            navigator: Arc::new(Mutex::new(navigator)),
            snapshots: Arc::new(tx),
            ticker: Mutex::new(None),
        }
    }

    /// Queues a waypoint (map click).
    ///
    /// A rejected point raises a hazard alert and schedules its removal
    /// after the alert duration, independently of the tick timer.
    pub fn enqueue_waypoint(&self, point: Position) -> Result<WaypointId, NavError> {
        let now = self.context.now();
        let mut nav = lock(&self.navigator);
        let result = nav.enqueue_waypoint(point, now);
        let alert_ttl = nav.config().alert_duration();
        self.publish(&nav);
        drop(nav);

        if let Err(NavError::HazardRejected(_)) = &result {
            self.schedule_alert_expiry(alert_ttl);
        }
        result
    }

    /// Starts the mission (start button). Returns false if the navigator
    /// refused (empty queue or already tracking).
    pub fn start_mission(&self) -> bool {
        let started = {
            let mut nav = lock(&self.navigator);
            let started = nav.start_mission();
            self.publish(&nav);
            started
        };

        if started {
            self.spawn_ticker();
        }
        started
    }

    /// Pauses the mission (tracking toggle) and stops the timer. Pending
    /// work is kept for `resume_mission`.
    pub fn pause_mission(&self) -> bool {
        let paused = {
            let mut nav = lock(&self.navigator);
            let paused = nav.pause_mission();
            self.publish(&nav);
            paused
        };

        if paused {
            self.stop_ticker();
        }
        paused
    }

    /// Resumes a paused mission on a fresh timer.
    pub fn resume_mission(&self) -> bool {
        let resumed = {
            let mut nav = lock(&self.navigator);
            let resumed = nav.resume_mission();
            self.publish(&nav);
            resumed
        };

        if resumed {
            self.spawn_ticker();
        }
        resumed
    }

    /// Aborts the mission (abort button) and stops the timer.
    pub fn abort_mission(&self) {
        {
            let mut nav = lock(&self.navigator);
            nav.abort_mission();
            self.publish(&nav);
        }
        self.stop_ticker();
    }

    /// Removes a pending waypoint by index.
    pub fn remove_waypoint(&self, index: usize) -> Option<Waypoint> {
        let mut nav = lock(&self.navigator);
        let removed = nav.remove_waypoint(index);
        self.publish(&nav);
        removed
    }

    /// Clears the mission stats.
    pub fn dismiss_stats(&self) {
        let mut nav = lock(&self.navigator);
        nav.dismiss_stats();
        self.publish(&nav);
    }

    /// Current state.
    pub fn snapshot(&self) -> NavSnapshot {
        lock(&self.navigator).snapshot(self.context.now())
    }

    /// Subscribes to per-tick snapshots.
    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.snapshots.subscribe()
    }

    /// True while a tick task is live.
    pub fn is_ticking(&self) -> bool {
        lock(&self.ticker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn publish(&self, nav: &Navigator) {
        self.snapshots.send_replace(nav.snapshot(self.context.now()));
    }

    /// Replaces any previous tick task with a fresh one.
    ///
    /// Only called after a successful start or resume, which means
    /// the navigator was not tracking, so an old task is either finished or
    /// about to exit. Aborting it keeps exactly one timer live.
    fn spawn_ticker(&self) {
        let context = Arc::clone(&self.context);
        let navigator = Arc::clone(&self.navigator);
        let snapshots = Arc::clone(&self.snapshots);

        let handle = self.context.spawn("nav-ticker", async move {
            run_ticker(context, navigator, snapshots).await;
        });

        if let Some(previous) = lock(&self.ticker).replace(handle) {
            previous.abort();
        }
    }

    fn stop_ticker(&self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
            debug!("Tick timer stopped");
        }
    }

    fn schedule_alert_expiry(&self, ttl: std::time::Duration) {
        let context = Arc::clone(&self.context);
        let navigator = Arc::clone(&self.navigator);
        let snapshots = Arc::clone(&self.snapshots);

        // Detached: an expiry task outliving a newer alert finds it
        // unexpired and leaves it alone.
        let _ = self.context.spawn("hazard-alert-expiry", async move {
            context.sleep(ttl).await;
            let mut nav = lock(&navigator);
            if nav.clear_expired_alert(context.now()) {
                snapshots.send_replace(nav.snapshot(context.now()));
                debug!("Hazard alert cleared");
            }
        });
    }
}

impl<Ctx: NavContext> Drop for NavigatorRuntime<Ctx> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// Periodic tick loop. Exits once the navigator stops tracking.
async fn run_ticker<Ctx: NavContext>(
    context: Arc<Ctx>,
    navigator: Arc<Mutex<Navigator>>,
    snapshots: Arc<watch::Sender<NavSnapshot>>,
) {
    let interval = lock(&navigator).config().tick_interval();
    debug!("Tick timer started ({:?})", interval);

    loop {
        context.sleep(interval).await;

        let wall_clock = match context.wall_clock() {
            Ok(wall_clock) => wall_clock,
            Err(e) => {
                error!("Tick timer stopped: {}", e);
                return;
            }
        };

        let tracking = {
            let mut nav = lock(&navigator);
            nav.tick(wall_clock);
            snapshots.send_replace(nav.snapshot(context.now()));
            nav.is_tracking()
        };

        if !tracking {
            debug!("Tick timer finished");
            return;
        }
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
