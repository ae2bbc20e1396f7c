//! The navigation state machine.
//!
//! A [`Navigator`] owns everything about the simulated vessel: position,
//! heading, the waypoint queue, the wake trail and the mission history.
//! [`Navigator::tick`] is the single transition function; commands
//! (`enqueue_waypoint`, `start_mission`, ...) are synchronous and are
//! observed by the next tick.
//!
//! # Tick
//!
//! ```text
//!            ┌──────────── active target? ────────────┐
//!            │ yes                                 no │
//!   ┌────────▼─────────┐                    ┌─────────▼────────┐
//!   │ TRANSIT          │                    │ STATION          │
//!   │ step / snap      │                    │ figure-8 drift   │
//!   │ bounded turn     │                    │ heading easing   │
//!   │ wake + history   │                    │ wake decays      │
//!   └────────┬─────────┘                    └─────────┬────────┘
//!            └──────────► pop queue head ◄────────────┘
//!                              │
//!                 queue drained & tracking → mission stats
//! ```

use crate::alert::HazardAlert;
use crate::config::NavConfig;
use crate::error::NavError;
use crate::geometry::{bearing, normalize_heading, turn_toward, CompassPoint, Position};
use crate::mission::MissionStats;
use crate::navigability::{NavigabilityPolicy, OpenWater};
use crate::snapshot::NavSnapshot;

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::{Builder, Uuid};

/// Identifier of a queued waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub Uuid);

impl WaypointId {
    /// Creates a deterministic version-4 id from a sequence number.
    ///
    /// The sequence sits in the low bytes, below the variant bits, so ids
    /// stay distinct for any realistic sequence.
    pub fn from_seq(seq: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seq.wrapping_mul(0x517cc1b727220a95).to_be_bytes());
        bytes[8..16].copy_from_slice(&seq.to_be_bytes());
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A requested destination. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: Position,
}

/// Motion mode, derived from whether a target is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Steering toward the active target
    Transit,
    /// Holding near the anchor
    Station,
}

impl Mode {
    /// Wire name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Transit => "transit",
            Mode::Station => "station",
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    /// False if the navigator was not tracking and the tick was a no-op
    pub advanced: bool,

    /// Target reached this tick
    pub arrived: Option<Waypoint>,

    /// Waypoint promoted from the queue this tick
    pub activated: Option<Waypoint>,

    /// Stats of the mission that completed this tick
    pub completed: Option<MissionStats>,
}

/// The vessel navigation simulator.
pub struct Navigator {
    config: NavConfig,
    policy: Box<dyn NavigabilityPolicy>,

    position: Position,
    heading: f64,
    anchor: Position,

    active_target: Option<Waypoint>,
    queue: VecDeque<Waypoint>,

    /// Rendering-only recent positions, bounded by `wake_capacity`
    wake: VecDeque<Position>,

    /// Every position visited this mission, for analytics
    history: Vec<Position>,

    stats: Option<MissionStats>,
    tracking: bool,
    alert: Option<HazardAlert>,

    issued_waypoints: u64,
    tick_count: u64,
}

impl Navigator {
    /// Creates a navigator at `config.home` that accepts every waypoint.
    ///
    /// Fails with `NavError::InvalidConfig` if `config` does not validate.
    pub fn new(config: NavConfig) -> Result<Self, NavError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: NavConfig) -> Self {
        let home = config.home;
        let mut wake = VecDeque::with_capacity(config.wake_capacity);
        wake.push_back(home);

        Self {
            heading: normalize_heading(config.initial_heading_deg),
            config,
            policy: Box::new(OpenWater),
            position: home,
            anchor: home,
            active_target: None,
            queue: VecDeque::new(),
            wake,
            history: Vec::new(),
            stats: None,
            tracking: false,
            alert: None,
            issued_waypoints: 0,
            tick_count: 0,
        }
    }

    /// Replaces the navigability policy.
    pub fn with_policy(mut self, policy: impl NavigabilityPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    // ── Commands ──────────────────────────────────────────────────────

    /// Queues a waypoint if the navigability policy accepts it.
    ///
    /// Does not start tracking. On rejection a hazard alert is raised that
    /// expires `alert_duration` after `now`, and the queue is left alone.
    pub fn enqueue_waypoint(&mut self, point: Position, now: Duration) -> Result<WaypointId, NavError> {
        if !self.policy.is_navigable(point) {
            warn!("Rejected waypoint {}: not navigable", point);
            self.alert = Some(HazardAlert::new(point, now, self.config.alert_duration()));
            return Err(NavError::HazardRejected(point));
        }

        let id = WaypointId::from_seq(self.issued_waypoints);
        self.issued_waypoints += 1;
        self.queue.push_back(Waypoint { id, position: point });
        self.alert = None;

        debug!("Queued waypoint {} at {} ({} pending)", id, point, self.queue.len());
        Ok(id)
    }

    /// Starts tracking. Returns false (no-op) if the queue is empty or a
    /// mission is already running.
    pub fn start_mission(&mut self) -> bool {
        if self.tracking || self.queue.is_empty() {
            return false;
        }

        self.tracking = true;
        self.stats = None;
        info!("Mission started with {} waypoints", self.queue.len());
        true
    }

    /// Suspends ticking mid-mission. Queue, active target and history are
    /// kept. Returns false if no mission is running.
    pub fn pause_mission(&mut self) -> bool {
        if !self.tracking {
            return false;
        }

        self.tracking = false;
        info!("Mission paused at {} ({} pending)", self.position, self.queue.len());
        true
    }

    /// Continues a paused mission. Unlike `start_mission` this only needs
    /// outstanding work, which may be just the active target. Returns false
    /// if already tracking or there is nothing to steer toward.
    pub fn resume_mission(&mut self) -> bool {
        if self.tracking || (self.active_target.is_none() && self.queue.is_empty()) {
            return false;
        }

        self.tracking = true;
        self.stats = None;
        info!("Mission resumed at {}", self.position);
        true
    }

    /// Stops the mission and drops all pending work. Position is kept.
    pub fn abort_mission(&mut self) {
        if self.tracking || self.active_target.is_some() || !self.queue.is_empty() {
            info!("Mission aborted at {}", self.position);
        }

        self.queue.clear();
        self.active_target = None;
        self.stats = None;
        self.history.clear();
        self.tracking = false;
    }

    /// Removes a pending (not active) waypoint by queue index.
    pub fn remove_waypoint(&mut self, index: usize) -> Option<Waypoint> {
        let removed = self.queue.remove(index);
        if let Some(waypoint) = &removed {
            debug!("Removed waypoint {} ({} pending)", waypoint.id, self.queue.len());
        }
        removed
    }

    /// Clears the mission stats only.
    pub fn dismiss_stats(&mut self) {
        self.stats = None;
    }

    /// Drops the hazard alert if it has expired. Returns true if it did.
    pub fn clear_expired_alert(&mut self, now: Duration) -> bool {
        match &self.alert {
            Some(alert) if alert.is_expired(now) => {
                self.alert = None;
                true
            }
            _ => false,
        }
    }

    // ── Simulation ────────────────────────────────────────────────────

    /// Advances the simulation by one fixed step.
    ///
    /// `wall_clock` is the time since the Unix epoch and only drives the
    /// station-keeping drift. No-op while not tracking.
    pub fn tick(&mut self, wall_clock: Duration) -> TickOutcome {
        if !self.tracking {
            return TickOutcome::default();
        }

        let mut outcome = TickOutcome {
            advanced: true,
            ..Default::default()
        };

        match self.active_target {
            Some(target) => outcome.arrived = self.steer(target),
            None => self.station_keep(wall_clock),
        }

        if self.active_target.is_none() {
            if let Some(next) = self.queue.pop_front() {
                debug!("Heading for waypoint {} at {}", next.id, next.position);
                self.active_target = Some(next);
                outcome.activated = Some(next);
            }
        }

        if self.active_target.is_none() && self.queue.is_empty() && self.tracking {
            let stats = MissionStats::from_track(&self.history, &self.config);
            info!(
                "Mission complete: {} / {} / {}",
                stats.distance_label(),
                stats.fuel_label(),
                stats.duration_label()
            );
            self.stats = Some(stats);
            self.tracking = false;
            self.history.clear();
            outcome.completed = Some(stats);
        }

        self.tick_count += 1;
        outcome
    }

    /// Applies one station-keeping step without the tracking gate.
    ///
    /// Lets a presentation layer animate an idle vessel. Returns false and
    /// does nothing while a target is active.
    pub fn hold_station(&mut self, wall_clock: Duration) -> bool {
        if self.active_target.is_some() {
            return false;
        }
        self.station_keep(wall_clock);
        true
    }

    /// Transit step. Returns the target on arrival.
    fn steer(&mut self, target: Waypoint) -> Option<Waypoint> {
        let offset = target.position.to_vector() - self.position.to_vector();
        let distance = offset.norm();

        if distance < self.config.arrival_threshold {
            self.position = target.position;
            self.anchor = target.position;
            self.active_target = None;
            self.record_track();
            debug!("Arrived at waypoint {} ({})", target.id, target.position);
            return Some(target);
        }

        let step = offset * (self.config.step_length / distance);
        self.position = Position::from_vector(self.position.to_vector() + step);
        self.heading = turn_toward(self.heading, bearing(&offset), self.config.turn_rate_deg);
        self.record_track();
        None
    }

    /// Figure-eight drift around the anchor; the wake dissipates.
    fn station_keep(&mut self, wall_clock: Duration) {
        let t = wall_clock.as_secs_f64() * 1000.0 / self.config.drift_period_ms;
        let radius = self.config.drift_radius;

        self.position = Position::new(
            self.anchor.lat + t.sin() * radius * 0.5,
            self.anchor.lng + (2.0 * t).sin() * radius,
        );

        let drift_heading = self.heading + t.cos() * self.config.drift_heading_swing_deg;
        self.heading = normalize_heading(
            self.heading + (drift_heading - self.heading) * self.config.heading_smoothing,
        );

        self.wake.pop_front();
    }

    /// Appends the current position to the wake (deduplicated, bounded)
    /// and to the mission history (always).
    fn record_track(&mut self) {
        let spaced = self
            .wake
            .back()
            .map_or(true, |last| last.distance_to(&self.position) > self.config.wake_min_spacing);

        if spaced {
            self.wake.push_back(self.position);
            while self.wake.len() > self.config.wake_capacity {
                self.wake.pop_front();
            }
        }

        self.history.push(self.position);
    }

    // ── State surface ─────────────────────────────────────────────────

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Heading in degrees, within `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn compass(&self) -> CompassPoint {
        CompassPoint::from_heading(self.heading)
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn mode(&self) -> Mode {
        if self.active_target.is_some() {
            Mode::Transit
        } else {
            Mode::Station
        }
    }

    pub fn active_target(&self) -> Option<Waypoint> {
        self.active_target
    }

    pub fn pending_waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.queue.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn wake_trail(&self) -> impl Iterator<Item = &Position> {
        self.wake.iter()
    }

    pub fn wake_len(&self) -> usize {
        self.wake.len()
    }

    /// Number of samples in the current mission's path history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn mission_stats(&self) -> Option<MissionStats> {
        self.stats
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// The hazard alert, unless it has expired by `now`.
    pub fn hazard_alert(&self, now: Duration) -> Option<&HazardAlert> {
        self.alert.as_ref().filter(|alert| !alert.is_expired(now))
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Copies the whole observable state. `now` is monotonic time, used to
    /// hide expired alerts.
    pub fn snapshot(&self, now: Duration) -> NavSnapshot {
        NavSnapshot {
            tick: self.tick_count,
            position: self.position,
            heading_deg: self.heading,
            compass: self.compass(),
            mode: self.mode(),
            tracking: self.tracking,
            wake_trail: self.wake.iter().copied().collect(),
            pending_waypoints: self.queue.iter().copied().collect(),
            active_target: self.active_target,
            mission_stats: self.stats,
            hazard_alert: self.hazard_alert(now).map(|alert| alert.message.clone()),
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::from_valid(NavConfig::default())
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("position", &self.position)
            .field("heading", &self.heading)
            .field("mode", &self.mode())
            .field("pending", &self.queue.len())
            .field("tracking", &self.tracking)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shortest_turn;
    use crate::navigability::NavigableZone;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const T0: Duration = Duration::from_secs(1_704_067_200);

    fn wall(tick: u64) -> Duration {
        T0 + Duration::from_millis(50 * tick)
    }

    /// Ticks until the mission completes. Returns the tick count.
    fn run_to_completion(nav: &mut Navigator, limit: u64) -> u64 {
        let mut ticks = 0;
        while nav.is_tracking() && ticks < limit {
            nav.tick(wall(ticks));
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_single_leg_mission() {
        let mut nav = Navigator::default();
        let target = Position::new(18.95, 72.84);

        nav.enqueue_waypoint(target, Duration::ZERO).unwrap();
        assert!(!nav.is_tracking(), "enqueue must not auto-start");
        assert!(nav.start_mission());

        let ticks = run_to_completion(&mut nav, 10_000);
        assert!(ticks < 10_000);

        assert_eq!(nav.position(), target);
        assert_eq!(nav.anchor(), target);
        assert!(nav.active_target().is_none());
        assert!(!nav.is_tracking());
        assert_eq!(nav.history_len(), 0);

        let stats = nav.mission_stats().unwrap();
        assert!(stats.distance_nm > 0.0);
        assert!(stats.fuel_liters > 0.0);
        assert!(stats.duration_minutes > 0.0);
    }

    #[test]
    fn test_transit_steps_exactly_step_length() {
        let mut nav = Navigator::default();
        let target = Position::new(18.95, 72.84);
        nav.enqueue_waypoint(target, Duration::ZERO).unwrap();
        nav.start_mission();

        // First tick: station step, then the waypoint is activated
        let outcome = nav.tick(wall(0));
        assert_eq!(outcome.activated.map(|w| w.position), Some(target));
        assert_eq!(nav.mode(), Mode::Transit);

        for i in 1..40 {
            let before = nav.position().distance_to(&target);
            assert!(before >= 0.0005);
            nav.tick(wall(i));
            let after = nav.position().distance_to(&target);
            assert_relative_eq!(before - after, 0.0002, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_arrival_snaps_without_overshoot() {
        let config = NavConfig::default();
        let home = config.home;
        let mut nav = Navigator::new(config).unwrap();

        // Inside the capture circle from the start
        let target = Position::new(home.lat + 0.0003, home.lng);
        nav.enqueue_waypoint(target, Duration::ZERO).unwrap();
        nav.start_mission();

        nav.tick(wall(0)); // activates
        let outcome = nav.tick(wall(1));

        assert_eq!(outcome.arrived.map(|w| w.position), Some(target));
        assert_eq!(nav.position(), target);
        assert!(outcome.completed.is_some());
    }

    #[test]
    fn test_heading_turn_rate_bounded() {
        let mut nav = Navigator::default();
        // Due south-west of home: needs a long turn from the initial 45°
        nav.enqueue_waypoint(Position::new(18.92, 72.81), Duration::ZERO).unwrap();
        nav.start_mission();
        nav.tick(wall(0));

        let mut tick = 1;
        while nav.mode() == Mode::Transit {
            let before = nav.heading();
            nav.tick(wall(tick));
            assert!(shortest_turn(before, nav.heading()).abs() <= 3.0 + 1e-9);
            tick += 1;
        }

        // Settled near the bearing toward the target (225°), give or take
        // the drift offset picked up on the first tick
        assert!(shortest_turn(nav.heading(), 225.0).abs() < 1.0);
    }

    #[test]
    fn test_fifo_order() {
        let mut nav = Navigator::default();
        let a = nav.enqueue_waypoint(Position::new(18.942, 72.832), Duration::ZERO).unwrap();
        let b = nav.enqueue_waypoint(Position::new(18.944, 72.830), Duration::ZERO).unwrap();
        nav.start_mission();

        let mut activations = Vec::new();
        let mut arrivals = Vec::new();
        let mut tick = 0;
        while nav.is_tracking() {
            let outcome = nav.tick(wall(tick));
            if let Some(w) = outcome.arrived {
                arrivals.push(w.id);
            }
            if let Some(w) = outcome.activated {
                // B only becomes active once A has been reached
                if w.id == b {
                    assert_eq!(arrivals, vec![a]);
                }
                activations.push(w.id);
            }
            tick += 1;
        }

        assert_eq!(activations, vec![a, b]);
        assert_eq!(arrivals, vec![a, b]);
    }

    #[test]
    fn test_mission_complete_fires_once() {
        let mut nav = Navigator::default();
        nav.enqueue_waypoint(Position::new(18.941, 72.831), Duration::ZERO).unwrap();
        nav.start_mission();

        let mut completions = 0;
        for tick in 0..500 {
            let outcome = nav.tick(wall(tick));
            if outcome.completed.is_some() {
                completions += 1;
                assert_eq!(nav.history_len(), 0);
            }
        }

        assert_eq!(completions, 1);
        assert!(nav.mission_stats().is_some());
    }

    #[test]
    fn test_hazard_rejection_leaves_queue_untouched() {
        let mut nav = Navigator::default().with_policy(NavigableZone::harbour_channel());
        nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();

        let now = Duration::from_secs(100);
        let err = nav.enqueue_waypoint(Position::new(19.10, 72.70), now).unwrap_err();

        assert!(err.is_hazard());
        assert_eq!(nav.pending_count(), 1);
        assert!(!nav.is_tracking());
        assert!(nav.hazard_alert(now).is_some());
        assert!(nav.hazard_alert(now + Duration::from_millis(2999)).is_some());
        assert!(nav.hazard_alert(now + Duration::from_secs(3)).is_none());

        assert!(!nav.clear_expired_alert(now + Duration::from_secs(1)));
        assert!(nav.clear_expired_alert(now + Duration::from_secs(3)));
    }

    #[test]
    fn test_accepted_waypoint_clears_alert() {
        let mut nav = Navigator::default().with_policy(NavigableZone::harbour_channel());
        nav.enqueue_waypoint(Position::new(19.10, 72.70), Duration::ZERO).unwrap_err();
        assert!(nav.hazard_alert(Duration::ZERO).is_some());

        nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();
        assert!(nav.hazard_alert(Duration::ZERO).is_none());
    }

    #[test]
    fn test_abort_mid_transit() {
        let mut nav = Navigator::default();
        nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();
        nav.enqueue_waypoint(Position::new(18.96, 72.84), Duration::ZERO).unwrap();
        nav.start_mission();

        for tick in 0..20 {
            nav.tick(wall(tick));
        }
        assert_eq!(nav.mode(), Mode::Transit);
        let frozen = nav.position();

        nav.abort_mission();

        assert!(nav.active_target().is_none());
        assert_eq!(nav.pending_count(), 0);
        assert!(!nav.is_tracking());
        assert!(nav.mission_stats().is_none());
        assert_eq!(nav.position(), frozen);

        // Further ticks are no-ops
        let outcome = nav.tick(wall(21));
        assert!(!outcome.advanced);
        assert_eq!(nav.position(), frozen);
    }

    #[test]
    fn test_start_mission_preconditions() {
        let mut nav = Navigator::default();
        assert!(!nav.start_mission(), "empty queue must not start");

        nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();
        assert!(nav.start_mission());
        assert!(!nav.start_mission(), "second start is a no-op");
    }

    #[test]
    fn test_tick_is_noop_when_idle() {
        let mut nav = Navigator::default();
        let before = nav.snapshot(Duration::ZERO);

        let outcome = nav.tick(wall(0));

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(nav.snapshot(Duration::ZERO), before);
    }

    #[test]
    fn test_remove_waypoint() {
        let mut nav = Navigator::default();
        let a = nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();
        let b = nav.enqueue_waypoint(Position::new(18.96, 72.84), Duration::ZERO).unwrap();

        assert!(nav.remove_waypoint(5).is_none());
        assert_eq!(nav.pending_count(), 2);

        let removed = nav.remove_waypoint(0).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(nav.pending_waypoints().map(|w| w.id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = NavConfig::default();
        config.arrival_threshold = 0.0;

        let err = Navigator::new(config).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig(_)));
        assert!(Navigator::new(NavConfig::default().with_step_length(0.001)).is_err());
        assert!(Navigator::new(NavConfig::default()).is_ok());
    }

    #[test]
    fn test_pause_and_resume_mid_transit() {
        let mut nav = Navigator::default();
        let target = Position::new(18.95, 72.84);
        nav.enqueue_waypoint(target, Duration::ZERO).unwrap();
        assert!(!nav.pause_mission(), "nothing to pause yet");
        nav.start_mission();

        for tick in 0..10 {
            nav.tick(wall(tick));
        }
        assert!(nav.pause_mission());
        assert!(!nav.pause_mission());

        let frozen = nav.position();
        let history = nav.history_len();
        for tick in 10..30 {
            assert!(!nav.tick(wall(tick)).advanced);
        }
        assert_eq!(nav.position(), frozen);
        assert_eq!(nav.history_len(), history);
        assert_eq!(nav.active_target().map(|w| w.position), Some(target));

        // Only the active target is left, so start refuses but resume works
        assert_eq!(nav.pending_count(), 0);
        assert!(!nav.start_mission());
        assert!(nav.resume_mission());
        assert!(!nav.resume_mission());

        let mut completions = 0;
        let mut tick = 30;
        while nav.is_tracking() && tick < 10_000 {
            if nav.tick(wall(tick)).completed.is_some() {
                completions += 1;
            }
            tick += 1;
        }

        assert_eq!(completions, 1);
        assert_eq!(nav.position(), target);
        assert!(nav.mission_stats().unwrap().distance_nm > 0.0);
        assert!(!nav.resume_mission());
    }

    #[test]
    fn test_tracking_tick_without_target_drifts_and_completes_once() {
        let mut nav = Navigator::default();
        let anchor = nav.anchor();
        let radius = nav.config().drift_radius;

        nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();
        assert!(nav.start_mission());
        assert!(nav.remove_waypoint(0).is_some());

        let outcome = nav.tick(wall(7));
        assert!(outcome.advanced);
        let p = nav.position();
        assert!((p.lat - anchor.lat).abs() <= radius * 0.5 + 1e-12);
        assert!((p.lng - anchor.lng).abs() <= radius + 1e-12);

        let stats = outcome.completed.unwrap();
        assert_eq!(stats.distance_nm, 0.0);
        assert_eq!(stats.samples, 0);
        assert!(!nav.is_tracking());

        assert!(nav.tick(wall(8)).completed.is_none());
        assert_eq!(nav.mission_stats(), Some(stats));
    }

    #[test]
    fn test_waypoint_ids_are_version_four_and_distinct() {
        let ids: Vec<WaypointId> = [0, 1, 4096, 1 << 32].iter().map(|&s| WaypointId::from_seq(s)).collect();
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.0.get_version_num(), 4);
            assert!(ids[i + 1..].iter().all(|other| other != id));
        }
        assert_eq!(WaypointId::from_seq(9), WaypointId::from_seq(9));
    }

    #[test]
    fn test_mode_as_str_matches_serde() {
        for mode in [Mode::Transit, Mode::Station] {
            assert_eq!(serde_json::to_value(mode).unwrap(), mode.as_str());
        }
    }

    #[test]
    fn test_dismiss_stats() {
        let mut nav = Navigator::default();
        nav.enqueue_waypoint(Position::new(18.941, 72.831), Duration::ZERO).unwrap();
        nav.start_mission();
        run_to_completion(&mut nav, 1000);
        assert!(nav.mission_stats().is_some());

        nav.dismiss_stats();
        assert!(nav.mission_stats().is_none());
        assert_eq!(nav.position(), Position::new(18.941, 72.831));
    }

    #[test]
    fn test_station_keeping_stays_within_drift_radius() {
        let mut nav = Navigator::default();
        let anchor = nav.anchor();
        let radius = nav.config().drift_radius;

        for tick in 0..2000 {
            assert!(nav.hold_station(wall(tick)));
            let p = nav.position();
            assert!((p.lat - anchor.lat).abs() <= radius + 1e-12);
            assert!((p.lng - anchor.lng).abs() <= radius + 1e-12);
        }

        // Wake has fully dissipated
        assert_eq!(nav.wake_len(), 0);
    }

    #[test]
    fn test_station_heading_eases() {
        let mut nav = Navigator::default();
        let before = nav.heading();
        nav.hold_station(Duration::ZERO);

        // cos(0) = 1: eases by smoothing * swing = 0.75°
        assert_relative_eq!(nav.heading(), before + 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_wake_dedup_and_growth() {
        let mut nav = Navigator::default();
        nav.enqueue_waypoint(Position::new(18.95, 72.84), Duration::ZERO).unwrap();
        nav.start_mission();

        // Station tick pops the seeded home point, then transit ticks append
        nav.tick(wall(0));
        assert_eq!(nav.wake_len(), 0);
        for tick in 1..11 {
            nav.tick(wall(tick));
        }
        assert_eq!(nav.wake_len(), 10);
        assert_eq!(nav.history_len(), 10);
    }

    #[test]
    fn test_wake_capacity_respected_on_long_transit() {
        let mut nav = Navigator::default();
        nav.enqueue_waypoint(Position::new(19.00, 72.90), Duration::ZERO).unwrap();
        nav.start_mission();

        let mut tick = 0;
        while nav.is_tracking() {
            nav.tick(wall(tick));
            assert!(nav.wake_len() <= 150);
            tick += 1;
        }

        assert_eq!(nav.wake_len(), 150);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_invariants_hold_for_random_routes(
            legs in proptest::collection::vec((-0.004f64..0.004, -0.004f64..0.004), 1..4)
        ) {
            let mut nav = Navigator::new(NavConfig::default().with_wake_capacity(40)).unwrap();
            let home = nav.anchor();
            for (dlat, dlng) in &legs {
                nav.enqueue_waypoint(Position::new(home.lat + dlat, home.lng + dlng), Duration::ZERO).unwrap();
            }
            prop_assert!(nav.start_mission());

            let mut completions = 0;
            let mut tick = 0;
            while nav.is_tracking() && tick < 20_000 {
                let was_transit = nav.mode() == Mode::Transit;
                let before = nav.heading();
                let outcome = nav.tick(wall(tick));

                prop_assert!(nav.wake_len() <= 40);
                prop_assert_eq!(nav.mode() == Mode::Transit, nav.active_target().is_some());
                if was_transit {
                    prop_assert!(shortest_turn(before, nav.heading()).abs() <= 3.0 + 1e-9);
                }
                if outcome.completed.is_some() {
                    completions += 1;
                }
                tick += 1;
            }

            prop_assert_eq!(completions, 1);
            prop_assert!(!nav.is_tracking());
        }
    }
}
