//! Scenario runner - drives the navigator through scripted missions.

use crate::exporter::{SimEvent, SimExport, SimFrame};
use crate::route::RoutePlanner;
use crate::scenarios::ScenarioId;
use crate::world::{SimConfig, SimWorld};

use seawatch_core::geometry::shortest_turn;
use seawatch_core::{MissionStats, NavConfig, NavError, NavigableZone, Position, TickOutcome, WaypointId};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,
    
    /// Seed used
    pub seed: u64,
    
    /// Whether scenario passed all assertions
    pub passed: bool,
    
    /// Total ticks executed
    pub total_ticks: u64,
    
    /// Final simulation time in seconds
    pub final_time_secs: f64,
    
    /// Final vessel position
    pub final_position: Position,
    
    /// Failure message if any
    pub failure_reason: Option<String>,
    
    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Waypoints accepted into the queue
    pub waypoints_enqueued: u64,
    
    /// Arrivals observed
    pub waypoints_reached: u64,
    
    /// Waypoints rejected by the navigability policy
    pub hazards_raised: u64,
    
    /// Largest heading change between consecutive ticks (degrees)
    pub max_turn_deg: f64,
    
    /// Longest wake trail observed
    pub max_wake_len: usize,
    
    /// Mission stats, if a mission completed
    pub stats: Option<MissionStats>,
}

/// Watches a world tick by tick, collecting metrics and optional frames.
struct Probe {
    metrics: ScenarioMetrics,
    arrivals: Vec<WaypointId>,
    completions: u32,
    last_heading: f64,
    export: Option<SimExport>,
    pending_events: Vec<SimEvent>,
    sample_every: u64,
}

impl Probe {
    fn new(world: &SimWorld, export: Option<SimExport>) -> Self {
        Self {
            metrics: ScenarioMetrics {
                max_wake_len: world.navigator.wake_len(),
                ..Default::default()
            },
            arrivals: Vec::new(),
            completions: 0,
            last_heading: world.navigator.heading(),
            export,
            pending_events: Vec::new(),
            sample_every: 5,
        }
    }
    
    fn event(&mut self, event: SimEvent) {
        if self.export.is_some() {
            self.pending_events.push(event);
        }
    }
    
    fn observe(&mut self, world: &SimWorld, outcome: &TickOutcome) {
        let nav = &world.navigator;
        
        let turn = shortest_turn(self.last_heading, nav.heading()).abs();
        self.metrics.max_turn_deg = self.metrics.max_turn_deg.max(turn);
        self.last_heading = nav.heading();
        self.metrics.max_wake_len = self.metrics.max_wake_len.max(nav.wake_len());
        
        if let Some(waypoint) = outcome.arrived {
            self.metrics.waypoints_reached += 1;
            self.arrivals.push(waypoint.id);
            self.event(SimEvent::info(format!("arrived at {}", waypoint.position)));
        }
        if let Some(waypoint) = outcome.activated {
            self.event(SimEvent::info(format!("heading for {}", waypoint.position)));
        }
        if let Some(stats) = outcome.completed {
            self.completions += 1;
            self.metrics.stats = Some(stats);
            self.event(SimEvent::info(format!(
                "mission complete: {} / {} / {}",
                stats.distance_label(),
                stats.fuel_label(),
                stats.duration_label()
            )));
        }
        
        let has_events = !self.pending_events.is_empty();
        if let Some(export) = self.export.as_mut() {
            if has_events || world.tick_count() % self.sample_every == 0 {
                let events = std::mem::take(&mut self.pending_events);
                let snapshot = nav.snapshot(world.now());
                export.add_frame(SimFrame::from_snapshot(world.time(), &snapshot, events));
            }
        }
    }
    
    fn finish(mut self, result: &ScenarioResult) -> Option<SimExport> {
        let mut export = self.export.take()?;
        export.finalize(result.passed, result.metrics.stats);
        Some(export)
    }
}

/// Collects failed checks for a scenario.
#[derive(Default)]
struct Checks {
    failures: Vec<String>,
}

impl Checks {
    fn expect(&mut self, ok: bool, what: impl FnOnce() -> String) {
        if !ok {
            let reason = what();
            warn!("  ✗ {}", reason);
            self.failures.push(reason);
        }
    }
    
    fn passed(&self) -> bool {
        self.failures.is_empty()
    }
    
    fn reason(&self) -> Option<String> {
        if self.failures.is_empty() {
            None
        } else {
            Some(self.failures.join("; "))
        }
    }
}

/// Runs navigation scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,
    
    /// Tick budget per mission
    max_ticks: u64,
    
    /// Navigator tuning
    nav: NavConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        let defaults = SimConfig::default();
        Self {
            seed,
            max_ticks: defaults.max_ticks,
            nav: defaults.nav,
        }
    }
    
    /// Sets the tick budget.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }
    
    /// Sets the navigator configuration. Fails if it does not validate.
    pub fn with_config(mut self, nav: NavConfig) -> Result<Self, NavError> {
        nav.validate()?;
        self.nav = nav;
        Ok(self)
    }
    
    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.execute(scenario, None).0
    }
    
    /// Runs a scenario and records a replayable track alongside the result.
    pub fn run_with_export(&self, scenario: ScenarioId) -> (ScenarioResult, SimExport) {
        let export = SimExport::new(scenario.name(), self.seed);
        let (result, export) = self.execute(scenario, Some(export));
        let export = export.unwrap_or_else(|| SimExport::new(scenario.name(), self.seed));
        (result, export)
    }
    
    fn execute(&self, scenario: ScenarioId, export: Option<SimExport>) -> (ScenarioResult, Option<SimExport>) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        
        let world = SimWorld::new(SimConfig {
            seed: self.seed,
            max_ticks: self.max_ticks,
            nav: self.nav.clone(),
        });
        let mut world = match world {
            Ok(world) => world,
            Err(e) => {
                warn!("✗ {} not run: {}", scenario, e);
                let result = ScenarioResult {
                    scenario,
                    seed: self.seed,
                    passed: false,
                    total_ticks: 0,
                    final_time_secs: 0.0,
                    final_position: self.nav.home,
                    failure_reason: Some(e.to_string()),
                    metrics: ScenarioMetrics::default(),
                };
                return (result, None);
            }
        };
        if scenario == ScenarioId::Hazard {
            world = world.with_policy(NavigableZone::harbour_channel());
        }
        
        let mut probe = Probe::new(&world, export);
        let checks = match scenario {
            ScenarioId::SingleLeg => self.run_single_leg(&mut world, &mut probe),
            ScenarioId::Patrol => self.run_patrol(&mut world, &mut probe),
            ScenarioId::Abort => self.run_abort(&mut world, &mut probe),
            ScenarioId::Hazard => self.run_hazard(&mut world, &mut probe),
            ScenarioId::StationKeeping => self.run_station_keeping(&mut world, &mut probe),
            ScenarioId::PauseResume => self.run_pause_resume(&mut world, &mut probe),
        };
        
        let result = ScenarioResult {
            scenario,
            seed: self.seed,
            passed: checks.passed(),
            total_ticks: world.tick_count(),
            final_time_secs: world.time(),
            final_position: world.navigator.position(),
            failure_reason: checks.reason(),
            metrics: probe.metrics.clone(),
        };
        
        if result.passed {
            info!("✓ {} passed in {} ticks ({:.2}s)", scenario, result.total_ticks, result.final_time_secs);
        } else {
            warn!("✗ {} failed: {}", scenario, result.failure_reason.as_deref().unwrap_or("unknown"));
        }
        
        let export = probe.finish(&result);
        (result, export)
    }
    
    /// Ticks until the mission stops tracking or the budget runs out.
    /// Returns false if the budget ran out.
    fn run_mission(&self, world: &mut SimWorld, probe: &mut Probe) -> bool {
        let budget = world.tick_count() + self.max_ticks;
        while world.navigator.is_tracking() {
            if world.tick_count() >= budget {
                return false;
            }
            let outcome = world.tick();
            probe.observe(world, &outcome);
        }
        true
    }
    
    fn enqueue(&self, world: &mut SimWorld, probe: &mut Probe, point: Position) -> Option<WaypointId> {
        match world.navigator.enqueue_waypoint(point, world.now()) {
            Ok(id) => {
                probe.metrics.waypoints_enqueued += 1;
                Some(id)
            }
            Err(err) => {
                probe.metrics.hazards_raised += 1;
                probe.event(SimEvent::warn(err.to_string()));
                None
            }
        }
    }
    
    fn check_turn_rate(&self, checks: &mut Checks, probe: &Probe) {
        let limit = self.nav.turn_rate_deg + 1e-9;
        checks.expect(probe.metrics.max_turn_deg <= limit, || {
            format!("heading changed {:.3}° in one tick", probe.metrics.max_turn_deg)
        });
        checks.expect(probe.metrics.max_wake_len <= self.nav.wake_capacity, || {
            format!("wake trail grew to {}", probe.metrics.max_wake_len)
        });
    }
    
    /// NAV-001: SingleLeg - one waypoint from home.
    fn run_single_leg(&self, world: &mut SimWorld, probe: &mut Probe) -> Checks {
        info!("NAV-001: SingleLeg - transit to a single waypoint");
        
        let mut checks = Checks::default();
        let target = Position::new(18.95, 72.84);
        
        self.enqueue(world, probe, target);
        checks.expect(world.navigator.start_mission(), || "mission did not start".into());
        let finished = self.run_mission(world, probe);
        checks.expect(finished, || format!("no arrival within {} ticks", self.max_ticks));
        
        let position = world.navigator.position();
        checks.expect(position == target, || format!("ended at {} instead of {}", position, target));
        checks.expect(world.navigator.anchor() == target, || "anchor not moved to target".into());
        
        match world.navigator.mission_stats() {
            Some(stats) => {
                debug!("  stats: {} / {} / {}", stats.distance_label(), stats.fuel_label(), stats.duration_label());
                checks.expect(stats.distance_nm > 0.0, || "zero mission distance".into());
                checks.expect(stats.fuel_liters > 0.0, || "zero fuel burn".into());
            }
            None => checks.expect(false, || "no mission stats".into()),
        }
        
        self.check_turn_rate(&mut checks, probe);
        checks
    }
    
    /// NAV-002: Patrol - seeded waypoints visited in order.
    fn run_patrol(&self, world: &mut SimWorld, probe: &mut Probe) -> Checks {
        info!("NAV-002: Patrol - seeded multi-waypoint route");
        
        let mut checks = Checks::default();
        let route_seed = self.seed.wrapping_mul(0x9e3779b97f4a7c15);
        let route = RoutePlanner::new(route_seed, 0.003).patrol(self.nav.home, 4);
        
        let ids: Vec<WaypointId> = route
            .iter()
            .filter_map(|&point| self.enqueue(world, probe, point))
            .collect();
        checks.expect(ids.len() == route.len(), || "patrol waypoint rejected".into());
        
        checks.expect(world.navigator.start_mission(), || "mission did not start".into());
        checks.expect(!world.navigator.start_mission(), || "second start was not a no-op".into());
        
        let finished = self.run_mission(world, probe);
        checks.expect(finished, || format!("patrol unfinished after {} ticks", self.max_ticks));
        
        checks.expect(probe.arrivals == ids, || {
            format!("arrival order {:?} != enqueue order {:?}", probe.arrivals, ids)
        });
        checks.expect(probe.completions == 1, || format!("mission completed {} times", probe.completions));
        if let Some(last) = route.last() {
            checks.expect(world.navigator.position() == *last, || "did not end on the last waypoint".into());
        }
        
        // Stats survive until dismissed
        for _ in 0..10 {
            let outcome = world.tick();
            probe.observe(world, &outcome);
        }
        checks.expect(world.navigator.mission_stats().is_some(), || "stats lost before dismissal".into());
        world.navigator.dismiss_stats();
        checks.expect(world.navigator.mission_stats().is_none(), || "dismiss did not clear stats".into());
        
        self.check_turn_rate(&mut checks, probe);
        checks
    }
    
    /// NAV-003: Abort - stop mid-transit.
    fn run_abort(&self, world: &mut SimWorld, probe: &mut Probe) -> Checks {
        info!("NAV-003: Abort - cancel a mission in transit");
        
        let mut checks = Checks::default();
        let home = self.nav.home;
        self.enqueue(world, probe, Position::new(home.lat + 0.01, home.lng + 0.01));
        self.enqueue(world, probe, Position::new(home.lat - 0.01, home.lng + 0.01));
        world.navigator.start_mission();
        
        for _ in 0..20 {
            let outcome = world.tick();
            probe.observe(world, &outcome);
        }
        checks.expect(world.navigator.active_target().is_some(), || "not in transit before abort".into());
        
        let frozen = world.navigator.position();
        world.navigator.abort_mission();
        probe.event(SimEvent::warn(format!("aborted at {}", frozen)));
        
        for _ in 0..20 {
            let outcome = world.tick();
            checks.expect(!outcome.advanced, || "tick advanced after abort".into());
            probe.observe(world, &outcome);
        }
        
        let nav = &world.navigator;
        checks.expect(nav.position() == frozen, || format!("drifted to {} after abort", nav.position()));
        checks.expect(!nav.is_tracking(), || "still tracking".into());
        checks.expect(nav.active_target().is_none(), || "active target kept".into());
        checks.expect(nav.pending_count() == 0, || format!("{} waypoints still queued", nav.pending_count()));
        checks.expect(nav.history_len() == 0, || "path history kept".into());
        checks.expect(nav.mission_stats().is_none(), || "stats computed for an aborted mission".into());
        
        checks
    }
    
    /// NAV-006: PauseResume - suspend mid-transit and carry on.
    fn run_pause_resume(&self, world: &mut SimWorld, probe: &mut Probe) -> Checks {
        info!("NAV-006: PauseResume - pause in transit, resume to arrival");
        
        let mut checks = Checks::default();
        let target = Position::new(18.95, 72.84);
        let id = self.enqueue(world, probe, target);
        world.navigator.start_mission();
        
        for _ in 0..20 {
            let outcome = world.tick();
            probe.observe(world, &outcome);
        }
        checks.expect(world.navigator.pause_mission(), || "pause refused in transit".into());
        probe.event(SimEvent::info("paused"));
        
        let frozen = world.navigator.position();
        for _ in 0..40 {
            let outcome = world.tick();
            checks.expect(!outcome.advanced, || "tick advanced while paused".into());
            probe.observe(world, &outcome);
        }
        checks.expect(world.navigator.position() == frozen, || "moved while paused".into());
        checks.expect(
            world.navigator.active_target().map(|w| w.id) == id,
            || "active target lost on pause".into(),
        );
        checks.expect(!world.navigator.start_mission(), || "start accepted with an empty queue".into());
        
        checks.expect(world.navigator.resume_mission(), || "resume refused".into());
        probe.event(SimEvent::info("resumed"));
        let finished = self.run_mission(world, probe);
        checks.expect(finished, || format!("no arrival within {} ticks", self.max_ticks));
        
        checks.expect(world.navigator.position() == target, || "did not reach the target".into());
        checks.expect(probe.completions == 1, || format!("mission completed {} times", probe.completions));
        checks.expect(world.navigator.mission_stats().is_some(), || "no mission stats".into());
        
        self.check_turn_rate(&mut checks, probe);
        checks
    }
    
    /// NAV-004: Hazard - a land point is refused.
    fn run_hazard(&self, world: &mut SimWorld, probe: &mut Probe) -> Checks {
        info!("NAV-004: Hazard - waypoint outside the harbour channel");
        
        let mut checks = Checks::default();
        let land = Position::new(19.10, 72.70);
        
        let accepted = self.enqueue(world, probe, land);
        checks.expect(accepted.is_none(), || format!("{} was accepted", land));
        checks.expect(world.navigator.pending_count() == 0, || "queue changed on rejection".into());
        checks.expect(world.navigator.hazard_alert(world.now()).is_some(), || "no hazard alert raised".into());
        
        let alert_duration = self.nav.alert_duration();
        world.advance(alert_duration.saturating_sub(Duration::from_millis(100)));
        checks.expect(world.navigator.hazard_alert(world.now()).is_some(), || "alert expired early".into());
        checks.expect(!world.navigator.clear_expired_alert(world.now()), || "live alert was cleared".into());
        
        world.advance(Duration::from_millis(100));
        checks.expect(world.navigator.clear_expired_alert(world.now()), || "alert outlived its duration".into());
        checks.expect(world.navigator.hazard_alert(world.now()).is_none(), || "alert still visible".into());
        
        // A point inside the channel is still accepted and reached
        let water = Position::new(18.95, 72.84);
        checks.expect(self.enqueue(world, probe, water).is_some(), || format!("{} was rejected", water));
        world.navigator.start_mission();
        checks.expect(self.run_mission(world, probe), || "channel transit unfinished".into());
        checks.expect(world.navigator.position() == water, || "did not reach the channel waypoint".into());
        
        checks
    }
    
    /// NAV-005: StationKeeping - idle drift around the anchor.
    fn run_station_keeping(&self, world: &mut SimWorld, probe: &mut Probe) -> Checks {
        info!("NAV-005: StationKeeping - drift around the anchor");
        
        let mut checks = Checks::default();
        let anchor = world.navigator.anchor();
        let radius = self.nav.drift_radius;
        let hold_ticks = self.max_ticks.min(400);
        
        let mut max_lat: f64 = 0.0;
        let mut max_lng: f64 = 0.0;
        for _ in 0..hold_ticks {
            checks.expect(world.hold(), || "hold refused while idle".into());
            let position = world.navigator.position();
            max_lat = max_lat.max((position.lat - anchor.lat).abs());
            max_lng = max_lng.max((position.lng - anchor.lng).abs());
            probe.observe(world, &TickOutcome::default());
        }
        debug!("  max drift: lat {:.6}, lng {:.6}", max_lat, max_lng);
        
        checks.expect(max_lat <= radius * 0.5 + 1e-12, || format!("lat drift {:.6} exceeds bound", max_lat));
        checks.expect(max_lng <= radius + 1e-12, || format!("lng drift {:.6} exceeds bound", max_lng));
        checks.expect(max_lat > 0.0 && max_lng > 0.0, || "vessel never drifted".into());
        if hold_ticks as usize >= self.nav.wake_capacity {
            checks.expect(world.navigator.wake_len() == 0, || "wake trail did not decay".into());
        }
        checks.expect(world.navigator.anchor() == anchor, || "anchor moved while idle".into());
        
        checks
    }
}
