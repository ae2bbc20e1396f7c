//! SimWorld - The simulation harness container.

use crate::context::SimContext;

use seawatch_core::{NavConfig, NavError, Navigator, NavigabilityPolicy, TickOutcome};
use seawatch_env::NavContext;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,
    
    /// Tick budget before a run is declared stuck
    pub max_ticks: u64,
    
    /// Navigator tuning
    pub nav: NavConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_ticks: 20_000,
            nav: NavConfig::default(),
        }
    }
}

/// The SimWorld - one navigator on a virtual clock.
///
/// Unlike `NavigatorRuntime`, ticks are stepped by hand so a scenario can
/// inspect the navigator between every step.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,
    
    /// Shared simulation context (virtual clock)
    pub context: Arc<SimContext>,
    
    /// The navigator under test
    pub navigator: Navigator,
    
    /// Current tick count
    tick_count: u64,
}

impl SimWorld {
    /// Creates a new SimWorld with the given configuration.
    ///
    /// Fails if the navigator configuration does not validate.
    pub fn new(config: SimConfig) -> Result<Self, NavError> {
        let navigator = Navigator::new(config.nav.clone())?;
        let context = SimContext::shared(config.seed);
        
        Ok(Self {
            config,
            context,
            navigator,
            tick_count: 0,
        })
    }
    
    /// Replaces the navigator's navigability policy.
    pub fn with_policy(mut self, policy: impl NavigabilityPolicy + 'static) -> Self {
        let navigator = std::mem::take(&mut self.navigator);
        self.navigator = navigator.with_policy(policy);
        self
    }
    
    /// Advances virtual time by one tick interval and ticks the navigator.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.navigator.tick(self.advance_clock());
        self.tick_count += 1;
        outcome
    }
    
    /// Advances one tick interval of pure station-keeping.
    pub fn hold(&mut self) -> bool {
        let wall_clock = self.advance_clock();
        self.tick_count += 1;
        self.navigator.hold_station(wall_clock)
    }
    
    /// Advances virtual time without ticking (e.g. to age alerts).
    pub fn advance(&mut self, duration: Duration) {
        self.context.advance_time(duration);
    }
    
    fn advance_clock(&self) -> Duration {
        self.context.advance_time(self.config.nav.tick_interval());
        // The virtual epoch is 2024-01-01, never before the Unix epoch
        self.context.wall_clock().unwrap_or_default()
    }
    
    /// Returns the current monotonic simulation time.
    pub fn now(&self) -> Duration {
        self.context.now()
    }
    
    /// Returns the current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.context.now().as_secs_f64()
    }
    
    /// Returns the current tick count.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
