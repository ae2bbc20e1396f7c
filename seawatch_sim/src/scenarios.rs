//! Navigation scenarios for the simulation harness.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// NAV-001: one waypoint from the home position
    SingleLeg,
    
    /// NAV-002: seeded multi-waypoint patrol, FIFO order
    Patrol,
    
    /// NAV-003: abort mid-transit
    Abort,
    
    /// NAV-004: waypoint rejected by a restrictive zone
    Hazard,
    
    /// NAV-005: idle drift around the anchor
    StationKeeping,
    
    /// NAV-006: pause mid-transit, then resume to completion
    PauseResume,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::SingleLeg,
            ScenarioId::Patrol,
            ScenarioId::Abort,
            ScenarioId::Hazard,
            ScenarioId::StationKeeping,
            ScenarioId::PauseResume,
        ]
    }
    
    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::SingleLeg => "single_leg",
            ScenarioId::Patrol => "patrol",
            ScenarioId::Abort => "abort",
            ScenarioId::Hazard => "hazard",
            ScenarioId::StationKeeping => "station_keeping",
            ScenarioId::PauseResume => "pause_resume",
        }
    }
    
    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::SingleLeg => "Transit (18.94, 72.83) → (18.95, 72.84), exact arrival and stats",
            ScenarioId::Patrol => "Seeded 4-point patrol, visited in enqueue order, stats once",
            ScenarioId::Abort => "Abort mid-transit, position frozen and mission state cleared",
            ScenarioId::Hazard => "Harbour-channel zone rejects a land point, alert clears after 3s",
            ScenarioId::StationKeeping => "Drift around the anchor stays inside the drift radius",
            ScenarioId::PauseResume => "Pause mid-transit keeps the target, resume arrives with stats once",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single_leg" | "singleleg" | "nav-001" => Ok(ScenarioId::SingleLeg),
            "patrol" | "nav-002" => Ok(ScenarioId::Patrol),
            "abort" | "nav-003" => Ok(ScenarioId::Abort),
            "hazard" | "nav-004" => Ok(ScenarioId::Hazard),
            "station_keeping" | "stationkeeping" | "station" | "nav-005" => Ok(ScenarioId::StationKeeping),
            "pause_resume" | "pauseresume" | "pause" | "nav-006" => Ok(ScenarioId::PauseResume),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_names_round_trip_through_from_str() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>(), Ok(scenario));
        }
        assert_eq!("NAV-004".parse::<ScenarioId>(), Ok(ScenarioId::Hazard));
        assert!("kraken".parse::<ScenarioId>().is_err());
    }
}
