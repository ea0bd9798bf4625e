//! Cycle clock tracking - detects day/night phase edges between ticks.

use serde::{Deserialize, Serialize};
use snowline_logic::cycle::{self, CycleConfig};

/// Phase-transition edges for one tick; each fires at most once per cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseEdges {
    pub became_night: bool,
    pub became_day: bool,
}

/// Remembers the previous tick's phase so edges fire exactly once per
/// crossing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CycleTracker {
    pub is_night: bool,
    pub light_opacity: f32,
}

impl Default for CycleTracker {
    fn default() -> Self {
        Self {
            is_night: false,
            light_opacity: 0.0,
        }
    }
}

impl CycleTracker {
    /// Advance to `elapsed` and report any phase edge crossed since the
    /// previous call.
    pub fn update(&mut self, elapsed: f64, config: &CycleConfig) -> PhaseEdges {
        let phase = cycle::phase_at(elapsed, config);
        let edges = PhaseEdges {
            became_night: phase.is_night && !self.is_night,
            became_day: !phase.is_night && self.is_night,
        };
        self.is_night = phase.is_night;
        self.light_opacity = phase.light_opacity;
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_fire_once() {
        let config = CycleConfig {
            day: 10.0,
            dusk: 2.0,
            night: 10.0,
            dawn: 2.0,
        };
        let mut tracker = CycleTracker::default();

        let mut night_edges = 0;
        let mut day_edges = 0;
        let mut t = 0.0;
        while t < config.total() {
            let edges = tracker.update(t, &config);
            night_edges += edges.became_night as u32;
            day_edges += edges.became_day as u32;
            t += 0.1;
        }

        assert_eq!(night_edges, 1);
        assert_eq!(day_edges, 1);
    }

    #[test]
    fn test_no_edge_without_crossing() {
        let config = CycleConfig::default();
        let mut tracker = CycleTracker::default();
        assert_eq!(tracker.update(1.0, &config), PhaseEdges::default());
        assert_eq!(tracker.update(2.0, &config), PhaseEdges::default());
    }
}
