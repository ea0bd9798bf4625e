//! Tuning configuration - the per-resort knobs supplied by the caller.
//!
//! Everything here is data; structural constants (tolerances, probabilities)
//! live in [`crate::constants`].

use crate::cycle::CycleConfig;
use crate::economy::EconomyRates;
use crate::geometry::Vec2;
use serde::{Deserialize, Serialize};

/// How skiers progress to the next skill level.
///
/// The two variants are mutually exclusive designs; exactly one applies
/// per engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProgressionRule {
    /// Promote after completing this many rides on the target difficulty.
    RideCount { rides: u32 },
    /// Promote after this much accumulated time skiing the target difficulty.
    TimeOnTarget { seconds: f64 },
}

/// Full tuning surface of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Base skiing speed in grid units per second, before multipliers.
    pub base_ski_speed: f32,
    /// Fixed mechanical lift/gondola speed in grid units per second.
    pub lift_speed: f32,
    /// Hunger lost per second while not eating.
    pub hunger_decay_rate: f32,
    /// Seconds a café visit takes.
    pub eating_duration: f32,
    /// Per-skier speed variance band, drawn once at creation.
    pub speed_variance_min: f32,
    pub speed_variance_max: f32,
    /// Seconds between periodic skier spawns.
    pub spawn_interval: f64,
    /// Population cap for periodic spawning (promotion rewards ignore it).
    pub max_population: usize,
    /// Where new skiers appear and where displaced skiers fall back to.
    pub spawn_point: Vec2,
    pub progression: ProgressionRule,
    pub cycle: CycleConfig,
    pub economy: EconomyRates,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            base_ski_speed: 6.0,
            lift_speed: 4.0,
            hunger_decay_rate: 0.8,
            eating_duration: 8.0,
            speed_variance_min: 0.85,
            speed_variance_max: 1.15,
            spawn_interval: 20.0,
            max_population: 40,
            spawn_point: Vec2::new(50.0, 95.0),
            progression: ProgressionRule::RideCount { rides: 3 },
            cycle: CycleConfig::default(),
            economy: EconomyRates::default(),
        }
    }
}
