//! Generation - procedural creation of a starter resort.

use crate::components::{FacilityKind, LiftClass, Vec2};
use crate::engine::SimulationEngine;
use crate::systems::spawn_skier;
use rand::Rng;
use snowline_logic::scoring::Difficulty;

/// Configuration for the starter resort.
#[derive(Debug, Clone)]
pub struct ResortConfig {
    pub name: String,
    pub skier_count: usize,
    pub tree_count: usize,
    pub starting_coins: i64,
    /// Playable area, screen coordinates (+y is downhill toward the base).
    pub width: f32,
    pub height: f32,
}

impl Default for ResortConfig {
    fn default() -> Self {
        Self {
            name: "Snowline".to_string(),
            skier_count: 6,
            tree_count: 40,
            starting_coins: 200,
            width: 160.0,
            height: 100.0,
        }
    }
}

/// Build a small connected resort: one base lift up the mountain, a green
/// and a blue trail back down, a café at the base, and the opening-day
/// skier population.
pub fn generate_resort(engine: &mut SimulationEngine, config: &ResortConfig) {
    let base_y = config.height * 0.9;
    let summit_y = config.height * 0.2;
    let mid_x = config.width * 0.5;

    engine.ledger.coins = config.starting_coins;

    // Trees first, so construction thins them out like a real build would.
    engine.trees = (0..config.tree_count)
        .map(|_| {
            Vec2::new(
                engine.rng.gen_range(0.0..config.width),
                engine.rng.gen_range(summit_y..base_y),
            )
        })
        .collect();

    engine.place_facility(
        "Base Quad",
        FacilityKind::Lift {
            class: LiftClass::ChairLift,
        },
        Vec2::new(mid_x, base_y),
        Vec2::new(mid_x, summit_y),
        Some(4),
    );
    engine.place_facility(
        "Meadow Run",
        FacilityKind::Trail {
            difficulty: Difficulty::Green,
        },
        Vec2::new(mid_x, summit_y),
        Vec2::new(mid_x - 25.0, base_y),
        None,
    );
    engine.place_facility(
        "Ridge Line",
        FacilityKind::Trail {
            difficulty: Difficulty::Blue,
        },
        Vec2::new(mid_x, summit_y),
        Vec2::new(mid_x + 25.0, base_y),
        None,
    );
    engine.place_facility(
        "Base Lodge Café",
        FacilityKind::Cafe,
        Vec2::new(mid_x - 12.0, base_y),
        Vec2::new(mid_x - 8.0, base_y),
        None,
    );

    for _ in 0..config.skier_count {
        let seq = engine.next_skier_seq;
        engine.next_skier_seq += 1;
        let config_snapshot = engine.config.clone();
        spawn_skier(&mut engine.world, &config_snapshot, &mut engine.rng, seq, 0.0);
    }
}
