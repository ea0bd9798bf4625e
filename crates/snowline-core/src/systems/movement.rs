//! Movement & progression - advances skiing/lifting skiers along their
//! facility, resolves arrivals within the same tick, and evaluates
//! promotion on qualifying trail completions.

use crate::components::{
    Facility, FacilityStatus, Hunger, Mobility, Position, Progress, Progression, SkierState, Vec2,
};
use hecs::{Entity, World};
use rand::Rng;
use snowline_logic::config::{ProgressionRule, TuningConfig};
use snowline_logic::constants::{ARRIVAL_JITTER, EPSILON_RATE, HUNGER_CRITICAL};
use snowline_logic::scoring::{self, Difficulty, SkierLevel};
use std::collections::HashMap;

/// A skier levelled up this tick; the engine turns these into feedback
/// labels and population-growth rewards.
#[derive(Debug, Clone, Copy)]
pub struct PromotionEvent {
    pub skier: Entity,
    pub pos: Vec2,
    pub new_level: SkierLevel,
}

struct RideFacility {
    difficulty: Option<Difficulty>,
    length: f32,
    end: Vec2,
    open: bool,
}

fn skiing_rate(
    cfg: &TuningConfig,
    difficulty: Difficulty,
    level: SkierLevel,
    variance: f32,
    hunger: f32,
    snow_depth: f32,
    length: f32,
) -> f32 {
    let speed = cfg.base_ski_speed
        * scoring::difficulty_speed_multiplier(difficulty)
        * scoring::level_speed_multiplier(level)
        * variance
        * scoring::mismatch_penalty(level, difficulty)
        * scoring::hunger_penalty(hunger, HUNGER_CRITICAL)
        * scoring::snow_multiplier(snow_depth);
    speed / length
}

/// Advance all in-transit skiers and finalize arrivals. Returns the
/// promotions earned this tick.
pub fn movement_system(
    world: &mut World,
    dt: f32,
    cfg: &TuningConfig,
    snow_depth: f32,
    rng: &mut impl Rng,
) -> Vec<PromotionEvent> {
    let facilities: HashMap<Entity, RideFacility> = world
        .query::<(&Facility, &FacilityStatus)>()
        .iter()
        .map(|(entity, (f, status))| {
            (
                entity,
                RideFacility {
                    difficulty: f.kind.difficulty(),
                    length: f.length,
                    end: f.end,
                    open: status.is_open(),
                },
            )
        })
        .collect();

    let mut promotions = Vec::new();
    let mut dangling = Vec::new();

    for (skier, (state, progress, position, progression, hunger, mobility)) in world
        .query_mut::<(
            &mut SkierState,
            &mut Progress,
            &mut Position,
            &mut Progression,
            &Hunger,
            &Mobility,
        )>()
    {
        let facility_entity = match *state {
            SkierState::Skiing { facility } | SkierState::Lifting { facility, .. } => facility,
            _ => continue,
        };
        let Some(facility) = facilities.get(&facility_entity) else {
            dangling.push(skier);
            continue;
        };

        let mut rate = match *state {
            SkierState::Skiing { .. } => {
                let difficulty = facility.difficulty.unwrap_or(Difficulty::Green);
                skiing_rate(
                    cfg,
                    difficulty,
                    progression.level,
                    mobility.speed_variance,
                    hunger.0,
                    snow_depth,
                    facility.length,
                )
            }
            // A closed carrier stalls anyone already aboard.
            SkierState::Lifting { .. } if !facility.open => 0.0,
            SkierState::Lifting { .. } => cfg.lift_speed / facility.length,
            _ => unreachable!(),
        };
        if !rate.is_finite() {
            rate = EPSILON_RATE;
        }

        let was_skiing = matches!(*state, SkierState::Skiing { .. });
        if was_skiing {
            if let (ProgressionRule::TimeOnTarget { .. }, Some(d)) =
                (cfg.progression, facility.difficulty)
            {
                if d == progression.level.promotion_target() {
                    progression.time_on_target += dt as f64;
                }
            }
        }

        progress.0 = (progress.0 + rate * dt).clamp(0.0, 1.0);
        if progress.0 < 1.0 {
            continue;
        }

        // Arrival: snap to the end with a little jitter so simultaneous
        // arrivals fan out visually.
        position.0 = facility.end
            + Vec2::new(
                rng.gen_range(-ARRIVAL_JITTER..=ARRIVAL_JITTER),
                rng.gen_range(-ARRIVAL_JITTER..=ARRIVAL_JITTER),
            );
        progress.0 = 0.0;

        if was_skiing {
            if let Some(difficulty) = facility.difficulty {
                if let Some(event) = evaluate_promotion(progression, difficulty, &cfg.progression) {
                    promotions.push(PromotionEvent {
                        skier,
                        pos: position.0,
                        new_level: event,
                    });
                }
            }
        }
        *state = SkierState::Idle;
    }

    // Dangling facility reference (demolished mid-ride): reset to idle in
    // place on this same tick.
    for skier in dangling {
        if let Ok(mut state) = world.get::<&mut SkierState>(skier) {
            *state = SkierState::Idle;
        }
        if let Ok(mut progress) = world.get::<&mut Progress>(skier) {
            progress.0 = 0.0;
        }
    }

    promotions
}

/// Apply the configured progression rule after completing `difficulty`.
/// Returns the new level when a promotion fires.
fn evaluate_promotion(
    progression: &mut Progression,
    difficulty: Difficulty,
    rule: &ProgressionRule,
) -> Option<SkierLevel> {
    if difficulty != progression.level.promotion_target() {
        return None;
    }

    let earned = match rule {
        ProgressionRule::RideCount { rides } => {
            progression.ride_count += 1;
            progression.ride_count >= *rides
        }
        ProgressionRule::TimeOnTarget { seconds } => progression.time_on_target >= *seconds,
    };
    if !earned {
        return None;
    }

    let next = progression.level.next()?;
    progression.level = next;
    progression.ride_count = 0;
    progression.time_on_target = 0.0;
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{BoardingQueue, FacilityId, FacilityKind, LiftClass, Skier};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn_trail(world: &mut World, difficulty: Difficulty) -> Entity {
        world.spawn((
            Facility::new(
                FacilityId(1),
                "Run",
                FacilityKind::Trail { difficulty },
                Vec2::new(0.0, 10.0),
                Vec2::new(0.0, 70.0),
                0.0,
            ),
            FacilityStatus::gated(true),
            BoardingQueue::default(),
        ))
    }

    fn spawn_skier_on(world: &mut World, state: SkierState, level: SkierLevel) -> Entity {
        world.spawn((
            Skier {
                label: "A".into(),
                created_at: 0.0,
            },
            Position::new(0.0, 10.0),
            state,
            Progress(0.0),
            Progression {
                level,
                ride_count: 0,
                time_on_target: 0.0,
            },
            Hunger(100.0),
            Mobility {
                speed_variance: 1.0,
                next_rental_due: 90.0,
            },
        ))
    }

    #[test]
    fn test_progress_advances_and_clamps() {
        let mut world = World::new();
        let trail = spawn_trail(&mut world, Difficulty::Green);
        let skier = spawn_skier_on(
            &mut world,
            SkierState::Skiing { facility: trail },
            SkierLevel::Beginner,
        );

        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        movement_system(&mut world, 1.0, &cfg, 50.0, &mut rng);

        let p = world.get::<&Progress>(skier).unwrap().0;
        assert!(p > 0.0 && p <= 1.0);
    }

    #[test]
    fn test_arrival_resolves_same_tick() {
        let mut world = World::new();
        let trail = spawn_trail(&mut world, Difficulty::Green);
        let skier = spawn_skier_on(
            &mut world,
            SkierState::Skiing { facility: trail },
            SkierLevel::Beginner,
        );
        world.get::<&mut Progress>(skier).unwrap().0 = 0.99;

        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        movement_system(&mut world, 5.0, &cfg, 50.0, &mut rng);

        assert_eq!(*world.get::<&SkierState>(skier).unwrap(), SkierState::Idle);
        assert_eq!(world.get::<&Progress>(skier).unwrap().0, 0.0);
        let pos = world.get::<&Position>(skier).unwrap().0;
        let end = Vec2::new(0.0, 70.0);
        assert!(pos.distance(&end) <= ARRIVAL_JITTER * 1.5);
    }

    #[test]
    fn test_promotion_after_threshold_rides() {
        let mut world = World::new();
        let trail = spawn_trail(&mut world, Difficulty::Green);
        let skier = spawn_skier_on(
            &mut world,
            SkierState::Skiing { facility: trail },
            SkierLevel::Beginner,
        );

        let cfg = TuningConfig::default(); // RideCount { rides: 3 }
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut promoted = Vec::new();
        for _ in 0..3 {
            *world.get::<&mut SkierState>(skier).unwrap() = SkierState::Skiing { facility: trail };
            world.get::<&mut Progress>(skier).unwrap().0 = 0.999;
            promoted.extend(movement_system(&mut world, 1.0, &cfg, 50.0, &mut rng));
        }

        assert_eq!(promoted.len(), 1);
        assert_eq!(promoted[0].new_level, SkierLevel::Amateur);
        let prog = world.get::<&Progression>(skier).unwrap();
        assert_eq!(prog.level, SkierLevel::Amateur);
        assert_eq!(prog.ride_count, 0, "counter resets on promotion");
    }

    #[test]
    fn test_wrong_difficulty_does_not_count() {
        let mut world = World::new();
        let trail = spawn_trail(&mut world, Difficulty::Blue);
        let skier = spawn_skier_on(
            &mut world,
            SkierState::Skiing { facility: trail },
            SkierLevel::Beginner,
        );
        world.get::<&mut Progress>(skier).unwrap().0 = 0.999;

        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        movement_system(&mut world, 1.0, &cfg, 50.0, &mut rng);

        assert_eq!(world.get::<&Progression>(skier).unwrap().ride_count, 0);
    }

    #[test]
    fn test_closed_lift_stalls_rider() {
        let mut world = World::new();
        let lift = world.spawn((
            Facility::new(
                FacilityId(2),
                "Quad",
                FacilityKind::Lift {
                    class: LiftClass::ChairLift,
                },
                Vec2::new(0.0, 70.0),
                Vec2::new(0.0, 10.0),
                0.0,
            ),
            FacilityStatus::gated(false),
            BoardingQueue::default(),
        ));
        let skier = spawn_skier_on(
            &mut world,
            SkierState::Lifting {
                facility: lift,
                seat: 0,
            },
            SkierLevel::Beginner,
        );
        world.get::<&mut Progress>(skier).unwrap().0 = 0.5;

        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        movement_system(&mut world, 10.0, &cfg, 50.0, &mut rng);

        assert_eq!(world.get::<&Progress>(skier).unwrap().0, 0.5, "stalled");
    }

    #[test]
    fn test_dangling_facility_heals_to_idle() {
        let mut world = World::new();
        let trail = spawn_trail(&mut world, Difficulty::Green);
        let skier = spawn_skier_on(
            &mut world,
            SkierState::Skiing { facility: trail },
            SkierLevel::Beginner,
        );
        world.despawn(trail).unwrap();

        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        movement_system(&mut world, 1.0, &cfg, 50.0, &mut rng);

        assert_eq!(*world.get::<&SkierState>(skier).unwrap(), SkierState::Idle);
    }
}
