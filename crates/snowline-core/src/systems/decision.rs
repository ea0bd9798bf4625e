//! Agent decision engine - resolves idle skiers into new bookings.
//!
//! Each idle skier enumerates the facilities it can physically enter
//! (standing at a gate, or laterally close to a trail's curve mid-slope),
//! scores them by preference, and draws one through a weighted lottery.
//! A skier with no candidates stays put: stuck in the crowd until
//! infrastructure is built, deliberately without pathfinding rescue.

use crate::components::{
    BoardingQueue, Facility, FacilityKind, FacilityStatus, Hunger, Position, Progress, SkierState,
};
use hecs::{Entity, World};
use rand::Rng;
use snowline_logic::constants::{
    ADJACENCY_TOL, CAFE_SEEK_RADIUS, HUNGER_BONUS, HUNGER_CRITICAL, MERGE_BONUS, MERGE_TOL,
    MERGE_T_MAX, MERGE_T_MIN, NEW_TRAIL_BONUS, NEW_TRAIL_WINDOW, SNAP_TOL,
};
use snowline_logic::geometry::{self, CurveParams, Vec2};
use snowline_logic::scoring::{self, Difficulty, SkierLevel};

struct Candidate {
    facility: Entity,
    kind: FacilityKind,
    entry_t: f32,
    score: f32,
}

struct FacilityInfo {
    entity: Entity,
    kind: FacilityKind,
    start: Vec2,
    end: Vec2,
    created_at: f64,
    open: bool,
    curve: Option<CurveParams>,
}

fn new_bonus(info: &FacilityInfo, sim_time: f64) -> f32 {
    if sim_time - info.created_at < NEW_TRAIL_WINDOW {
        NEW_TRAIL_BONUS
    } else {
        0.0
    }
}

/// Best preference among open trails served by this carrier's top end. A
/// carrier leading only to closed or unrewarding terrain scores zero and
/// is effectively never chosen.
fn carrier_score(
    carrier: &FacilityInfo,
    facilities: &[FacilityInfo],
    level: SkierLevel,
    sim_time: f64,
) -> f32 {
    let mut best = 0.0f32;
    for info in facilities {
        if !info.open {
            continue;
        }
        if let FacilityKind::Trail { difficulty } = info.kind {
            if carrier.end.distance(&info.start) <= ADJACENCY_TOL {
                let score = scoring::preference(level, difficulty) + new_bonus(info, sim_time);
                best = best.max(score);
            }
        }
    }
    best
}

fn trail_score(
    info: &FacilityInfo,
    difficulty: Difficulty,
    level: SkierLevel,
    merge: bool,
    sim_time: f64,
) -> f32 {
    let mut score = scoring::preference(level, difficulty) + new_bonus(info, sim_time);
    if merge {
        score += MERGE_BONUS;
    }
    score
}

/// Enumerate and score this skier's candidate facilities.
fn candidates_for(
    pos: Vec2,
    hunger: f32,
    level: SkierLevel,
    facilities: &[FacilityInfo],
    sim_time: f64,
) -> Vec<Candidate> {
    let mut options = Vec::new();

    // Hunger override: once critical, food dominates every other motive.
    if hunger < HUNGER_CRITICAL {
        for info in facilities {
            if info.kind == FacilityKind::Cafe && info.open {
                let dist = pos.distance(&info.start);
                if dist <= CAFE_SEEK_RADIUS {
                    options.push(Candidate {
                        facility: info.entity,
                        kind: info.kind,
                        entry_t: 0.0,
                        score: HUNGER_BONUS + 10.0 / (dist + 1.0),
                    });
                }
            }
        }
        return options;
    }

    for info in facilities {
        if !info.open {
            continue;
        }

        // Standing at the gate (parameter t=0).
        if pos.distance(&info.start) <= SNAP_TOL {
            let score = match info.kind {
                FacilityKind::Trail { difficulty } => {
                    trail_score(info, difficulty, level, false, sim_time)
                }
                FacilityKind::Lift { .. } | FacilityKind::Gondola => {
                    carrier_score(info, facilities, level, sim_time)
                }
                FacilityKind::Cafe => 0.0,
            };
            options.push(Candidate {
                facility: info.entity,
                kind: info.kind,
                entry_t: 0.0,
                score,
            });
            continue;
        }

        // Mid-slope merge onto a trail's curve at an interior parameter.
        if let (FacilityKind::Trail { difficulty }, Some(curve)) = (info.kind, info.curve) {
            let (t, dist) = geometry::nearest_on_curve(pos, info.start, info.end, curve);
            if dist <= MERGE_TOL && t > MERGE_T_MIN && t < MERGE_T_MAX {
                options.push(Candidate {
                    facility: info.entity,
                    kind: info.kind,
                    entry_t: t,
                    score: trail_score(info, difficulty, level, true, sim_time),
                });
            }
        }
    }

    options
}

/// Route every idle skier for this tick.
pub fn decision_system(world: &mut World, sim_time: f64, rng: &mut impl Rng) {
    let facilities: Vec<FacilityInfo> = world
        .query::<(&Facility, &FacilityStatus)>()
        .iter()
        .map(|(entity, (f, status))| FacilityInfo {
            entity,
            kind: f.kind,
            start: f.start,
            end: f.end,
            created_at: f.created_at,
            open: status.is_open(),
            curve: matches!(f.kind, FacilityKind::Trail { .. }).then(|| f.curve()),
        })
        .collect();

    let idle: Vec<(Entity, Vec2, f32, SkierLevel)> = world
        .query::<(&SkierState, &Position, &Hunger, &crate::components::Progression)>()
        .iter()
        .filter(|(_, (state, ..))| state.is_idle())
        .map(|(e, (_, pos, hunger, prog))| (e, pos.0, hunger.0, prog.level))
        .collect();

    let mut bookings: Vec<(Entity, Entity, FacilityKind, f32)> = Vec::new();
    for (skier, pos, hunger, level) in idle {
        let options = candidates_for(pos, hunger, level, &facilities, sim_time);
        let scores: Vec<f32> = options.iter().map(|o| o.score).collect();
        if let Some(i) = scoring::weighted_pick(rng, &scores) {
            let chosen = &options[i];
            bookings.push((skier, chosen.facility, chosen.kind, chosen.entry_t));
        }
    }

    for (skier, facility, kind, entry_t) in bookings {
        let new_state = match kind {
            FacilityKind::Trail { .. } => SkierState::Skiing { facility },
            FacilityKind::Lift { .. } | FacilityKind::Gondola => SkierState::Waiting { facility },
            FacilityKind::Cafe => SkierState::Eating { facility },
        };
        if let Ok(mut state) = world.get::<&mut SkierState>(skier) {
            *state = new_state;
        }
        if let Ok(mut progress) = world.get::<&mut Progress>(skier) {
            progress.0 = if matches!(kind, FacilityKind::Trail { .. }) {
                entry_t
            } else {
                0.0
            };
        }
        if matches!(kind, FacilityKind::Lift { .. } | FacilityKind::Gondola) {
            if let Ok(mut queue) = world.get::<&mut BoardingQueue>(facility) {
                queue.enqueue(skier);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{FacilityId, LiftClass, Mobility, Progression, Skier};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn_facility(
        world: &mut World,
        id: u32,
        kind: FacilityKind,
        start: Vec2,
        end: Vec2,
        open: bool,
    ) -> Entity {
        world.spawn((
            Facility::new(FacilityId(id), format!("F{id}"), kind, start, end, 0.0),
            if kind.is_gated() {
                FacilityStatus::gated(open)
            } else {
                FacilityStatus::always_open()
            },
            BoardingQueue::default(),
        ))
    }

    fn spawn_idle(world: &mut World, pos: Vec2, hunger: f32, level: SkierLevel) -> Entity {
        world.spawn((
            Skier {
                label: "A".into(),
                created_at: 0.0,
            },
            Position(pos),
            SkierState::Idle,
            Progress(0.0),
            Progression {
                level,
                ride_count: 0,
                time_on_target: 0.0,
            },
            Hunger(hunger),
            Mobility {
                speed_variance: 1.0,
                next_rental_due: 90.0,
            },
        ))
    }

    fn state(world: &World, skier: Entity) -> SkierState {
        *world.get::<&SkierState>(skier).unwrap()
    }

    #[test]
    fn test_lone_beginner_takes_green_trail() {
        let mut world = World::new();
        let trail = spawn_facility(
            &mut world,
            1,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 90.0),
            true,
        );
        let skier = spawn_idle(&mut world, Vec2::new(10.0, 10.0), 100.0, SkierLevel::Beginner);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);

        assert_eq!(state(&world, skier), SkierState::Skiing { facility: trail });
        assert_eq!(world.get::<&Progress>(skier).unwrap().0, 0.0);
    }

    #[test]
    fn test_closed_facility_rejected() {
        let mut world = World::new();
        spawn_facility(
            &mut world,
            1,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 90.0),
            false,
        );
        let skier = spawn_idle(&mut world, Vec2::new(10.0, 10.0), 100.0, SkierLevel::Beginner);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);

        assert_eq!(state(&world, skier), SkierState::Idle, "stays put");
    }

    #[test]
    fn test_hungry_skier_heads_to_cafe() {
        let mut world = World::new();
        // Both a café and a perfectly good trail at the gate; hunger wins.
        let cafe = spawn_facility(
            &mut world,
            1,
            FacilityKind::Cafe,
            Vec2::new(20.0, 92.0),
            Vec2::new(24.0, 92.0),
            true,
        );
        spawn_facility(
            &mut world,
            2,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(10.0, 90.0),
            Vec2::new(10.0, 10.0),
            true,
        );
        let skier = spawn_idle(&mut world, Vec2::new(10.0, 90.0), 10.0, SkierLevel::Beginner);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);

        assert_eq!(state(&world, skier), SkierState::Eating { facility: cafe });
    }

    #[test]
    fn test_lift_to_dead_terrain_never_chosen() {
        let mut world = World::new();
        // Lift whose summit serves only a closed trail scores zero; the
        // green trail at the same gate always wins the lottery.
        spawn_facility(
            &mut world,
            1,
            FacilityKind::Lift {
                class: LiftClass::ChairLift,
            },
            Vec2::new(10.0, 90.0),
            Vec2::new(10.0, 10.0),
            true,
        );
        spawn_facility(
            &mut world,
            2,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 90.0),
            false,
        );
        let green = spawn_facility(
            &mut world,
            3,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(10.0, 90.0),
            Vec2::new(40.0, 95.0),
            true,
        );
        let skier = spawn_idle(&mut world, Vec2::new(10.0, 90.0), 100.0, SkierLevel::Beginner);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);

        assert_eq!(state(&world, skier), SkierState::Skiing { facility: green });
    }

    #[test]
    fn test_waiting_skier_lands_in_queue() {
        let mut world = World::new();
        let lift = spawn_facility(
            &mut world,
            1,
            FacilityKind::Lift {
                class: LiftClass::ChairLift,
            },
            Vec2::new(10.0, 90.0),
            Vec2::new(10.0, 10.0),
            true,
        );
        spawn_facility(
            &mut world,
            2,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 90.0),
            true,
        );
        let skier = spawn_idle(&mut world, Vec2::new(10.0, 90.0), 100.0, SkierLevel::Beginner);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);

        assert_eq!(state(&world, skier), SkierState::Waiting { facility: lift });
        assert!(world.get::<&BoardingQueue>(lift).unwrap().contains(skier));
    }

    #[test]
    fn test_mid_slope_merge() {
        let mut world = World::new();
        let trail = spawn_facility(
            &mut world,
            1,
            FacilityKind::Trail {
                difficulty: Difficulty::Green,
            },
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 90.0),
            true,
        );
        // Place the skier exactly on the curve's midpoint.
        let mid = world
            .get::<&Facility>(trail)
            .unwrap()
            .point_at(0.5);
        let skier = spawn_idle(&mut world, mid, 100.0, SkierLevel::Beginner);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);

        assert_eq!(state(&world, skier), SkierState::Skiing { facility: trail });
        let t = world.get::<&Progress>(skier).unwrap().0;
        assert!((t - 0.5).abs() < 0.1, "merged mid-slope, t={t}");
    }

    #[test]
    fn test_no_candidates_stays_idle() {
        let mut world = World::new();
        let skier = spawn_idle(&mut world, Vec2::new(500.0, 500.0), 100.0, SkierLevel::Beginner);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        decision_system(&mut world, 500.0, &mut rng);
        assert_eq!(state(&world, skier), SkierState::Idle);
    }
}
