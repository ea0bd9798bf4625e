//! Hunger, meals, and overnight rest.
//!
//! Hunger decays for everyone not at a table; eating runs on the shared
//! progress component as a meal timer and refills hunger on completion.
//! Rest transitions are edge-triggered by the day/night clock.

use crate::components::{Facility, Hunger, Position, Progress, SkierState, Vec2};
use hecs::{Entity, World};
use snowline_logic::config::TuningConfig;
use std::collections::HashMap;

/// A skier finished a meal this tick; the engine charges for it.
#[derive(Debug, Clone, Copy)]
pub struct MealFinished {
    pub pos: Vec2,
}

/// Decay hunger and advance meal timers. Returns finished meals.
pub fn needs_system(world: &mut World, dt: f32, cfg: &TuningConfig) -> Vec<MealFinished> {
    let cafe_ends: HashMap<Entity, Vec2> = world
        .query::<&Facility>()
        .iter()
        .map(|(entity, f)| (entity, f.end))
        .collect();

    let mut meals = Vec::new();
    for (_, (state, progress, position, hunger)) in world
        .query_mut::<(&mut SkierState, &mut Progress, &mut Position, &mut Hunger)>()
    {
        if let SkierState::Eating { facility } = *state {
            progress.0 += dt / cfg.eating_duration;
            if progress.0 >= 1.0 {
                hunger.0 = 100.0;
                progress.0 = 0.0;
                if let Some(end) = cafe_ends.get(&facility) {
                    position.0 = *end;
                }
                *state = SkierState::Idle;
                meals.push(MealFinished { pos: position.0 });
            }
        } else {
            hunger.0 = (hunger.0 - cfg.hunger_decay_rate * dt).max(0.0);
        }
    }
    meals
}

/// Night edge: idle skiers check into the hotel. Returns their positions so
/// the engine can charge for the rooms.
pub fn night_edge(world: &mut World) -> Vec<Vec2> {
    let mut checked_in = Vec::new();
    for (_, (state, position)) in world.query_mut::<(&mut SkierState, &Position)>() {
        if state.is_idle() {
            *state = SkierState::Resting;
            checked_in.push(position.0);
        }
    }
    checked_in
}

/// Day edge: everyone wakes up.
pub fn day_edge(world: &mut World) {
    for (_, state) in world.query_mut::<&mut SkierState>() {
        if matches!(state, SkierState::Resting) {
            *state = SkierState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        BoardingQueue, FacilityId, FacilityKind, FacilityStatus, Mobility, Progression, Skier,
    };

    fn spawn_skier(world: &mut World, state: SkierState, hunger: f32) -> Entity {
        world.spawn((
            Skier {
                label: "A".into(),
                created_at: 0.0,
            },
            Position::new(10.0, 90.0),
            state,
            Progress(0.0),
            Progression::beginner(),
            Hunger(hunger),
            Mobility {
                speed_variance: 1.0,
                next_rental_due: 90.0,
            },
        ))
    }

    #[test]
    fn test_hunger_decays_and_floors_at_zero() {
        let mut world = World::new();
        let skier = spawn_skier(&mut world, SkierState::Idle, 1.0);
        let cfg = TuningConfig::default();

        needs_system(&mut world, 1.0, &cfg);
        let h1 = world.get::<&Hunger>(skier).unwrap().0;
        assert!(h1 < 1.0);

        needs_system(&mut world, 100.0, &cfg);
        assert_eq!(world.get::<&Hunger>(skier).unwrap().0, 0.0);
    }

    #[test]
    fn test_meal_refills_and_frees_skier() {
        let mut world = World::new();
        let cafe = world.spawn((
            Facility::new(
                FacilityId(1),
                "Base Café",
                FacilityKind::Cafe,
                Vec2::new(10.0, 90.0),
                Vec2::new(14.0, 90.0),
                0.0,
            ),
            FacilityStatus::always_open(),
            BoardingQueue::default(),
        ));
        let skier = spawn_skier(&mut world, SkierState::Eating { facility: cafe }, 20.0);
        let cfg = TuningConfig::default();

        // Part-way through the meal nothing changes yet.
        let meals = needs_system(&mut world, cfg.eating_duration * 0.5, &cfg);
        assert!(meals.is_empty());
        assert_eq!(world.get::<&Hunger>(skier).unwrap().0, 20.0);

        let meals = needs_system(&mut world, cfg.eating_duration, &cfg);
        assert_eq!(meals.len(), 1);
        assert_eq!(world.get::<&Hunger>(skier).unwrap().0, 100.0);
        assert_eq!(*world.get::<&SkierState>(skier).unwrap(), SkierState::Idle);
        let pos = world.get::<&Position>(skier).unwrap().0;
        assert_eq!((pos.x, pos.y), (14.0, 90.0), "ends at the café exit");
    }

    #[test]
    fn test_night_edge_rests_only_idle() {
        let mut world = World::new();
        let idle = spawn_skier(&mut world, SkierState::Idle, 80.0);
        let trail = world.spawn(());
        let skiing = spawn_skier(&mut world, SkierState::Skiing { facility: trail }, 80.0);

        let checked_in = night_edge(&mut world);
        assert_eq!(checked_in.len(), 1);
        assert_eq!(
            *world.get::<&SkierState>(idle).unwrap(),
            SkierState::Resting
        );
        assert!(matches!(
            *world.get::<&SkierState>(skiing).unwrap(),
            SkierState::Skiing { .. }
        ));
    }

    #[test]
    fn test_day_edge_wakes_everyone() {
        let mut world = World::new();
        let skier = spawn_skier(&mut world, SkierState::Resting, 80.0);
        day_edge(&mut world);
        assert_eq!(*world.get::<&SkierState>(skier).unwrap(), SkierState::Idle);
    }
}
