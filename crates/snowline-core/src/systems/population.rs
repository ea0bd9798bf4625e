//! Skier arrivals - periodic spawning at the resort entrance up to the
//! population cap.

use crate::components::{
    Hunger, Mobility, Position, Progress, Progression, Skier, SkierState, skier_label,
};
use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use snowline_logic::config::TuningConfig;

/// Spawn a fresh beginner at the entrance. `seq` drives the alphabetic
/// label and is advanced by the caller's counter.
pub fn spawn_skier(
    world: &mut World,
    cfg: &TuningConfig,
    rng: &mut impl Rng,
    seq: u64,
    sim_time: f64,
) -> Entity {
    let label = skier_label(seq);
    debug!("skier {label} arrives at t={sim_time:.1}");
    world.spawn((
        Skier {
            label,
            created_at: sim_time,
        },
        Position(cfg.spawn_point),
        SkierState::Idle,
        Progress(0.0),
        Progression::beginner(),
        Hunger::default(),
        Mobility {
            speed_variance: rng.gen_range(cfg.speed_variance_min..=cfg.speed_variance_max),
            next_rental_due: sim_time + cfg.economy.rental_interval,
        },
    ))
}

/// Spawn on the configured interval while under the population cap.
/// Returns the new arrival, if any.
pub fn population_system(
    world: &mut World,
    sim_time: f64,
    cfg: &TuningConfig,
    rng: &mut impl Rng,
    next_seq: &mut u64,
    last_spawn: &mut f64,
) -> Option<Entity> {
    if sim_time - *last_spawn < cfg.spawn_interval {
        return None;
    }
    *last_spawn = sim_time;

    let population = world.query_mut::<&Skier>().into_iter().count();
    if population >= cfg.max_population {
        return None;
    }

    let seq = *next_seq;
    *next_seq += 1;
    Some(spawn_skier(world, cfg, rng, seq, sim_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_respects_interval() {
        let mut world = World::new();
        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut seq = 0;
        let mut last_spawn = 0.0;

        assert!(population_system(&mut world, 5.0, &cfg, &mut rng, &mut seq, &mut last_spawn)
            .is_none());
        assert!(population_system(
            &mut world,
            cfg.spawn_interval,
            &cfg,
            &mut rng,
            &mut seq,
            &mut last_spawn
        )
        .is_some());
        // Interval restarts from the spawn.
        assert!(population_system(
            &mut world,
            cfg.spawn_interval + 1.0,
            &cfg,
            &mut rng,
            &mut seq,
            &mut last_spawn
        )
        .is_none());
    }

    #[test]
    fn test_population_cap() {
        let mut world = World::new();
        let mut cfg = TuningConfig::default();
        cfg.max_population = 2;
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for seq in 0..2 {
            spawn_skier(&mut world, &cfg, &mut rng, seq, 0.0);
        }
        let mut seq = 2;
        let mut last_spawn = 0.0;
        assert!(population_system(
            &mut world,
            cfg.spawn_interval,
            &cfg,
            &mut rng,
            &mut seq,
            &mut last_spawn
        )
        .is_none());
    }

    #[test]
    fn test_new_arrival_is_beginner_with_variance_in_band() {
        let mut world = World::new();
        let cfg = TuningConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let skier = spawn_skier(&mut world, &cfg, &mut rng, 0, 12.0);
        let mobility = *world.get::<&Mobility>(skier).unwrap();
        assert!(
            (cfg.speed_variance_min..=cfg.speed_variance_max).contains(&mobility.speed_variance)
        );
        assert_eq!(mobility.next_rental_due, 12.0 + cfg.economy.rental_interval);
        assert_eq!(world.get::<&Skier>(skier).unwrap().label, "A");
        assert!(world.get::<&SkierState>(skier).unwrap().is_idle());
    }
}
