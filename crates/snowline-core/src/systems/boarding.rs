//! Lift boarding scheduler - admits queued skiers into free seats during
//! the boarding window of each carrier's seat cycle.
//!
//! Seats pass the loading terminal in discrete pulses: the continuous
//! cycle position modulo 1 defines a phase, and boarding only happens
//! while the phase is inside the initial window.

use crate::components::{BoardingQueue, Facility, FacilityStatus, Progress, SkierState};
use hecs::{Entity, World};
use rand::Rng;
use snowline_logic::constants::BOARDING_WINDOW;
use std::collections::HashMap;

/// Board queued skiers onto open carriers, then self-heal any waiting
/// skier that fell out of its queue.
pub fn boarding_system(world: &mut World, sim_time: f64, lift_speed: f32, rng: &mut impl Rng) {
    // Seats currently occupied near the terminal, per carrier.
    let mut occupied: HashMap<Entity, Vec<u32>> = HashMap::new();
    for (_, (state, progress)) in world.query::<(&SkierState, &Progress)>().iter() {
        if let SkierState::Lifting { facility, seat } = state {
            if progress.0 < BOARDING_WINDOW {
                occupied.entry(*facility).or_default().push(*seat);
            }
        }
    }

    // Plan admissions per carrier without mutating mid-iteration.
    struct Plan {
        carrier: Entity,
        admitted: Vec<(Entity, u32)>,
        phase: f32,
    }
    let mut plans = Vec::new();

    for (carrier, (facility, status, queue)) in world
        .query::<(&Facility, &FacilityStatus, &BoardingQueue)>()
        .iter()
    {
        if !facility.kind.is_carrier() || !status.is_open() || queue.0.is_empty() {
            continue;
        }

        let rate = lift_speed / facility.length;
        let phase = (sim_time * rate as f64).fract() as f32;
        if phase >= BOARDING_WINDOW {
            continue;
        }

        let capacity = facility.seat_count();
        let taken = occupied.remove(&carrier).unwrap_or_default();
        let mut free: Vec<u32> = (0..capacity).filter(|s| !taken.contains(s)).collect();

        // Admit up to the free-seat count from the queue head, atomically.
        let admit = free.len().min(queue.0.len());
        let mut admitted = Vec::with_capacity(admit);
        for &skier in queue.0.iter().take(admit) {
            // Randomized seat choice gives single-capacity carriers some
            // visual variety.
            let seat = free.swap_remove(rng.gen_range(0..free.len()));
            admitted.push((skier, seat));
        }

        if !admitted.is_empty() {
            plans.push(Plan {
                carrier,
                admitted,
                phase,
            });
        }
    }

    for plan in plans {
        if let Ok(mut queue) = world.get::<&mut BoardingQueue>(plan.carrier) {
            queue.0.drain(..plan.admitted.len());
        }
        for (skier, seat) in plan.admitted {
            if let Ok(mut state) = world.get::<&mut SkierState>(skier) {
                *state = SkierState::Lifting {
                    facility: plan.carrier,
                    seat,
                };
            }
            if let Ok(mut progress) = world.get::<&mut Progress>(skier) {
                progress.0 = plan.phase;
            }
        }
    }

    requeue_waiting(world);
}

/// Consistency self-heal: a skier marked waiting but absent from its
/// facility's queue is re-enqueued (idempotently, preserving FIFO order
/// for everyone already queued).
fn requeue_waiting(world: &mut World) {
    let mut strays = Vec::new();
    for (skier, state) in world.query::<&SkierState>().iter() {
        if let SkierState::Waiting { facility } = state {
            match world.get::<&BoardingQueue>(*facility) {
                Ok(queue) if queue.contains(skier) => {}
                Ok(_) => strays.push((skier, *facility)),
                Err(_) => {} // dangling reference, healed by the engine
            }
        }
    }
    for (skier, facility) in strays {
        if let Ok(mut queue) = world.get::<&mut BoardingQueue>(facility) {
            queue.enqueue(skier);
        }
    }
}
