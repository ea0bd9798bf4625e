//! Night/day policy - rewrites intrinsic facility status on phase edges.
//!
//! Day: trails reopen, carriers roll against a wind hold.
//! Night: trails gate by difficulty, carriers close and are selectively
//! reopened by reverse reachability from the surviving trails.

use super::collect_facilities;
use crate::components::{FacilityKind, FacilityStatus};
use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use snowline_logic::constants::{ADJACENCY_TOL, NIGHT_BLUE_P, NIGHT_FALLBACK_RANGE, WIND_HOLD_P};
use snowline_logic::scoring::Difficulty;
use std::collections::VecDeque;

fn set_intrinsic(world: &mut World, entity: Entity, open: bool) {
    if let Ok(mut status) = world.get::<&mut FacilityStatus>(entity) {
        *status = FacilityStatus::gated(open);
    }
}

/// Morning policy: every trail reopens; every carrier independently rolls
/// open with a small chance of a closed wind hold. Queues are untouched -
/// idle skiers simply re-route.
pub fn day_policy(world: &mut World, rng: &mut impl Rng) {
    let facilities = collect_facilities(world);
    let mut held = 0;

    for view in &facilities {
        match view.kind {
            FacilityKind::Trail { .. } => set_intrinsic(world, view.entity, true),
            FacilityKind::Lift { .. } | FacilityKind::Gondola => {
                let wind_hold = rng.gen_bool(WIND_HOLD_P);
                held += wind_hold as u32;
                set_intrinsic(world, view.entity, !wind_hold);
            }
            FacilityKind::Cafe => {}
        }
    }

    debug!("day policy: {} facilities, {} wind holds", facilities.len(), held);
}

/// Night policy: gate trails by difficulty, close carriers, then reopen the
/// carriers that can still feed an open trail (directly or through other
/// carriers). If none can, fall back to the geometrically nearest one so
/// the base resort never goes fully dead.
pub fn night_policy(world: &mut World, rng: &mut impl Rng) {
    let facilities = collect_facilities(world);

    // Trail gating: easiest tier always survives, the next opens by chance,
    // harder tiers close for the night.
    let mut open_trail = vec![false; facilities.len()];
    for (i, view) in facilities.iter().enumerate() {
        if let FacilityKind::Trail { difficulty } = view.kind {
            let open = match difficulty {
                Difficulty::Green => true,
                Difficulty::Blue => rng.gen_bool(NIGHT_BLUE_P),
                Difficulty::Red | Difficulty::Black => false,
            };
            open_trail[i] = open;
            set_intrinsic(world, view.entity, open);
        }
    }

    // Carriers close by default, then reopen by reverse reachability:
    // walk feeder edges (A -> B when A's end is near B's start) backward
    // from every open trail.
    let mut carrier_open = vec![false; facilities.len()];
    let mut frontier: VecDeque<usize> = (0..facilities.len()).filter(|&i| open_trail[i]).collect();

    while let Some(i) = frontier.pop_front() {
        for (j, feeder) in facilities.iter().enumerate() {
            if carrier_open[j] || !feeder.kind.is_carrier() {
                continue;
            }
            if feeder.end.distance(&facilities[i].start) <= ADJACENCY_TOL {
                carrier_open[j] = true;
                frontier.push_back(j);
            }
        }
    }

    let reached_any = carrier_open.iter().any(|&o| o);
    if !reached_any {
        // Disconnected layout: open the single carrier nearest any open
        // trail, if one is within a generous range.
        let mut best: Option<(usize, f32)> = None;
        for (j, view) in facilities.iter().enumerate() {
            if !view.kind.is_carrier() {
                continue;
            }
            for (i, trail) in facilities.iter().enumerate() {
                if !open_trail[i] {
                    continue;
                }
                let dist = view.end.distance(&trail.start);
                if dist <= NIGHT_FALLBACK_RANGE && best.map_or(true, |(_, d)| dist < d) {
                    best = Some((j, dist));
                }
            }
        }
        if let Some((j, dist)) = best {
            carrier_open[j] = true;
            debug!(
                "night policy: fallback reopened {:?} at distance {:.1}",
                facilities[j].id, dist
            );
        }
    }

    for (j, view) in facilities.iter().enumerate() {
        if view.kind.is_carrier() {
            set_intrinsic(world, view.entity, carrier_open[j]);
        }
    }

    debug!(
        "night policy: {} trails open, {} carriers open",
        open_trail.iter().filter(|&&o| o).count(),
        carrier_open.iter().filter(|&&o| o).count()
    );
}
