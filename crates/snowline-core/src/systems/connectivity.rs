//! Connectivity resolver - forward reachability from the base area.
//!
//! Runs every tick. A trail whose only lift access is closed is unusable
//! even if the trail itself would be open, so any gated facility not
//! reachable from an intrinsically-open base carrier is force-closed.

use super::collect_facilities;
use crate::components::FacilityStatus;
use hecs::World;
use snowline_logic::constants::ADJACENCY_TOL;
use std::collections::VecDeque;

/// Recompute effective open/closed status from intrinsic status plus graph
/// reachability. Idempotent: the result depends only on the intrinsic
/// assignment and geometry, never on the previous effective state.
pub fn connectivity_system(world: &mut World) {
    let facilities = collect_facilities(world);
    if facilities.is_empty() {
        return;
    }

    // The base area is the lower half of the playable vertical extent
    // (screen coordinates: +y down, base at larger y).
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for view in &facilities {
        min_y = min_y.min(view.start.y).min(view.end.y);
        max_y = max_y.max(view.start.y).max(view.end.y);
    }
    let base_line = (min_y + max_y) / 2.0;

    // Sources: intrinsically-open carriers loading in the base area.
    let mut reached = vec![false; facilities.len()];
    let mut frontier = VecDeque::new();
    for (i, view) in facilities.iter().enumerate() {
        if view.kind.is_carrier()
            && !view.status.intrinsically_closed()
            && view.start.y >= base_line
        {
            reached[i] = true;
            frontier.push_back(i);
        }
    }

    // Forward BFS: edge A -> B when A's end is near B's start. An
    // intrinsically-closed facility is never entered, so nothing
    // propagates through it.
    while let Some(i) = frontier.pop_front() {
        for (j, next) in facilities.iter().enumerate() {
            if reached[j] || !next.kind.is_gated() || next.status.intrinsically_closed() {
                continue;
            }
            if facilities[i].end.distance(&next.start) <= ADJACENCY_TOL {
                reached[j] = true;
                frontier.push_back(j);
            }
        }
    }

    for (i, view) in facilities.iter().enumerate() {
        if !view.kind.is_gated() {
            continue; // cafés stay ungated
        }
        let intrinsic = view.status.intrinsic_open.unwrap_or(true);
        if let Ok(mut status) = world.get::<&mut FacilityStatus>(view.entity) {
            status.open = Some(intrinsic && reached[i]);
        }
    }
}
