//! Simulation systems - the logic that runs each tick, one module per
//! pipeline stage.
//!
//! Tick order is fixed: clock -> policy (on phase edges) -> connectivity ->
//! boarding -> decision -> movement -> needs -> economy -> population.
//! Later stages depend on the open/closed and queue state established by
//! earlier stages within the same tick.

mod boarding;
mod clock;
mod connectivity;
mod decision;
mod economy;
mod movement;
mod needs;
mod policy;
mod population;

pub use boarding::*;
pub use clock::*;
pub use connectivity::*;
pub use decision::*;
pub use economy::*;
pub use movement::*;
pub use needs::*;
pub use policy::*;
pub use population::*;

use crate::components::{Facility, FacilityId, FacilityKind, FacilityStatus};
use hecs::{Entity, World};
use snowline_logic::geometry::Vec2;

/// Per-tick snapshot of one facility, shared by the graph systems so each
/// does not re-query the world mid-iteration.
#[derive(Debug, Clone)]
pub(crate) struct FacilityView {
    pub entity: Entity,
    pub id: FacilityId,
    pub kind: FacilityKind,
    pub start: Vec2,
    pub end: Vec2,
    pub status: FacilityStatus,
}

pub(crate) fn collect_facilities(world: &World) -> Vec<FacilityView> {
    world
        .query::<(&Facility, &FacilityStatus)>()
        .iter()
        .map(|(entity, (f, status))| FacilityView {
            entity,
            id: f.id,
            kind: f.kind,
            start: f.start,
            end: f.end,
            status: *status,
        })
        .collect()
}
