//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod facilities;
mod skiers;

pub use common::*;
pub use facilities::*;
pub use skiers::*;
