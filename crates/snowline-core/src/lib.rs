//! Snowline Core - Ski Resort Simulation Engine
//!
//! An ECS-based simulation of a mountain resort: autonomous skiers route
//! themselves over a directed network of trails, lifts, gondolas, and
//! cafés, under a day/night cycle, capacity-constrained lift boarding,
//! and reachability-gated facility availability.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) via `hecs`:
//! - **Entities**: Skiers and facilities
//! - **Components**: Pure data (Position, Facility, BoardingQueue, etc.)
//! - **Systems**: One per tick stage, run in a fixed order
//!
//! # Example
//!
//! ```rust,no_run
//! use snowline_core::prelude::*;
//! use snowline_core::generation::{generate_resort, ResortConfig};
//! use snowline_logic::config::TuningConfig;
//!
//! let mut engine = SimulationEngine::from_seed(TuningConfig::default(), 42);
//! generate_resort(&mut engine, &ResortConfig::default());
//!
//! loop {
//!     engine.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod engine;
pub mod generation;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{BuildOrder, CommandError, SimulationEngine};
    pub use crate::systems::Ledger;
}
