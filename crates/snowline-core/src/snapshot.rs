//! Layout snapshots - persist the facility set and coin balance.
//!
//! Live skier state is deliberately excluded: a loaded resort starts a
//! fresh day with a fresh population, so snapshots never carry entity ids.

use crate::components::{BoardingQueue, Facility, FacilityStatus, Vec2};
use crate::engine::SimulationEngine;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

/// Snapshot format version; bump when the layout shape changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

#[derive(Serialize, Deserialize)]
struct LayoutSnapshot {
    version: u32,
    coins: i64,
    trees: Vec<Vec2>,
    facilities: Vec<Facility>,
}

/// Write the current layout to `writer`.
pub fn save_layout<W: Write>(engine: &SimulationEngine, writer: W) -> Result<(), SnapshotError> {
    let facilities: Vec<Facility> = engine
        .world
        .query::<&Facility>()
        .iter()
        .map(|(_, f)| f.clone())
        .collect();

    let snapshot = LayoutSnapshot {
        version: SNAPSHOT_VERSION,
        coins: engine.coins(),
        trees: engine.trees.clone(),
        facilities,
    };
    bincode::serialize_into(writer, &snapshot)?;
    Ok(())
}

/// Replace the engine's facilities, trees, and balance with a saved layout.
/// Skiers in the world are left alone; dangling references they may hold
/// are healed on the next tick.
pub fn load_layout<R: Read>(engine: &mut SimulationEngine, reader: R) -> Result<(), SnapshotError> {
    let snapshot: LayoutSnapshot = bincode::deserialize_from(reader)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }

    let old: Vec<_> = engine
        .world
        .query::<&Facility>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in old {
        let _ = engine.world.despawn(entity);
    }

    let mut max_id = 0;
    for facility in snapshot.facilities {
        max_id = max_id.max(facility.id.0);
        let status = if facility.kind.is_gated() {
            FacilityStatus::gated(true)
        } else {
            FacilityStatus::always_open()
        };
        engine
            .world
            .spawn((facility, status, BoardingQueue::default()));
    }
    // Resume the id sequence past the loaded set so later construction
    // never reuses a stable id (ids key lookup, demolition, and the
    // deterministic curve hash).
    engine.next_facility_id = max_id + 1;
    engine.ledger.coins = snapshot.coins;
    engine.trees = snapshot.trees;
    Ok(())
}
