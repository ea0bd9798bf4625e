//! Skier components: identity, behavioral state, progression, and needs.

use hecs::Entity;
use serde::{Deserialize, Serialize};
pub use snowline_logic::scoring::SkierLevel;

/// Identity component for a skier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skier {
    /// Base-26 alphabetic display label (A, B, ..., Z, AA, AB, ...).
    pub label: String,
    /// Simulation time of arrival at the resort.
    pub created_at: f64,
}

/// Base-26 alphabetic label for the n-th skier (0 = "A", 25 = "Z", 26 = "AA").
pub fn skier_label(seq: u64) -> String {
    let mut n = seq;
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_else(|_| "A".to_string())
}

/// Behavioral state. The facility link exists iff the state requires one,
/// so a dangling `current_facility_id` cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkierState {
    Idle,
    /// In a carrier's boarding queue.
    Waiting {
        #[serde(skip, default = "dangling_entity")]
        facility: Entity,
    },
    /// Descending a trail.
    Skiing {
        #[serde(skip, default = "dangling_entity")]
        facility: Entity,
    },
    /// Aboard a carrier, in a specific seat slot.
    Lifting {
        #[serde(skip, default = "dangling_entity")]
        facility: Entity,
        seat: u32,
    },
    /// At a café; progress acts as the meal timer.
    Eating {
        #[serde(skip, default = "dangling_entity")]
        facility: Entity,
    },
    /// Overnight hotel rest; wakes on the day edge.
    Resting,
}

fn dangling_entity() -> Entity {
    Entity::DANGLING
}

impl SkierState {
    /// The facility this state is bound to, if any.
    pub fn facility(&self) -> Option<Entity> {
        match self {
            SkierState::Waiting { facility }
            | SkierState::Skiing { facility }
            | SkierState::Lifting { facility, .. }
            | SkierState::Eating { facility } => Some(*facility),
            SkierState::Idle | SkierState::Resting => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SkierState::Idle)
    }
}

/// Normalized progress along the current facility, clamped to [0,1].
/// Meaningless while idle or resting.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Progress(pub f32);

/// Skill progression counters. `level` never regresses; the active counter
/// resets on promotion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Progression {
    pub level: SkierLevel,
    /// Completed rides on the promotion-target difficulty.
    pub ride_count: u32,
    /// Accumulated seconds skiing the target difficulty (time-based rule).
    pub time_on_target: f64,
}

impl Progression {
    pub fn beginner() -> Self {
        Self {
            level: SkierLevel::Beginner,
            ride_count: 0,
            time_on_target: 0.0,
        }
    }
}

/// Hunger in [0,100]; decays while not eating and gates café-seeking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hunger(pub f32);

impl Default for Hunger {
    fn default() -> Self {
        Self(100.0)
    }
}

/// Fixed per-skier traits drawn once at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Mobility {
    /// Narrow-band speed multiplier so skiers never move in lockstep.
    pub speed_variance: f32,
    /// Next simulation time an equipment rental charge is due.
    pub next_rental_due: f64,
}
