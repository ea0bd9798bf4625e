//! Facility components: trails, lifts, gondolas, and cafés.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use snowline_logic::geometry::{self, CurveParams, Vec2};
use snowline_logic::scoring::Difficulty;

/// Stable facility identifier, independent of the ECS entity id. External
/// commands and the curve hash both key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacilityId(pub u32);

/// Mechanism class of a lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiftClass {
    ChairLift,
    TBar,
    MagicCarpet,
}

/// Tagged facility variant; each carries only the fields relevant to it,
/// so invalid combinations are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityKind {
    Trail { difficulty: Difficulty },
    Lift { class: LiftClass },
    Gondola,
    Cafe,
}

impl FacilityKind {
    /// Lifts and gondolas carry seated passengers in discrete units.
    pub fn is_carrier(&self) -> bool {
        matches!(self, FacilityKind::Lift { .. } | FacilityKind::Gondola)
    }

    /// Trails, lifts, and gondolas are gated by phase policy and
    /// reachability; cafés are always open.
    pub fn is_gated(&self) -> bool {
        !matches!(self, FacilityKind::Cafe)
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            FacilityKind::Trail { difficulty } => Some(*difficulty),
            _ => None,
        }
    }
}

/// Core facility component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    /// Cosmetic display name.
    pub name: String,
    pub kind: FacilityKind,
    pub start: Vec2,
    pub end: Vec2,
    /// Cached Euclidean distance, clamped to the division-safe minimum.
    /// Used as the curve parametrization scale.
    pub length: f32,
    /// Explicit seat count per carrying unit; carriers without one derive
    /// it from length.
    pub capacity: Option<u32>,
    /// Simulation time of construction; drives the new-facility bonus.
    pub created_at: f64,
}

impl Facility {
    pub fn new(
        id: FacilityId,
        name: impl Into<String>,
        kind: FacilityKind,
        start: Vec2,
        end: Vec2,
        created_at: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            start,
            end,
            length: geometry::facility_length(start, end),
            capacity: None,
            created_at,
        }
    }

    pub fn with_capacity(mut self, seats: u32) -> Self {
        self.capacity = Some(seats);
        self
    }

    /// Seat count: explicit capacity, else roughly one seat unit per two
    /// length units, minimum one. Zero for non-carriers.
    pub fn seat_count(&self) -> u32 {
        if !self.kind.is_carrier() {
            return 0;
        }
        self.capacity
            .unwrap_or_else(|| ((self.length / 2.0) as u32).max(1))
    }

    /// Deterministic curve shape for trails.
    pub fn curve(&self) -> CurveParams {
        geometry::curve_params(self.id.0, self.length)
    }

    /// Point on this facility at parameter t (curved for trails, straight
    /// for everything else).
    pub fn point_at(&self, t: f32) -> Vec2 {
        match self.kind {
            FacilityKind::Trail { .. } => geometry::curve_point(self.start, self.end, self.curve(), t),
            _ => self.start + (self.end - self.start) * t,
        }
    }
}

/// Open/closed state, split into what the phase policy decided (intrinsic)
/// and what connectivity resolution produced (effective). The resolver
/// recomputes `open` from `intrinsic_open` every tick, which keeps it
/// idempotent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FacilityStatus {
    /// Policy-owned status. `None` = ungated (cafés).
    pub intrinsic_open: Option<bool>,
    /// Effective status after reachability. `None` = ungated.
    pub open: Option<bool>,
}

impl FacilityStatus {
    pub fn always_open() -> Self {
        Self::default()
    }

    pub fn gated(open: bool) -> Self {
        Self {
            intrinsic_open: Some(open),
            open: Some(open),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.unwrap_or(true)
    }

    pub fn intrinsically_closed(&self) -> bool {
        self.intrinsic_open == Some(false)
    }
}

/// FIFO of skiers waiting to board a carrier. A skier appears in at most
/// one queue at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardingQueue(#[serde(skip)] pub Vec<Entity>);

impl BoardingQueue {
    pub fn contains(&self, skier: Entity) -> bool {
        self.0.contains(&skier)
    }

    /// Append unless already present; never double-enqueues.
    pub fn enqueue(&mut self, skier: Entity) {
        if !self.contains(skier) {
            self.0.push(skier);
        }
    }

    pub fn remove(&mut self, skier: Entity) {
        self.0.retain(|&e| e != skier);
    }
}
