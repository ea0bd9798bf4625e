//! Fixed simulation constants - tolerances, probabilities, kernel parameters.
//!
//! Values here are structural: changing them changes what the simulation
//! *is*, not how a particular resort is tuned. Per-resort tuning lives in
//! [`crate::config::TuningConfig`].

/// Minimum facility length; all lengths are clamped here before division.
pub const MIN_LENGTH: f32 = 1.0;

/// Two facilities connect when one's end is within this of the other's start.
pub const ADJACENCY_TOL: f32 = 2.0;

/// A skier standing within this of a facility start can enter at its gate.
pub const SNAP_TOL: f32 = 1.5;

/// Maximum lateral distance for merging onto a trail mid-slope.
pub const MERGE_TOL: f32 = 1.0;

/// Interior parameter band in which mid-slope merges are allowed.
pub const MERGE_T_MIN: f32 = 0.05;
pub const MERGE_T_MAX: f32 = 0.95;

/// Sample count for the nearest-point-on-curve scan.
pub const CURVE_SAMPLES: u32 = 30;

/// Seed for the id -> curve-shape hash. Stable across processes.
pub const CURVE_HASH_SEED: u64 = 0x534e_4f57;

/// Fallback progress rate when a computed speed is non-finite.
pub const EPSILON_RATE: f32 = 1e-4;

/// Positional jitter applied when snapping an arrival to a facility end.
pub const ARRIVAL_JITTER: f32 = 0.75;

/// Fraction of a lift's seat cycle during which boarding is possible.
pub const BOARDING_WINDOW: f32 = 0.2;

/// Probability that a lift/gondola stays closed on a morning wind hold.
pub const WIND_HOLD_P: f64 = 0.08;

/// Probability that a Blue trail stays open overnight.
pub const NIGHT_BLUE_P: f64 = 0.5;

/// Maximum distance for the nearest-lift night reopening fallback.
pub const NIGHT_FALLBACK_RANGE: f32 = 60.0;

/// Hunger below this sends a skier looking for food above all else.
pub const HUNGER_CRITICAL: f32 = 30.0;

/// Radius within which a hungry skier considers cafés.
pub const CAFE_SEEK_RADIUS: f32 = 40.0;

/// Flat score bonus that makes hunger dominate all other motives.
pub const HUNGER_BONUS: f32 = 50.0;

/// Small edge a mid-slope merge candidate has over a cold gate start.
pub const MERGE_BONUS: f32 = 2.0;

/// Attraction bonus for a freshly built trail, and how long it lasts.
pub const NEW_TRAIL_BONUS: f32 = 8.0;
pub const NEW_TRAIL_WINDOW: f64 = 120.0;

/// Trees within this of a new facility's curve are cleared at build time.
pub const TREE_CLEAR_RADIUS: f32 = 3.0;

/// Lifetime of a floating feedback label, in seconds.
pub const LABEL_LIFETIME: f32 = 2.5;
