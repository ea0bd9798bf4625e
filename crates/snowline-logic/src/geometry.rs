//! Geometry kernel - pure math over points, segments, polygons, and the
//! parametric trail curves.
//!
//! Trail curves are a straight base interpolation plus a perpendicular
//! sinusoidal offset. The frequency and amplitude derive from a stable hash
//! of the facility id, so a given trail evaluates to the same curve across
//! ticks and across processes.

use crate::constants::{CURVE_HASH_SEED, CURVE_SAMPLES, MIN_LENGTH};
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

/// 2D position in continuous grid units. A value type with no identity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Perpendicular (rotated 90° counter-clockwise).
    pub fn perp(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Ray-casting parity test. Points exactly on an edge may land either way.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let slope_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < slope_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Closest point on segment `a -> b` to `p`, with the clamped parameter t.
pub fn project_onto_segment(p: Vec2, a: Vec2, b: Vec2) -> (Vec2, f32) {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-6 {
        return (a, 0.0);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Shape of a trail's sinusoidal offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Whole number of half-waves, so the offset vanishes at both endpoints.
    pub frequency: f32,
    pub amplitude: f32,
}

/// Derive curve shape deterministically from the facility id and length.
pub fn curve_params(facility_id: u32, length: f32) -> CurveParams {
    let hash = XxHash64::oneshot(CURVE_HASH_SEED, &facility_id.to_le_bytes());
    let frequency = 1.0 + (hash % 3) as f32;
    // Amplitude scales with length but stays narrow enough that merge
    // tolerances remain meaningful.
    let scale = 0.5 + ((hash >> 8) % 100) as f32 / 100.0;
    let amplitude = (length.max(MIN_LENGTH) * 0.06).clamp(0.4, 4.0) * scale;
    CurveParams {
        frequency,
        amplitude,
    }
}

/// Evaluate the trail curve at parameter `t` in [0,1].
///
/// Returns exactly `start` at t=0 and exactly `end` at t=1 because the
/// frequency is a whole number of half-waves.
pub fn curve_point(start: Vec2, end: Vec2, params: CurveParams, t: f32) -> Vec2 {
    let base = start + (end - start) * t;
    let dir = (end - start).normalize();
    let offset = params.amplitude * (std::f32::consts::PI * t * params.frequency).sin();
    base + dir.perp() * offset
}

/// Dense fixed-step nearest-point search on a trail curve.
///
/// An approximation, not an analytic solution; acceptable because it only
/// gates snap/merge tolerances of about one grid unit.
pub fn nearest_on_curve(p: Vec2, start: Vec2, end: Vec2, params: CurveParams) -> (f32, f32) {
    let mut best_t = 0.0;
    let mut best_dist = f32::MAX;
    for i in 0..=CURVE_SAMPLES {
        let t = i as f32 / CURVE_SAMPLES as f32;
        let dist = curve_point(start, end, params, t).distance(&p);
        if dist < best_dist {
            best_dist = dist;
            best_t = t;
        }
    }
    (best_t, best_dist)
}

/// Euclidean length of a facility, clamped to the division-safe minimum.
pub fn facility_length(start: Vec2, end: Vec2) -> f32 {
    start.distance(&end).max(MIN_LENGTH)
}
