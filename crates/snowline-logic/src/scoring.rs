//! Skill levels, trail difficulties, preference scores, speed multipliers,
//! and the weighted ticket lottery used by the decision engine.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Trail difficulty tiers, easiest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Green,
    Blue,
    Red,
    Black,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Green,
        Difficulty::Blue,
        Difficulty::Red,
        Difficulty::Black,
    ];

    fn tier(&self) -> i32 {
        match self {
            Difficulty::Green => 0,
            Difficulty::Blue => 1,
            Difficulty::Red => 2,
            Difficulty::Black => 3,
        }
    }
}

/// Skier skill levels; monotonically non-decreasing over a skier's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkierLevel {
    Beginner,
    Amateur,
    Advanced,
    Expertise,
}

impl SkierLevel {
    fn tier(&self) -> i32 {
        match self {
            SkierLevel::Beginner => 0,
            SkierLevel::Amateur => 1,
            SkierLevel::Advanced => 2,
            SkierLevel::Expertise => 3,
        }
    }

    /// The difficulty a skier of this level must complete to progress.
    pub fn promotion_target(&self) -> Difficulty {
        match self {
            SkierLevel::Beginner => Difficulty::Green,
            SkierLevel::Amateur => Difficulty::Blue,
            SkierLevel::Advanced => Difficulty::Red,
            SkierLevel::Expertise => Difficulty::Black,
        }
    }

    /// Next level up, or None at the top tier.
    pub fn next(&self) -> Option<SkierLevel> {
        match self {
            SkierLevel::Beginner => Some(SkierLevel::Amateur),
            SkierLevel::Amateur => Some(SkierLevel::Advanced),
            SkierLevel::Advanced => Some(SkierLevel::Expertise),
            SkierLevel::Expertise => None,
        }
    }
}

/// How desirable a trail of `difficulty` is to a skier of `level`.
///
/// Own-level trails score highest; one-easier "comfort" trails score
/// moderately; much harder trails score near zero.
pub fn preference(level: SkierLevel, difficulty: Difficulty) -> f32 {
    match difficulty.tier() - level.tier() {
        0 => 10.0,
        -1 => 4.0,
        1 => 2.0,
        d if d <= -2 => 1.0,
        _ => 0.0,
    }
}

/// Harder trails are nominally faster to traverse.
pub fn difficulty_speed_multiplier(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Green => 1.0,
        Difficulty::Blue => 1.15,
        Difficulty::Red => 1.3,
        Difficulty::Black => 1.5,
    }
}

/// Better skiers descend faster.
pub fn level_speed_multiplier(level: SkierLevel) -> f32 {
    match level {
        SkierLevel::Beginner => 0.8,
        SkierLevel::Amateur => 1.0,
        SkierLevel::Advanced => 1.15,
        SkierLevel::Expertise => 1.3,
    }
}

/// Penalty when a trail outclasses the skier.
pub fn mismatch_penalty(level: SkierLevel, difficulty: Difficulty) -> f32 {
    let gap = difficulty.tier() - level.tier();
    match gap {
        g if g <= 0 => 1.0,
        1 => 0.7,
        _ => 0.45,
    }
}

/// Penalty when hunger is critically low.
pub fn hunger_penalty(hunger: f32, critical: f32) -> f32 {
    if hunger < critical {
        0.6
    } else {
        1.0
    }
}

/// Environmental multiplier from snow depth, in [0.4, 1.0].
///
/// Too little snow slows skiing hard; excessive depth imposes a mild
/// penalty. The comfortable band is roughly 30-80 units.
pub fn snow_multiplier(depth: f32) -> f32 {
    if depth < 10.0 {
        0.4
    } else if depth < 30.0 {
        0.4 + 0.6 * (depth - 10.0) / 20.0
    } else if depth <= 80.0 {
        1.0
    } else {
        0.85
    }
}

/// Weighted ticket lottery over candidate scores.
///
/// Each positive-scored candidate contributes `max(floor(score), 1)`
/// tickets. When every candidate scores zero, falls back to a uniform
/// draw over all candidates. Empty input yields None.
pub fn weighted_pick(rng: &mut impl Rng, scores: &[f32]) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }

    let tickets: Vec<u32> = scores
        .iter()
        .map(|&s| if s > 0.0 { (s.floor() as u32).max(1) } else { 0 })
        .collect();
    let total: u32 = tickets.iter().sum();

    if total == 0 {
        return Some(rng.gen_range(0..scores.len()));
    }

    let mut draw = rng.gen_range(0..total);
    for (i, &t) in tickets.iter().enumerate() {
        if draw < t {
            return Some(i);
        }
        draw -= t;
    }
    // Unreachable with a correct total; keep the last index as a guard.
    Some(scores.len() - 1)
}
