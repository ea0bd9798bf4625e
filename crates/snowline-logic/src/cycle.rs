//! Day/night cycle clock.
//!
//! Stateless: a function of elapsed time and four configured durations.
//! Edge detection (just-became-night / just-became-day) is the caller's
//! job, by comparing the previous tick's phase to the new one.

use serde::{Deserialize, Serialize};

/// The four cycle segment durations, in simulation seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CycleConfig {
    pub day: f64,
    /// Fade from day to night.
    pub dusk: f64,
    pub night: f64,
    /// Fade from night back to day.
    pub dawn: f64,
}

impl CycleConfig {
    pub fn total(&self) -> f64 {
        self.day + self.dusk + self.night + self.dawn
    }
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            day: 120.0,
            dusk: 10.0,
            night: 60.0,
            dawn: 10.0,
        }
    }
}

/// Instantaneous phase of the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePhase {
    pub is_night: bool,
    /// Darkness overlay opacity in [0,1]; ramps linearly across each fade.
    pub light_opacity: f32,
}

/// Map elapsed time onto the cycle.
///
/// The night flag flips exactly twice per cycle: to night at the end of
/// dusk, back to day at the start of dawn (while the opacity is still
/// fading out).
pub fn phase_at(elapsed: f64, config: &CycleConfig) -> CyclePhase {
    let total = config.total();
    if total <= 0.0 {
        return CyclePhase {
            is_night: false,
            light_opacity: 0.0,
        };
    }
    let t = elapsed.rem_euclid(total);

    let dusk_start = config.day;
    let night_start = config.day + config.dusk;
    let dawn_start = night_start + config.night;

    if t < dusk_start {
        CyclePhase {
            is_night: false,
            light_opacity: 0.0,
        }
    } else if t < night_start {
        let f = if config.dusk > 0.0 {
            (t - dusk_start) / config.dusk
        } else {
            1.0
        };
        CyclePhase {
            is_night: false,
            light_opacity: f as f32,
        }
    } else if t < dawn_start {
        CyclePhase {
            is_night: true,
            light_opacity: 1.0,
        }
    } else {
        let f = if config.dawn > 0.0 {
            (t - dawn_start) / config.dawn
        } else {
            1.0
        };
        CyclePhase {
            is_night: false,
            light_opacity: (1.0 - f) as f32,
        }
    }
}
