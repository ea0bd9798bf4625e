//! Pure simulation logic for Snowline.
//!
//! This crate contains all resort logic that is independent of the ECS
//! world or any runtime. Functions take plain data and return results,
//! making them unit-testable and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Tuning configuration: speeds, thresholds, cycle durations |
//! | [`constants`] | Fixed tolerances, probabilities, and kernel parameters |
//! | [`cycle`] | Day/night cycle clock and fade-opacity interpolation |
//! | [`economy`] | Tariff table and passive income accrual |
//! | [`geometry`] | Point/polygon tests, segment projection, trail curves |
//! | [`scoring`] | Skill levels, trail difficulties, preference weights, lottery |

pub mod config;
pub mod constants;
pub mod cycle;
pub mod economy;
pub mod geometry;
pub mod scoring;
