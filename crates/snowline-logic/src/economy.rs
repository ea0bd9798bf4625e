//! Pure economy logic - tariffs and passive income accrual.
//!
//! The ledger itself (coin balance, floating labels) lives in the core
//! engine; this module only holds the rates and the fractional-coin math.

use serde::{Deserialize, Serialize};

/// All prices and rates, in whole coins unless noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyRates {
    /// Coins per skier per second of passive income.
    pub income_per_skier: f64,
    /// Equipment rental fee, charged every `rental_interval` per skier.
    pub rental_fee: i64,
    pub rental_interval: f64,
    /// Charged when a skier finishes eating.
    pub meal_price: i64,
    /// Charged per skier on the night-rest transition.
    pub hotel_price: i64,
    /// Credited by the manual sell-lesson command.
    pub lesson_price: i64,
}

impl Default for EconomyRates {
    fn default() -> Self {
        Self {
            income_per_skier: 0.25,
            rental_fee: 12,
            rental_interval: 90.0,
            meal_price: 8,
            hotel_price: 20,
            lesson_price: 30,
        }
    }
}

/// Accumulates fractional passive income and pays out whole coins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeAccumulator {
    carry: f64,
}

impl IncomeAccumulator {
    /// Accrue income for `population` skiers over `dt` seconds; returns the
    /// whole coins to credit this tick.
    pub fn accrue(&mut self, rate_per_skier: f64, population: usize, dt: f64) -> i64 {
        self.carry += rate_per_skier * population as f64 * dt;
        let whole = self.carry.floor();
        self.carry -= whole;
        whole as i64
    }
}
