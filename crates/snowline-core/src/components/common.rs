//! Components shared by skiers and facilities, plus the floating feedback
//! labels the ledger emits for the presentation layer.

use serde::{Deserialize, Serialize};
pub use snowline_logic::geometry::Vec2;

/// Spatial position component.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Presentation color class of a floating label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelColor {
    /// Coins in (charges collected, income).
    Credit,
    /// Coins out (construction, manual debits).
    Debit,
    /// Neutral notices (promotions, reopenings).
    Info,
}

/// Short-lived feedback event: text drifting up from a world position.
/// Purely presentational; decays to removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingLabel {
    pub pos: Vec2,
    pub text: String,
    pub color: LabelColor,
    /// Remaining life in seconds.
    pub life: f32,
}

impl FloatingLabel {
    pub fn new(pos: Vec2, text: impl Into<String>, color: LabelColor) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            life: snowline_logic::constants::LABEL_LIFETIME,
        }
    }
}
