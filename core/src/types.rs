//! Shared primitive types used across every generator.

/// Zero-based day index within the generation horizon.
pub type DayIndex = u32;

/// A stable, unique identifier for any generated entity.
pub type EntityId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Round a monetary value to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn round_cents(value: f64) -> f64 {
    round_to(value, 2)
}
