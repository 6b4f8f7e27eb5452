//! Fitness scalar type.
//!
//! A fitness value is a non-negative scalar proportional to an individual's
//! relative chance of being chosen as a parent. Values are measured relative
//! to a reference, so 1.0 is neutral; values above 1 are beneficial and
//! values below 1 are deleterious. Selection tables routinely express
//! overdominance with values above 1, so no upper bound is imposed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

/// A fitness value constrained to `[0.0, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FitnessValue(f64);

impl FitnessValue {
    /// Neutral fitness.
    pub const NEUTRAL: FitnessValue = FitnessValue(1.0);

    /// Zero fitness: the individual is never chosen as a parent.
    pub const LETHAL: FitnessValue = FitnessValue(0.0);

    /// Creates a new `FitnessValue`, clamping negative input to 0.0.
    pub fn new(value: f64) -> Self {
        Self(value.max(0.0))
    }

    /// Returns the inner f64 value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Selection coefficient `s = 1 - f`, used by additive composition.
    pub fn selection_coefficient(self) -> f64 {
        1.0 - self.0
    }
}

impl From<f64> for FitnessValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<FitnessValue> for f64 {
    fn from(fitness: FitnessValue) -> Self {
        fitness.0
    }
}

impl Default for FitnessValue {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for FitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul for FitnessValue {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        FitnessValue::new(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_new_clamps_negative_to_zero() {
        assert!(approx_eq(FitnessValue::new(-1.0).get(), 0.0));
    }

    #[test]
    fn test_new_preserves_above_one() {
        assert!(approx_eq(FitnessValue::new(1.5).get(), 1.5));
    }

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(FitnessValue::default(), FitnessValue::NEUTRAL);
        assert!(approx_eq(FitnessValue::default().get(), 1.0));
    }

    #[test]
    fn test_mul_composes() {
        let f = FitnessValue::new(0.8) * FitnessValue::new(0.5);
        assert!(approx_eq(f.get(), 0.4));
    }

    #[test]
    fn test_mul_with_lethal_gives_lethal() {
        let f = FitnessValue::new(0.8) * FitnessValue::LETHAL;
        assert_eq!(f, FitnessValue::LETHAL);
    }

    #[test]
    fn test_selection_coefficient() {
        assert!(approx_eq(FitnessValue::new(0.7).selection_coefficient(), 0.3));
        assert!(approx_eq(FitnessValue::NEUTRAL.selection_coefficient(), 0.0));
    }

    #[test]
    fn test_from_f64_roundtrip() {
        let f: FitnessValue = 0.75.into();
        let raw: f64 = f.into();
        assert!(approx_eq(raw, 0.75));
    }

    #[test]
    fn test_display_parsable() {
        let parsed: f64 = FitnessValue::new(0.25).to_string().parse().unwrap();
        assert!(approx_eq(parsed, 0.25));
    }

    #[test]
    fn test_serde_roundtrip() {
        let f = FitnessValue::new(0.9);
        let json = serde_json::to_string(&f).unwrap();
        let back: FitnessValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
