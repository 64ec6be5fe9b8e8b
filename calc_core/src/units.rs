//! # Unit Types
//!
//! Type-safe wrappers for the SI units used by the concrete calculations.
//! They are plain f64 newtypes so JSON stays clean (just numbers).
//!
//! ## Units in use
//!
//! - Length: centimeters (corbel geometry), millimeters (column sections)
//! - Force: kilonewtons (kN)
//! - Stress: megapascals (MPa = N/mm²)
//! - Area: mm² (column sections and bars)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Centimeters, KiloNewtons, Millimeters, Newtons};
//!
//! let corbel_height = Centimeters(65.0);
//! let mm: Millimeters = corbel_height.into();
//! assert_eq!(mm.0, 650.0);
//!
//! let vrd: KiloNewtons = Newtons(1_950_000.0).into();
//! assert_eq!(vrd.value(), 1950.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Centimeters> for Millimeters {
    fn from(cm: Centimeters) -> Self {
        Millimeters(cm.0 * 10.0)
    }
}

impl From<Millimeters> for Centimeters {
    fn from(mm: Millimeters) -> Self {
        Centimeters(mm.0 / 10.0)
    }
}

// ============================================================================
// Force and Stress Units
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

// ============================================================================
// Area Units
// ============================================================================

/// Area in square millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(Newtons);
impl_arithmetic!(MegaPascals);
impl_arithmetic!(SquareMillimeters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_mm() {
        let mm: Millimeters = Centimeters(80.0).into();
        assert_eq!(mm.0, 800.0);
        let back: Centimeters = mm.into();
        assert_eq!(back.0, 80.0);
    }

    #[test]
    fn test_newtons_to_kilonewtons() {
        let kn: KiloNewtons = Newtons(1_950_000.0).into();
        assert_eq!(kn.0, 1950.0);
    }

    #[test]
    fn test_arithmetic() {
        let d = Centimeters(65.0) - Centimeters(5.0);
        assert_eq!(d.0, 60.0);
        assert_eq!((d * 2.0).0, 120.0);
        assert_eq!((d / 2.0).value(), 30.0);
    }

    #[test]
    fn test_serialization() {
        let area = SquareMillimeters(452.4);
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, "452.4");
    }
}
