//! Reinforcing Steel
//!
//! Steel grades for reinforcement design and the standard bar diameter
//! catalogue offered for column detailing.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::units::{MegaPascals, Millimeters, SquareMillimeters};

/// Partial safety factor for reinforcing steel
pub const GAMMA_S: f64 = 1.15;

/// Absolute minimum longitudinal bar diameter for columns (mm)
pub const MIN_COLUMN_BAR_DIAMETER_MM: f64 = 12.0;

/// Bar diameters available for selection (mm)
pub const BAR_DIAMETERS_MM: [f64; 8] = [10.0, 12.0, 14.0, 16.0, 20.0, 25.0, 32.0, 40.0];

/// Bar diameters enabled by default (mm)
pub const DEFAULT_ALLOWED_BAR_DIAMETERS_MM: [f64; 4] = [12.0, 16.0, 20.0, 25.0];

/// Reinforcing steel grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    /// B500B (high ductility)
    B500B,
}

impl SteelGrade {
    /// Characteristic yield strength fyk
    pub fn fyk(&self) -> MegaPascals {
        match self {
            SteelGrade::B500B => MegaPascals(500.0),
        }
    }

    /// Design yield strength fyd = fyk / γs
    pub fn fyd(&self) -> MegaPascals {
        self.fyk() / GAMMA_S
    }

    pub fn label(&self) -> &'static str {
        match self {
            SteelGrade::B500B => "B500B",
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Cross-sectional area of one round bar, π·d²/4
pub fn bar_area(diameter: Millimeters) -> SquareMillimeters {
    SquareMillimeters(PI * diameter.0.powi(2) / 4.0)
}

/// Whether a diameter is part of the standard catalogue
pub fn is_standard_diameter(diameter_mm: f64) -> bool {
    BAR_DIAMETERS_MM.contains(&diameter_mm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b500b_design_strength() {
        assert_eq!(SteelGrade::B500B.fyd().0, 500.0 / 1.15);
    }

    #[test]
    fn test_bar_area() {
        // 16mm bar: π·256/4 = 201.06 mm²
        let area = bar_area(Millimeters(16.0));
        assert!((area.0 - 201.06).abs() < 0.01);
    }

    #[test]
    fn test_catalogue() {
        assert!(is_standard_diameter(25.0));
        assert!(!is_standard_diameter(18.0));
        assert!(DEFAULT_ALLOWED_BAR_DIAMETERS_MM.iter().all(|d| is_standard_diameter(*d)));
    }
}
