//! Concrete Strength Classes (EN 1992-1-1 Table 3.1)
//!
//! Characteristic cylinder strengths for the classes used by the precast
//! calculations, plus the partial factor for concrete.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::MegaPascals;

/// Partial safety factor for concrete (persistent and transient situations)
pub const GAMMA_C: f64 = 1.50;

/// Concrete strength class (cylinder/cube)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    #[serde(rename = "C25/30")]
    C25_30,
    #[serde(rename = "C30/37")]
    C30_37,
    #[serde(rename = "C35/45")]
    C35_45,
    #[serde(rename = "C40/50")]
    C40_50,
    #[serde(rename = "C45/55")]
    C45_55,
    #[serde(rename = "C50/60")]
    C50_60,
}

impl ConcreteGrade {
    /// All classes for UI selection
    pub const ALL: [ConcreteGrade; 6] = [
        ConcreteGrade::C25_30,
        ConcreteGrade::C30_37,
        ConcreteGrade::C35_45,
        ConcreteGrade::C40_50,
        ConcreteGrade::C45_55,
        ConcreteGrade::C50_60,
    ];

    /// Characteristic cylinder strength fck
    pub fn fck(&self) -> MegaPascals {
        MegaPascals(match self {
            ConcreteGrade::C25_30 => 25.0,
            ConcreteGrade::C30_37 => 30.0,
            ConcreteGrade::C35_45 => 35.0,
            ConcreteGrade::C40_50 => 40.0,
            ConcreteGrade::C45_55 => 45.0,
            ConcreteGrade::C50_60 => 50.0,
        })
    }

    /// Class label as printed on drawings (e.g. "C50/60")
    pub fn label(&self) -> &'static str {
        match self {
            ConcreteGrade::C25_30 => "C25/30",
            ConcreteGrade::C30_37 => "C30/37",
            ConcreteGrade::C35_45 => "C35/45",
            ConcreteGrade::C40_50 => "C40/50",
            ConcreteGrade::C45_55 => "C45/55",
            ConcreteGrade::C50_60 => "C50/60",
        }
    }

    /// Look up the class matching a characteristic strength
    pub fn from_fck(fck_mpa: f64) -> CalcResult<Self> {
        Self::ALL
            .into_iter()
            .find(|grade| grade.fck().0 == fck_mpa)
            .ok_or_else(|| {
                CalcError::invalid_input("fck_MPa", fck_mpa.to_string(), "No concrete class with this strength")
            })
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
