//! # Materials
//!
//! Concrete strength classes and reinforcing steel used by the corbel and
//! column calculations.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::materials::{ConcreteGrade, SteelGrade, GAMMA_C};
//!
//! let fck = ConcreteGrade::C50_60.fck();
//! let fcd = fck.0 / GAMMA_C;
//! let fyd = SteelGrade::B500B.fyd();
//! assert!(fcd > 33.0 && fyd.0 > 434.0);
//! ```

pub mod concrete;
pub mod reinforcement;

pub use concrete::{ConcreteGrade, GAMMA_C};
pub use reinforcement::{
    bar_area, is_standard_diameter, SteelGrade, BAR_DIAMETERS_MM,
    DEFAULT_ALLOWED_BAR_DIAMETERS_MM, GAMMA_S, MIN_COLUMN_BAR_DIAMETER_MM,
};
