//! # Column Schedule
//!
//! Minimum detailing reinforcement for a table of concrete column sections.
//!
//! ## Current Status: Minimum Detailing Only
//!
//! Each row gets the minimum number of longitudinal bars for its shape at
//! the chosen diameter (never below 12 mm). The provided steel area is
//! *not* checked against the axial load NEd.
//!
//! ## Rules
//!
//! - Rectangular / square sections: 4 bars minimum
//! - Circular sections: 6 bars minimum
//! - Minimum longitudinal bar diameter: 12 mm
//!
//! Rows with missing geometry are still detailed; their concrete area is NaN
//! and the row carries a note. Conflicting geometry, unreadable cells and
//! strengths outside the concrete classes are noted the same way. One bad
//! row never stops the schedule.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::column_schedule::{generate_schedule, ColumnSection};
//!
//! let sections = ColumnSection::default_rows(3);
//! let schedule = generate_schedule(&sections, 16.0);
//!
//! assert_eq!(schedule.len(), 3);
//! assert_eq!(schedule[0].n_bars, 4);
//! assert_eq!(schedule[0].ac_mm2, 90_000.0);
//! assert!(schedule[0].notes.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{bar_area, ConcreteGrade, MIN_COLUMN_BAR_DIAMETER_MM};
use crate::units::Millimeters;

/// Note attached to circular rows without a diameter
pub const NOTE_MISSING_DIAMETER: &str = "Missing D_mm for circular column";

/// Note attached to rectangular rows without both side lengths
pub const NOTE_MISSING_SIDES: &str = "Missing b_mm/h_mm for rectangular column";

/// Note attached to rectangular rows that also carry a diameter
pub const NOTE_DIAMETER_ON_RECT: &str = "D_mm given for rectangular column";

/// Note attached to circular rows that also carry side lengths
pub const NOTE_SIDES_ON_CIRC: &str = "b_mm/h_mm given for circular column";

/// Cross-section shape of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnShape {
    /// Rectangular or square (b × h)
    #[serde(rename = "RECT")]
    Rect,
    /// Circular (diameter D)
    #[serde(rename = "CIRC")]
    Circ,
}

impl ColumnShape {
    /// Parse a shape string, ignoring case and surrounding whitespace.
    ///
    /// CIRC, CIRCULAR and ROUND are circular; everything else, including
    /// unrecognised values, is treated as rectangular.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "CIRC" | "CIRCULAR" | "ROUND" => ColumnShape::Circ,
            _ => ColumnShape::Rect,
        }
    }

    /// Minimum number of longitudinal bars
    pub fn min_bars(&self) -> u32 {
        match self {
            ColumnShape::Rect => 4,
            ColumnShape::Circ => 6,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ColumnShape::Rect => "RECT",
            ColumnShape::Circ => "CIRC",
        }
    }
}

impl std::fmt::Display for ColumnShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Minimum bar count for a shape string (4 rectangular, 6 circular).
///
/// ```rust
/// use calc_core::calculations::column_schedule::min_bars_for_shape;
///
/// assert_eq!(min_bars_for_shape(" Rect "), 4);
/// assert_eq!(min_bars_for_shape("round"), 6);
/// assert_eq!(min_bars_for_shape("hexagon"), 4);
/// ```
pub fn min_bars_for_shape(shape: &str) -> u32 {
    ColumnShape::parse(shape).min_bars()
}

/// One column row of the schedule input.
///
/// Cells that were empty in the source table are `None`. Cells that held
/// something other than a number are also `None` and their column name is
/// listed in `invalid_fields`, so the row note can tell the two apart.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "C1",
///   "shape": "RECT",
///   "b_mm": 300.0,
///   "h_mm": 300.0,
///   "d_mm": null,
///   "axial_load_kn": 1200.0,
///   "fck_mpa": 30.0,
///   "cover_mm": 40.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSection {
    /// Column identifier (e.g. "C1")
    pub id: String,
    pub shape: ColumnShape,
    /// Width b for rectangular sections
    pub b_mm: Option<f64>,
    /// Depth h for rectangular sections
    pub h_mm: Option<f64>,
    /// Diameter D for circular sections
    pub d_mm: Option<f64>,
    /// Design axial load NEd (kN), carried through to the schedule
    pub axial_load_kn: Option<f64>,
    /// Concrete strength fck (MPa)
    pub fck_mpa: Option<f64>,
    /// Nominal cover (mm)
    pub cover_mm: Option<f64>,
    /// Table columns whose cell was not a number
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_fields: Vec<String>,
}

impl ColumnSection {
    /// Rectangular section b × h
    pub fn rect(id: impl Into<String>, b_mm: f64, h_mm: f64) -> Self {
        ColumnSection {
            id: id.into(),
            shape: ColumnShape::Rect,
            b_mm: Some(b_mm),
            h_mm: Some(h_mm),
            d_mm: None,
            axial_load_kn: Some(1200.0),
            fck_mpa: Some(30.0),
            cover_mm: Some(40.0),
            invalid_fields: Vec::new(),
        }
    }

    /// Circular section of diameter D
    pub fn circ(id: impl Into<String>, d_mm: f64) -> Self {
        ColumnSection {
            id: id.into(),
            shape: ColumnShape::Circ,
            b_mm: None,
            h_mm: None,
            d_mm: Some(d_mm),
            axial_load_kn: Some(1200.0),
            fck_mpa: Some(30.0),
            cover_mm: Some(40.0),
            invalid_fields: Vec::new(),
        }
    }

    /// Manual-input starting grid: C1..Cn, 300×300 RECT, NEd 1200 kN,
    /// fck 30 MPa, cover 40 mm.
    pub fn default_rows(count: usize) -> Vec<Self> {
        (1..=count).map(|i| ColumnSection::rect(format!("C{i}"), 300.0, 300.0)).collect()
    }

    /// Note describing missing geometry for the section's shape, if any
    pub fn geometry_note(&self) -> Option<&'static str> {
        match self.shape {
            ColumnShape::Circ if self.d_mm.is_none() => Some(NOTE_MISSING_DIAMETER),
            ColumnShape::Rect if self.b_mm.is_none() || self.h_mm.is_none() => Some(NOTE_MISSING_SIDES),
            _ => None,
        }
    }

    /// Note for geometry that belongs to the other shape, if any
    pub fn conflict_note(&self) -> Option<&'static str> {
        match self.shape {
            ColumnShape::Rect if self.d_mm.is_some() => Some(NOTE_DIAMETER_ON_RECT),
            ColumnShape::Circ if self.b_mm.is_some() || self.h_mm.is_some() => Some(NOTE_SIDES_ON_CIRC),
            _ => None,
        }
    }

    fn is_invalid(&self, field: &str) -> bool {
        self.invalid_fields.iter().any(|f| f == field)
    }

    /// Every problem found on this row.
    ///
    /// The row is still detailed whatever this returns.
    pub fn notes(&self) -> Vec<String> {
        let mut notes: Vec<String> = self.invalid_fields.iter().map(|f| format!("Invalid {f}")).collect();

        let geometry_fields: &[&str] = match self.shape {
            ColumnShape::Circ => &["D_mm"],
            ColumnShape::Rect => &["b_mm", "h_mm"],
        };
        if !geometry_fields.iter().any(|f| self.is_invalid(f)) {
            notes.extend(self.geometry_note().map(String::from));
        }
        notes.extend(self.conflict_note().map(String::from));

        for (field, value) in [
            ("NEd_kN", self.axial_load_kn),
            ("fck_MPa", self.fck_mpa),
            ("cover_mm", self.cover_mm),
        ] {
            if value.is_none() && !self.is_invalid(field) {
                notes.push(format!("Missing {field}"));
            }
        }

        if let Some(fck) = self.fck_mpa {
            if ConcreteGrade::from_fck(fck).is_err() {
                notes.push(format!("fck_MPa {fck} is not a standard concrete class"));
            }
        }
        notes
    }
}

/// Gross concrete area Ac (mm²).
///
/// Returns NaN when the geometry required by the shape is missing; the
/// caller reports it through [`ColumnSection::geometry_note`].
pub fn concrete_area(section: &ColumnSection) -> f64 {
    match section.shape {
        ColumnShape::Circ => match section.d_mm {
            Some(d) => std::f64::consts::PI * d.powi(2) / 4.0,
            None => f64::NAN,
        },
        ColumnShape::Rect => match (section.b_mm, section.h_mm) {
            (Some(b), Some(h)) => b * h,
            _ => f64::NAN,
        },
    }
}

/// Minimum longitudinal reinforcement for one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimumReinforcement {
    pub bar_count: u32,
    pub bar_diameter_mm: f64,
    /// n · π · d² / 4 (mm²)
    pub provided_area_mm2: f64,
}

/// Minimum detailing: shape bar count at `max(chosen, 12 mm)`.
///
/// The axial load is not checked against the provided area.
pub fn design_minimum_reinforcement(section: &ColumnSection, chosen_diameter_mm: f64) -> MinimumReinforcement {
    let bar_diameter_mm = chosen_diameter_mm.max(MIN_COLUMN_BAR_DIAMETER_MM);
    let bar_count = section.shape.min_bars();
    let provided_area_mm2 = bar_count as f64 * bar_area(Millimeters(bar_diameter_mm)).value();

    MinimumReinforcement {
        bar_count,
        bar_diameter_mm,
        provided_area_mm2,
    }
}

/// A schedule row: the input section plus computed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScheduleRow {
    pub section: ColumnSection,
    /// Gross concrete area (mm²), NaN when geometry is missing
    pub ac_mm2: f64,
    pub n_bars: u32,
    pub bar_diam_mm: f64,
    pub as_provided_mm2: f64,
    /// Empty when the row is complete
    pub notes: String,
}

impl ColumnScheduleRow {
    /// Provided reinforcement ratio As / Ac, None without a concrete area
    pub fn reinforcement_ratio(&self) -> Option<f64> {
        if self.ac_mm2.is_finite() && self.ac_mm2 > 0.0 {
            Some(self.as_provided_mm2 / self.ac_mm2)
        } else {
            None
        }
    }
}

/// Detail every section of a schedule.
///
/// One output row per input row, in the same order.
pub fn generate_schedule(sections: &[ColumnSection], chosen_diameter_mm: f64) -> Vec<ColumnScheduleRow> {
    sections
        .iter()
        .map(|section| {
            let reinforcement = design_minimum_reinforcement(section, chosen_diameter_mm);
            let notes = section.notes().join("; ");
            if !notes.is_empty() {
                tracing::warn!(column = %section.id, %notes, "column row has problems");
            }
            ColumnScheduleRow {
                section: section.clone(),
                ac_mm2: concrete_area(section),
                n_bars: reinforcement.bar_count,
                bar_diam_mm: reinforcement.bar_diameter_mm,
                as_provided_mm2: reinforcement.provided_area_mm2,
                notes,
            }
        })
        .collect()
}

/// Input parameters for a stored column schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnScheduleInput {
    pub label: String,
    pub sections: Vec<ColumnSection>,
    /// Overrides the session's chosen diameter when set
    pub bar_diameter_mm: Option<f64>,
}

impl Default for ColumnScheduleInput {
    fn default() -> Self {
        ColumnScheduleInput {
            label: "Column Schedule".to_string(),
            sections: ColumnSection::default_rows(8),
            bar_diameter_mm: None,
        }
    }
}

/// Generate a stored schedule with the given default diameter.
pub fn calculate(input: &ColumnScheduleInput, default_diameter_mm: f64) -> CalcResult<Vec<ColumnScheduleRow>> {
    let diameter = input.bar_diameter_mm.unwrap_or(default_diameter_mm);
    if !(diameter > 0.0) || !diameter.is_finite() {
        return Err(CalcError::invalid_input(
            "bar_diameter_mm",
            diameter.to_string(),
            "Bar diameter must be a positive number",
        ));
    }
    Ok(generate_schedule(&input.sections, diameter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_bars_for_shape() {
        for shape in ["RECT", "rect", " Rect ", "SQUARE", "unknown_value", ""] {
            assert_eq!(min_bars_for_shape(shape), 4, "{shape:?}");
        }
        for shape in ["CIRC", "circular", "ROUND", " Circ\t"] {
            assert_eq!(min_bars_for_shape(shape), 6, "{shape:?}");
        }
    }

    #[test]
    fn test_diameter_floor_enforced() {
        let section = ColumnSection::rect("C1", 300.0, 300.0);
        let r = design_minimum_reinforcement(&section, 10.0);
        assert_eq!(r.bar_diameter_mm, 12.0);
        assert_eq!(r.bar_count, 4);
        // 4 · π · 144 / 4 = 452.39 mm²
        assert!((r.provided_area_mm2 - 452.389).abs() < 1e-3);
    }

    #[test]
    fn test_larger_diameter_kept() {
        let section = ColumnSection::circ("C9", 500.0);
        let r = design_minimum_reinforcement(&section, 20.0);
        assert_eq!(r.bar_diameter_mm, 20.0);
        assert_eq!(r.bar_count, 6);
        assert!((r.provided_area_mm2 - 6.0 * std::f64::consts::PI * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_concrete_area() {
        assert_eq!(concrete_area(&ColumnSection::rect("C1", 300.0, 400.0)), 120_000.0);
        let circ = concrete_area(&ColumnSection::circ("C2", 400.0));
        assert!((circ - 125_663.706).abs() < 1e-3);
    }

    #[test]
    fn test_missing_geometry_is_nan() {
        let mut circ = ColumnSection::circ("C2", 400.0);
        circ.d_mm = None;
        assert!(concrete_area(&circ).is_nan());
        assert_eq!(circ.geometry_note(), Some(NOTE_MISSING_DIAMETER));

        let mut rect = ColumnSection::rect("C3", 300.0, 300.0);
        rect.h_mm = None;
        assert!(concrete_area(&rect).is_nan());
        assert_eq!(rect.geometry_note(), Some(NOTE_MISSING_SIDES));
    }

    #[test]
    fn test_missing_row_does_not_affect_siblings() {
        let mut missing = ColumnSection::circ("C2", 400.0);
        missing.d_mm = None;
        let sections = vec![
            ColumnSection::rect("C1", 300.0, 300.0),
            missing,
            ColumnSection::circ("C3", 400.0),
        ];

        let rows = generate_schedule(&sections, 16.0);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].ac_mm2, 90_000.0);
        assert_eq!(rows[0].notes, "");

        assert!(rows[1].ac_mm2.is_nan());
        assert_eq!(rows[1].notes, "Missing D_mm for circular column");
        assert_eq!(rows[1].n_bars, 6);
        assert_eq!(rows[1].bar_diam_mm, 16.0);

        assert!(rows[2].ac_mm2.is_finite());
        assert_eq!(rows[2].notes, "");
    }

    #[test]
    fn test_conflicting_geometry_noted() {
        let mut rect = ColumnSection::rect("C1", 300.0, 300.0);
        rect.d_mm = Some(400.0);
        let mut circ = ColumnSection::circ("C2", 400.0);
        circ.b_mm = Some(300.0);

        let rows = generate_schedule(&[rect, circ], 12.0);
        assert_eq!(rows[0].notes, NOTE_DIAMETER_ON_RECT);
        assert_eq!(rows[0].ac_mm2, 90_000.0);
        assert_eq!(rows[1].notes, NOTE_SIDES_ON_CIRC);
        assert!((rows[1].ac_mm2 - 125_663.706).abs() < 1e-3);
    }

    #[test]
    fn test_unreadable_cells_noted_per_row() {
        let mut bad = ColumnSection::circ("C2", 400.0);
        bad.d_mm = None;
        bad.axial_load_kn = None;
        bad.invalid_fields = vec!["D_mm".to_string()];

        let rows = generate_schedule(&[ColumnSection::rect("C1", 300.0, 300.0), bad], 12.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].notes, "");
        assert_eq!(rows[1].notes, "Invalid D_mm; Missing NEd_kN");
        assert_eq!(rows[1].n_bars, 6);
    }

    #[test]
    fn test_unknown_concrete_class_noted() {
        let mut section = ColumnSection::rect("C1", 300.0, 300.0);
        section.fck_mpa = Some(33.0);
        assert_eq!(section.notes(), vec!["fck_MPa 33 is not a standard concrete class"]);

        section.fck_mpa = Some(50.0);
        assert!(section.notes().is_empty());
    }

    #[test]
    fn test_default_rows() {
        let rows = ColumnSection::default_rows(8);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[7].id, "C8");
        assert!(rows.iter().all(|r| r.geometry_note().is_none()));
    }

    #[test]
    fn test_reinforcement_ratio() {
        let rows = generate_schedule(&[ColumnSection::rect("C1", 300.0, 300.0)], 12.0);
        let ratio = rows[0].reinforcement_ratio().unwrap();
        assert!((ratio - 452.389 / 90_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_calculate_uses_override() {
        let mut input = ColumnScheduleInput::default();
        let rows = calculate(&input, 12.0).unwrap();
        assert!(rows.iter().all(|r| r.bar_diam_mm == 12.0));

        input.bar_diameter_mm = Some(25.0);
        let rows = calculate(&input, 12.0).unwrap();
        assert!(rows.iter().all(|r| r.bar_diam_mm == 25.0));

        input.bar_diameter_mm = Some(-1.0);
        assert!(calculate(&input, 12.0).is_err());
    }

    #[test]
    fn test_shape_serializes_as_code() {
        let json = serde_json::to_string(&ColumnShape::Circ).unwrap();
        assert_eq!(json, "\"CIRC\"");
    }
}
