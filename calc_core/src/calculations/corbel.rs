//! # Corbel Calculation
//!
//! Sizes the tie reinforcement of a concrete corbel with the strut-and-tie
//! expressions from Schneider, Bautabellen (20th ed.), eqs. 5.11 and 5.24.
//!
//! ## Design basis
//!
//! - Concrete C50/60 (fck = 50 MPa, γc = 1.50)
//! - Reinforcement B500B (fyd = 500 / 1.15 MPa)
//! - Concrete cover 5 cm
//! - Geometry in cm, forces in kN, steel areas in cm²
//!
//! ## Formulas
//!
//! ```text
//! VRd,max = 0.5 · (0.7 − fck/200) · (b/2) · hc · fck / γc     (b, hc in mm → N, /1000 → kN)
//! d       = hc − cover
//! ac      = corbel depth − pad offset
//! z0      = d · (1 − 0.4 · VEd / VRd,max)
//! ZEd     = VEd · ac / z0 + HEd · (cover + z0) / z0
//! As1     = ZEd / fyd · 100
//! As2     = 0.5 · As1
//! ```
//!
//! Inputs that drive VRd,max or z0 to zero or below are rejected with
//! [`CalcError::InvalidGeometry`] rather than producing NaN or infinite areas.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::corbel::{size_corbel, CorbelCase, CorbelGeometry};
//!
//! let case = CorbelCase {
//!     label: "Corbel 2".to_string(),
//!     vertical_force_kn: 250.0,
//!     horizontal_force_kn: 85.0,
//!     geometry: CorbelGeometry::default(),
//! };
//!
//! let result = size_corbel(&case).unwrap();
//! assert!((result.as1_cm2 - 56.62).abs() < 0.01);
//! assert_eq!(result.as2_cm2, result.as1_cm2 * 0.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::{ConcreteGrade, SteelGrade, GAMMA_C};
use crate::units::{Centimeters, KiloNewtons, Millimeters, Newtons};

/// Concrete class the corbel formulas are calibrated for
pub const CONCRETE_GRADE: ConcreteGrade = ConcreteGrade::C50_60;

/// Reinforcement grade for the tie and stirrups
pub const STEEL_GRADE: SteelGrade = SteelGrade::B500B;

/// Concrete cover to the tie (cm)
pub const COVER_CM: f64 = 5.0;

/// Stirrup area as a fraction of the main tie area
pub const STIRRUP_RATIO: f64 = 0.5;

/// Corbel type by shear span to height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorbelClassification {
    ExtraShortCorbel,
    ShortCorbel,
    StrutAndTieCorbel,
    /// Shear span exceeds the corbel height; design as a cantilever beam
    OutOfRange,
}

impl CorbelClassification {
    pub fn description(&self) -> &'static str {
        match self {
            CorbelClassification::ExtraShortCorbel => "Extra Short Corbel",
            CorbelClassification::ShortCorbel => "Short Corbel",
            CorbelClassification::StrutAndTieCorbel => "Strut and Tie Corbel",
            CorbelClassification::OutOfRange => "Error: Calculate as cantilever beam if ac > hc",
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, CorbelClassification::OutOfRange)
    }
}

impl std::fmt::Display for CorbelClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Classify a corbel from its shear span `ac` and height `hc`.
///
/// Bands are tested in order and the first match wins. The short and
/// strut-and-tie bands overlap for `0.4·hc <= ac < 0.5·hc`; such corbels
/// classify as short.
///
/// ```rust
/// use calc_core::calculations::corbel::{classify_corbel, CorbelClassification};
///
/// assert_eq!(classify_corbel(10.0, 65.0), CorbelClassification::ExtraShortCorbel);
/// assert_eq!(classify_corbel(40.0, 65.0), CorbelClassification::StrutAndTieCorbel);
/// ```
pub fn classify_corbel(ac: f64, hc: f64) -> CorbelClassification {
    if ac <= 0.2 * hc {
        CorbelClassification::ExtraShortCorbel
    } else if ac < 0.5 * hc {
        CorbelClassification::ShortCorbel
    } else if 0.4 * hc <= ac && ac <= hc {
        CorbelClassification::StrutAndTieCorbel
    } else {
        CorbelClassification::OutOfRange
    }
}

/// Column and corbel dimensions, all in cm.
///
/// ## JSON Example
///
/// ```json
/// {
///   "column_width_cm": 80.0,
///   "corbel_height_cm": 65.0,
///   "corbel_depth_cm": 40.0,
///   "pad_offset_cm": 5.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorbelGeometry {
    /// Square column side; the corbel is half as wide
    pub column_width_cm: f64,
    /// Corbel height hc at the column face
    pub corbel_height_cm: f64,
    /// Projection of the corbel from the column face
    pub corbel_depth_cm: f64,
    /// Distance of the bearing pad from the corbel tip
    pub pad_offset_cm: f64,
}

impl Default for CorbelGeometry {
    fn default() -> Self {
        CorbelGeometry {
            column_width_cm: 80.0,
            corbel_height_cm: 65.0,
            corbel_depth_cm: 40.0,
            pad_offset_cm: 5.0,
        }
    }
}

impl CorbelGeometry {
    /// Reject non-numeric dimensions. Degenerate but finite values are left
    /// to the strut and lever-arm checks in [`size_corbel`].
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("column_width_cm", self.column_width_cm),
            ("corbel_height_cm", self.corbel_height_cm),
            ("corbel_depth_cm", self.corbel_depth_cm),
            ("pad_offset_cm", self.pad_offset_cm),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Dimension must be a finite number"));
            }
        }
        Ok(())
    }

    /// Shear span used for classification (half the corbel depth)
    pub fn classification_span_cm(&self) -> f64 {
        self.corbel_depth_cm / 2.0
    }

    /// Lever arm of the vertical load about the column face
    pub fn load_lever_arm_cm(&self) -> f64 {
        self.corbel_depth_cm - self.pad_offset_cm
    }

    /// Effective depth d = hc − cover
    pub fn effective_depth_cm(&self) -> f64 {
        (Centimeters(self.corbel_height_cm) - Centimeters(COVER_CM)).value()
    }

    pub fn classification(&self) -> CorbelClassification {
        classify_corbel(self.classification_span_cm(), self.corbel_height_cm)
    }

    /// Column size tag for schedules, e.g. "80 x 80"
    pub fn column_size_tag(&self) -> String {
        format!("{} x {}", self.column_width_cm, self.column_width_cm)
    }
}

/// Geometric proportion check of the bearing position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryCheck {
    /// Load lever arm ac (cm)
    pub ac_cm: f64,
    /// Corbel height hc (cm)
    pub hc_cm: f64,
    pub ratio: f64,
    /// ac / hc <= 0.5
    pub passes: bool,
}

/// Check that the bearing sits within half the corbel height of the column face.
pub fn check_geometry(geometry: &CorbelGeometry) -> GeometryCheck {
    let ac_cm = geometry.load_lever_arm_cm();
    let hc_cm = geometry.corbel_height_cm;
    let ratio = ac_cm / hc_cm;
    GeometryCheck {
        ac_cm,
        hc_cm,
        ratio,
        passes: ratio <= 0.5,
    }
}

/// Strut capacity VRd,max of the corbel (kN).
pub fn strut_capacity(geometry: &CorbelGeometry) -> KiloNewtons {
    let fck = CONCRETE_GRADE.fck().value();
    let width_mm = Millimeters::from(Centimeters(geometry.column_width_cm)).value();
    let height_mm = Millimeters::from(Centimeters(geometry.corbel_height_cm)).value();
    let vrd = 0.5 * (0.7 - fck / 200.0) * (width_mm / 2.0) * height_mm * fck / GAMMA_C;
    KiloNewtons::from(Newtons(vrd))
}

/// One corbel load case with its geometry.
///
/// Geometry fields are flattened in JSON, so a case reads as a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorbelCase {
    /// Location label (e.g. "Corbel 1", "Axis B/4")
    pub label: String,
    /// Vertical design force VEd (kN)
    pub vertical_force_kn: f64,
    /// Horizontal design force HEd (kN)
    pub horizontal_force_kn: f64,
    #[serde(flatten)]
    pub geometry: CorbelGeometry,
}

/// Results of one corbel sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub label: String,
    pub classification: CorbelClassification,
    /// Strut capacity VRd,max (kN)
    pub vrd_kn: f64,
    /// Effective depth d (cm)
    pub effective_depth_cm: f64,
    /// Load lever arm ac (cm)
    pub lever_arm_cm: f64,
    /// Internal lever arm z0 (cm)
    pub z0_cm: f64,
    /// Tie force ZEd (kN)
    pub zed_kn: f64,
    /// Main tie (anchorage) reinforcement As1 (cm²)
    pub as1_cm2: f64,
    /// Stirrup reinforcement As2 (cm²)
    pub as2_cm2: f64,
}

/// Size the corbel reinforcement for one load case.
///
/// # Returns
///
/// * `Ok(SizingResult)` - Reinforcement areas; an out-of-range classification
///   is reported in the result, not as an error
/// * `Err(CalcError::InvalidInput)` - Non-finite input
/// * `Err(CalcError::InvalidGeometry)` - VRd,max or z0 zero/negative, or a
///   non-finite intermediate result
pub fn size_corbel(case: &CorbelCase) -> CalcResult<SizingResult> {
    case.geometry.validate()?;
    for (field, value) in [
        ("vertical_force_kn", case.vertical_force_kn),
        ("horizontal_force_kn", case.horizontal_force_kn),
    ] {
        if !value.is_finite() {
            return Err(CalcError::invalid_input(field, value.to_string(), "Force must be a finite number"));
        }
    }

    let geometry = &case.geometry;
    let v = case.vertical_force_kn;
    let h = case.horizontal_force_kn;

    let vrd = strut_capacity(geometry).value();
    if !(vrd > 0.0) || !vrd.is_finite() {
        tracing::warn!(label = %case.label, vrd, "corbel strut capacity is not positive");
        return Err(CalcError::invalid_geometry(
            "Vrd",
            vrd,
            "Strut capacity must be positive; check column width and corbel height",
        ));
    }

    let d = geometry.effective_depth_cm();
    let ac = geometry.load_lever_arm_cm();
    let z0 = d * (1.0 - 0.4 * (v / vrd));
    if !(z0 > 0.0) {
        tracing::warn!(label = %case.label, z0, "corbel internal lever arm is not positive");
        return Err(CalcError::invalid_geometry(
            "z0",
            z0,
            "Internal lever arm must be positive; corbel too shallow for the vertical force",
        ));
    }

    let zed = v * (ac / z0) + h * ((COVER_CM + z0) / z0);
    let as1 = (zed / STEEL_GRADE.fyd().value()) * 100.0;
    let as2 = as1 * STIRRUP_RATIO;
    if !as1.is_finite() {
        return Err(CalcError::invalid_geometry("As1", as1, "Tie area is not a finite number"));
    }

    let classification = geometry.classification();
    tracing::debug!(label = %case.label, %classification, vrd, z0, zed, as1, "sized corbel");

    Ok(SizingResult {
        label: case.label.clone(),
        classification,
        vrd_kn: vrd,
        effective_depth_cm: d,
        lever_arm_cm: ac,
        z0_cm: z0,
        zed_kn: zed,
        as1_cm2: as1,
        as2_cm2: as2,
    })
}

/// Size a sequence of cases independently.
///
/// Output order and length match the input; a failing case does not affect
/// its neighbours.
pub fn size_corbel_batch(cases: &[CorbelCase]) -> Vec<CalcResult<SizingResult>> {
    cases.iter().map(size_corbel).collect()
}

/// One row of the corbel load table (forces from the global model).
///
/// A force is `None` when its table cell was empty or not a number; the row
/// then fails on its own when the schedule is sized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorbelLoad {
    pub location: String,
    /// V (kN)
    pub vertical_force_kn: Option<f64>,
    /// H (kN)
    pub horizontal_force_kn: Option<f64>,
}

impl CorbelLoad {
    pub fn new(location: impl Into<String>, vertical_force_kn: f64, horizontal_force_kn: f64) -> Self {
        CorbelLoad {
            location: location.into(),
            vertical_force_kn: Some(vertical_force_kn),
            horizontal_force_kn: Some(horizontal_force_kn),
        }
    }

    /// The load as a sizing case on `geometry`.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidInput` naming V or H when that force is missing.
    pub fn to_case(&self, geometry: CorbelGeometry) -> CalcResult<CorbelCase> {
        let force = |field: &str, value: Option<f64>| {
            value.ok_or_else(|| {
                CalcError::invalid_input(field, "", format!("No numeric {field} for {}", self.location))
            })
        };

        Ok(CorbelCase {
            label: self.location.clone(),
            vertical_force_kn: force("V", self.vertical_force_kn)?,
            horizontal_force_kn: force("H", self.horizontal_force_kn)?,
            geometry,
        })
    }
}

/// A corbel schedule: one shared geometry, many load rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorbelBatchInput {
    pub label: String,
    pub geometry: CorbelGeometry,
    pub loads: Vec<CorbelLoad>,
}

impl Default for CorbelBatchInput {
    fn default() -> Self {
        CorbelBatchInput {
            label: "Corbel Schedule".to_string(),
            geometry: CorbelGeometry::default(),
            loads: vec![
                CorbelLoad::new("Corbel 1", 150.0, 120.0),
                CorbelLoad::new("Corbel 2", 250.0, 65.0),
                CorbelLoad::new("Corbel 3", 200.0, 120.0),
                CorbelLoad::new("Corbel 4", 300.0, 50.0),
            ],
        }
    }
}

impl CorbelBatchInput {
    /// Expand the load rows into independent cases, one per row
    pub fn cases(&self) -> Vec<CalcResult<CorbelCase>> {
        self.loads.iter().map(|load| load.to_case(self.geometry)).collect()
    }
}

/// A load row with its sizing outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorbelRow {
    pub load: CorbelLoad,
    pub outcome: CalcResult<SizingResult>,
}

/// Location with the largest main tie area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoverningCase {
    pub location: String,
    pub as1_cm2: f64,
}

/// Results of a corbel schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorbelBatchResult {
    pub column_size_tag: String,
    pub classification: CorbelClassification,
    pub geometry_check: GeometryCheck,
    pub rows: Vec<CorbelRow>,
    /// None when no row could be sized
    pub governing: Option<GoverningCase>,
}

impl CorbelBatchResult {
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_err()).count()
    }
}

/// Size every load row of a schedule.
///
/// # Errors
///
/// `CalcError::InvalidInput` if the shared geometry is not numeric; per-row
/// failures are kept in [`CorbelRow::outcome`].
pub fn calculate_batch(input: &CorbelBatchInput) -> CalcResult<CorbelBatchResult> {
    input.geometry.validate()?;

    let rows: Vec<CorbelRow> = input
        .loads
        .iter()
        .zip(input.cases())
        .map(|(load, case)| {
            if let Err(e) = &case {
                tracing::warn!(location = %load.location, error = %e, "corbel load row unreadable");
            }
            CorbelRow {
                load: load.clone(),
                outcome: case.and_then(|case| size_corbel(&case)),
            }
        })
        .collect();

    let mut governing: Option<GoverningCase> = None;
    for row in &rows {
        if let Ok(result) = &row.outcome {
            if governing.as_ref().map_or(true, |g| result.as1_cm2 > g.as1_cm2) {
                governing = Some(GoverningCase {
                    location: row.load.location.clone(),
                    as1_cm2: result.as1_cm2,
                });
            }
        }
    }

    Ok(CorbelBatchResult {
        column_size_tag: input.geometry.column_size_tag(),
        classification: input.geometry.classification(),
        geometry_check: check_geometry(&input.geometry),
        rows,
        governing,
    })
}
