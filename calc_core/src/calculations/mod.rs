//! # Structural Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`corbel`] - Strut-and-tie corbel reinforcement (single case and schedules)
//! - [`column_schedule`] - Minimum detailing of concrete column sections
//! - [`modular_layout`] - Stacking volumetric units into a footprint grid

pub mod column_schedule;
pub mod corbel;
pub mod modular_layout;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::session::GlobalSettings;

// Re-export commonly used types
pub use column_schedule::{
    concrete_area, design_minimum_reinforcement, generate_schedule, min_bars_for_shape, ColumnScheduleInput,
    ColumnScheduleRow, ColumnSection, ColumnShape, MinimumReinforcement,
};
pub use corbel::{
    classify_corbel, size_corbel, size_corbel_batch, CorbelBatchInput, CorbelBatchResult, CorbelCase,
    CorbelClassification, CorbelGeometry, CorbelLoad, SizingResult,
};
pub use modular_layout::{generate_layout, Block, BlockDimensions, LayoutInput, LayoutResult};

/// Enum wrapper for all calculation types stored in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Corbel schedule (shared geometry, many load rows)
    CorbelBatch(CorbelBatchInput),
    /// Column schedule with minimum detailing
    ColumnSchedule(ColumnScheduleInput),
    /// Modular stacking study
    Layout(LayoutInput),
}

/// Output of evaluating a [`CalculationItem`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    CorbelBatch(CorbelBatchResult),
    ColumnSchedule { rows: Vec<ColumnScheduleRow> },
    Layout(LayoutResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::CorbelBatch(c) => &c.label,
            CalculationItem::ColumnSchedule(c) => &c.label,
            CalculationItem::Layout(l) => &l.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::CorbelBatch(_) => "Corbel",
            CalculationItem::ColumnSchedule(_) => "Column Schedule",
            CalculationItem::Layout(_) => "Modular Layout",
        }
    }

    /// Run the calculation against the session settings.
    pub fn evaluate(&self, settings: &GlobalSettings) -> CalcResult<CalculationOutput> {
        match self {
            CalculationItem::CorbelBatch(input) => corbel::calculate_batch(input).map(CalculationOutput::CorbelBatch),
            CalculationItem::ColumnSchedule(input) => {
                let rows = column_schedule::calculate(input, settings.chosen_bar_diameter_mm()?)?;
                Ok(CalculationOutput::ColumnSchedule { rows })
            }
            CalculationItem::Layout(input) => modular_layout::calculate(input).map(CalculationOutput::Layout),
        }
    }
}
