//! # Modular Layout
//!
//! Stacks volumetric units into a square-ish footprint grid.
//!
//! The number of stacks is the minimum that keeps every stack at or below
//! `max_height`; stacks are laid out on a `grid_side × grid_side` grid and
//! filled in row-major order, bottom level first. The last stack may be
//! partially filled.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::modular_layout::generate_layout;
//!
//! let layout = generate_layout(12, 3).unwrap();
//! assert_eq!(layout.blocks.len(), 12);
//! assert_eq!(layout.footprint_column_count, 4);
//! assert_eq!(layout.grid_side, 2);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Unit block dimensions (width : length : height = 1 : 3 : 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockDimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl Default for BlockDimensions {
    fn default() -> Self {
        BlockDimensions {
            width: 1.0,
            length: 3.0,
            height: 1.0,
        }
    }
}

/// One unit placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// Grid index along the width axis
    pub column: u32,
    /// Grid index along the length axis
    pub row: u32,
    /// Storey, 0 = ground
    pub level: u32,
}

impl Block {
    /// World coordinates of the block's minimum corner
    pub fn origin(&self, dims: &BlockDimensions) -> [f64; 3] {
        [
            self.column as f64 * dims.width,
            self.row as f64 * dims.length,
            self.level as f64 * dims.height,
        ]
    }
}

/// Block placements plus derived footprint figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Placement order: cell by cell, bottom to top
    pub blocks: Vec<Block>,
    pub dimensions: BlockDimensions,
    /// Distinct (column, row) cells occupied
    pub footprint_column_count: u32,
    /// Side length of the square grid the stacks are laid on
    pub grid_side: u32,
}

impl LayoutResult {
    /// Number of storeys actually occupied
    pub fn levels_used(&self) -> u32 {
        self.blocks.iter().map(|b| b.level + 1).max().unwrap_or(0)
    }

    /// Plan area covered by occupied cells, in block-dimension units²
    pub fn footprint_area(&self) -> f64 {
        self.footprint_column_count as f64 * self.dimensions.width * self.dimensions.length
    }

    /// Occupied cells with their stack heights, ordered by (column, row)
    pub fn cells(&self) -> BTreeMap<(u32, u32), u32> {
        let mut cells = BTreeMap::new();
        for block in &self.blocks {
            *cells.entry((block.column, block.row)).or_insert(0) += 1;
        }
        cells
    }
}

/// Smallest `s` with `s * s >= n`.
fn grid_side_for(n: u32) -> u32 {
    let mut side = (n as f64).sqrt().ceil() as u32;
    // Float sqrt can land one off for large n
    while (side as u64) * (side as u64) < n as u64 {
        side += 1;
    }
    while side > 0 && ((side - 1) as u64) * ((side - 1) as u64) >= n as u64 {
        side -= 1;
    }
    side
}

/// Generate a stacked block layout.
///
/// # Arguments
///
/// * `total_units` - Number of blocks to place (0 yields an empty layout)
/// * `max_height` - Maximum blocks per stack
///
/// # Errors
///
/// `CalcError::InvalidInput` when `max_height` is zero. No other bounds are
/// checked here.
pub fn generate_layout(total_units: u32, max_height: u32) -> CalcResult<LayoutResult> {
    if max_height == 0 {
        return Err(CalcError::invalid_input(
            "max_height",
            "0",
            "Stack height must be at least one unit",
        ));
    }

    let columns_needed = total_units.div_ceil(max_height);
    let grid_side = grid_side_for(columns_needed);

    let mut blocks = Vec::with_capacity(total_units as usize);
    'fill: for column in 0..grid_side {
        for row in 0..grid_side {
            for level in 0..max_height {
                if blocks.len() as u32 == total_units {
                    break 'fill;
                }
                blocks.push(Block { column, row, level });
            }
        }
    }

    tracing::debug!(
        total_units,
        max_height,
        columns_needed,
        grid_side,
        "generated modular layout"
    );

    Ok(LayoutResult {
        blocks,
        dimensions: BlockDimensions::default(),
        footprint_column_count: columns_needed,
        grid_side,
    })
}

/// Dashboard bounds for the stack height slider
pub const MAX_HEIGHT_RANGE: (u32, u32) = (1, 6);

/// Dashboard bounds for the total unit slider
pub const TOTAL_UNITS_RANGE: (u32, u32) = (1, 25);

/// Input parameters for a stored layout study.
///
/// ## JSON Example
///
/// ```json
/// { "label": "Block A", "total_units": 12, "max_height": 3 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInput {
    pub label: String,
    pub total_units: u32,
    pub max_height: u32,
}

impl Default for LayoutInput {
    fn default() -> Self {
        LayoutInput {
            label: "Modular Asset".to_string(),
            total_units: 12,
            max_height: 3,
        }
    }
}

impl LayoutInput {
    /// Validate against the configurator's slider ranges.
    pub fn validate(&self) -> CalcResult<()> {
        let (lo, hi) = MAX_HEIGHT_RANGE;
        if !(lo..=hi).contains(&self.max_height) {
            return Err(CalcError::invalid_input(
                "max_height",
                self.max_height.to_string(),
                format!("Stack height must be between {lo} and {hi} units"),
            ));
        }
        let (lo, hi) = TOTAL_UNITS_RANGE;
        if !(lo..=hi).contains(&self.total_units) {
            return Err(CalcError::invalid_input(
                "total_units",
                self.total_units.to_string(),
                format!("Total units must be between {lo} and {hi}"),
            ));
        }
        Ok(())
    }
}

/// Validate and generate a layout study.
pub fn calculate(input: &LayoutInput) -> CalcResult<LayoutResult> {
    input.validate()?;
    generate_layout(input.total_units, input.max_height)
}
