//! Layout data types
//!
//! These types carry intermediate layout results between the pure planning
//! functions and the code that writes them into the document.

use crate::types::EdgePins;

/// Spacing and movement options for the artboard packer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackOptions {
    /// Horizontal gap between artboards in a row
    pub h_spacing: f64,
    /// Vertical gap between rows
    pub v_spacing: f64,
    /// Whether artboards are moved, or only put in reading order
    pub move_artboards: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            h_spacing: 100.0,
            v_spacing: 100.0,
            move_artboards: false,
        }
    }
}

/// Result of row detection over a set of frames
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackPlan {
    /// Detected rows, top to bottom, each left to right (indices into the input)
    pub rows: Vec<Vec<usize>>,
    /// New top-left corner per input frame, when artboards are moved
    pub positions: Vec<Option<(f64, f64)>>,
}

impl PackPlan {
    /// Input indices in reading order
    pub fn order(&self) -> Vec<usize> {
        self.rows.iter().flatten().copied().collect()
    }
}

/// Placement of one TOC group inside the TOC container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnPlacement {
    /// Index of the group in the input sequence
    pub group: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub pins: EdgePins,
}

/// Column flow of a sequence of groups
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLayout {
    /// Group indices per column, left to right
    pub columns: Vec<Vec<usize>>,
    /// Width shared by every column
    pub column_width: f64,
    pub placements: Vec<ColumnPlacement>,
}

/// One row of a vertical flow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowRow {
    pub y: f64,
    pub height: f64,
}
