//! Vertical flow with measured row heights
//!
//! Rows are stacked top to bottom with no gap. Each row's height is the
//! measured height of its wrapped text plus the fixed padding its template
//! puts around the text.

use super::FlowRow;

/// Stack rows whose text heights are already measured.
///
/// Returns the row frames and the total height.
pub fn flow_rows(text_heights: &[f64], vertical_padding: f64) -> (Vec<FlowRow>, f64) {
    let mut running_top = 0.0;
    let rows = text_heights
        .iter()
        .map(|text_height| {
            let row = FlowRow {
                y: running_top,
                height: vertical_padding + text_height,
            };
            running_top += row.height;
            row
        })
        .collect();
    (rows, running_top)
}
