//! Column flow
//!
//! Groups of known height are poured into a fixed-size container column by
//! column. Column width is only known once every group has been bucketed, so
//! the flow runs in two passes.

use crate::types::EdgePins;

use super::{ColumnLayout, ColumnPlacement};

/// Bucket groups into columns.
///
/// A group starts a new column when the current column already holds
/// something and the group would extend past `container_height`. A group
/// taller than the container therefore still gets a column of its own.
pub fn bucket_columns(heights: &[f64], container_height: f64) -> Vec<Vec<usize>> {
    let mut columns: Vec<Vec<usize>> = vec![Vec::new()];
    let mut cur_y = 0.0;
    for (i, height) in heights.iter().enumerate() {
        if cur_y > 0.0 && cur_y + height > container_height {
            columns.push(Vec::new());
            cur_y = 0.0;
        }
        cur_y += height;
        if let Some(column) = columns.last_mut() {
            column.push(i);
        }
    }
    columns
}

/// Width of each of `count` columns separated by `gap`, rounded to whole units
pub fn column_width(container_width: f64, gap: f64, count: usize) -> f64 {
    let count = count.max(1) as f64;
    ((container_width - gap * (count - 1.0)) / count).round()
}

/// Flow groups into columns and compute each group's frame and pinning.
///
/// Pinning: the first group of a column is pinned to the top, groups of the
/// leftmost column to the left, groups of the rightmost column (when there is
/// more than one) to the right. Heights are always fixed.
pub fn layout_columns(
    heights: &[f64],
    container_width: f64,
    container_height: f64,
    gap: f64,
) -> ColumnLayout {
    let columns = bucket_columns(heights, container_height);
    let count = columns.len();
    let width = column_width(container_width, gap, count);

    let mut placements = Vec::with_capacity(heights.len());
    for (col, column) in columns.iter().enumerate() {
        let x = col as f64 * (width + gap);
        let mut y = 0.0;
        for (row, &group) in column.iter().enumerate() {
            let pins = EdgePins {
                top: row == 0,
                left: col == 0,
                right: col != 0 && col == count - 1,
                fixed_height: true,
                ..Default::default()
            };
            placements.push(ColumnPlacement {
                group,
                column: col,
                x,
                y,
                width,
                pins,
            });
            y += heights[group];
        }
    }

    ColumnLayout {
        columns,
        column_width: width,
        placements,
    }
}
