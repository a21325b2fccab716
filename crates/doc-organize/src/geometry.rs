//! Geometry and ordering helpers
//!
//! Row-major sorting of layers, a modulo that behaves for decimal grid sizes,
//! and grid rounding.

use crate::constants::ROW_SORT_FACTOR;
use crate::types::Rect;
use std::cmp::Ordering;

/// Decimal places beyond which values are treated as binary noise
const MAX_DECIMAL_PLACES: u32 = 12;

// =============================================================================
// Ordering
// =============================================================================

/// Single numeric key that sorts by row, then by x within a row.
///
/// This is a heuristic: two frames whose tops differ by less than one unit
/// but whose lefts differ by more than [`ROW_SORT_FACTOR`] will swap rows.
/// Use [`crate::layout::pack_artboards`] when rows must be detected robustly.
pub fn row_sort_key(frame: &Rect, min_x: f64, min_y: f64) -> f64 {
    (frame.y - min_y) * ROW_SORT_FACTOR + (frame.x - min_x)
}

/// Sort items laid out in horizontal rows into reading order.
pub fn sort_by_rows<T>(items: &mut [T], frame_of: impl Fn(&T) -> Rect) {
    let (min_x, min_y) = items.iter().map(&frame_of).fold(
        (f64::INFINITY, f64::INFINITY),
        |(min_x, min_y), frame| (min_x.min(frame.x), min_y.min(frame.y)),
    );
    items.sort_by(|a, b| {
        let ka = row_sort_key(&frame_of(a), min_x, min_y);
        let kb = row_sort_key(&frame_of(b), min_x, min_y);
        ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
    });
}

/// Sort items left to right
pub fn sort_by_x<T>(items: &mut [T], frame_of: impl Fn(&T) -> Rect) {
    items.sort_by(|a, b| {
        frame_of(a)
            .x
            .partial_cmp(&frame_of(b).x)
            .unwrap_or(Ordering::Equal)
    });
}

/// Sort items top to bottom
pub fn sort_by_y<T>(items: &mut [T], frame_of: impl Fn(&T) -> Rect) {
    items.sort_by(|a, b| {
        frame_of(a)
            .y
            .partial_cmp(&frame_of(b).y)
            .unwrap_or(Ordering::Equal)
    });
}

// =============================================================================
// Modulo and Rounding
// =============================================================================

/// Number of decimal places in the shortest representation of `value`.
pub fn decimal_places(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let text = value.abs().to_string();
    let places = text
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len() as u32);
    places.min(MAX_DECIMAL_PLACES)
}

/// Mathematical modulo that is exact for decimal operands.
///
/// Both operands are scaled to integers by the larger of their decimal
/// precisions before taking the remainder, so `floating_point_safe_mod(10.3, 0.5)`
/// is `0.3` rather than `0.3000000000000007`. The result takes the sign of
/// `modulus`; for `modulus > 0` it lies in `[0, modulus)`.
pub fn floating_point_safe_mod(value: f64, modulus: f64) -> f64 {
    if !value.is_finite() || !modulus.is_finite() || modulus == 0.0 {
        return f64::NAN;
    }
    let places = decimal_places(value).max(decimal_places(modulus));
    let scale = 10f64.powi(places as i32);
    let scaled_value = (value * scale).round();
    let scaled_modulus = (modulus * scale).round();

    // Both scaled operands must stay well inside i128 so `(v % m) + m` cannot overflow
    let limit = i128::MAX as f64 / 4.0;
    if scaled_value.abs() >= limit || scaled_modulus.abs() >= limit || scaled_modulus == 0.0 {
        return value.rem_euclid(modulus.abs()).copysign(modulus);
    }

    let v = scaled_value as i128;
    let m = scaled_modulus as i128;
    let remainder = ((v % m) + m) % m;
    remainder as f64 / scale
}

/// Round `value` to the nearest multiple of `grid_size`.
///
/// Halves round up, and the multiplication happens in the grid's decimal
/// scale so results such as `10.3` on a `0.1` grid come out exact.
pub fn round_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 || !grid_size.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimal_places(grid_size) as i32);
    let scaled_grid = (grid_size * scale).round();
    let steps = ((value * scale) / scaled_grid + 0.5).floor();
    (steps * scaled_grid) / scale
}

/// Whether `value` already sits on the grid
pub fn is_on_grid(value: f64, grid_size: f64) -> bool {
    floating_point_safe_mod(value, grid_size) == 0.0
}
