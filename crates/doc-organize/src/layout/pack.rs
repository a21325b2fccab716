//! Artboard packing
//!
//! Artboards scattered on the page are grouped into rows by repeatedly
//! extracting the top-most row, then optionally repacked into a tidy grid.
//! The resulting order is the document's reading order.

use crate::constants::ROW_TOLERANCE_FACTOR;
use crate::document::Document;
use crate::geometry::sort_by_x;
use crate::types::{LayerId, Rect};

use super::{PackOptions, PackPlan};

// =============================================================================
// Planning
// =============================================================================

/// Detect rows and compute packed positions for `frames`.
///
/// A frame belongs to the current top row when its top edge is within
/// `0.85 × (shortest remaining height)` of the highest remaining top edge.
/// The frame(s) at the highest top edge always join the row, so zero-height
/// frames cannot stall the extraction.
pub fn plan_rows(frames: &[Rect], options: &PackOptions) -> PackPlan {
    let h_spacing = options.h_spacing.max(0.0);
    let v_spacing = options.v_spacing.max(0.0);

    let mut remaining: Vec<usize> = (0..frames.len()).collect();
    let mut plan = PackPlan {
        rows: Vec::new(),
        positions: vec![None; frames.len()],
    };
    let mut origin: Option<(f64, f64)> = None;
    let mut row_y = 0.0;

    while !remaining.is_empty() {
        let min_y = remaining
            .iter()
            .map(|i| frames[*i].y)
            .fold(f64::INFINITY, f64::min);
        let min_height = remaining
            .iter()
            .map(|i| frames[*i].height)
            .fold(f64::INFINITY, f64::min);
        let tolerance = min_height * ROW_TOLERANCE_FACTOR;

        let (mut row, mut rest): (Vec<usize>, Vec<usize>) = remaining.iter().partition(|i| {
            let dy = (frames[**i].y - min_y).abs();
            dy < tolerance || frames[**i].y == min_y
        });
        if row.is_empty() {
            // Only NaN tops are left; they never match, so take one per row
            row.push(rest.remove(0));
        }
        sort_by_x(&mut row, |i| frames[*i]);

        let (origin_x, origin_y) = *origin.get_or_insert_with(|| {
            let lead = frames[row[0]];
            (lead.x, lead.y)
        });
        if plan.rows.is_empty() {
            row_y = origin_y;
        }

        let mut row_x = origin_x;
        let mut max_height: f64 = 0.0;
        for &i in &row {
            if options.move_artboards {
                plan.positions[i] = Some((row_x, row_y));
            }
            row_x += frames[i].width + h_spacing;
            max_height = max_height.max(frames[i].height);
        }
        row_y += max_height + v_spacing;

        log::debug!("Row {} holds {} artboard(s)", plan.rows.len() + 1, row.len());
        plan.rows.push(row);
        remaining = rest;
    }

    plan
}

// =============================================================================
// Document Application
// =============================================================================

/// Arrange the page's artboards into rows and return them in reading order.
///
/// Artboards are restacked so that back-to-front order matches reading order,
/// and the whole set is selected.
pub fn pack_artboards<D: Document + ?Sized>(doc: &mut D, options: &PackOptions) -> Vec<LayerId> {
    let artboards = doc.artboards();
    if artboards.is_empty() {
        return Vec::new();
    }

    let frames: Vec<Rect> = artboards.iter().map(|id| doc.frame(*id)).collect();
    let plan = plan_rows(&frames, options);

    for (i, position) in plan.positions.iter().enumerate() {
        if let Some((x, y)) = position {
            let frame = frames[i];
            doc.set_frame(artboards[i], Rect::new(*x, *y, frame.width, frame.height));
        }
    }

    let ordered: Vec<LayerId> = plan.order().into_iter().map(|i| artboards[i]).collect();
    for (n, artboard) in ordered.iter().enumerate() {
        doc.bring_to_front(*artboard);
        doc.select(*artboard, n > 0);
    }

    log::info!(
        "Sorted {} artboards into {} row(s)",
        ordered.len(),
        plan.rows.len()
    );
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(h: f64, v: f64) -> PackOptions {
        PackOptions {
            h_spacing: h,
            v_spacing: v,
            move_artboards: true,
        }
    }

    #[test]
    fn test_rows_detected_with_tolerance() {
        let frames = vec![
            Rect::new(500.0, 0.0, 200.0, 300.0),
            Rect::new(0.0, 0.0, 200.0, 300.0),
            Rect::new(0.0, 400.0, 200.0, 300.0),
        ];
        let plan = plan_rows(&frames, &PackOptions::default());
        assert_eq!(plan.rows, vec![vec![1, 0], vec![2]]);
        assert_eq!(plan.order(), vec![1, 0, 2]);
        assert!(plan.positions.iter().all(Option::is_none));
    }

    #[test]
    fn test_misaligned_tops_share_a_row() {
        // 250 < 300 * 0.85, so the second artboard still joins the first row
        let frames = vec![
            Rect::new(0.0, 0.0, 100.0, 300.0),
            Rect::new(200.0, 250.0, 100.0, 300.0),
            Rect::new(400.0, 260.0, 100.0, 300.0),
        ];
        let plan = plan_rows(&frames, &PackOptions::default());
        assert_eq!(plan.rows, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_packing_positions() {
        let frames = vec![
            Rect::new(37.0, 12.0, 200.0, 300.0),
            Rect::new(900.0, 20.0, 100.0, 250.0),
            Rect::new(15.0, 800.0, 200.0, 300.0),
        ];
        let plan = plan_rows(&frames, &moving(50.0, 40.0));
        assert_eq!(plan.rows, vec![vec![0, 1], vec![2]]);
        // Origin is the leading artboard of the first row
        assert_eq!(plan.positions[0], Some((37.0, 12.0)));
        assert_eq!(plan.positions[1], Some((287.0, 12.0)));
        // Next row starts below the tallest artboard of the first
        assert_eq!(plan.positions[2], Some((37.0, 352.0)));
    }

    #[test]
    fn test_negative_spacing_is_clamped() {
        let frames = vec![
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Rect::new(300.0, 0.0, 100.0, 100.0),
        ];
        let plan = plan_rows(&frames, &moving(-20.0, -20.0));
        assert_eq!(plan.positions[1], Some((100.0, 0.0)));
    }

    #[test]
    fn test_zero_height_artboards_terminate() {
        let frames = vec![
            Rect::new(0.0, 10.0, 100.0, 0.0),
            Rect::new(200.0, 0.0, 100.0, 0.0),
            Rect::new(400.0, 0.0, 100.0, 0.0),
        ];
        let plan = plan_rows(&frames, &PackOptions::default());
        assert_eq!(plan.rows, vec![vec![1, 2], vec![0]]);
    }

    #[test]
    fn test_non_finite_tops_terminate() {
        let frames = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, f64::NAN, 10.0, 10.0),
            Rect::new(20.0, f64::INFINITY, 10.0, 10.0),
        ];
        let plan = plan_rows(&frames, &PackOptions::default());
        // An infinite top still equals the infinite minimum; NaN is left for last
        assert_eq!(plan.rows, vec![vec![0], vec![2], vec![1]]);

        let plan = plan_rows(&[Rect::new(0.0, f64::NAN, 10.0, 10.0)], &PackOptions::default());
        assert_eq!(plan.rows, vec![vec![0]]);
    }

    #[test]
    fn test_empty_input() {
        let plan = plan_rows(&[], &PackOptions::default());
        assert!(plan.rows.is_empty());
        assert!(plan.order().is_empty());
    }
}
