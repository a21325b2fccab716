//! Pixel rounding
//!
//! Snaps the geometry of every layer inside the page's artboards to a grid.
//! Entries of generated lists are skipped: their sizes come from the list
//! layouts and are rebuilt on every run anyway.

use crate::constants::{CALLOUT_LIST_GROUP, TOC_SECTION_PREFIX};
use crate::document::{Document, descendants};
use crate::geometry::{is_on_grid, round_to_grid};
use crate::types::{LayerId, Rect};

/// Outcome of a rounding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundingReport {
    pub layers_checked: usize,
    /// Number of x/y/width/height values that moved
    pub dimensions_fixed: usize,
}

/// Round each of `frame`'s values that is off the grid.
///
/// Returns the new frame and how many values changed.
pub fn round_frame(frame: Rect, grid_size: f64) -> (Rect, usize) {
    let mut fixed = 0;
    let mut snap = |value: f64| {
        if is_on_grid(value, grid_size) {
            value
        } else {
            fixed += 1;
            round_to_grid(value, grid_size)
        }
    };
    let rounded = Rect::new(
        snap(frame.x),
        snap(frame.y),
        snap(frame.width),
        snap(frame.height),
    );
    (rounded, fixed)
}

fn is_excluded<D: Document + ?Sized>(doc: &D, layer: LayerId) -> bool {
    doc.parent(layer).is_some_and(|parent| {
        let name = doc.name(parent);
        name == CALLOUT_LIST_GROUP || name.starts_with(TOC_SECTION_PREFIX)
    })
}

/// Round every non-excluded layer below the page's artboards
pub fn round_layers<D: Document + ?Sized>(doc: &mut D, grid_size: f64) -> RoundingReport {
    let mut report = RoundingReport::default();
    for artboard in doc.artboards() {
        for layer in descendants(doc, artboard) {
            if is_excluded(doc, layer) {
                continue;
            }
            report.layers_checked += 1;
            let (rounded, fixed) = round_frame(doc.frame(layer), grid_size);
            if fixed > 0 {
                doc.set_frame(layer, rounded);
                report.dimensions_fixed += fixed;
            }
        }
    }
    log::info!(
        "Rounded {} value(s) across {} layer(s) to {}",
        report.dimensions_fixed,
        report.layers_checked,
        grid_size
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use crate::types::LayerKind;

    #[test]
    fn test_round_frame() {
        let (rounded, fixed) = round_frame(Rect::new(10.3, 4.0, 20.75, 8.5), 0.5);
        assert_eq!(rounded, Rect::new(10.5, 4.0, 21.0, 8.5));
        assert_eq!(fixed, 2);

        let aligned = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(round_frame(aligned, 1.0), (aligned, 0));
    }

    #[test]
    fn test_round_frame_tenths() {
        let (rounded, fixed) = round_frame(Rect::new(0.34, 0.1, 12.25, 7.0), 0.1);
        assert_eq!(rounded, Rect::new(0.3, 0.1, 12.3, 7.0));
        assert_eq!(fixed, 2);
    }

    #[test]
    fn test_round_layers_skips_list_entries() {
        let mut doc = MemoryDocument::new();
        let ab = doc.add_artboard("A", Rect::new(0.0, 0.0, 500.0, 500.0));
        let shape = doc.add_layer(Some(ab), LayerKind::Shape, "box", Rect::new(1.4, 2.0, 10.0, 10.6));
        let list = doc.add_layer(Some(ab), LayerKind::Group, CALLOUT_LIST_GROUP, Rect::new(300.0, 0.0, 100.0, 50.0));
        let entry = doc.add_layer(Some(list), LayerKind::Shape, "entry", Rect::new(0.0, 0.0, 100.0, 24.3));
        let run = doc.add_layer(Some(ab), LayerKind::Group, "<tocSection> 1 - A", Rect::new(0.0, 100.0, 50.0, 50.0));
        let item = doc.add_layer(Some(run), LayerKind::Shape, "item", Rect::new(0.0, 0.5, 50.0, 20.0));

        let report = round_layers(&mut doc, 1.0);

        assert_eq!(report.layers_checked, 3);
        assert_eq!(report.dimensions_fixed, 2);
        assert_eq!(doc.frame(shape), Rect::new(1.0, 2.0, 10.0, 11.0));
        assert_eq!(doc.frame(entry).height, 24.3);
        assert_eq!(doc.frame(item).y, 0.5);
    }
}
