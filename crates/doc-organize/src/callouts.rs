//! Callout numbering and description lists
//!
//! Callouts are symbol instances with a `<calloutDescription>` slot. Each
//! artboard's callouts are numbered in visual order and mirrored into a
//! `<calloutListGroup>` whose rows are as tall as their wrapped descriptions.

use crate::constants::*;
use crate::document::{Document, child_named, children_of_kind, descendants};
use crate::geometry::{sort_by_rows, sort_by_x, sort_by_y};
use crate::layout::flow_rows;
use crate::options::Settings;
use crate::types::{EdgePins, LayerId, LayerKind, Rect};
use crate::{OrganizeError, Result};

// =============================================================================
// Identifiers
// =============================================================================

/// Spreadsheet-style letter code: `0 → A`, `25 → Z`, `26 → AA`, `27 → AB`
pub fn letter_code(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let digit = (n - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Section prefix for callout numbers taken from the artboard name.
///
/// `"2.3 – Overview"` gives `"2.3."`; names that do not start with a number
/// give an empty prefix.
pub fn section_prefix(artboard_name: &str) -> String {
    let head = artboard_name.split(' ').next().unwrap_or_default();
    let head = head.trim_end_matches('.');
    if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{head}.")
    } else {
        String::new()
    }
}

/// Identifier of the callout at 1-based `index`
pub fn callout_identifier(index: usize, prefix: &str, use_sections: bool) -> String {
    if use_sections {
        format!("{prefix}{index}")
    } else {
        letter_code(index.saturating_sub(1))
    }
}

/// Layer name of a callout: identifier plus the start of its description
pub fn callout_layer_name(identifier: &str, description: &str) -> String {
    let head: String = description
        .chars()
        .take(CALLOUT_NAME_DESCRIPTION_CHARS)
        .collect();
    format!("{identifier} - {head}...")
}

// =============================================================================
// Discovery
// =============================================================================

fn is_callout<D: Document + ?Sized>(doc: &D, layer: LayerId) -> bool {
    doc.kind(layer) == Some(LayerKind::SymbolInstance)
        && doc.has_override(layer, CALLOUT_DESCRIPTION_SLOT)
}

/// Callouts of `artboard` in numbering order.
///
/// Grouped callouts come first, group by group from left to right, each
/// group's callouts in row order. Ungrouped callouts follow, top to bottom.
pub fn sorted_callouts<D: Document + ?Sized>(doc: &D, artboard: LayerId) -> Vec<LayerId> {
    let mut groups: Vec<LayerId> = children_of_kind(doc, artboard, LayerKind::Group)
        .into_iter()
        .filter(|group| doc.name(*group) != CALLOUT_LIST_GROUP)
        .collect();
    sort_by_x(&mut groups, |g| doc.frame(*g));

    let mut ordered = Vec::new();
    for group in groups {
        let mut members: Vec<LayerId> = descendants(doc, group)
            .into_iter()
            .filter(|layer| is_callout(doc, *layer))
            .collect();
        sort_by_rows(&mut members, |c| doc.frame(*c));
        ordered.extend(members);
    }

    let mut loose: Vec<LayerId> = doc
        .children(artboard)
        .into_iter()
        .filter(|layer| is_callout(doc, *layer))
        .collect();
    sort_by_y(&mut loose, |c| doc.frame(*c));
    ordered.extend(loose);
    ordered
}

// =============================================================================
// Numbering
// =============================================================================

/// Number the callouts of `artboard` and rebuild its description list.
///
/// Returns the number of callouts updated. Fails before touching the document
/// when there are callouts but no description-list template.
pub fn update_callouts_on_artboard<D: Document + ?Sized>(
    doc: &mut D,
    artboard: LayerId,
    settings: &Settings,
) -> Result<usize> {
    let callouts = sorted_callouts(doc, artboard);
    let list = child_named(doc, artboard, LayerKind::Group, CALLOUT_LIST_GROUP);
    if callouts.is_empty() && list.is_none() {
        return Ok(0);
    }

    let template = doc.template_with_slot(CALLOUT_LIST_DESCRIPTION_SLOT);
    if template.is_none() && !callouts.is_empty() {
        return Err(OrganizeError::MissingTemplate {
            slot: CALLOUT_LIST_DESCRIPTION_SLOT.to_string(),
        });
    }

    let prefix = section_prefix(&doc.name(artboard));
    let mut rows = Vec::with_capacity(callouts.len());
    for (i, callout) in callouts.iter().enumerate() {
        let identifier = callout_identifier(i + 1, &prefix, settings.use_sections);
        let description = doc
            .override_text(*callout, CALLOUT_DESCRIPTION_SLOT)
            .unwrap_or_default();
        if description.trim().is_empty() {
            log::warn!("Callout {} on {} has no description", identifier, artboard);
        }

        doc.set_override_text(*callout, CALLOUT_NUMBER_SLOT, &identifier);
        doc.set_override_text(*callout, CALLOUT_DESCRIPTION_SLOT, &description);
        let name = callout_layer_name(&identifier, &description);
        doc.set_name(*callout, &name);
        rows.push((identifier, description));
    }

    let list = match list {
        Some(list) => list,
        None => create_callout_list_group(doc, artboard),
    };
    for entry in children_of_kind(doc, list, LayerKind::SymbolInstance) {
        doc.remove_layer(entry);
    }

    if let Some(template) = template {
        for (identifier, description) in &rows {
            let entry = doc.instantiate(template, list);
            doc.set_override_text(entry, CALLOUT_LIST_NUMBER_SLOT, identifier);
            doc.set_override_text(entry, CALLOUT_LIST_DESCRIPTION_SLOT, description);
            doc.set_name(entry, identifier);
        }
    }

    layout_callout_list(doc, list)?;
    log::debug!("Updated {} callout(s) on {}", callouts.len(), artboard);
    Ok(callouts.len())
}

// =============================================================================
// Description List
// =============================================================================

/// Create an empty description list in the artboard's right-hand margin
pub fn create_callout_list_group<D: Document + ?Sized>(doc: &mut D, artboard: LayerId) -> LayerId {
    let board = doc.frame(artboard);
    let width = (board.width * CALLOUT_LIST_WIDTH_RATIO).round();

    let list = doc.create_group(artboard, CALLOUT_LIST_GROUP);
    doc.create_rectangle(
        list,
        CALLOUT_GROUP_RECT,
        Rect::new(0.0, 0.0, width, board.height),
    );
    doc.set_frame(
        list,
        Rect::new(
            (board.width * CALLOUT_LIST_X_RATIO).round(),
            (board.height * CALLOUT_LIST_Y_RATIO).round(),
            width,
            board.height,
        ),
    );
    doc.set_pins(
        list,
        EdgePins {
            top: true,
            right: true,
            fixed_width: true,
            fixed_height: true,
            ..Default::default()
        },
    );
    log::debug!("Created callout list on {}", artboard);
    list
}

/// Stack the list's entries with heights measured from their text, then size
/// the list and its background to fit.
///
/// Returns the list's new height.
pub fn layout_callout_list<D: Document + ?Sized>(doc: &mut D, list: LayerId) -> Result<f64> {
    let frame = doc.frame(list);
    let width = frame.width;
    let entries = children_of_kind(doc, list, LayerKind::SymbolInstance);

    let row_heights = if entries.is_empty() {
        Vec::new()
    } else {
        let template = doc
            .template_with_slot(CALLOUT_LIST_DESCRIPTION_SLOT)
            .ok_or_else(|| OrganizeError::MissingTemplate {
                slot: CALLOUT_LIST_DESCRIPTION_SLOT.to_string(),
            })?;
        let outer = doc.template_frame(template);
        let text = doc
            .template_slot_frame(template, CALLOUT_LIST_DESCRIPTION_SLOT)
            .unwrap_or(outer);
        let text_width = width - (outer.width - text.width);
        let padding = outer.height - text.height;

        let heights: Vec<f64> = entries
            .iter()
            .map(|entry| {
                let description = doc
                    .override_text(*entry, CALLOUT_LIST_DESCRIPTION_SLOT)
                    .unwrap_or_default();
                doc.measure_wrapped_text_height(
                    template,
                    CALLOUT_LIST_DESCRIPTION_SLOT,
                    &description,
                    text_width,
                )
            })
            .collect();
        let (rows, _) = flow_rows(&heights, padding);
        for (entry, row) in entries.iter().zip(&rows) {
            doc.set_frame(*entry, Rect::new(0.0, row.y, width, row.height));
        }
        rows.iter().map(|row| row.height).collect()
    };
    let total: f64 = row_heights.iter().sum();

    let background = Rect::new(0.0, 0.0, width, total);
    match child_named(doc, list, LayerKind::Shape, CALLOUT_GROUP_RECT) {
        Some(rect) => doc.set_frame(rect, background),
        None => {
            doc.create_rectangle(list, CALLOUT_GROUP_RECT, background);
        }
    }
    doc.set_frame(list, Rect::new(frame.x, frame.y, width, total));

    Ok(total)
}
