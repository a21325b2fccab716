//! Table of contents
//!
//! TOC entries from the numbering pass are stamped into template instances,
//! grouped into runs (a section header with its pages), and the runs are
//! flowed into columns inside the `<tocGroup>` container. The container's
//! `<tocGroupRect>` defines the area available to the columns.

use crate::constants::*;
use crate::document::{Document, child_named, children_of_kind, page_layer_named};
use crate::layout::{ColumnLayout, layout_columns};
use crate::options::Settings;
use crate::types::{LayerId, LayerKind, Rect, TemplateId, TocEntry};
use crate::{OrganizeError, Result};

/// Everything the TOC builder needs from the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocSetup {
    pub container: LayerId,
    pub rect: LayerId,
    pub section_template: TemplateId,
    pub page_template: TemplateId,
}

impl TocSetup {
    /// Locate the TOC container and entry templates.
    ///
    /// All problems are reported together so the user can fix them in one go.
    pub fn locate<D: Document + ?Sized>(doc: &D) -> std::result::Result<Self, Vec<OrganizeError>> {
        let mut errors = Vec::new();

        let section_template = doc.template_with_slot(TOC_SECTION_TITLE_SLOT);
        if section_template.is_none() {
            errors.push(OrganizeError::MissingTemplate {
                slot: TOC_SECTION_TITLE_SLOT.to_string(),
            });
        }
        let page_template = doc.template_with_slot(TOC_PAGE_TITLE_SLOT);
        if page_template.is_none() {
            errors.push(OrganizeError::MissingTemplate {
                slot: TOC_PAGE_TITLE_SLOT.to_string(),
            });
        }

        let (container, rect) = match locate_container(doc) {
            Ok(found) => (Some(found.0), Some(found.1)),
            Err(e) => {
                errors.push(e);
                (None, None)
            }
        };

        match (container, rect, section_template, page_template) {
            (Some(container), Some(rect), Some(section_template), Some(page_template)) => {
                Ok(Self {
                    container,
                    rect,
                    section_template,
                    page_template,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Find `<tocGroup>` and its sizing rectangle
pub fn locate_container<D: Document + ?Sized>(doc: &D) -> Result<(LayerId, LayerId)> {
    let container = page_layer_named(doc, LayerKind::Group, TOC_GROUP).ok_or_else(|| {
        OrganizeError::MissingMarker {
            name: TOC_GROUP.to_string(),
        }
    })?;
    let rect = child_named(doc, container, LayerKind::Shape, TOC_GROUP_RECT).ok_or_else(|| {
        OrganizeError::MissingSizingRect {
            container: TOC_GROUP.to_string(),
            rect: TOC_GROUP_RECT.to_string(),
        }
    })?;
    Ok((container, rect))
}

// =============================================================================
// Runs
// =============================================================================

/// Split the retained entries into runs (indices into `entries`).
///
/// A run closes after the last entry, after any entry that does not belong to
/// a section, before the next section header, and after every entry when only
/// section headers are shown.
pub fn toc_runs(entries: &[TocEntry], sections_only: bool) -> Vec<Vec<usize>> {
    let retained: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !sections_only || entry.is_section())
        .map(|(i, _)| i)
        .collect();

    let mut runs = Vec::new();
    let mut current = Vec::new();
    let mut in_section = false;

    for (pos, &i) in retained.iter().enumerate() {
        if entries[i].is_section() {
            in_section = true;
        }
        current.push(i);

        let is_last = pos + 1 == retained.len();
        let next_is_section = retained
            .get(pos + 1)
            .is_some_and(|next| entries[*next].is_section());
        if is_last || !in_section || next_is_section || sections_only {
            runs.push(std::mem::take(&mut current));
        }
    }
    runs
}

// =============================================================================
// Building
// =============================================================================

/// Remove the groups a previous run left in the container
pub fn initialize_toc<D: Document + ?Sized>(doc: &mut D, container: LayerId) -> usize {
    let stale = children_of_kind(doc, container, LayerKind::Group);
    for group in &stale {
        doc.remove_layer(*group);
    }
    stale.len()
}

/// Rebuild the table of contents from `entries` and lay it out.
///
/// Returns the number of entries added.
pub fn build_toc<D: Document + ?Sized>(
    doc: &mut D,
    setup: &TocSetup,
    entries: &[TocEntry],
    settings: &Settings,
) -> Result<usize> {
    let removed = initialize_toc(doc, setup.container);
    log::debug!("Removed {} stale TOC group(s)", removed);

    let runs = toc_runs(entries, settings.toc_show_sections_only);
    let mut added = 0;

    for run in &runs {
        let Some(first) = run.first() else { continue };
        let group = doc.create_group(
            setup.container,
            &format!("{} {}", TOC_SECTION_PREFIX, entries[*first].display_title()),
        );

        let mut y = 0.0;
        for &i in run {
            let entry = &entries[i];
            let item = stamp_entry(doc, setup, group, entry);
            let height = doc.frame(item).height;
            doc.set_frame(item, Rect::new(0.0, y, TOC_INITIAL_ENTRY_WIDTH, height));
            y += height;
            added += 1;
        }
        doc.fit_group_to_content(group);
    }

    log::info!("Built TOC with {} entries in {} group(s)", added, runs.len());
    layout_toc(doc, setup.container, setup.rect, settings.toc_column_spacing);
    Ok(added)
}

fn stamp_entry<D: Document + ?Sized>(
    doc: &mut D,
    setup: &TocSetup,
    group: LayerId,
    entry: &TocEntry,
) -> LayerId {
    let page_number = entry.page_number.as_deref().unwrap_or_default();
    let (item, name) = match &entry.section_title {
        Some(title) => {
            let item = doc.instantiate(setup.section_template, group);
            doc.set_override_text(item, TOC_SECTION_TITLE_SLOT, title);
            (item, format!("{} {}", TOC_SECTION_ENTRY_PREFIX, title))
        }
        None => {
            let title = entry.page_title.as_deref().unwrap_or_default();
            let item = doc.instantiate(setup.page_template, group);
            doc.set_override_text(item, TOC_PAGE_TITLE_SLOT, title);
            (item, format!("{} {}", TOC_PAGE_ENTRY_PREFIX, title))
        }
    };
    doc.set_override_text(item, TOC_PAGE_NUMBER_SLOT, page_number);
    doc.set_name(item, &name);
    item
}

// =============================================================================
// Column Layout
// =============================================================================

/// Flow the container's groups into columns sized by the sizing rectangle
pub fn layout_toc<D: Document + ?Sized>(
    doc: &mut D,
    container: LayerId,
    rect: LayerId,
    column_spacing: f64,
) -> ColumnLayout {
    let area = doc.frame(rect);
    let groups = children_of_kind(doc, container, LayerKind::Group);
    let heights: Vec<f64> = groups.iter().map(|g| doc.frame(*g).height).collect();

    let layout = layout_columns(&heights, area.width, area.height, column_spacing);

    for placement in &layout.placements {
        let group = groups[placement.group];
        let height = heights[placement.group];
        doc.set_frame(
            group,
            Rect::new(placement.x, placement.y, placement.width, height),
        );
        doc.set_pins(group, placement.pins);

        for item in doc.children(group) {
            let frame = doc.frame(item);
            doc.set_frame(item, Rect::new(frame.x, frame.y, placement.width, frame.height));
        }
    }

    log::debug!(
        "TOC laid out in {} column(s) of width {}",
        layout.columns.len(),
        layout.column_width
    );
    layout
}

/// Re-run the column layout after the container was resized.
///
/// The sizing rectangle follows the container's new size first.
pub fn relayout_toc<D: Document + ?Sized>(doc: &mut D, settings: &Settings) -> Result<ColumnLayout> {
    let (container, rect) = locate_container(doc)?;
    let size = doc.frame(container);
    doc.set_frame(rect, Rect::new(0.0, 0.0, size.width, size.height));
    Ok(layout_toc(doc, container, rect, settings.toc_column_spacing))
}
