//! The organize pipeline and the host hooks built on it
//!
//! `organize_document` checks the page, then packs, numbers, builds the TOC,
//! updates callouts and rounds, in that order. Each pass adds a line to the
//! [`Summary`]; setup problems are reported there instead of aborting the
//! passes that do not depend on them.

use crate::callouts::{layout_callout_list, update_callouts_on_artboard};
use crate::constants::*;
use crate::document::{Document, all_page_layers};
use crate::layout::pack_artboards;
use crate::numbering::number_artboards;
use crate::options::Settings;
use crate::rounding::round_layers;
use crate::summary::Summary;
use crate::toc::{TocSetup, build_toc, relayout_toc};
use crate::types::LayerId;
use crate::{MemoryDocument, OrganizeError, Result};
use chrono::NaiveDateTime;

/// Result of checking the page before anything is changed
#[derive(Debug, Default)]
pub struct PageSetup {
    /// Problems that stop the whole run
    pub fatal: Vec<OrganizeError>,
    /// Problems that only skip the table of contents
    pub toc_errors: Vec<OrganizeError>,
    /// Present when the TOC is enabled and fully set up
    pub toc: Option<TocSetup>,
}

impl PageSetup {
    pub fn can_organize(&self) -> bool {
        self.fatal.is_empty()
    }
}

/// Check the page for the artboards, templates and markers the passes need
pub fn check_page_setup<D: Document + ?Sized>(doc: &D, settings: &Settings) -> PageSetup {
    let mut setup = PageSetup::default();

    if doc.artboards().is_empty() {
        setup.fatal.push(OrganizeError::NoArtboards);
        return setup;
    }

    for slot in [PAGE_NUMBER_SLOT, SECTION_TITLE_SLOT, PAGE_TITLE_SLOT] {
        if doc.template_with_slot(slot).is_none() {
            setup.fatal.push(OrganizeError::MissingTemplate {
                slot: slot.to_string(),
            });
        }
    }

    if settings.use_toc {
        match TocSetup::locate(doc) {
            Ok(toc) => setup.toc = Some(toc),
            Err(errors) => setup.toc_errors = errors,
        }
    }
    setup
}

/// Run every pass over the current page
pub fn organize_document<D: Document + ?Sized>(
    doc: &mut D,
    settings: &Settings,
    now: &NaiveDateTime,
) -> Summary {
    let mut summary = Summary::new();

    let setup = check_page_setup(doc, settings);
    if !setup.can_organize() {
        for error in &setup.fatal {
            summary.push_error(error);
        }
        return summary;
    }

    let order = pack_artboards(doc, &settings.pack_options());
    let numbering = number_artboards(doc, &order, settings, now);
    summary.push_success(format!("{} artboards updated", numbering.titles_added));

    if settings.use_toc {
        for error in &setup.toc_errors {
            summary.push_error(error);
        }
        if let Some(toc) = &setup.toc {
            match build_toc(doc, toc, &numbering.toc_entries, settings) {
                Ok(added) => summary.push_success(format!("{} items added to TOC", added)),
                Err(e) => summary.push_error(&e),
            }
        } else {
            log::warn!("Skipping table of contents");
        }
    }

    let mut updated = 0;
    let mut callout_error = None;
    for artboard in &order {
        match update_callouts_on_artboard(doc, *artboard, settings) {
            Ok(count) => updated += count,
            Err(e) => {
                log::debug!("Callouts on {} skipped: {}", artboard, e);
                if callout_error.is_none() {
                    callout_error = Some(e);
                }
            }
        }
    }
    if let Some(e) = callout_error {
        summary.push_error(&e);
    }
    summary.push_success(format!("{} callouts updated", updated));

    if settings.round_to_nearest_pixel {
        let grid = settings.nearest_pixel_to_round_to;
        let report = round_layers(doc, grid);
        summary.push_success(format!(
            "{} dimensions rounded to nearest {} pixels",
            report.dimensions_fixed, grid
        ));
    }

    summary
}

/// Run the pipeline on a blocking thread.
///
/// The caller can show its "working" message before awaiting.
pub async fn organize_document_async(
    doc: MemoryDocument,
    settings: Settings,
    now: NaiveDateTime,
) -> Result<(MemoryDocument, Summary)> {
    let result = tokio::task::spawn_blocking(move || {
        let mut doc = doc;
        let summary = organize_document(&mut doc, &settings, &now);
        (doc, summary)
    })
    .await?;
    Ok(result)
}

/// Renumber the callouts of the artboard holding the selection.
///
/// Nothing selected is an error for the caller to show; everything else ends
/// up in the summary.
pub fn update_callouts_on_selected_artboard<D: Document + ?Sized>(
    doc: &mut D,
    settings: &Settings,
) -> Result<Summary> {
    let artboard = doc.selected_artboard().ok_or(OrganizeError::NoSelection)?;
    let mut summary = Summary::new();
    match update_callouts_on_artboard(doc, artboard, settings) {
        Ok(count) => summary.push_success(format!("{} callouts updated", count)),
        Err(e) => summary.push_error(&e),
    }
    Ok(summary)
}

// =============================================================================
// Host Events
// =============================================================================

/// Refresh every `<currentDate>` slot on the page, unless this is an autosave
pub fn on_document_saved<D: Document + ?Sized>(
    doc: &mut D,
    settings: &Settings,
    autosaved: bool,
    now: &NaiveDateTime,
) -> Summary {
    let mut summary = Summary::new();
    if autosaved {
        return summary;
    }

    let date = crate::date::format_date(settings.date_template(), now);
    let mut updated = 0;
    for layer in all_page_layers(doc) {
        if doc.has_override(layer, CURRENT_DATE_SLOT) {
            doc.set_override_text(layer, CURRENT_DATE_SLOT, &date);
            updated += 1;
        }
    }
    if updated > 0 {
        summary.push_success(format!(
            "{} current-date instance(s) updated on Save",
            updated
        ));
    }
    summary
}

/// Re-run list layouts for resized TOC and callout-list containers
pub fn on_layers_resized<D: Document + ?Sized>(
    doc: &mut D,
    settings: &Settings,
    layers: &[LayerId],
) -> Summary {
    let mut summary = Summary::new();
    for &layer in layers {
        let name = doc.name(layer);
        if name == TOC_GROUP {
            match relayout_toc(doc, settings) {
                Ok(layout) => summary.push_success(format!(
                    "TOC laid out in {} column(s)",
                    layout.columns.len()
                )),
                Err(e) => summary.push_error(&e),
            }
        } else if name == CALLOUT_LIST_GROUP {
            match layout_callout_list(doc, layer) {
                Ok(_) => summary.push_success("Callout list laid out"),
                Err(e) => summary.push_error(&e),
            }
        }
    }
    summary
}
