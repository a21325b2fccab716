//! Page and section numbering
//!
//! Artboards are walked in reading order. Each artboard's annotatable
//! elements (symbol instances) are inspected for title and page-number slots,
//! and a [`NumberingState`] carries the counters from one artboard to the
//! next. [`number_artboard`] is the pure step; [`number_artboards`] reads the
//! elements from a [`Document`] and writes the results back.

use crate::constants::*;
use crate::date::format_date;
use crate::document::{Document, descendants};
use crate::options::{DashType, Settings};
use crate::types::{LayerId, LayerKind, TocEntry};
use chrono::NaiveDateTime;

/// Placeholder replaced by the page number in page-number templates
pub const PAGE_NUMBER_PLACEHOLDER: char = '#';

// =============================================================================
// Title Composition
// =============================================================================

fn is_prefix_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '.' | '-' | '\u{2013}' | '\u{2014}')
}

/// Byte index where an existing `1.2 – ` style prefix ends.
///
/// Returns 0 when the text does not start with a prefix character, and also
/// when the text consists of nothing but prefix characters.
pub fn prefix_end_index(text: &str) -> usize {
    text.char_indices()
        .find(|(_, c)| !is_prefix_char(*c))
        .map_or(0, |(i, _)| i)
}

/// Text with any numbering prefix removed.
///
/// Surrounding whitespace is trimmed first and stays trimmed, so the prefix
/// index always refers to the text it is sliced from.
pub fn strip_numbering(text: &str) -> &str {
    let text = text.trim();
    &text[prefix_end_index(text)..]
}

/// How composed titles look
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleStyle {
    pub use_sections: bool,
    pub dash: DashType,
}

impl From<&Settings> for TitleStyle {
    fn from(settings: &Settings) -> Self {
        Self {
            use_sections: settings.use_sections,
            dash: settings.dash_type,
        }
    }
}

/// Compose a display title from a raw title and its position.
///
/// `page_in_section == 0` marks a section header (`"2 – Title"`); anything
/// else is a page within the section (`"2.3 – Title"`). Any previous
/// numbering prefix is replaced, so composing is idempotent.
pub fn compose_title(
    text: &str,
    section_number: u32,
    page_in_section: u32,
    style: TitleStyle,
) -> String {
    let stripped = strip_numbering(text);
    let dash = style.dash.glyph();
    if !style.use_sections {
        stripped.to_string()
    } else if page_in_section == 0 {
        format!("{section_number} {dash} {stripped}")
    } else {
        format!("{section_number}.{page_in_section} {dash} {stripped}")
    }
}

/// Render a page number, substituting it into `template` when the template
/// contains a `#` placeholder
pub fn format_page_number(page: u32, template: Option<&str>) -> String {
    match template {
        Some(t) if t.contains(PAGE_NUMBER_PLACEHOLDER) => {
            t.replace(PAGE_NUMBER_PLACEHOLDER, &page.to_string())
        }
        _ => page.to_string(),
    }
}

// =============================================================================
// Numbering State
// =============================================================================

/// Counters carried across the reading-order walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingState {
    /// Page number the next opted-in artboard receives
    pub page_counter: u32,
    /// Set once an artboard with a page-number slot has been seen
    pub first_page_found: bool,
    pub section_counter: u32,
    pub page_in_section: u32,
    /// Most recent composed section title
    pub running_section_title: Option<String>,
}

impl Default for NumberingState {
    fn default() -> Self {
        Self {
            page_counter: 1,
            first_page_found: false,
            section_counter: 0,
            page_in_section: 0,
            running_section_title: None,
        }
    }
}

/// Slots one element exposes, with the raw texts the step needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementSlots {
    /// Present when the element has a page-number slot; holds the slot's
    /// template default, which may contain a `#` placeholder
    pub page_number_format: Option<String>,
    pub section_title: Option<String>,
    pub page_title: Option<String>,
    pub has_current_section: bool,
    pub has_current_date: bool,
    pub has_document_title: bool,
}

/// Values shared by every step of one walk
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub style: TitleStyle,
    pub document_title: &'a str,
    pub current_date: &'a str,
}

/// A pending override write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotWrite {
    /// Index into the step's element slice
    pub element: usize,
    pub slot: &'static str,
    pub text: String,
}

/// Everything one step decided about an artboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtboardNumbering {
    pub writes: Vec<SlotWrite>,
    /// New artboard name, from the last title found
    pub artboard_name: Option<String>,
    pub toc_entry: Option<TocEntry>,
    pub titles_added: usize,
}

/// Number one artboard.
///
/// Takes the state left by the previous artboard and returns the state for
/// the next one along with the writes to perform.
pub fn number_artboard(
    mut state: NumberingState,
    elements: &[ElementSlots],
    ctx: &StepContext<'_>,
) -> (NumberingState, ArtboardNumbering) {
    let mut out = ArtboardNumbering::default();
    let mut section_title: Option<String> = None;
    let mut page_title: Option<String> = None;

    for (element, slots) in elements.iter().enumerate() {
        let mut write = |slot: &'static str, text: String| {
            out.writes.push(SlotWrite {
                element,
                slot,
                text,
            });
        };

        if let Some(format) = &slots.page_number_format {
            write(
                PAGE_NUMBER_SLOT,
                format_page_number(state.page_counter, Some(format.as_str())),
            );
            state.first_page_found = true;
        }

        if let Some(raw) = &slots.section_title {
            state.section_counter += 1;
            state.page_in_section = 0;
            let title = compose_title(raw, state.section_counter, 0, ctx.style);
            write(SECTION_TITLE_SLOT, title.clone());
            state.running_section_title = Some(title.clone());
            out.artboard_name = Some(title.clone());
            section_title = Some(title);
            out.titles_added += 1;
        }

        if let Some(raw) = &slots.page_title {
            state.page_in_section += 1;
            let title = compose_title(
                raw,
                state.section_counter,
                state.page_in_section,
                ctx.style,
            );
            write(PAGE_TITLE_SLOT, title.clone());
            out.artboard_name = Some(title.clone());
            page_title = Some(title);
            out.titles_added += 1;
        }

        if slots.has_current_section {
            if let Some(running) = &state.running_section_title {
                write(CURRENT_SECTION_SLOT, strip_numbering(running).to_string());
            }
        }

        if slots.has_current_date {
            write(CURRENT_DATE_SLOT, ctx.current_date.to_string());
        }

        if slots.has_document_title && !ctx.document_title.is_empty() {
            write(DOCUMENT_TITLE_SLOT, ctx.document_title.to_string());
        }
    }

    if section_title.is_some() || page_title.is_some() {
        out.toc_entry = Some(TocEntry {
            section_title,
            page_title,
            page_number: state
                .first_page_found
                .then(|| state.page_counter.to_string()),
        });
    }

    if state.first_page_found {
        state.page_counter += 1;
    }

    (state, out)
}

// =============================================================================
// Document Application
// =============================================================================

/// Result of numbering every artboard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberingOutcome {
    pub toc_entries: Vec<TocEntry>,
    pub titles_added: usize,
    pub final_state: NumberingState,
}

fn element_slots<D: Document + ?Sized>(doc: &D, element: LayerId) -> ElementSlots {
    ElementSlots {
        page_number_format: doc.has_override(element, PAGE_NUMBER_SLOT).then(|| {
            doc.default_override_text(element, PAGE_NUMBER_SLOT)
                .unwrap_or_default()
        }),
        section_title: doc.override_text(element, SECTION_TITLE_SLOT),
        page_title: doc.override_text(element, PAGE_TITLE_SLOT),
        has_current_section: doc.has_override(element, CURRENT_SECTION_SLOT),
        has_current_date: doc.has_override(element, CURRENT_DATE_SLOT),
        has_document_title: doc.has_override(element, DOCUMENT_TITLE_SLOT),
    }
}

/// Symbol instances anywhere inside `artboard`, in tree order
pub fn artboard_instances<D: Document + ?Sized>(doc: &D, artboard: LayerId) -> Vec<LayerId> {
    descendants(doc, artboard)
        .into_iter()
        .filter(|layer| doc.kind(*layer) == Some(LayerKind::SymbolInstance))
        .collect()
}

/// Number and rename `artboards` (in reading order) and collect TOC entries.
pub fn number_artboards<D: Document + ?Sized>(
    doc: &mut D,
    artboards: &[LayerId],
    settings: &Settings,
    now: &NaiveDateTime,
) -> NumberingOutcome {
    let current_date = format_date(settings.date_template(), now);
    let ctx = StepContext {
        style: TitleStyle::from(settings),
        document_title: &settings.doc_title,
        current_date: &current_date,
    };

    let mut outcome = NumberingOutcome::default();
    let mut state = NumberingState::default();

    for &artboard in artboards {
        let instances = artboard_instances(doc, artboard);
        let elements: Vec<ElementSlots> = instances
            .iter()
            .map(|instance| element_slots(doc, *instance))
            .collect();

        let (next, step) = number_artboard(state, &elements, &ctx);
        state = next;

        for write in &step.writes {
            doc.set_override_text(instances[write.element], write.slot, &write.text);
        }
        if let Some(name) = &step.artboard_name {
            log::debug!("Artboard {} is now \"{}\"", artboard, name);
            doc.set_name(artboard, name);
        }
        if let Some(entry) = step.toc_entry {
            if entry.page_number.is_none() {
                log::warn!("\"{}\" has no page number yet", entry.display_title());
            }
            outcome.toc_entries.push(entry);
        }
        outcome.titles_added += step.titles_added;
    }

    log::info!(
        "Numbered {} artboards, {} titles",
        artboards.len(),
        outcome.titles_added
    );
    outcome.final_state = state;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(dash: DashType) -> TitleStyle {
        TitleStyle {
            use_sections: true,
            dash,
        }
    }

    fn ctx(dash: DashType) -> StepContext<'static> {
        StepContext {
            style: style(dash),
            document_title: "",
            current_date: "today",
        }
    }

    #[test]
    fn test_prefix_end_index() {
        assert_eq!(prefix_end_index("1 \u{2013} Introduction"), 6);
        assert_eq!(prefix_end_index("2.3 - Overview"), 6);
        assert_eq!(prefix_end_index("Overview"), 0);
        // Nothing but prefix characters: nothing is stripped
        assert_eq!(prefix_end_index("1.2 - "), 0);
    }

    #[test]
    fn test_strip_numbering_trims_before_slicing() {
        assert_eq!(strip_numbering("2.1 - Overview"), "Overview");
        assert_eq!(strip_numbering("  2.1 - Overview  "), "Overview");
        assert_eq!(strip_numbering(" Overview "), "Overview");
        assert_eq!(strip_numbering(" 1.2 - "), "1.2 -");
    }

    #[test]
    fn test_compose_title() {
        let en = style(DashType::EnDash);
        assert_eq!(compose_title("Introduction", 1, 0, en), "1 \u{2013} Introduction");
        assert_eq!(
            compose_title("1 \u{2013} Introduction", 1, 0, en),
            "1 \u{2013} Introduction"
        );
        assert_eq!(compose_title("Overview", 2, 3, en), "2.3 \u{2013} Overview");
    }

    #[test]
    fn test_compose_title_rewrites_old_prefix_and_dash() {
        let hyphen = style(DashType::Hyphen);
        assert_eq!(compose_title("4.7 \u{2014} Install", 1, 2, hyphen), "1.2 - Install");
        assert_eq!(compose_title("  Install ", 3, 0, hyphen), "3 - Install");
    }

    #[test]
    fn test_compose_title_without_sections() {
        let plain = TitleStyle {
            use_sections: false,
            dash: DashType::EnDash,
        };
        assert_eq!(compose_title("2.1 \u{2013} Setup", 2, 1, plain), "Setup");
        assert_eq!(compose_title("Setup", 2, 1, plain), "Setup");
    }

    #[test]
    fn test_format_page_number() {
        assert_eq!(format_page_number(3, None), "3");
        assert_eq!(format_page_number(3, Some("")), "3");
        assert_eq!(format_page_number(3, Some("Page #")), "Page 3");
        assert_eq!(format_page_number(12, Some("# of 20")), "12 of 20");
    }

    #[test]
    fn test_page_counter_starts_at_first_opt_in() {
        let ctx = ctx(DashType::Hyphen);
        let cover = vec![ElementSlots::default()];
        let numbered = vec![ElementSlots {
            page_number_format: Some(String::new()),
            ..Default::default()
        }];

        let (state, step) = number_artboard(NumberingState::default(), &cover, &ctx);
        assert!(step.writes.is_empty());
        assert_eq!(state.page_counter, 1);

        let (state, step) = number_artboard(state, &numbered, &ctx);
        assert_eq!(step.writes[0].text, "1");
        assert_eq!(state.page_counter, 2);

        // Artboards after the first opt-in advance even without a slot
        let (state, _) = number_artboard(state, &cover, &ctx);
        let (_, step) = number_artboard(state, &numbered, &ctx);
        assert_eq!(step.writes[0].text, "3");
    }

    #[test]
    fn test_sections_and_pages() {
        let ctx = ctx(DashType::Hyphen);
        let section = vec![ElementSlots {
            section_title: Some("Setup".into()),
            has_current_section: true,
            ..Default::default()
        }];
        let page = |title: &str| {
            vec![ElementSlots {
                page_title: Some(title.into()),
                has_current_section: true,
                has_current_date: true,
                ..Default::default()
            }]
        };

        let (state, first) = number_artboard(NumberingState::default(), &section, &ctx);
        assert_eq!(first.artboard_name.as_deref(), Some("1 - Setup"));
        assert_eq!(
            first.writes,
            vec![
                SlotWrite {
                    element: 0,
                    slot: SECTION_TITLE_SLOT,
                    text: "1 - Setup".into()
                },
                SlotWrite {
                    element: 0,
                    slot: CURRENT_SECTION_SLOT,
                    text: "Setup".into()
                },
            ]
        );

        let (state, second) = number_artboard(state, &page("Install"), &ctx);
        assert_eq!(second.artboard_name.as_deref(), Some("1.1 - Install"));
        assert!(second.writes.contains(&SlotWrite {
            element: 0,
            slot: CURRENT_DATE_SLOT,
            text: "today".into()
        }));

        let (state, third) = number_artboard(state, &section, &ctx);
        assert_eq!(third.artboard_name.as_deref(), Some("2 - Setup"));
        let (_, fourth) = number_artboard(state, &page("Configure"), &ctx);
        assert_eq!(fourth.artboard_name.as_deref(), Some("2.1 - Configure"));

        let entry = fourth.toc_entry.unwrap();
        assert_eq!(entry.section_title, None);
        assert_eq!(entry.page_title.as_deref(), Some("2.1 - Configure"));
        // No page-number slot anywhere yet
        assert_eq!(entry.page_number, None);
    }

    #[test]
    fn test_document_title_only_when_set() {
        let elements = vec![ElementSlots {
            has_document_title: true,
            ..Default::default()
        }];
        let (_, step) = number_artboard(NumberingState::default(), &elements, &ctx(DashType::EnDash));
        assert!(step.writes.is_empty());

        let titled = StepContext {
            document_title: "Field Guide",
            ..ctx(DashType::EnDash)
        };
        let (_, step) = number_artboard(NumberingState::default(), &elements, &titled);
        assert_eq!(step.writes[0].slot, DOCUMENT_TITLE_SLOT);
        assert_eq!(step.writes[0].text, "Field Guide");
    }
}
