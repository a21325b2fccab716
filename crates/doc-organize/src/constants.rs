//! Shared constants for document organization
//!
//! This module centralizes the marker names, override slot names and the
//! empirically chosen layout heuristics used throughout the passes.

// =============================================================================
// Override Slots
// =============================================================================

pub const PAGE_NUMBER_SLOT: &str = "<pageNumber>";
pub const SECTION_TITLE_SLOT: &str = "<sectionTitle>";
pub const PAGE_TITLE_SLOT: &str = "<pageTitle>";
pub const DOCUMENT_TITLE_SLOT: &str = "<documentTitle>";
pub const CURRENT_SECTION_SLOT: &str = "<currentSection>";
pub const CURRENT_DATE_SLOT: &str = "<currentDate>";

pub const CALLOUT_DESCRIPTION_SLOT: &str = "<calloutDescription>";
pub const CALLOUT_NUMBER_SLOT: &str = "<calloutNumber>";
pub const CALLOUT_LIST_DESCRIPTION_SLOT: &str = "<calloutListDescription>";
pub const CALLOUT_LIST_NUMBER_SLOT: &str = "<calloutListNumber>";

pub const TOC_SECTION_TITLE_SLOT: &str = "<tocSectionTitle>";
pub const TOC_PAGE_TITLE_SLOT: &str = "<tocPageTitle>";
pub const TOC_PAGE_NUMBER_SLOT: &str = "<tocPageNumber>";

// =============================================================================
// Marker Layers
// =============================================================================

/// Container the table of contents is flowed into
pub const TOC_GROUP: &str = "<tocGroup>";

/// Background rectangle that sizes the TOC container
pub const TOC_GROUP_RECT: &str = "<tocGroupRect>";

/// Name prefix of one TOC run group
pub const TOC_SECTION_PREFIX: &str = "<tocSection>";

pub const TOC_SECTION_ENTRY_PREFIX: &str = "<tocSectionEntry>";
pub const TOC_PAGE_ENTRY_PREFIX: &str = "<tocPageEntry>";

/// Per-artboard container of callout descriptions
pub const CALLOUT_LIST_GROUP: &str = "<calloutListGroup>";

/// Background rectangle of the callout description list
pub const CALLOUT_GROUP_RECT: &str = "<calloutGroupRect>";

// =============================================================================
// Ordering Heuristics
// =============================================================================

/// Vertical weight of the single-key row sort. Layers whose tops differ by
/// less than 1 unit are treated as one row unless they sit further apart
/// horizontally than this.
pub const ROW_SORT_FACTOR: f64 = 100.0;

/// An artboard joins the current row when its top edge is within this
/// fraction of the shortest remaining artboard's height.
pub const ROW_TOLERANCE_FACTOR: f64 = 0.85;

// =============================================================================
// Table of Contents
// =============================================================================

/// Width given to freshly created TOC entries before column layout
pub const TOC_INITIAL_ENTRY_WIDTH: f64 = 100.0;

// =============================================================================
// Callouts
// =============================================================================

/// Horizontal placement of a new callout list, as a fraction of artboard width
pub const CALLOUT_LIST_X_RATIO: f64 = 0.72;

/// Vertical placement of a new callout list, as a fraction of artboard height
pub const CALLOUT_LIST_Y_RATIO: f64 = 0.07;

/// Width of a new callout list, as a fraction of artboard width
pub const CALLOUT_LIST_WIDTH_RATIO: f64 = 0.25;

/// Characters of the description kept in a callout's layer name
pub const CALLOUT_NAME_DESCRIPTION_CHARS: usize = 30;

// =============================================================================
// Pixel Rounding
// =============================================================================

/// Grid sizes the rounding pass accepts
pub const PIXEL_GRID_SIZES: [f64; 3] = [0.1, 0.5, 1.0];
