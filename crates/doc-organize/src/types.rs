use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a layer in the host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a reusable template ("symbol master")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub u64);

/// What a layer is, as far as the organizer cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    Artboard,
    Group,
    SymbolInstance,
    Shape,
    Text,
}

/// A rectangle in document units.
///
/// `y` grows downwards, so `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// Resizing constraints of a layer inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgePins {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
    pub fixed_width: bool,
    pub fixed_height: bool,
}

/// One line of the table of contents, produced by the numbering pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    /// Composed section title if the artboard heads a section
    pub section_title: Option<String>,
    /// Composed page title if the artboard is a page
    pub page_title: Option<String>,
    /// Page number, absent until page numbering has started
    pub page_number: Option<String>,
}

impl TocEntry {
    pub fn is_section(&self) -> bool {
        self.section_title.is_some()
    }

    /// Title shown in the TOC: the section title wins over the page title
    pub fn display_title(&self) -> &str {
        self.section_title
            .as_deref()
            .or(self.page_title.as_deref())
            .unwrap_or_default()
    }
}
