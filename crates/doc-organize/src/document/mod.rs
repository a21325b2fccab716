//! The host document as seen by the organizer
//!
//! Every pass talks to the host through the [`Document`] trait. The trait is
//! deliberately narrow: geometry, names, override slots, a handful of
//! creation/removal calls, and text measurement. [`MemoryDocument`] is a
//! self-contained implementation used by the command line tool and tests.

mod memory;

pub use memory::{MemoryDocument, MemoryLayer, MemoryTemplate, TemplateSlot, TextMetrics};

use crate::types::{EdgePins, LayerId, LayerKind, Rect, TemplateId};

/// Capabilities the organizer needs from the host's layer tree.
///
/// Frames of nested layers are relative to their parent; artboard frames are
/// in page coordinates.
pub trait Document {
    /// Artboards of the current page, back to front
    fn artboards(&self) -> Vec<LayerId>;

    /// Top-level layers of the current page, back to front
    fn page_layers(&self) -> Vec<LayerId>;

    fn kind(&self, layer: LayerId) -> Option<LayerKind>;

    /// Direct children, back to front
    fn children(&self, layer: LayerId) -> Vec<LayerId>;

    fn parent(&self, layer: LayerId) -> Option<LayerId>;

    fn name(&self, layer: LayerId) -> String;

    fn set_name(&mut self, layer: LayerId, name: &str);

    fn frame(&self, layer: LayerId) -> Rect;

    fn set_frame(&mut self, layer: LayerId, frame: Rect);

    fn set_pins(&mut self, layer: LayerId, pins: EdgePins);

    // -------------------------------------------------------------------------
    // Override slots
    // -------------------------------------------------------------------------

    /// Whether `layer` is a symbol instance whose template defines `slot`
    fn has_override(&self, layer: LayerId, slot: &str) -> bool;

    /// Current text of `slot`, falling back to the template default.
    /// `None` when the layer exposes no such slot.
    fn override_text(&self, layer: LayerId, slot: &str) -> Option<String>;

    /// Template default text of `slot` on the instance's template
    fn default_override_text(&self, layer: LayerId, slot: &str) -> Option<String>;

    /// Single raw write of an override value. Returns `false` when the slot
    /// does not exist.
    fn write_override(&mut self, layer: LayerId, slot: &str, text: &str) -> bool;

    /// Write an override value so the host UI notices it.
    ///
    /// Some hosts ignore a write that arrives while the inspector shows the
    /// old value; writing a blank first forces a refresh.
    fn set_override_text(&mut self, layer: LayerId, slot: &str, text: &str) -> bool {
        if !self.write_override(layer, slot, " ") {
            return false;
        }
        self.write_override(layer, slot, text)
    }

    // -------------------------------------------------------------------------
    // Templates
    // -------------------------------------------------------------------------

    /// First template that defines a text slot named `slot`
    fn template_with_slot(&self, slot: &str) -> Option<TemplateId>;

    /// Frame of the template itself
    fn template_frame(&self, template: TemplateId) -> Rect;

    /// Frame of the text layer backing `slot` inside the template
    fn template_slot_frame(&self, template: TemplateId, slot: &str) -> Option<Rect>;

    /// Height of `text` rendered in the template's `slot` style, wrapped at `width`
    fn measure_wrapped_text_height(
        &self,
        template: TemplateId,
        slot: &str,
        text: &str,
        width: f64,
    ) -> f64;

    // -------------------------------------------------------------------------
    // Creation and removal
    // -------------------------------------------------------------------------

    /// New instance of `template` appended to `parent` at the template's size
    fn instantiate(&mut self, template: TemplateId, parent: LayerId) -> LayerId;

    fn create_group(&mut self, parent: LayerId, name: &str) -> LayerId;

    fn create_rectangle(&mut self, parent: LayerId, name: &str, frame: Rect) -> LayerId;

    /// Remove a layer and everything below it
    fn remove_layer(&mut self, layer: LayerId);

    /// Shrink or grow a group to the bounds of its children, keeping the
    /// children where they are on the page
    fn fit_group_to_content(&mut self, group: LayerId);

    // -------------------------------------------------------------------------
    // Stacking and selection
    // -------------------------------------------------------------------------

    /// Move a top-level layer in front of all its siblings
    fn bring_to_front(&mut self, layer: LayerId);

    fn select(&mut self, layer: LayerId, extend_selection: bool);

    /// Artboard holding the current selection, or the selected artboard itself
    fn selected_artboard(&self) -> Option<LayerId>;
}

// =============================================================================
// Tree Queries
// =============================================================================

/// All layers below `layer`, depth first, parents before children
pub fn descendants<D: Document + ?Sized>(doc: &D, layer: LayerId) -> Vec<LayerId> {
    let mut out = Vec::new();
    let mut stack: Vec<LayerId> = doc.children(layer).into_iter().rev().collect();
    while let Some(next) = stack.pop() {
        out.push(next);
        stack.extend(doc.children(next).into_iter().rev());
    }
    out
}

/// Every layer on the current page, depth first
pub fn all_page_layers<D: Document + ?Sized>(doc: &D) -> Vec<LayerId> {
    let mut out = Vec::new();
    for layer in doc.page_layers() {
        out.push(layer);
        out.extend(descendants(doc, layer));
    }
    out
}

/// Direct children of `layer` with the given kind
pub fn children_of_kind<D: Document + ?Sized>(
    doc: &D,
    layer: LayerId,
    kind: LayerKind,
) -> Vec<LayerId> {
    doc.children(layer)
        .into_iter()
        .filter(|child| doc.kind(*child) == Some(kind))
        .collect()
}

/// First direct child of `layer` with the given kind and name
pub fn child_named<D: Document + ?Sized>(
    doc: &D,
    layer: LayerId,
    kind: LayerKind,
    name: &str,
) -> Option<LayerId> {
    doc.children(layer)
        .into_iter()
        .find(|child| doc.kind(*child) == Some(kind) && doc.name(*child) == name)
}

/// First layer anywhere on the page with the given kind and name
pub fn page_layer_named<D: Document + ?Sized>(
    doc: &D,
    kind: LayerKind,
    name: &str,
) -> Option<LayerId> {
    all_page_layers(doc)
        .into_iter()
        .find(|layer| doc.kind(*layer) == Some(kind) && doc.name(*layer) == name)
}

/// The nearest artboard enclosing `layer` (or `layer` itself)
pub fn enclosing_artboard<D: Document + ?Sized>(doc: &D, layer: LayerId) -> Option<LayerId> {
    let mut current = Some(layer);
    while let Some(id) = current {
        if doc.kind(id) == Some(LayerKind::Artboard) {
            return Some(id);
        }
        current = doc.parent(id);
    }
    None
}
