use super::{Document, enclosing_artboard};
use crate::types::*;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Approximate text metrics used to wrap and measure text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    /// Average advance of one character
    pub char_width: f64,
    /// Height of one rendered line
    pub line_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 16.0,
        }
    }
}

impl TextMetrics {
    /// Number of lines `text` wraps to at `width`, breaking on whitespace
    pub fn line_count(&self, text: &str, width: f64) -> usize {
        let per_line = if self.char_width > 0.0 {
            ((width / self.char_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };
        text.split('\n')
            .map(|paragraph| wrapped_lines(paragraph, per_line))
            .sum::<usize>()
            .max(1)
    }

    pub fn wrapped_height(&self, text: &str, width: f64) -> f64 {
        self.line_count(text, width) as f64 * self.line_height
    }
}

/// Greedy word wrap; words longer than a line are hard-broken
fn wrapped_lines(paragraph: &str, per_line: usize) -> usize {
    let mut lines = 1;
    let mut used = 0;
    for word in paragraph.split_whitespace() {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= per_line {
            used = needed;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        if len > per_line {
            lines += (len - 1) / per_line;
            used = len - (len - 1) / per_line * per_line;
        } else {
            used = len;
        }
    }
    lines
}

/// A text slot inside a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    pub name: String,
    pub frame: Rect,
    #[serde(default)]
    pub default_text: String,
}

/// A reusable template ("symbol master")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryTemplate {
    pub id: TemplateId,
    pub name: String,
    pub frame: Rect,
    #[serde(default)]
    pub slots: Vec<TemplateSlot>,
}

impl MemoryTemplate {
    fn slot(&self, name: &str) -> Option<&TemplateSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }
}

/// One node of the in-memory layer tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryLayer {
    pub kind: LayerKind,
    pub name: String,
    pub frame: Rect,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
    #[serde(default)]
    pub pins: EdgePins,
    #[serde(skip)]
    parent: Option<LayerId>,
}

impl MemoryLayer {
    fn new(kind: LayerKind, name: &str, frame: Rect) -> Self {
        Self {
            kind,
            name: name.to_string(),
            frame,
            children: Vec::new(),
            template: None,
            overrides: BTreeMap::new(),
            pins: EdgePins::default(),
            parent: None,
        }
    }
}

/// A single-page document held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryDocument {
    #[serde(default)]
    pub templates: Vec<MemoryTemplate>,
    /// Top-level layers, back to front
    #[serde(default)]
    pub page: Vec<LayerId>,
    #[serde(default)]
    pub layers: BTreeMap<LayerId, MemoryLayer>,
    #[serde(default)]
    pub selection: Vec<LayerId>,
    #[serde(default)]
    pub text_metrics: TextMetrics,
    /// Next layer id to hand out; ids of removed layers are never reused
    #[serde(default)]
    pub next_layer_id: u64,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let doc: MemoryDocument = serde_json::from_slice(&bytes)?;
        Ok(doc.relinked())
    }

    /// Save the document to a JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Rebuild parent links from the children lists
    pub fn relinked(mut self) -> Self {
        let links: Vec<(LayerId, LayerId)> = self
            .layers
            .iter()
            .flat_map(|(id, layer)| layer.children.iter().map(move |child| (*child, *id)))
            .collect();
        for layer in self.layers.values_mut() {
            layer.parent = None;
        }
        for (child, parent) in links {
            if let Some(layer) = self.layers.get_mut(&child) {
                layer.parent = Some(parent);
            }
        }
        self
    }

    pub fn layer(&self, id: LayerId) -> Option<&MemoryLayer> {
        self.layers.get(&id)
    }

    pub fn template(&self, id: TemplateId) -> Option<&MemoryTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Find a layer by name anywhere in the document
    pub fn find_by_name(&self, name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|(_, layer)| layer.name == name)
            .map(|(id, _)| *id)
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn add_template(&mut self, name: &str, frame: Rect, slots: Vec<TemplateSlot>) -> TemplateId {
        let id = TemplateId(self.templates.iter().map(|t| t.id.0 + 1).max().unwrap_or(1));
        self.templates.push(MemoryTemplate {
            id,
            name: name.to_string(),
            frame,
            slots,
        });
        id
    }

    pub fn add_artboard(&mut self, name: &str, frame: Rect) -> LayerId {
        let id = self.next_id();
        self.layers
            .insert(id, MemoryLayer::new(LayerKind::Artboard, name, frame));
        self.page.push(id);
        id
    }

    /// Add a layer under `parent`, or on the page when `parent` is `None`
    pub fn add_layer(
        &mut self,
        parent: Option<LayerId>,
        kind: LayerKind,
        name: &str,
        frame: Rect,
    ) -> LayerId {
        let id = self.next_id();
        let mut layer = MemoryLayer::new(kind, name, frame);
        layer.parent = parent;
        self.layers.insert(id, layer);
        match parent.and_then(|p| self.layers.get_mut(&p)) {
            Some(parent_layer) => parent_layer.children.push(id),
            None => self.page.push(id),
        }
        id
    }

    /// Add an instance of `template` at `frame` with explicit overrides
    pub fn add_instance(
        &mut self,
        parent: LayerId,
        template: TemplateId,
        frame: Rect,
        overrides: &[(&str, &str)],
    ) -> LayerId {
        let name = self
            .template(template)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        let id = self.add_layer(Some(parent), LayerKind::SymbolInstance, &name, frame);
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.template = Some(template);
            for (slot, text) in overrides {
                layer.overrides.insert(slot.to_string(), text.to_string());
            }
        }
        id
    }

    fn next_id(&mut self) -> LayerId {
        // Files written by hand may omit the counter, so never go below the arena
        let after_last = self.layers.keys().next_back().map_or(1, |id| id.0 + 1);
        let id = self.next_layer_id.max(after_last);
        self.next_layer_id = id + 1;
        LayerId(id)
    }

    fn instance_template(&self, layer: LayerId) -> Option<&MemoryTemplate> {
        let layer = self.layers.get(&layer)?;
        if layer.kind != LayerKind::SymbolInstance {
            return None;
        }
        self.template(layer.template?)
    }

    fn detach(&mut self, id: LayerId) {
        let parent = self.layers.get(&id).and_then(|layer| layer.parent);
        match parent.and_then(|p| self.layers.get_mut(&p)) {
            Some(parent_layer) => parent_layer.children.retain(|child| *child != id),
            None => self.page.retain(|child| *child != id),
        }
    }
}

impl Document for MemoryDocument {
    fn artboards(&self) -> Vec<LayerId> {
        self.page
            .iter()
            .copied()
            .filter(|id| self.kind(*id) == Some(LayerKind::Artboard))
            .collect()
    }

    fn page_layers(&self) -> Vec<LayerId> {
        self.page.clone()
    }

    fn kind(&self, layer: LayerId) -> Option<LayerKind> {
        self.layers.get(&layer).map(|l| l.kind)
    }

    fn children(&self, layer: LayerId) -> Vec<LayerId> {
        self.layers
            .get(&layer)
            .map(|l| l.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, layer: LayerId) -> Option<LayerId> {
        self.layers.get(&layer).and_then(|l| l.parent)
    }

    fn name(&self, layer: LayerId) -> String {
        self.layers
            .get(&layer)
            .map(|l| l.name.clone())
            .unwrap_or_default()
    }

    fn set_name(&mut self, layer: LayerId, name: &str) {
        if let Some(l) = self.layers.get_mut(&layer) {
            l.name = name.to_string();
        }
    }

    fn frame(&self, layer: LayerId) -> Rect {
        self.layers.get(&layer).map(|l| l.frame).unwrap_or_default()
    }

    fn set_frame(&mut self, layer: LayerId, frame: Rect) {
        if let Some(l) = self.layers.get_mut(&layer) {
            l.frame = frame;
        }
    }

    fn set_pins(&mut self, layer: LayerId, pins: EdgePins) {
        if let Some(l) = self.layers.get_mut(&layer) {
            l.pins = pins;
        }
    }

    fn has_override(&self, layer: LayerId, slot: &str) -> bool {
        self.instance_template(layer)
            .is_some_and(|t| t.slot(slot).is_some())
    }

    fn override_text(&self, layer: LayerId, slot: &str) -> Option<String> {
        let template_slot = self.instance_template(layer)?.slot(slot)?;
        let explicit = self.layers.get(&layer)?.overrides.get(slot);
        Some(explicit.unwrap_or(&template_slot.default_text).clone())
    }

    fn default_override_text(&self, layer: LayerId, slot: &str) -> Option<String> {
        self.instance_template(layer)?
            .slot(slot)
            .map(|s| s.default_text.clone())
    }

    fn write_override(&mut self, layer: LayerId, slot: &str, text: &str) -> bool {
        if !self.has_override(layer, slot) {
            return false;
        }
        match self.layers.get_mut(&layer) {
            Some(l) => {
                l.overrides.insert(slot.to_string(), text.to_string());
                true
            }
            None => false,
        }
    }

    fn template_with_slot(&self, slot: &str) -> Option<TemplateId> {
        self.templates
            .iter()
            .find(|t| t.slot(slot).is_some())
            .map(|t| t.id)
    }

    fn template_frame(&self, template: TemplateId) -> Rect {
        self.template(template).map(|t| t.frame).unwrap_or_default()
    }

    fn template_slot_frame(&self, template: TemplateId, slot: &str) -> Option<Rect> {
        self.template(template)?.slot(slot).map(|s| s.frame)
    }

    fn measure_wrapped_text_height(
        &self,
        _template: TemplateId,
        _slot: &str,
        text: &str,
        width: f64,
    ) -> f64 {
        self.text_metrics.wrapped_height(text, width)
    }

    fn instantiate(&mut self, template: TemplateId, parent: LayerId) -> LayerId {
        let size = self.template_frame(template);
        let frame = Rect::new(0.0, 0.0, size.width, size.height);
        self.add_instance(parent, template, frame, &[])
    }

    fn create_group(&mut self, parent: LayerId, name: &str) -> LayerId {
        self.add_layer(Some(parent), LayerKind::Group, name, Rect::default())
    }

    fn create_rectangle(&mut self, parent: LayerId, name: &str, frame: Rect) -> LayerId {
        self.add_layer(Some(parent), LayerKind::Shape, name, frame)
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.detach(layer);
        let mut stack = vec![layer];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.layers.remove(&id) {
                stack.extend(removed.children);
            }
            self.selection.retain(|selected| *selected != id);
        }
    }

    fn fit_group_to_content(&mut self, group: LayerId) {
        let children = self.children(group);
        let Some(bounds) = children
            .iter()
            .map(|child| self.frame(*child))
            .reduce(|acc, frame| acc.union(&frame))
        else {
            return;
        };
        for child in children {
            if let Some(l) = self.layers.get_mut(&child) {
                l.frame.x -= bounds.x;
                l.frame.y -= bounds.y;
            }
        }
        if let Some(l) = self.layers.get_mut(&group) {
            l.frame = Rect::new(
                l.frame.x + bounds.x,
                l.frame.y + bounds.y,
                bounds.width,
                bounds.height,
            );
        }
    }

    fn bring_to_front(&mut self, layer: LayerId) {
        let parent = self.parent(layer);
        let siblings = match parent.and_then(|p| self.layers.get_mut(&p)) {
            Some(parent_layer) => &mut parent_layer.children,
            None => &mut self.page,
        };
        if let Some(pos) = siblings.iter().position(|id| *id == layer) {
            let id = siblings.remove(pos);
            siblings.push(id);
        }
    }

    fn select(&mut self, layer: LayerId, extend_selection: bool) {
        if !extend_selection {
            self.selection.clear();
        }
        if !self.selection.contains(&layer) {
            self.selection.push(layer);
        }
    }

    fn selected_artboard(&self) -> Option<LayerId> {
        self.selection
            .iter()
            .find_map(|layer| enclosing_artboard(self, *layer))
    }
}
