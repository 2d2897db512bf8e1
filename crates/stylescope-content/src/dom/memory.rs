//! In-memory document.
//!
//! Built from a serialized page snapshot or programmatically. Inherited
//! properties (`color`, `font-*`, `line-height`) cascade from the parent when
//! a node does not declare them; `background-color` defaults to
//! `rgba(0, 0, 0, 0)` like a real engine reports it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ComputedStyle, Document, ElementInfo, EventKind, NodeId, OverlayRole, OverlaySpec, Rect};
use crate::error::SnapshotError;

const INHERITED: [&str; 5] = ["color", "font-family", "font-size", "font-weight", "line-height"];
const DEFAULT_BACKGROUND: &str = "rgba(0, 0, 0, 0)";

/// Serialized page: `{url, title?, root}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    pub root: NodeSnapshot,
}

/// Serialized element subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "class")]
    pub class_name: String,
    /// Own text, excluding children.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub style: HashMap<String, String>,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
struct ElementNode {
    tag_name: String,
    class_name: String,
    id: String,
    text: String,
    rect: Rect,
    style: HashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A picker decoration living in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayNode {
    pub role: OverlayRole,
    pub css_text: &'static str,
    /// `None` while hidden.
    pub rect: Option<Rect>,
    pub visible: bool,
}

#[derive(Debug, Clone)]
enum Slot {
    Element(ElementNode),
    Overlay(OverlayNode),
    Removed,
}

/// Document held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    url: String,
    title: Option<String>,
    slots: Vec<Slot>,
    root: Option<NodeId>,
    cursor: String,
    listeners: HashMap<EventKind, usize>,
    agent_installed: bool,
}

impl MemoryDocument {
    /// Empty document at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            slots: Vec::new(),
            root: None,
            cursor: String::new(),
            listeners: HashMap::new(),
            agent_installed: false,
        }
    }

    pub fn from_snapshot(snapshot: PageSnapshot) -> Result<Self, SnapshotError> {
        let mut doc = Self::new(snapshot.url);
        doc.title = snapshot.title;
        doc.set_root(snapshot.root)?;
        Ok(doc)
    }

    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: PageSnapshot = serde_json::from_str(raw)?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let raw = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Replace the page tree, dropping every existing node. Returns the root handle.
    pub fn set_root(&mut self, root: NodeSnapshot) -> Result<NodeId, SnapshotError> {
        self.slots.clear();
        let id = self.insert_tree(root, None)?;
        self.root = Some(id);
        Ok(id)
    }

    fn insert_tree(&mut self, node: NodeSnapshot, parent: Option<NodeId>) -> Result<NodeId, SnapshotError> {
        if node.tag.trim().is_empty() {
            return Err(SnapshotError::MissingTag);
        }
        let id = self.slots.len();
        self.slots.push(Slot::Element(ElementNode {
            tag_name: node.tag.to_uppercase(),
            class_name: node.class_name,
            id: node.id,
            text: node.text,
            rect: node.rect,
            style: node.style,
            parent,
            children: Vec::new(),
        }));
        for child in node.children {
            let child_id = self.insert_tree(child, Some(id))?;
            if let Some(Slot::Element(el)) = self.slots.get_mut(id) {
                el.children.push(child_id);
            }
        }
        Ok(id)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// First element whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&node| matches!(self.slots.get(node), Some(Slot::Element(el)) if el.id == id))
    }

    /// First element with the given tag name, case-insensitive.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements().into_iter().find(|&node| {
            matches!(self.slots.get(node), Some(Slot::Element(el)) if el.tag_name.eq_ignore_ascii_case(tag))
        })
    }

    /// Parent element of `node`.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        match self.slots.get(node) {
            Some(Slot::Element(el)) => el.parent,
            _ => None,
        }
    }

    pub fn overlay(&self, node: NodeId) -> Option<&OverlayNode> {
        match self.slots.get(node) {
            Some(Slot::Overlay(overlay)) => Some(overlay),
            _ => None,
        }
    }

    /// Live overlay nodes with their handles.
    pub fn overlays(&self) -> Vec<(NodeId, &OverlayNode)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| match slot {
                Slot::Overlay(overlay) => Some((id, overlay)),
                _ => None,
            })
            .collect()
    }

    /// Number of registered capture listeners across all event kinds.
    pub fn listener_count(&self) -> usize {
        self.listeners.values().sum()
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners.get(&kind).copied().unwrap_or(0) > 0
    }

    fn collect(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Some(Slot::Element(el)) = self.slots.get(node) {
            out.push(node);
            for &child in &el.children {
                self.collect(child, out);
            }
        }
    }

    fn text_of(&self, node: NodeId, out: &mut String) {
        if let Some(Slot::Element(el)) = self.slots.get(node) {
            out.push_str(&el.text);
            for &child in &el.children {
                self.text_of(child, out);
            }
        }
    }

    fn inherited(&self, node: NodeId, property: &str) -> Option<&str> {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(Slot::Element(el)) = self.slots.get(id) else {
                return None;
            };
            if let Some(value) = el.style.get(property) {
                return Some(value.as_str());
            }
            current = el.parent;
        }
        None
    }
}

impl Document for MemoryDocument {
    fn url(&self) -> &str {
        &self.url
    }

    fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect(root, &mut out);
        }
        out
    }

    fn element(&self, node: NodeId) -> Option<ElementInfo> {
        let Some(Slot::Element(el)) = self.slots.get(node) else {
            return None;
        };
        let mut text_content = String::new();
        self.text_of(node, &mut text_content);
        Some(ElementInfo {
            tag_name: el.tag_name.clone(),
            class_name: el.class_name.clone(),
            id: el.id.clone(),
            text_content,
        })
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        let Some(Slot::Element(el)) = self.slots.get(node) else {
            return ComputedStyle::default();
        };
        let mut properties = el.style.clone();
        for property in INHERITED {
            if !properties.contains_key(property) {
                if let Some(value) = self.inherited(node, property) {
                    properties.insert(property.to_string(), value.to_string());
                }
            }
        }
        properties
            .entry("background-color".to_string())
            .or_insert_with(|| DEFAULT_BACKGROUND.to_string());
        ComputedStyle::new(properties)
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        match self.slots.get(node) {
            Some(Slot::Element(el)) => el.rect,
            Some(Slot::Overlay(overlay)) => overlay.rect.unwrap_or_default(),
            _ => Rect::default(),
        }
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn insert_overlay(&mut self, spec: &OverlaySpec) -> NodeId {
        let id = self.slots.len();
        self.slots.push(Slot::Overlay(OverlayNode {
            role: spec.role,
            css_text: spec.css_text,
            rect: None,
            visible: spec.visible,
        }));
        id
    }

    fn place_overlay(&mut self, node: NodeId, rect: Option<Rect>) {
        if let Some(Slot::Overlay(overlay)) = self.slots.get_mut(node) {
            overlay.visible = rect.is_some();
            overlay.rect = rect;
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        if let Some(slot) = self.slots.get_mut(node) {
            if matches!(slot, Slot::Overlay(_)) {
                *slot = Slot::Removed;
            }
        }
    }

    fn cursor(&self) -> String {
        self.cursor.clone()
    }

    fn set_cursor(&mut self, cursor: &str) {
        self.cursor = cursor.to_string();
    }

    fn add_capture_listener(&mut self, kind: EventKind) {
        *self.listeners.entry(kind).or_insert(0) += 1;
    }

    fn remove_capture_listener(&mut self, kind: EventKind) {
        if let Some(count) = self.listeners.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
    }

    fn agent_installed(&self) -> bool {
        self.agent_installed
    }

    fn mark_agent_installed(&mut self) {
        self.agent_installed = true;
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
