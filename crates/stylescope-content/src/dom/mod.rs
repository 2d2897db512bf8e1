//! Document abstraction.
//!
//! The agent never talks to a concrete DOM. Everything it needs from a page
//! (element enumeration, computed styles, geometry, overlay nodes, capture
//! listeners and the body cursor) goes through the [`Document`] trait so the
//! same aggregation and picker code runs against a real page binding or the
//! in-memory [`MemoryDocument`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

mod memory;

pub use memory::{MemoryDocument, NodeSnapshot, OverlayNode, PageSnapshot};

/// Handle of a node inside one document.
pub type NodeId = usize;

/// Viewport rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Identity and text of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    /// Tag name as the document reports it (usually uppercase).
    pub tag_name: String,
    pub class_name: String,
    pub id: String,
    /// Concatenated text of the element and its descendants.
    pub text_content: String,
}

/// Resolved style declarations of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    properties: HashMap<String, String>,
}

impl ComputedStyle {
    pub fn new(properties: HashMap<String, String>) -> Self {
        Self { properties }
    }

    /// Value of a kebab-case property, empty when unset.
    pub fn property(&self, name: &str) -> &str {
        self.properties.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn background_color(&self) -> &str {
        self.property("background-color")
    }

    pub fn color(&self) -> &str {
        self.property("color")
    }

    pub fn font_family(&self) -> &str {
        self.property("font-family")
    }
}

/// Document-level events the picker captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerOver,
    PointerOut,
    Click,
    KeyDown,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::PointerOver,
        EventKind::PointerOut,
        EventKind::Click,
        EventKind::KeyDown,
    ];

    /// DOM event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointerOver => "mouseover",
            Self::PointerOut => "mouseout",
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }
}

/// Which picker decoration a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayRole {
    /// Full viewport dimming layer.
    Dimmer,
    /// Rectangle tracking the hovered element.
    Highlight,
}

/// A node the picker appends to the page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlaySpec {
    pub role: OverlayRole,
    pub css_text: &'static str,
    /// Whether the node starts out displayed.
    pub visible: bool,
}

impl OverlaySpec {
    pub const DIMMER: OverlaySpec = OverlaySpec {
        role: OverlayRole::Dimmer,
        css_text: "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                   background: rgba(0, 0, 0, 0.1); z-index: 999999; pointer-events: none;",
        visible: true,
    };

    pub const HIGHLIGHT: OverlaySpec = OverlaySpec {
        role: OverlayRole::Highlight,
        css_text: "position: absolute; border: 2px solid #3b82f6; \
                   background: rgba(59, 130, 246, 0.1); pointer-events: none; \
                   z-index: 1000000; transition: all 0.1s ease; \
                   box-shadow: 0 0 0 1px rgba(255, 255, 255, 0.5); display: none;",
        visible: false,
    };
}

/// The page surface the agent operates on.
pub trait Document: Send {
    /// Address of the page.
    fn url(&self) -> &str;

    /// Every page element in document order. Picker overlays are excluded.
    fn elements(&self) -> Vec<NodeId>;

    fn element(&self, node: NodeId) -> Option<ElementInfo>;

    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Append a decoration node to the body.
    fn insert_overlay(&mut self, spec: &OverlaySpec) -> NodeId;

    /// Move an overlay onto `rect`, or hide it with `None`.
    fn place_overlay(&mut self, node: NodeId, rect: Option<Rect>);

    fn remove_node(&mut self, node: NodeId);

    /// Current body cursor, empty when unset.
    fn cursor(&self) -> String;

    fn set_cursor(&mut self, cursor: &str);

    fn add_capture_listener(&mut self, kind: EventKind);

    fn remove_capture_listener(&mut self, kind: EventKind);

    /// Per-page marker set by the first agent installation.
    fn agent_installed(&self) -> bool;

    fn mark_agent_installed(&mut self);
}
