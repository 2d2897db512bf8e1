//! Element picker state machine.
//!
//! A session moves `Idle -> Active` on activation and back to `Idle` when an
//! element is committed by a click or the user cancels with Escape. While
//! active it owns two decoration nodes (a dimming layer and a highlight
//! rectangle), four capturing document listeners and the body cursor.
//!
//! Teardown is idempotent and reports deactivation exactly once per
//! activation, whichever path (commit, cancel, forced replacement) gets
//! there first.

use stylescope_protocols::ElementSnapshot;
use tracing::{debug, info};

use crate::dom::{Document, EventKind, NodeId, OverlaySpec};
use crate::snapshot::{self, TEXT_PREVIEW_CHARS};

/// Receives the outcome of a picking session.
pub trait PickerObserver: Send {
    fn on_element_selected(&mut self, snapshot: ElementSnapshot);

    fn on_deactivated(&mut self);
}

/// An input event delivered to the capturing listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    PointerOver { target: NodeId },
    PointerOut { target: NodeId, related: Option<NodeId> },
    Click { target: NodeId },
    KeyDown { key: String },
}

impl PickerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointerOver { .. } => EventKind::PointerOver,
            Self::PointerOut { .. } => EventKind::PointerOut,
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
        }
    }
}

/// What the listener did to the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventOutcome {
    const IGNORED: EventOutcome = EventOutcome {
        prevent_default: false,
        stop_propagation: false,
    };

    const SWALLOWED: EventOutcome = EventOutcome {
        prevent_default: true,
        stop_propagation: true,
    };

    const DEFAULT_PREVENTED: EventOutcome = EventOutcome {
        prevent_default: true,
        stop_propagation: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Idle,
    Active,
}

/// Session settings.
#[derive(Debug, Clone)]
pub struct PickerOptions {
    pub cursor: String,
    pub text_preview_chars: usize,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            cursor: "crosshair".to_string(),
            text_preview_chars: TEXT_PREVIEW_CHARS,
        }
    }
}

/// One picking session bound to a document.
pub struct PickerSession {
    state: PickerState,
    options: PickerOptions,
    dimmer: Option<NodeId>,
    highlight: Option<NodeId>,
    previous_cursor: String,
    observer: Box<dyn PickerObserver>,
}

impl PickerSession {
    pub fn new(options: PickerOptions, observer: Box<dyn PickerObserver>) -> Self {
        Self {
            state: PickerState::Idle,
            options,
            dimmer: None,
            highlight: None,
            previous_cursor: String::new(),
            observer,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PickerState::Active
    }

    /// Handle of the highlight rectangle while active.
    pub fn highlight(&self) -> Option<NodeId> {
        self.highlight
    }

    /// Handle of the dimming layer while active.
    pub fn dimmer(&self) -> Option<NodeId> {
        self.dimmer
    }

    pub fn activate<D: Document + ?Sized>(&mut self, document: &mut D) {
        if self.is_active() {
            return;
        }
        self.state = PickerState::Active;
        self.dimmer = Some(document.insert_overlay(&OverlaySpec::DIMMER));
        self.highlight = Some(document.insert_overlay(&OverlaySpec::HIGHLIGHT));
        for kind in EventKind::ALL {
            document.add_capture_listener(kind);
        }
        self.previous_cursor = document.cursor();
        document.set_cursor(&self.options.cursor);
        info!(url = document.url(), "Element picker activated");
    }

    /// Release everything the session installed. No-op when idle.
    pub fn teardown<D: Document + ?Sized>(&mut self, document: &mut D) {
        if !self.is_active() {
            return;
        }
        self.state = PickerState::Idle;
        for node in [self.dimmer.take(), self.highlight.take()].into_iter().flatten() {
            document.remove_node(node);
        }
        for kind in EventKind::ALL {
            document.remove_capture_listener(kind);
        }
        document.set_cursor(&self.previous_cursor);
        info!(url = document.url(), "Element picker deactivated");
        self.observer.on_deactivated();
    }

    fn is_decoration(&self, node: NodeId) -> bool {
        self.dimmer == Some(node) || self.highlight == Some(node)
    }

    pub fn handle_event<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        event: &PickerEvent,
    ) -> EventOutcome {
        if !self.is_active() {
            return EventOutcome::IGNORED;
        }
        match event {
            PickerEvent::PointerOver { target } => {
                if !self.is_decoration(*target) {
                    if let Some(highlight) = self.highlight {
                        let rect = document.bounding_rect(*target);
                        document.place_overlay(highlight, Some(rect));
                    }
                }
                EventOutcome::IGNORED
            }
            PickerEvent::PointerOut { target, related } => {
                if !self.is_decoration(*target) {
                    let inside = related.is_some_and(|related| document.contains(*target, related));
                    if !inside {
                        if let Some(highlight) = self.highlight {
                            document.place_overlay(highlight, None);
                        }
                    }
                }
                EventOutcome::IGNORED
            }
            PickerEvent::Click { target } => {
                if self.is_decoration(*target) {
                    return EventOutcome::SWALLOWED;
                }
                match snapshot::capture(&*document, *target, self.options.text_preview_chars) {
                    Some(snapshot) => {
                        debug!(element = %snapshot.selector_label(), "Element selected");
                        self.observer.on_element_selected(snapshot);
                        self.teardown(document);
                    }
                    None => debug!(node = *target, "Click on unknown node ignored"),
                }
                EventOutcome::SWALLOWED
            }
            PickerEvent::KeyDown { key } => {
                if key == "Escape" {
                    debug!("Element picker cancelled");
                    self.teardown(document);
                    EventOutcome::DEFAULT_PREVENTED
                } else {
                    EventOutcome::IGNORED
                }
            }
        }
    }
}

/// Holder of the single picker session of one content context.
#[derive(Default)]
pub struct PickerSlot {
    session: Option<PickerSession>,
}

impl PickerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(PickerSession::is_active)
    }

    pub fn session(&self) -> Option<&PickerSession> {
        self.session.as_ref()
    }

    /// Replace the current session with a fresh, active one.
    ///
    /// The previous session is torn down first so it never coexists with the
    /// new one.
    pub fn activate<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        options: PickerOptions,
        observer: Box<dyn PickerObserver>,
    ) {
        self.deactivate(document);
        let mut session = PickerSession::new(options, observer);
        session.activate(document);
        self.session = Some(session);
    }

    /// Route an event to the active session. Finished sessions are released.
    pub fn dispatch<D: Document + ?Sized>(&mut self, document: &mut D, event: &PickerEvent) -> EventOutcome {
        let Some(session) = self.session.as_mut() else {
            return EventOutcome::IGNORED;
        };
        let outcome = session.handle_event(document, event);
        if !session.is_active() {
            self.session = None;
        }
        outcome
    }

    pub fn deactivate<D: Document + ?Sized>(&mut self, document: &mut D) {
        if let Some(mut session) = self.session.take() {
            session.teardown(document);
        }
    }
}

#[cfg(test)]
#[path = "picker_tests.rs"]
mod tests;
