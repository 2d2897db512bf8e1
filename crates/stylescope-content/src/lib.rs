//! # StyleScope Content
//!
//! Everything that runs inside an inspected page.
//!
//! - [`dom`] - the [`Document`](dom::Document) surface and an in-memory implementation
//! - [`aggregator`] - page-wide color and font ranking
//! - [`snapshot`] - element snapshot capture
//! - [`picker`] - the element picker state machine
//! - [`agent`] - the request handler hosting the aggregator and the picker

pub mod agent;
pub mod aggregator;
pub mod dom;
pub mod error;
pub mod picker;
pub mod snapshot;

pub use agent::{AgentOptions, ContentAgent, InstallOutcome, UpstreamObserver};
pub use aggregator::{StyleAggregator, StyleTally};
pub use dom::{Document, MemoryDocument, NodeId, NodeSnapshot, PageSnapshot, Rect};
pub use error::SnapshotError;
pub use picker::{
    EventOutcome, PickerEvent, PickerObserver, PickerOptions, PickerSession, PickerSlot,
    PickerState,
};
