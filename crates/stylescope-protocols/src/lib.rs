//! # StyleScope Protocols
//!
//! Contracts shared by every StyleScope execution context.
//! Contains only pure functions and data definitions - no I/O.
//!
//! ## Modules
//!
//! - [`policy`] - URL restriction policy (which pages may be inspected)
//! - [`color`] - hex/rgb/hsl conversion helpers
//! - [`model`] - analysis results and element snapshots
//! - [`message`] - typed messages exchanged between popup, background and content
//! - [`error`] - error taxonomy for cross-context commands

pub mod color;
pub mod error;
pub mod message;
pub mod model;
pub mod policy;

pub use color::{ColorFormat, Hsl, Rgb};
pub use error::{CommandError, DeliveryError, ProtocolError};
pub use message::{Message, Response, TabId, TabInfo};
pub use model::{
    AnalysisResult, BoxModel, ColorPair, ColorSummary, ComputedStyleSummary, ElementSnapshot,
    FontSummary, Typography,
};
pub use policy::{PageKind, RestrictionCategory, RestrictionVerdict};
