//! # StyleScope Popup
//!
//! The user-facing context: page classification, analysis and picker
//! requests, display formatting and the Tailwind export.

pub mod controller;
pub mod export;

pub use controller::{color_value, BackgroundPort, PageInfo, PopupController, View};
pub use export::ExportError;
