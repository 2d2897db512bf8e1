//! Error types for the StyleScope protocol layer.

mod command;
mod delivery;
mod protocol;

pub use command::*;
pub use delivery::*;
pub use protocol::*;
