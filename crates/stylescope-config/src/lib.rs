//! # StyleScope Config
//!
//! Configuration management for StyleScope: retry budgets for agent
//! injection, aggregation limits, picker and export settings, logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
