//! # scmd Config
//!
//! Configuration is read once at startup: defaults, then an optional TOML file,
//! then environment overrides, then validation. Nothing mutates it afterwards.

mod error;
mod loader;
mod preferred;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use preferred::PreferredProvider;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
