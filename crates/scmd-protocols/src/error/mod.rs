//! Error types for the scmd protocol layer.

mod provider;
mod search;
mod store;

pub use provider::*;
pub use search::*;
pub use store::*;
