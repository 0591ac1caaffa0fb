//! # relmap-core
//!
//! Foundation types for the relmap mapping engine. This crate has no
//! dependency on the ORM layer and provides what every other crate needs:
//!
//! - [`error`] - Error types and result aliases
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers (pluralization for table naming)

pub mod error;
pub mod logging;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{RelmapError, RelmapResult};
