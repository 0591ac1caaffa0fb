//! Utility functions for the relmap engine.
//!
//! Currently only the [`text`] helper lives here; the registry uses
//! [`text::pluralize`] to derive default table names.

pub mod text;
