//! # relmap
//!
//! A relational mapping engine for Rust: declare model metadata once, and
//! turn flat, join-aware result rows into nested object graphs with full
//! persistence-state tracking.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `relmap` to get the whole engine, or on the individual
//! crates for finer-grained control.

/// Error types, logging setup, and text utilities.
pub use relmap_core as core;

/// Model metadata, instance state tracking, and result mapping.
pub use relmap_db as db;

/// The commonly used types, importable in one line.
pub mod prelude {
    pub use relmap_core::{RelmapError, RelmapResult};
    pub use relmap_db::{
        assign_contiguous_ids, assign_returned_ids, create_model, create_models,
        extract_relational_record, map_relational_result, ChangeSet, FieldDescriptor, FieldKind,
        Instance, Model, ModelRef, ModelRegistry, RelationDescriptor, RelationKind, RelationValue,
        Row, Value,
    };
}
