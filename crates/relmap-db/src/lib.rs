//! # relmap-db
//!
//! The mapping-and-state core of the relmap engine. Provides the
//! [`Model`](model::Model) trait and [`ModelRegistry`](registry::ModelRegistry)
//! for declaring field and relation metadata, [`Instance`](model::Instance)
//! for carrying record state through its persistence lifecycle, and the
//! relational result mapper that turns flat namespaced join rows back into
//! nested object graphs.
//!
//! ## Architecture
//!
//! Everything here is pure, synchronous data transformation: no SQL is
//! generated and no connection is held. A database adapter feeds
//! [`Row`](row::Row)s in and takes column/value maps out; the engine in
//! between owns metadata, normalization, dirty tracking, and graph
//! assembly.
//!
//! ## Module Overview
//!
//! - [`model`] - The [`Model`](model::Model) trait, [`ModelRef`](model::ModelRef), and [`Instance`](model::Instance)
//! - [`fields`] - Field descriptors ([`FieldDescriptor`](fields::FieldDescriptor)) and kinds
//! - [`relations`] - Relation descriptors with lazy target resolvers
//! - [`registry`] - The metadata registry and its process-wide instance
//! - [`value`] - The backend-agnostic [`Value`](value::Value) enum
//! - [`state`] - Normalization, write materialization, and snapshot diffing
//! - [`row`] - Result rows and `<table>__<column>` namespacing
//! - [`mapper`] - Flat rows to object graphs
//! - [`bulk`] - Bulk-insert id assignment

// These clippy lints are intentionally allowed for the mapping crate:
// - result_large_err: RelmapError is the engine error type and should be used consistently
// - cast_precision_loss: i64-to-f64 casts are acceptable for value widening
// - doc_markdown: backtick requirements for documentation items are too strict
// - use_self: explicit type names are clearer in some contexts
#![allow(clippy::result_large_err)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod bulk;
pub mod fields;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod relations;
pub mod row;
pub mod state;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use bulk::{assign_contiguous_ids, assign_returned_ids};
pub use fields::{FieldDescriptor, FieldKind};
pub use mapper::{create_model, create_models, extract_relational_record, map_relational_result};
pub use model::{Instance, Model, ModelRef, RelationValue};
pub use registry::{ModelMetadata, ModelRegistry};
pub use relations::{RelationDescriptor, RelationKind, TargetResolver};
pub use row::{namespaced_key, Row};
pub use state::{normalize_value, ChangeSet};
pub use value::{FromValue, Value};
