//! Core error types for the relmap mapping engine.
//!
//! All failures in the engine core are synchronous and surface as a
//! [`RelmapError`] to the immediate caller. The core performs no I/O, so
//! there are no retries and no background failure paths.

use thiserror::Error;

/// The primary error type for the relmap engine.
///
/// Each variant corresponds to a distinct failure category:
///
/// - [`Configuration`](RelmapError::Configuration): a model was queried
///   without being registered, or required metadata (such as a primary key)
///   was never declared. Never retried; fix the model declaration.
/// - [`Validation`](RelmapError::Validation): a required field was empty at
///   the moment column values were materialized for a write. The write is
///   aborted; nothing partial is produced.
/// - [`MalformedRow`](RelmapError::MalformedRow): a result row handed to the
///   mapper is structurally invalid (e.g. the root table's primary-key
///   column is missing entirely). Failing hard here is deliberate - the
///   alternative is silently building a corrupt object graph.
/// - [`Database`](RelmapError::Database): a value could not be converted to
///   the requested type at the row boundary.
#[derive(Error, Debug)]
pub enum RelmapError {
    /// Model metadata is missing or inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A field failed validation during value materialization.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A result row does not have the shape the mapper requires.
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// A database value could not be converted to the requested type.
    #[error("Database error: {0}")]
    Database(String),
}

/// A convenience type alias for `Result<T, RelmapError>`.
pub type RelmapResult<T> = Result<T, RelmapError>;
