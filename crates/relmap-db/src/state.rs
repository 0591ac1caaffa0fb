//! Instance persistence-state tracking.
//!
//! This module carries the second `impl` block of
//! [`Instance`](crate::model::Instance): everything that consults model
//! metadata to normalize values, materialize column values for a write,
//! manage the saved flag and last-synced snapshot, and diff the current
//! state against that snapshot.
//!
//! All operations are pure and synchronous; the tracker assumes
//! single-writer access to an instance between save points.

use std::collections::HashMap;

use relmap_core::{RelmapError, RelmapResult};

use crate::fields::{FieldDescriptor, FieldKind};
use crate::model::Instance;
use crate::registry::ModelRegistry;
use crate::value::Value;

/// The result of diffing an instance against its last-synced snapshot.
///
/// An instance without a snapshot (never saved, or explicitly marked
/// unsaved) is always fully dirty but reports no itemized fields - there is
/// no baseline to diff against. Callers that need a fine-grained update
/// diff must only ask after the instance has been saved at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Whether any field differs from the snapshot (or no snapshot exists).
    pub is_dirty: bool,
    /// Property keys of the fields that changed. Empty when no snapshot
    /// exists, even though `is_dirty` is true.
    pub changed_fields: Vec<&'static str>,
}

/// Coerces a raw value to a field's declared semantic kind.
///
/// Numeric strings become numbers, 0/1 integers become booleans for Boolean
/// fields, serialized date strings become date values, and non-string
/// scalars become text for Text fields. `Null` always passes through, and a
/// value that cannot be coerced is returned unchanged - validation belongs
/// to write materialization, not normalization.
pub fn normalize_value(kind: FieldKind, value: &Value) -> Value {
    match (kind, value) {
        (_, Value::Null) => Value::Null,
        (FieldKind::Number, Value::String(s)) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().map(Value::Int).unwrap_or_else(|_| {
                trimmed
                    .parse::<f64>()
                    .map_or_else(|_| value.clone(), Value::Float)
            })
        }
        (FieldKind::Boolean, Value::Int(0)) => Value::Bool(false),
        (FieldKind::Boolean, Value::Int(1)) => Value::Bool(true),
        (FieldKind::Date, Value::String(s)) => parse_date(s).unwrap_or_else(|| value.clone()),
        (FieldKind::Text, Value::Int(i)) => Value::String(i.to_string()),
        (FieldKind::Text, Value::Float(f)) => Value::String(f.to_string()),
        (FieldKind::Text, Value::Bool(b)) => Value::String(b.to_string()),
        _ => value.clone(),
    }
}

fn parse_date(s: &str) -> Option<Value> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(Value::DateTimeTz(dt.with_timezone(&chrono::Utc)));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Value::DateTime(dt));
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Value::Date(d));
    }
    None
}

impl Instance {
    /// Coerces every assigned field value to its declared kind, in place.
    ///
    /// Called before any write to the database so the adapter receives
    /// values of the declared types regardless of how they were assigned.
    pub fn normalize(&mut self, registry: &ModelRegistry) -> RelmapResult<()> {
        let fields = registry.columns(self.model())?;
        for fd in &fields {
            if let Some(current) = self.get(fd.name) {
                let normalized = normalize_value(fd.kind, current);
                if &normalized != current {
                    self.values_mut().insert(fd.name.to_string(), normalized);
                }
            }
        }
        Ok(())
    }

    fn materialized_value(&self, fd: &FieldDescriptor) -> RelmapResult<Value> {
        if let Some(current) = self.get(fd.name) {
            return Ok(normalize_value(fd.kind, current));
        }
        if let Some(default) = &fd.default {
            return Ok(normalize_value(fd.kind, default));
        }
        if fd.nullable {
            return Ok(Value::Null);
        }
        Err(RelmapError::Validation(format!(
            "Field '{}' cannot be empty!",
            fd.name
        )))
    }

    /// Materializes column values for a write, keyed by **column name**.
    ///
    /// Restricted to the given property keys when `keys` is provided, else
    /// all declared fields. An unassigned field yields its declared default
    /// if any, else `Null` if nullable, else a validation error naming the
    /// field; nothing partial is produced on failure. Values are normalized
    /// on the way out.
    pub fn values_for_write(
        &self,
        registry: &ModelRegistry,
        keys: Option<&[&str]>,
    ) -> RelmapResult<HashMap<String, Value>> {
        let fields = registry.columns(self.model())?;
        let mut out = HashMap::new();
        for fd in &fields {
            if let Some(filter) = keys {
                if !filter.contains(&fd.name) {
                    continue;
                }
            }
            out.insert(fd.column.clone(), self.materialized_value(fd)?);
        }
        Ok(out)
    }

    /// Whether this instance is currently synced to a database row.
    pub const fn is_saved(&self) -> bool {
        self.saved_flag()
    }

    /// Updates the saved flag.
    ///
    /// Marking saved captures the snapshot of current column values that
    /// later diffs compare against (and therefore fails if a required field
    /// is empty). Marking unsaved clears the flag and snapshot but keeps
    /// the field values, leaving a usable fresh record.
    pub fn set_saved(&mut self, registry: &ModelRegistry, saved: bool) -> RelmapResult<()> {
        if saved {
            let snapshot = self.values_for_write(registry, None)?;
            self.set_original_snapshot(Some(snapshot));
        } else {
            self.set_original_snapshot(None);
        }
        self.set_saved_flag(saved);
        Ok(())
    }

    /// The last-synced snapshot of column values, if the instance has been
    /// saved and not since marked unsaved.
    pub const fn original(&self) -> Option<&HashMap<String, Value>> {
        self.original_snapshot()
    }

    /// Diffs the current (normalized) field values against the snapshot.
    pub fn compare_with_original(&self, registry: &ModelRegistry) -> RelmapResult<ChangeSet> {
        let Some(snapshot) = self.original_snapshot() else {
            return Ok(ChangeSet {
                is_dirty: true,
                changed_fields: Vec::new(),
            });
        };

        let fields = registry.columns(self.model())?;
        let mut changed = Vec::new();
        for fd in &fields {
            let current = self.materialized_value(fd)?;
            if snapshot.get(&fd.column) != Some(&current) {
                changed.push(fd.name);
            }
        }
        Ok(ChangeSet {
            is_dirty: !changed.is_empty(),
            changed_fields: changed,
        })
    }

    /// The current value of the primary-key field, if assigned.
    pub fn primary_key_value(&self, registry: &ModelRegistry) -> RelmapResult<Option<Value>> {
        let pk = registry.primary_key(self.model())?;
        Ok(self.get(pk.name).cloned())
    }

    /// Assigns the primary-key field.
    pub fn set_primary_key(
        &mut self,
        registry: &ModelRegistry,
        value: impl Into<Value>,
    ) -> RelmapResult<()> {
        let pk = registry.primary_key(self.model())?;
        self.set(pk.name, value.into());
        Ok(())
    }
}
