//! Relational result mapping: flat join rows back into object graphs.
//!
//! A join-aware select produces one flat row per (root, related) pair, with
//! every column namespaced as `<table>__<column>`. The mapper groups those
//! rows by the root's primary-key value - in order of first appearance,
//! never by sorting - and rebuilds one hydrated [`Instance`] per distinct
//! root, with the requested relations attached.
//!
//! Missing relation rows from outer joins never become placeholder objects:
//! a `HasMany` with only null-keyed rows is an empty sequence, a
//! `BelongsTo` with a null key is `None`.

use std::collections::HashMap;

use relmap_core::logging::mapping_span;
use relmap_core::{RelmapError, RelmapResult};

use crate::model::{Instance, ModelRef, RelationValue};
use crate::registry::ModelRegistry;
use crate::relations::RelationKind;
use crate::row::{namespaced_key, Row};
use crate::value::Value;

/// Reads one model's declared fields off one namespaced row.
///
/// Every declared field is looked up under `<table>__<column>`; columns
/// belonging to other tables are ignored, and a field whose key is absent
/// from the row is simply absent from the result. The returned map is keyed
/// by property key.
pub fn extract_relational_record(
    registry: &ModelRegistry,
    row: &Row,
    model: ModelRef,
) -> RelmapResult<HashMap<String, Value>> {
    let meta = registry.metadata(model)?;
    let table = meta.table_name();
    let mut record = HashMap::new();
    for fd in meta.fields() {
        let key = namespaced_key(&table, &fd.column);
        if let Some(value) = row.get_value(&key) {
            record.insert(fd.name.to_string(), value.clone());
        }
    }
    Ok(record)
}

// Grouping keys are the display form of the primary-key value. Within one
// result set the root key column has a single type, so this cannot conflate
// distinct values.
fn group_key(value: &Value) -> String {
    value.to_string()
}

fn extract_related(
    registry: &ModelRegistry,
    row: &Row,
    target: ModelRef,
) -> RelmapResult<Option<Instance>> {
    let pk = registry.primary_key(target)?;
    let table = registry.table_name(target)?;
    let pk_key = namespaced_key(&table, &pk.column);
    match row.get_value(&pk_key) {
        // An outer join with no match leaves the related key null; an
        // absent column means the relation was not selected at all. Either
        // way there is no related record on this row.
        None | Some(Value::Null) => Ok(None),
        Some(_) => {
            let values = extract_relational_record(registry, row, target)?;
            Ok(Some(Instance::with_values(target, values)))
        }
    }
}

fn mark_hydrated(registry: &ModelRegistry, instance: &mut Instance) -> RelmapResult<()> {
    instance.normalize(registry)?;
    instance.set_saved(registry, true)?;
    for relation in instance.relations_mut().values_mut() {
        match relation {
            RelationValue::Many(items) => {
                for item in items {
                    mark_hydrated(registry, item)?;
                }
            }
            RelationValue::One(Some(item)) => mark_hydrated(registry, item)?,
            RelationValue::One(None) => {}
        }
    }
    Ok(())
}

/// Maps a flat, namespaced row stream to one hydrated instance per root.
///
/// Rows are grouped by the root model's primary-key value, preserving the
/// order in which distinct values first appear; rows belonging to the same
/// root need not be adjacent. Each requested relation (by property key) is
/// populated per the rules above; relations not named are not attached at
/// all. Every emitted instance - roots and related records alike - is
/// normalized, marked saved, and snapshotted.
///
/// A row that lacks the root's namespaced primary-key column entirely is a
/// malformed input and fails hard.
pub fn map_relational_result(
    registry: &ModelRegistry,
    model: ModelRef,
    relation_names: &[&str],
    rows: &[Row],
) -> RelmapResult<Vec<Instance>> {
    let span = mapping_span(model.name());
    let _guard = span.enter();

    let table = registry.table_name(model)?;
    let pk = registry.primary_key(model)?;
    let pk_key = namespaced_key(&table, &pk.column);

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in rows {
        let key_value = row.get_value(&pk_key).ok_or_else(|| {
            RelmapError::MalformedRow(format!(
                "row is missing root primary-key column '{pk_key}'"
            ))
        })?;
        let key = group_key(key_value);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(row);
    }

    let relations = registry.relations(model, Some(relation_names))?;
    let mut out = Vec::with_capacity(order.len());
    for key in &order {
        let group = &groups[key];
        let root_values = extract_relational_record(registry, group[0], model)?;
        let mut instance = Instance::with_values(model, root_values);

        for relation in &relations {
            let target = relation.resolve_target();
            let value = match relation.kind {
                RelationKind::HasMany => {
                    let mut items = Vec::new();
                    for row in group {
                        // Null-keyed rows contribute nothing; identical
                        // repeats are each appended, no deduplication.
                        if let Some(child) = extract_related(registry, row, target)? {
                            items.push(child);
                        }
                    }
                    RelationValue::Many(items)
                }
                RelationKind::BelongsTo => {
                    RelationValue::One(extract_related(registry, group[0], target)?.map(Box::new))
                }
            };
            instance.set_relation(relation.name, value);
        }

        mark_hydrated(registry, &mut instance)?;
        out.push(instance);
    }

    tracing::debug!(rows = rows.len(), roots = out.len(), "mapped result set");
    Ok(out)
}

/// Constructs one instance from a flat or nested values object.
///
/// Declared fields are read from the object by property key; values present
/// under relation keys recursively construct related instances. An absent
/// or empty relation value becomes an empty sequence for `HasMany` and
/// `None` for `BelongsTo`. When `hydrated` is true the entire graph is
/// normalized, marked saved, and snapshotted; otherwise it is left unsaved.
pub fn create_model(
    registry: &ModelRegistry,
    model: ModelRef,
    values: &serde_json::Value,
    hydrated: bool,
) -> RelmapResult<Instance> {
    let object = values.as_object().ok_or_else(|| {
        RelmapError::MalformedRow(format!(
            "expected an object to construct '{}' from, got {values}",
            model.name()
        ))
    })?;

    let mut instance = Instance::blank(model);
    for fd in registry.columns(model)? {
        if let Some(raw) = object.get(fd.name) {
            instance.set(fd.name, Value::from_json(raw));
        }
    }

    for relation in registry.relations(model, None)? {
        let target = relation.resolve_target();
        let value = match relation.kind {
            RelationKind::HasMany => match object.get(relation.name) {
                Some(serde_json::Value::Array(items)) => {
                    let mut children = Vec::with_capacity(items.len());
                    for item in items {
                        children.push(create_model(registry, target, item, hydrated)?);
                    }
                    RelationValue::Many(children)
                }
                _ => RelationValue::Many(Vec::new()),
            },
            RelationKind::BelongsTo => match object.get(relation.name) {
                Some(nested) if nested.is_object() => RelationValue::One(Some(Box::new(
                    create_model(registry, target, nested, hydrated)?,
                ))),
                _ => RelationValue::One(None),
            },
        };
        instance.set_relation(relation.name, value);
    }

    if hydrated {
        instance.normalize(registry)?;
        instance.set_saved(registry, true)?;
    }
    Ok(instance)
}

/// Constructs a sequence of instances from an array of values objects.
pub fn create_models(
    registry: &ModelRegistry,
    model: ModelRef,
    values: &serde_json::Value,
    hydrated: bool,
) -> RelmapResult<Vec<Instance>> {
    let items = values.as_array().ok_or_else(|| {
        RelmapError::MalformedRow(format!(
            "expected an array to construct '{}' records from, got {values}",
            model.name()
        ))
    })?;
    items
        .iter()
        .map(|item| create_model(registry, model, item, hydrated))
        .collect()
}
