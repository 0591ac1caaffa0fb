//! Process-wide model metadata registry.
//!
//! Models self-register their field and relation descriptors at declaration
//! time (effectively process startup); after that the registry is read-only
//! and safely shared. There is no runtime reflection anywhere: everything
//! the mapper and tracker know about a model comes from these registration
//! calls.
//!
//! All engine entry points take a [`ModelRegistry`] reference explicitly, so
//! tests and embedders can build private registries. [`register`] and
//! [`read`] operate on the process-wide instance for applications that want
//! the conventional single registry.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use relmap_core::utils::text::pluralize;
use relmap_core::{RelmapError, RelmapResult};

use crate::fields::FieldDescriptor;
use crate::model::{Model, ModelRef};
use crate::relations::RelationDescriptor;

/// Everything registered for one model: its ordered columns, relations, and
/// table name. Built during declaration, never mutated afterwards.
#[derive(Debug)]
pub struct ModelMetadata {
    model: ModelRef,
    table_name: Option<String>,
    fields: Vec<FieldDescriptor>,
    relations: Vec<RelationDescriptor>,
}

impl ModelMetadata {
    fn new(model: ModelRef) -> Self {
        Self {
            model,
            table_name: None,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// The model this metadata belongs to.
    pub const fn model(&self) -> ModelRef {
        self.model
    }

    /// The field descriptors, in registration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The relation descriptors, in registration order.
    pub fn relations(&self) -> &[RelationDescriptor] {
        &self.relations
    }

    /// The resolved table name: the explicit override if one was registered,
    /// else the pluralized lowercase model name (`User` -> `users`).
    pub fn table_name(&self) -> String {
        self.table_name
            .clone()
            .unwrap_or_else(|| pluralize(&self.model.name().to_lowercase()))
    }

    /// The primary-key descriptor, if one was declared.
    pub fn primary_key(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.primary_key)
    }
}

/// The model metadata store, keyed by model type identity.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<TypeId, ModelMetadata>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, model: ModelRef) -> &mut ModelMetadata {
        self.models
            .entry(model.type_id())
            .or_insert_with(|| ModelMetadata::new(model))
    }

    /// Registers a field descriptor for model `M`.
    ///
    /// Registration is idempotent per property key: registering the same
    /// key twice keeps the first descriptor. Registering a different
    /// property under an already-used column name, or a second primary key,
    /// is a configuration error.
    pub fn register_field<M: Model>(&mut self, descriptor: FieldDescriptor) -> RelmapResult<()> {
        self.register_field_for(ModelRef::of::<M>(), descriptor)
    }

    /// Non-generic form of [`register_field`](ModelRegistry::register_field).
    pub fn register_field_for(
        &mut self,
        model: ModelRef,
        descriptor: FieldDescriptor,
    ) -> RelmapResult<()> {
        let meta = self.entry(model);
        if meta.fields.iter().any(|f| f.name == descriptor.name) {
            return Ok(());
        }
        if meta.fields.iter().any(|f| f.column == descriptor.column) {
            return Err(RelmapError::Configuration(format!(
                "model '{}' already maps column '{}'",
                model.name(),
                descriptor.column
            )));
        }
        if descriptor.primary_key && meta.fields.iter().any(|f| f.primary_key) {
            return Err(RelmapError::Configuration(format!(
                "model '{}' already declares a primary key",
                model.name()
            )));
        }
        tracing::debug!(
            model = model.name(),
            field = descriptor.name,
            column = %descriptor.column,
            "registered field"
        );
        meta.fields.push(descriptor);
        Ok(())
    }

    /// Registers a relation descriptor for model `M`.
    ///
    /// Idempotent per property key. The target resolver is stored, never
    /// invoked here, so mutually-referencing models may register in either
    /// order.
    pub fn register_relation<M: Model>(&mut self, descriptor: RelationDescriptor) {
        self.register_relation_for(ModelRef::of::<M>(), descriptor);
    }

    /// Non-generic form of [`register_relation`](ModelRegistry::register_relation).
    pub fn register_relation_for(&mut self, model: ModelRef, descriptor: RelationDescriptor) {
        let meta = self.entry(model);
        if meta.relations.iter().any(|r| r.name == descriptor.name) {
            return;
        }
        tracing::debug!(
            model = model.name(),
            relation = descriptor.name,
            "registered relation"
        );
        meta.relations.push(descriptor);
    }

    /// Overrides the default table name for model `M`.
    pub fn set_table_name<M: Model>(&mut self, name: impl Into<String>) {
        self.entry(ModelRef::of::<M>()).table_name = Some(name.into());
    }

    /// Returns `true` if any descriptor has been registered for the model.
    pub fn is_registered(&self, model: ModelRef) -> bool {
        self.models.contains_key(&model.type_id())
    }

    /// Looks up the metadata for a model.
    pub fn metadata(&self, model: ModelRef) -> RelmapResult<&ModelMetadata> {
        self.models.get(&model.type_id()).ok_or_else(|| {
            RelmapError::Configuration(format!("model '{}' is not registered", model.name()))
        })
    }

    /// The ordered field descriptors of a model.
    pub fn columns(&self, model: ModelRef) -> RelmapResult<Vec<FieldDescriptor>> {
        Ok(self.metadata(model)?.fields().to_vec())
    }

    /// The relation descriptors of a model, filtered to the given property
    /// keys when `names` is provided.
    pub fn relations(
        &self,
        model: ModelRef,
        names: Option<&[&str]>,
    ) -> RelmapResult<Vec<RelationDescriptor>> {
        let all = self.metadata(model)?.relations();
        Ok(match names {
            Some(filter) => all
                .iter()
                .filter(|r| filter.contains(&r.name))
                .cloned()
                .collect(),
            None => all.to_vec(),
        })
    }

    /// The primary-key descriptor of a model.
    pub fn primary_key(&self, model: ModelRef) -> RelmapResult<FieldDescriptor> {
        self.metadata(model)?.primary_key().cloned().ok_or_else(|| {
            RelmapError::Configuration(format!(
                "model '{}' has no primary key declared",
                model.name()
            ))
        })
    }

    /// The resolved table name of a model.
    pub fn table_name(&self, model: ModelRef) -> RelmapResult<String> {
        Ok(self.metadata(model)?.table_name())
    }
}

static REGISTRY: Lazy<RwLock<ModelRegistry>> = Lazy::new(|| RwLock::new(ModelRegistry::new()));

/// Runs registration calls against the process-wide registry.
///
/// Intended for model declaration at startup:
///
/// ```
/// use relmap_db::fields::{FieldDescriptor, FieldKind};
/// use relmap_db::model::Model;
/// use relmap_db::registry;
///
/// struct Invoice;
/// impl Model for Invoice {
///     fn model_name() -> &'static str { "Invoice" }
/// }
///
/// registry::register(|reg| {
///     reg.register_field::<Invoice>(
///         FieldDescriptor::new("id", FieldKind::Number).primary_key(),
///     )
/// }).unwrap();
/// ```
pub fn register<F>(f: F) -> RelmapResult<()>
where
    F: FnOnce(&mut ModelRegistry) -> RelmapResult<()>,
{
    let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Reads from the process-wide registry.
pub fn read<T>(f: impl FnOnce(&ModelRegistry) -> T) -> T {
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    f(&guard)
}
