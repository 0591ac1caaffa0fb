//! Model identity and instance representation.
//!
//! A model type is any Rust type implementing [`Model`]; the engine never
//! inspects the type itself, only the descriptors registered for it. A
//! [`ModelRef`] is the lightweight handle (type identity plus name) that
//! metadata lookups and the mapper pass around at runtime.
//!
//! [`Instance`] is the explicit wrapper the engine works with: the current
//! field values, attached relation data, and the persistence bookkeeping
//! (saved flag, last-synced snapshot) that is not part of the model's
//! public shape.

use std::any::TypeId;
use std::collections::HashMap;

use crate::value::Value;

/// A declared entity type with registered field and relation metadata.
///
/// Implementations are unit structs (or any `'static` type) that serve as a
/// compile-time name for a table. All actual metadata lives in the
/// [`ModelRegistry`](crate::registry::ModelRegistry), populated by
/// declaration-time registration calls.
///
/// # Examples
///
/// ```
/// use relmap_db::model::{Model, ModelRef};
///
/// struct User;
///
/// impl Model for User {
///     fn model_name() -> &'static str { "User" }
/// }
///
/// assert_eq!(ModelRef::of::<User>().name(), "User");
/// ```
pub trait Model: 'static {
    /// Returns the type name used for diagnostics and default table naming.
    fn model_name() -> &'static str;
}

/// A runtime handle to a model type: its [`TypeId`] plus its name.
///
/// `ModelRef` is `Copy` and hashable, so it serves as the registry key and
/// as the value produced by lazy relation-target resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelRef {
    type_id: TypeId,
    name: &'static str,
}

impl ModelRef {
    /// Creates the handle for a model type.
    pub fn of<M: Model>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            name: M::model_name(),
        }
    }

    /// Returns the model's type name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the model's type identity.
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// The data attached to one relation property of an instance.
///
/// A missing relation never degrades to a placeholder object: a `HasMany`
/// with no matching rows is an empty sequence, a `BelongsTo` with no match
/// is `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationValue {
    /// Zero-or-many related instances, in row order.
    Many(Vec<Instance>),
    /// Zero-or-one related instance.
    One(Option<Box<Instance>>),
}

impl RelationValue {
    /// Returns the related instances of a `Many` relation.
    pub fn as_many(&self) -> Option<&[Instance]> {
        match self {
            Self::Many(items) => Some(items),
            Self::One(_) => None,
        }
    }

    /// Returns the related instance of a `One` relation, if present.
    pub fn as_one(&self) -> Option<&Instance> {
        match self {
            Self::One(inner) => inner.as_deref(),
            Self::Many(_) => None,
        }
    }
}

/// One in-memory record of a model, with persistence-state bookkeeping.
///
/// Lifecycle: created blank (unsaved, no snapshot) or hydrated from a result
/// row (snapshot captured immediately, saved). Direct field assignment via
/// [`set`](Instance::set) never touches the snapshot; only
/// [`set_saved`](Instance::set_saved) does. Marking an instance unsaved
/// clears the flag and snapshot but keeps the field values, leaving a
/// usable fresh record.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    model: ModelRef,
    values: HashMap<String, Value>,
    relations: HashMap<String, RelationValue>,
    saved: bool,
    original: Option<HashMap<String, Value>>,
}

impl Instance {
    /// Creates a blank, unsaved instance of the given model.
    pub fn blank(model: ModelRef) -> Self {
        Self {
            model,
            values: HashMap::new(),
            relations: HashMap::new(),
            saved: false,
            original: None,
        }
    }

    /// Creates a blank, unsaved instance of the model type `M`.
    pub fn of<M: Model>() -> Self {
        Self::blank(ModelRef::of::<M>())
    }

    /// Creates an unsaved instance carrying the given field values.
    pub fn with_values(model: ModelRef, values: HashMap<String, Value>) -> Self {
        Self {
            model,
            values,
            relations: HashMap::new(),
            saved: false,
            original: None,
        }
    }

    /// The model this instance belongs to.
    pub const fn model(&self) -> ModelRef {
        self.model
    }

    /// Returns the current value of a field, if one is assigned.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Assigns a field value. The snapshot is not updated; the change shows
    /// up in [`compare_with_original`](Instance::compare_with_original)
    /// until the instance is saved again.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// All currently assigned field values, keyed by property key.
    pub const fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.values
    }

    /// Returns the attached data for a relation property.
    pub fn relation(&self, key: &str) -> Option<&RelationValue> {
        self.relations.get(key)
    }

    /// Attaches relation data under a relation property.
    pub fn set_relation(&mut self, key: impl Into<String>, value: RelationValue) {
        self.relations.insert(key.into(), value);
    }

    /// All attached relation data, keyed by property key.
    pub const fn relations(&self) -> &HashMap<String, RelationValue> {
        &self.relations
    }

    pub(crate) fn relations_mut(&mut self) -> &mut HashMap<String, RelationValue> {
        &mut self.relations
    }

    pub(crate) const fn saved_flag(&self) -> bool {
        self.saved
    }

    pub(crate) fn set_saved_flag(&mut self, saved: bool) {
        self.saved = saved;
    }

    pub(crate) const fn original_snapshot(&self) -> Option<&HashMap<String, Value>> {
        self.original.as_ref()
    }

    pub(crate) fn set_original_snapshot(&mut self, snapshot: Option<HashMap<String, Value>>) {
        self.original = snapshot;
    }
}
