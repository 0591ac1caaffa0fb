//! Field descriptors for model declarations.
//!
//! A [`FieldDescriptor`] records everything the engine knows about one
//! column of a model: the property key it is exposed under, the database
//! column it maps to, its semantic [`FieldKind`], and its write behavior
//! (primary key, nullable, default, selected by default).

use crate::value::Value;

/// The semantic type of a model field.
///
/// The kind drives [`normalization`](crate::model::Instance::normalize):
/// raw values read from a driver or assigned by the caller are coerced to
/// the declared kind before being written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FieldKind {
    /// Integer or floating-point numbers.
    Number,
    /// UTF-8 text.
    Text,
    /// True/false.
    Boolean,
    /// Calendar dates and timestamps.
    Date,
}

/// Complete definition of a model field.
///
/// Constructed builder-style at model declaration time:
///
/// ```
/// use relmap_db::fields::{FieldDescriptor, FieldKind};
///
/// let id = FieldDescriptor::new("id", FieldKind::Number).primary_key();
/// let email = FieldDescriptor::new("email", FieldKind::Text).column("email_address");
/// assert!(id.primary_key);
/// assert_eq!(email.column, "email_address");
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldDescriptor {
    /// The property key this field is exposed under on the model.
    pub name: &'static str,
    /// The database column name (defaults to `name`).
    pub column: String,
    /// The semantic type of this field.
    pub kind: FieldKind,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Default value substituted when the field is unset at write time.
    pub default: Option<Value>,
    /// Whether this field is included in default queries.
    pub select: bool,
}

impl FieldDescriptor {
    /// Creates a new descriptor with sensible defaults: column equal to the
    /// property key, not a primary key, not nullable, no default, selected.
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column: name.to_string(),
            kind,
            primary_key: false,
            nullable: false,
            default: None,
            select: true,
        }
    }

    /// Sets the database column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Marks this field as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value for this field.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Excludes this field from default queries.
    #[must_use]
    pub const fn unselected(mut self) -> Self {
        self.select = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let f = FieldDescriptor::new("email", FieldKind::Text);
        assert_eq!(f.name, "email");
        assert_eq!(f.column, "email");
        assert!(!f.primary_key);
        assert!(!f.nullable);
        assert!(f.default.is_none());
        assert!(f.select);
    }

    #[test]
    fn test_builder() {
        let f = FieldDescriptor::new("age", FieldKind::Number)
            .column("age_years")
            .nullable()
            .default(18_i64)
            .unselected();
        assert_eq!(f.column, "age_years");
        assert!(f.nullable);
        assert_eq!(f.default, Some(Value::Int(18)));
        assert!(!f.select);
    }

    #[test]
    fn test_primary_key() {
        let f = FieldDescriptor::new("id", FieldKind::Number).primary_key();
        assert!(f.primary_key);
    }
}
