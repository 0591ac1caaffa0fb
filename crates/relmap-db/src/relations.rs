//! Relation descriptors for model declarations.
//!
//! A [`RelationDescriptor`] records how one model relates to another. The
//! target model is held as a zero-argument resolver rather than a direct
//! reference, so two models that reference each other can both finish
//! declaring before either resolver is ever invoked. Resolution happens
//! only when relation metadata is consulted.

use std::fmt;

use crate::model::ModelRef;

/// The two relation kinds the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// One root row relates to zero-or-many rows of the target model. The
    /// foreign key lives on the target's table and points back at this
    /// model's primary key.
    HasMany,
    /// One root row relates to exactly zero-or-one target row. The foreign
    /// key lives on this model's own table and points at the target's
    /// primary key.
    BelongsTo,
}

/// A deferred lookup of the relation's target model.
pub type TargetResolver = fn() -> ModelRef;

/// Metadata about one declared relation.
#[derive(Clone)]
pub struct RelationDescriptor {
    /// The property key the relation is exposed under on the model.
    pub name: &'static str,
    /// Whether this is a collection or a single reference.
    pub kind: RelationKind,
    /// Deferred reference to the target model type.
    pub target: TargetResolver,
    /// The foreign-key column. For [`RelationKind::HasMany`] it lives on the
    /// target table; for [`RelationKind::BelongsTo`] on the owning table.
    pub target_column: String,
}

impl RelationDescriptor {
    /// Declares a one-to-many relation.
    pub fn has_many(
        name: &'static str,
        target: TargetResolver,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            name,
            kind: RelationKind::HasMany,
            target,
            target_column: target_column.into(),
        }
    }

    /// Declares a many-to-one relation.
    pub fn belongs_to(
        name: &'static str,
        target: TargetResolver,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            name,
            kind: RelationKind::BelongsTo,
            target,
            target_column: target_column.into(),
        }
    }

    /// Resolves the target model reference.
    pub fn resolve_target(&self) -> ModelRef {
        (self.target)()
    }
}

impl fmt::Debug for RelationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("target_column", &self.target_column)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;

    struct Author;
    struct Book;

    impl Model for Author {
        fn model_name() -> &'static str {
            "Author"
        }
    }

    impl Model for Book {
        fn model_name() -> &'static str {
            "Book"
        }
    }

    #[test]
    fn test_has_many() {
        let rel = RelationDescriptor::has_many("books", ModelRef::of::<Book>, "author_id");
        assert_eq!(rel.kind, RelationKind::HasMany);
        assert_eq!(rel.name, "books");
        assert_eq!(rel.target_column, "author_id");
        assert_eq!(rel.resolve_target(), ModelRef::of::<Book>());
    }

    #[test]
    fn test_belongs_to() {
        let rel = RelationDescriptor::belongs_to("author", ModelRef::of::<Author>, "author_id");
        assert_eq!(rel.kind, RelationKind::BelongsTo);
        assert_eq!(rel.resolve_target().name(), "Author");
    }

    #[test]
    fn test_debug_omits_resolver() {
        let rel = RelationDescriptor::has_many("books", ModelRef::of::<Book>, "author_id");
        let debug = format!("{rel:?}");
        assert!(debug.contains("books"));
        assert!(debug.contains("HasMany"));
    }
}
