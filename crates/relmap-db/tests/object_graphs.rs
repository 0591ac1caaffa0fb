//! Integration tests for the full mapping engine: model declaration,
//! join-row mapping into nested object graphs, the instance persistence
//! lifecycle, and bulk-insert id assignment.

use relmap_db::{
    assign_contiguous_ids, create_model, map_relational_result, FieldDescriptor, FieldKind,
    Instance, Model, ModelRef, ModelRegistry, RelationDescriptor, Row, Value,
};

struct User;
impl Model for User {
    fn model_name() -> &'static str {
        "User"
    }
}

struct Product;
impl Model for Product {
    fn model_name() -> &'static str {
        "Product"
    }
}

fn registry() -> ModelRegistry {
    let mut reg = ModelRegistry::new();

    reg.register_field::<User>(FieldDescriptor::new("id", FieldKind::Number).primary_key())
        .unwrap();
    reg.register_field::<User>(FieldDescriptor::new("email", FieldKind::Text))
        .unwrap();
    reg.register_field::<User>(FieldDescriptor::new("age", FieldKind::Number).nullable())
        .unwrap();
    reg.register_relation::<User>(RelationDescriptor::has_many(
        "products",
        ModelRef::of::<Product>,
        "user_id",
    ));

    reg.register_field::<Product>(FieldDescriptor::new("id", FieldKind::Number).primary_key())
        .unwrap();
    reg.register_field::<Product>(FieldDescriptor::new("title", FieldKind::Text))
        .unwrap();
    reg.register_field::<Product>(FieldDescriptor::new("user_id", FieldKind::Number).nullable())
        .unwrap();
    reg.register_relation::<Product>(RelationDescriptor::belongs_to(
        "user",
        ModelRef::of::<User>,
        "user_id",
    ));

    reg
}

fn join_row(user: (i64, &str, Option<i64>), product: Option<(i64, &str)>) -> Row {
    let (uid, email, age) = user;
    let (pid, title, fk) = match product {
        Some((pid, title)) => (Value::Int(pid), Value::String(title.to_string()), Value::Int(uid)),
        None => (Value::Null, Value::Null, Value::Null),
    };
    Row::from_pairs(vec![
        ("users__id", Value::Int(uid)),
        ("users__email", Value::String(email.to_string())),
        ("users__age", age.map_or(Value::Null, Value::Int)),
        ("products__id", pid),
        ("products__title", title),
        ("products__user_id", fk),
    ])
}

// ═════════════════════════════════════════════════════════════════════
// 1. Join rows to object graphs
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_users_with_products_graph() {
    let reg = registry();
    let rows = vec![
        join_row((1, "a@b.com", Some(30)), Some((10, "Spoon"))),
        join_row((1, "a@b.com", Some(30)), Some((11, "Fork"))),
        join_row((2, "c@d.com", None), Some((12, "Knife"))),
        join_row((3, "e@f.com", None), None),
    ];

    let users = map_relational_result(&reg, ModelRef::of::<User>(), &["products"], &rows).unwrap();
    assert_eq!(users.len(), 3);

    assert_eq!(users[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(users[0].get("email"), Some(&Value::String("a@b.com".into())));
    let products = users[0].relation("products").unwrap().as_many().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].get("title"), Some(&Value::String("Spoon".into())));
    assert_eq!(products[1].get("title"), Some(&Value::String("Fork".into())));

    // The outer-join user without products gets an empty list, not nulls.
    let empty = users[2].relation("products").unwrap().as_many().unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_products_with_owner() {
    let reg = registry();
    let rows = vec![
        Row::from_pairs(vec![
            ("products__id", Value::Int(10)),
            ("products__title", Value::String("Spoon".into())),
            ("products__user_id", Value::Int(1)),
            ("users__id", Value::Int(1)),
            ("users__email", Value::String("a@b.com".into())),
            ("users__age", Value::Null),
        ]),
        Row::from_pairs(vec![
            ("products__id", Value::Int(11)),
            ("products__title", Value::String("Fork".into())),
            ("products__user_id", Value::Null),
            ("users__id", Value::Null),
            ("users__email", Value::Null),
            ("users__age", Value::Null),
        ]),
    ];

    let products =
        map_relational_result(&reg, ModelRef::of::<Product>(), &["user"], &rows).unwrap();
    assert_eq!(products.len(), 2);

    let owner = products[0].relation("user").unwrap().as_one().unwrap();
    assert_eq!(owner.get("email"), Some(&Value::String("a@b.com".into())));
    assert!(owner.is_saved());

    // Orphan product: the relation is present but empty.
    assert!(products[1].relation("user").unwrap().as_one().is_none());
}

#[test]
fn test_mapped_graph_normalizes_driver_values() {
    // A driver that hands back strings for numeric columns still yields
    // typed instances.
    let reg = registry();
    let rows = vec![Row::from_pairs(vec![
        ("users__id", Value::String("1".into())),
        ("users__email", Value::String("a@b.com".into())),
        ("users__age", Value::String("16".into())),
    ])];

    let users = map_relational_result(&reg, ModelRef::of::<User>(), &[], &rows).unwrap();
    assert_eq!(users[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(users[0].get("age"), Some(&Value::Int(16)));
}

// ═════════════════════════════════════════════════════════════════════
// 2. Mapped instances enter the saved lifecycle
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_mapped_instance_dirty_tracking() {
    let reg = registry();
    let rows = vec![join_row((1, "a@b.com", Some(30)), None)];
    let mut users =
        map_relational_result(&reg, ModelRef::of::<User>(), &["products"], &rows).unwrap();
    let user = &mut users[0];

    assert!(user.is_saved());
    let diff = user.compare_with_original(&reg).unwrap();
    assert!(!diff.is_dirty);

    user.set("email", "changed@b.com");
    let diff = user.compare_with_original(&reg).unwrap();
    assert!(diff.is_dirty);
    assert_eq!(diff.changed_fields, vec!["email"]);

    // An update would write just the changed column.
    let update = user.values_for_write(&reg, Some(&["email"])).unwrap();
    assert_eq!(update.len(), 1);
    assert_eq!(
        update.get("email"),
        Some(&Value::String("changed@b.com".into()))
    );
}

#[test]
fn test_unsaving_a_mapped_instance_makes_it_insertable() {
    let reg = registry();
    let rows = vec![join_row((1, "a@b.com", None), None)];
    let mut users = map_relational_result(&reg, ModelRef::of::<User>(), &[], &rows).unwrap();
    let user = &mut users[0];

    user.set_saved(&reg, false).unwrap();
    assert!(!user.is_saved());
    assert!(user.original().is_none());
    // Values survive for re-insertion under a fresh key.
    assert_eq!(user.get("email"), Some(&Value::String("a@b.com".into())));
}

// ═════════════════════════════════════════════════════════════════════
// 3. Values-object construction
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_create_nested_graph_from_json() {
    let reg = registry();
    let user = create_model(
        &reg,
        ModelRef::of::<User>(),
        &serde_json::json!({
            "id": 1,
            "email": "a@b.com",
            "age": 30,
            "products": [
                {"id": 10, "title": "Spoon", "user_id": 1, "user": {"id": 1, "email": "a@b.com"}},
            ],
        }),
        true,
    )
    .unwrap();

    assert!(user.is_saved());
    let products = user.relation("products").unwrap().as_many().unwrap();
    assert_eq!(products.len(), 1);
    let back = products[0].relation("user").unwrap().as_one().unwrap();
    assert_eq!(back.get("id"), Some(&Value::Int(1)));
}

// ═════════════════════════════════════════════════════════════════════
// 4. Bulk insert end to end
// ═════════════════════════════════════════════════════════════════════

#[test]
fn test_bulk_insert_flow() {
    let reg = registry();

    let mut batch: Vec<Instance> = (0..3)
        .map(|i| {
            let mut inst = Instance::of::<User>();
            inst.set("email", format!("user{i}@b.com"));
            inst
        })
        .collect();

    // The adapter would take one values map per instance, leaving the
    // auto-increment key to the database...
    for inst in &batch {
        let values = inst.values_for_write(&reg, Some(&["email", "age"])).unwrap();
        assert!(values.contains_key("email"));
        assert!(!values.contains_key("id"));
    }

    // ...and report the last id of the contiguous range.
    assign_contiguous_ids(&reg, &mut batch, 10).unwrap();

    let ids: Vec<_> = batch.iter().map(|i| i.get("id").cloned().unwrap()).collect();
    assert_eq!(ids, vec![Value::Int(8), Value::Int(9), Value::Int(10)]);
    assert!(batch.iter().all(Instance::is_saved));
    for inst in &batch {
        assert!(!inst.compare_with_original(&reg).unwrap().is_dirty);
    }
}
