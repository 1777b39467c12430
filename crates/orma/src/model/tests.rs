use super::*;
use crate::error::OrmError;
use crate::testing::{BadTag, CamelModel, CustomTable, DupColumn, Empty, TaggedModel, TestModel};
use std::sync::Arc;
use std::thread;

#[test]
fn test_underscore_name() {
    assert_eq!(underscore_name("UserId"), "user_id");
    assert_eq!(underscore_name("ID"), "id");
    assert_eq!(underscore_name("UserID"), "user_id");
    assert_eq!(underscore_name("HTTPCode"), "h_t_t_p_code");
    assert_eq!(underscore_name("first_name"), "first_name");
    assert_eq!(underscore_name("TestModel"), "test_model");
    assert_eq!(underscore_name(""), "");
}

#[test]
fn test_parse_tag() {
    let tags = parse_tag("column=id_t").unwrap();
    assert_eq!(tags.get("column").map(String::as_str), Some("id_t"));
    assert!(parse_tag("").unwrap().is_empty());

    let err = parse_tag("column").unwrap_err();
    assert!(matches!(err, OrmError::InvalidTagContent(ref s) if s == "column"));
    let err = parse_tag("column=a=b").unwrap_err();
    assert!(matches!(err, OrmError::InvalidTagContent(ref s) if s == "column=a=b"));
}

#[test]
fn test_default_mapping() {
    let registry = Registry::new();
    let model = registry.get::<TestModel>().unwrap();

    assert_eq!(model.table_name, "test_model");
    let columns: Vec<&str> = model.fields.iter().map(|f| f.column.as_str()).collect();
    assert_eq!(columns, ["id", "first_name", "age", "last_name"]);
    assert_eq!(model.field("first_name").unwrap().index, 1);
    assert_eq!(model.field_by_column("last_name").unwrap().name, "last_name");
    assert_eq!(model.field("age").unwrap().type_name, "i32");
}

#[test]
fn test_camel_case_fields() {
    let registry = Registry::new();
    let model = registry.get::<CamelModel>().unwrap();

    assert_eq!(model.table_name, "camel_model");
    assert_eq!(model.column_of("ID").unwrap(), "id");
    assert_eq!(model.column_of("UserID").unwrap(), "user_id");
    assert_eq!(model.column_of("HTTPCode").unwrap(), "h_t_t_p_code");
    assert_eq!(model.column_of("FirstName").unwrap(), "first_name");
}

#[test]
fn test_tag_overrides_column() {
    let registry = Registry::new();
    let model = registry.get::<TaggedModel>().unwrap();

    assert_eq!(model.column_of("id").unwrap(), "id_t");
    assert_eq!(model.column_of("FirstName").unwrap(), "first_name_t");
    assert_eq!(model.column_of("Age").unwrap(), "age");
    assert!(model.field_by_column("id").is_none());
}

#[test]
fn test_invalid_tag() {
    let registry = Registry::new();
    let err = registry.get::<BadTag>().unwrap_err();
    assert!(matches!(err, OrmError::InvalidTagContent(ref s) if s == "column"));
    assert!(registry.is_empty());
}

#[test]
fn test_custom_table_name() {
    let registry = Registry::new();
    let model = registry.get::<CustomTable>().unwrap();
    assert_eq!(model.table_name, "custom_table_name_t");
}

#[test]
fn test_not_a_struct() {
    let registry = Registry::new();
    let err = registry.get::<Empty>().unwrap_err();
    assert!(matches!(err, OrmError::NotAStruct(ref s) if s == "Empty"));
}

#[test]
fn test_register_options() {
    let registry = Registry::new();
    let model = registry
        .register::<TestModel>([
            with_table_name("test_model_t"),
            with_column_name("first_name", "first_name_ccc"),
        ])
        .unwrap();

    assert_eq!(model.table_name, "test_model_t");
    assert_eq!(model.column_of("first_name").unwrap(), "first_name_ccc");
    assert_eq!(
        model.field_by_column("first_name_ccc").unwrap().name,
        "first_name"
    );
    assert!(model.field_by_column("first_name").is_none());
}

#[test]
fn test_with_column_name_unknown_field() {
    let registry = Registry::new();
    let err = registry
        .register::<TestModel>([with_column_name("FirstNameXXX", "x")])
        .unwrap_err();
    assert!(matches!(err, OrmError::UnknownField(ref s) if s == "FirstNameXXX"));
}

#[test]
fn test_get_is_cached() {
    let registry = Registry::new();
    let first = registry.get::<TestModel>().unwrap();
    let second = registry.get::<TestModel>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_last_register_wins() {
    let registry = Registry::new();
    registry
        .register::<TestModel>([with_table_name("first")])
        .unwrap();
    registry
        .register::<TestModel>([with_table_name("second")])
        .unwrap();

    assert_eq!(registry.get::<TestModel>().unwrap().table_name, "second");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_concurrent_get() {
    let registry = Arc::new(Registry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get::<TestModel>().unwrap().table_name.clone())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "test_model");
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_duplicate_tag_column() {
    let registry = Registry::new();
    let err = registry.get::<DupColumn>().unwrap_err();
    assert!(matches!(
        err,
        OrmError::DuplicateColumn { ref column, ref field, ref existing }
            if column == "key" && field == "code" && existing == "id"
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_column_override_collides() {
    let registry = Registry::new();
    let err = registry
        .register::<TestModel>([with_column_name("first_name", "age")])
        .unwrap_err();
    assert!(matches!(
        err,
        OrmError::DuplicateColumn { ref column, ref field, ref existing }
            if column == "age" && field == "first_name" && existing == "age"
    ));
    assert!(registry.is_empty());

    // Renaming a field onto its own column is not a collision.
    let model = registry
        .register::<TestModel>([with_column_name("age", "age")])
        .unwrap();
    assert_eq!(model.field_by_column("age").unwrap().name, "age");
}

#[test]
fn test_column_override_frees_old_column() {
    let registry = Registry::new();
    let model = registry
        .register::<TestModel>([
            with_column_name("age", "years"),
            with_column_name("first_name", "age"),
        ])
        .unwrap();
    assert_eq!(model.field_by_column("age").unwrap().name, "first_name");
    assert_eq!(model.field_by_column("years").unwrap().name, "age");
    assert!(model.field_by_column("first_name").is_none());
}

#[test]
fn test_concurrent_register_and_get() {
    let registry = Arc::new(Registry::new());
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                if i % 2 == 0 {
                    registry
                        .register::<TestModel>([
                            with_table_name(format!("table_{i}")),
                            with_column_name("age", format!("age_{i}")),
                        ])
                        .unwrap();
                } else {
                    registry.get::<TestModel>().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 1);
    let model = registry.get::<TestModel>().unwrap();
    assert_eq!(model.fields.len(), 4);
    if model.table_name == "test_model" {
        // A plain `get` registered last.
        assert_eq!(model.column_of("age").unwrap(), "age");
    } else {
        // Every option set stays together.
        let n = model.table_name.strip_prefix("table_").unwrap();
        assert_eq!(model.column_of("age").unwrap(), format!("age_{n}"));
        assert_eq!(model.field_by_column(&format!("age_{n}")).unwrap().name, "age");
    }
    for field in &model.fields {
        assert_eq!(model.field_by_column(&field.column).unwrap().name, field.name);
    }
}
