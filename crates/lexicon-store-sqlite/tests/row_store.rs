//! Row store integration tests for `SqliteLexiconStore`.

use lexicon_registry::{RegistryError, RowStore, SchemaRegistry};
use lexicon_store_sqlite::SqliteLexiconStore;
use lexicon_types::{ColumnType, Row, Template, Value};

fn store_with_table() -> SqliteLexiconStore {
    let store = SqliteLexiconStore::open_in_memory().expect("open");
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    store
}

fn entry(code: &str, name: &str) -> Row {
    Row::new().with("code", code).with("full_name", name)
}

#[test]
fn list_empty_table() {
    let store = store_with_table();
    assert!(store.list("ship_types").expect("list").is_empty());
}

#[test]
fn list_is_ordered_by_code() {
    let store = store_with_table();
    for (code, name) in [("FRG", "Frigate"), ("BTL", "Battleship"), ("CRU", "Cruiser")] {
        store.create("ship_types", entry(code, name)).expect("create");
    }
    let codes: Vec<String> = store
        .list("ship_types")
        .expect("list")
        .iter()
        .filter_map(|r| r.get_str("code").map(String::from))
        .collect();
    assert_eq!(codes, vec!["BTL", "CRU", "FRG"]);
}

#[test]
fn rows_carry_every_column_in_catalog_order() {
    let store = store_with_table();
    store
        .create("ship_types", entry("FRG", "Frigate"))
        .expect("create");
    let row = store.get("ship_types", "FRG").expect("get");
    let columns: Vec<&str> = row.columns().collect();
    assert_eq!(columns, vec!["code", "full_name", "description", "created_at"]);
    assert_eq!(row.get("description"), Some(&Value::Null));
}

#[test]
fn create_stamps_created_at() {
    let store = store_with_table();
    let created = store
        .create(
            "ship_types",
            entry("FRG", "Frigate").with("created_at", "1999-01-01 00:00:00"),
        )
        .expect("create");
    let stamp = created.get_str("created_at").expect("stamp");
    assert_ne!(stamp, "1999-01-01 00:00:00");
    assert_eq!(stamp.len(), 19);
}

#[test]
fn create_requires_code_and_full_name() {
    let store = store_with_table();
    let err = store
        .create("ship_types", Row::new().with("full_name", "Frigate"))
        .expect_err("no code");
    assert!(matches!(err, RegistryError::MissingRequiredField { ref field } if field == "code"));

    let err = store
        .create("ship_types", entry("FRG", ""))
        .expect_err("empty name");
    assert!(
        matches!(err, RegistryError::MissingRequiredField { ref field } if field == "full_name")
    );

    let err = store
        .create(
            "ship_types",
            Row::new().with("code", 7_i64).with("full_name", "Seven"),
        )
        .expect_err("numeric code");
    assert!(matches!(err, RegistryError::MissingRequiredField { .. }));
}

#[test]
fn duplicate_code_is_conflict() {
    let store = store_with_table();
    store
        .create("ship_types", entry("FRG", "Frigate"))
        .expect("create");
    let err = store
        .create("ship_types", entry("FRG", "Other"))
        .expect_err("dup");
    assert!(matches!(err, RegistryError::DuplicateCode { ref code, .. } if code == "FRG"));
}

#[test]
fn unknown_column_is_storage_error() {
    let store = store_with_table();
    let err = store
        .create("ship_types", entry("FRG", "Frigate").with("tonnage", 10_i64))
        .expect_err("unknown column");
    assert!(matches!(err, RegistryError::Storage { .. }));
}

#[test]
fn get_missing_is_entry_not_found() {
    let store = store_with_table();
    let err = store.get("ship_types", "NOPE").expect_err("missing");
    assert!(matches!(err, RegistryError::EntryNotFound { .. }));
}

#[test]
fn partial_update_touches_only_given_columns() {
    let store = store_with_table();
    store
        .create(
            "ship_types",
            entry("FRG", "Frigate").with("description", "Light escort"),
        )
        .expect("create");

    let updated = store
        .update(
            "ship_types",
            "FRG",
            Row::new().with("description", "Escort"),
        )
        .expect("update");
    assert_eq!(updated.get_str("full_name"), Some("Frigate"));
    assert_eq!(updated.get_str("description"), Some("Escort"));
}

#[test]
fn update_cannot_change_code_or_created_at() {
    let store = store_with_table();
    let created = store
        .create("ship_types", entry("FRG", "Frigate"))
        .expect("create");

    let updated = store
        .update(
            "ship_types",
            "FRG",
            Row::new()
                .with("code", "HIJACK")
                .with("created_at", "2000-01-01 00:00:00")
                .with("full_name", "Frigate Mk II"),
        )
        .expect("update");
    assert_eq!(updated.get_str("code"), Some("FRG"));
    assert_eq!(updated.get("created_at"), created.get("created_at"));
    assert_eq!(updated.get_str("full_name"), Some("Frigate Mk II"));

    let err = store.get("ship_types", "HIJACK").expect_err("no hijack");
    assert!(matches!(err, RegistryError::EntryNotFound { .. }));
}

#[test]
fn update_with_only_protected_fields_has_nothing_to_do() {
    let store = store_with_table();
    store
        .create("ship_types", entry("FRG", "Frigate"))
        .expect("create");
    let err = store
        .update("ship_types", "FRG", Row::new().with("code", "X"))
        .expect_err("empty");
    assert!(matches!(err, RegistryError::NoFieldsProvided));
}

#[test]
fn update_missing_entry_is_not_found() {
    let store = store_with_table();
    let err = store
        .update("ship_types", "NOPE", Row::new().with("full_name", "x"))
        .expect_err("missing");
    assert!(matches!(err, RegistryError::EntryNotFound { .. }));
}

#[test]
fn update_rejects_empty_full_name() {
    let store = store_with_table();
    store
        .create("ship_types", entry("FRG", "Frigate"))
        .expect("create");
    let err = store
        .update("ship_types", "FRG", Row::new().with("full_name", ""))
        .expect_err("empty");
    assert!(matches!(err, RegistryError::MissingRequiredField { .. }));
}

#[test]
fn delete_is_idempotent() {
    let store = store_with_table();
    store
        .create("ship_types", entry("FRG", "Frigate"))
        .expect("create");
    store.delete("ship_types", "FRG").expect("delete");
    store.delete("ship_types", "DOES-NOT-EXIST").expect("no-op");
    assert!(store.list("ship_types").expect("list").is_empty());
}

#[test]
fn upsert_preserves_unlisted_columns_and_created_at() {
    let store = store_with_table();
    let created = store
        .create(
            "ship_types",
            entry("FRG", "Frigate").with("description", "Light escort"),
        )
        .expect("create");

    store
        .upsert("ship_types", entry("FRG", "Frigate Mk II"))
        .expect("upsert existing");
    store
        .upsert("ship_types", entry("DST", "Destroyer"))
        .expect("upsert new");

    let frigate = store.get("ship_types", "FRG").expect("get");
    assert_eq!(frigate.get_str("full_name"), Some("Frigate Mk II"));
    assert_eq!(frigate.get_str("description"), Some("Light escort"));
    assert_eq!(frigate.get("created_at"), created.get("created_at"));
    assert!(store.get("ship_types", "DST").is_ok());
}

#[test]
fn number_columns_round_trip() {
    let store = store_with_table();
    store
        .add_column("ship_types", "tonnage", ColumnType::Number)
        .expect("add");
    store
        .create(
            "ship_types",
            entry("FRG", "Frigate").with("tonnage", 1250.5_f64),
        )
        .expect("create");
    let row = store.get("ship_types", "FRG").expect("get");
    assert_eq!(row.get("tonnage"), Some(&Value::Real(1250.5)));
}

#[test]
fn row_operations_refuse_non_lookup_tables() {
    let store = store_with_table();
    let err = store.list("lookup_table_config").expect_err("bookkeeping");
    assert!(matches!(err, RegistryError::NotALookupTable { .. }));
    let err = store
        .create("ghost_types", entry("A", "a"))
        .expect_err("missing");
    assert!(matches!(err, RegistryError::TableNotFound { .. }));
}
