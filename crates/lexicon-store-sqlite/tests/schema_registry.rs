//! Schema registry integration tests for `SqliteLexiconStore`.

use lexicon_registry::{RegistryError, RowStore, SchemaRegistry, TableQuery};
use lexicon_store_sqlite::SqliteLexiconStore;
use lexicon_types::{ColumnType, ConfigUpdate, Row, Template};

fn store() -> SqliteLexiconStore {
    SqliteLexiconStore::open_in_memory().expect("open")
}

fn column_names(store: &SqliteLexiconStore, table: &str) -> Vec<String> {
    store
        .schema(table)
        .expect("schema")
        .columns
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn templates_produce_their_columns() {
    let store = store();
    let cases: [(&str, Template, &[&str]); 4] = [
        (
            "basic_types",
            Template::Basic,
            &["code", "full_name", "description", "created_at"],
        ),
        (
            "category_types",
            Template::WithCategory,
            &["code", "full_name", "category", "description", "created_at"],
        ),
        (
            "ordered_types",
            Template::WithSortOrder,
            &["code", "full_name", "description", "sort_order", "created_at"],
        ),
        (
            "faction_codes",
            Template::WithUniverse,
            &[
                "code",
                "full_name",
                "universe",
                "description",
                "founded_year",
                "created_at",
            ],
        ),
    ];
    for (name, template, expected) in cases {
        store.create_table(name, template, false).expect("create");
        assert_eq!(column_names(&store, name), expected, "template {template}");
    }

    let storage = |table: &str, column: &str| {
        store
            .schema(table)
            .expect("schema")
            .columns
            .into_iter()
            .find(|c| c.name == column)
            .map(|c| c.storage_type)
            .expect("column")
    };
    assert_eq!(storage("category_types", "category"), "VARCHAR(50)");
    assert_eq!(storage("ordered_types", "sort_order"), "INTEGER");
    assert_eq!(storage("faction_codes", "code"), "VARCHAR(3)");
    assert_eq!(storage("faction_codes", "universe"), "VARCHAR(100)");
}

#[test]
fn code_column_is_primary_key() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let schema = store.schema("ship_types").expect("schema");
    let code = &schema.columns[0];
    assert_eq!(code.name, "code");
    assert!(code.primary_key);
    assert!(!code.nullable);
    assert_eq!(code.storage_type, "VARCHAR(20)");
}

#[test]
fn create_requires_lookup_suffix() {
    let store = store();
    store
        .create_table("widget_types", Template::Basic, false)
        .expect("create");

    let err = store
        .create_table("widgets", Template::Basic, false)
        .expect_err("no suffix");
    assert!(matches!(err, RegistryError::InvalidTableName { .. }));

    let err = store
        .create_table("lookup_table_config", Template::Basic, false)
        .expect_err("bookkeeping");
    assert!(matches!(err, RegistryError::InvalidTableName { .. }));

    let err = store
        .create_table("bad-name_types", Template::Basic, false)
        .expect_err("charset");
    assert!(matches!(err, RegistryError::InvalidTableName { .. }));
}

#[test]
fn create_twice_is_already_exists() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .create_table("ship_types", Template::WithCategory, true)
        .expect_err("dup");
    assert!(matches!(err, RegistryError::AlreadyExists { .. }));
}

#[test]
fn create_case_variant_is_already_exists() {
    let store = store();
    store
        .create_table("Ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .create_table("ship_types", Template::Basic, false)
        .expect_err("case variant");
    assert!(matches!(err, RegistryError::AlreadyExists { .. }));
}

#[test]
fn case_variant_name_reaches_the_stored_table() {
    let store = store();
    store
        .create_table("Ship_types", Template::Basic, true)
        .expect("create");
    store
        .update_config(
            "ship_types",
            ConfigUpdate {
                is_multi_select: None,
                use_for_image_processing: Some(true),
            },
        )
        .expect("config");
    let schema = store.schema("Ship_types").expect("schema");
    assert!(schema.is_multi_select);
    assert!(schema.use_for_image_processing);
}

#[test]
fn create_records_multi_select() {
    let store = store();
    store
        .create_table("tag_codes", Template::Basic, true)
        .expect("create");
    let schema = store.schema("tag_codes").expect("schema");
    assert!(schema.is_multi_select);
    assert!(!schema.use_for_image_processing);
    assert!(schema.artifact_types.is_empty());
}

#[test]
fn protected_columns_cannot_be_dropped() {
    let store = store();
    for (name, template) in [
        ("a_types", Template::Basic),
        ("b_types", Template::WithCategory),
        ("c_types", Template::WithSortOrder),
        ("d_types", Template::WithUniverse),
    ] {
        store.create_table(name, template, false).expect("create");
        for column in ["code", "full_name", "created_at"] {
            let err = store.drop_column(name, column).expect_err("protected");
            assert!(
                matches!(err, RegistryError::ProtectedColumn { .. }),
                "{name}.{column}"
            );
        }
    }
}

#[test]
fn add_and_drop_column() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    store
        .add_column("ship_types", "tonnage", ColumnType::Number)
        .expect("add");
    let schema = store.schema("ship_types").expect("schema");
    let tonnage = schema
        .columns
        .iter()
        .find(|c| c.name == "tonnage")
        .expect("tonnage");
    assert_eq!(tonnage.storage_type, "REAL");
    assert!(tonnage.nullable);

    store.drop_column("ship_types", "tonnage").expect("drop");
    assert!(!column_names(&store, "ship_types").contains(&"tonnage".to_string()));
}

#[test]
fn add_existing_column_is_storage_error() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .add_column("ship_types", "description", ColumnType::Text1000)
        .expect_err("dup column");
    assert!(matches!(err, RegistryError::Storage { .. }));
}

#[test]
fn add_column_rejects_hostile_name() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .add_column("ship_types", "x\"; DROP TABLE ship_types; --", ColumnType::Text20)
        .expect_err("hostile");
    assert!(matches!(err, RegistryError::InvalidColumnName { .. }));
}

#[test]
fn drop_missing_column_is_not_found() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .drop_column("ship_types", "nope")
        .expect_err("missing");
    assert!(matches!(err, RegistryError::ColumnNotFound { .. }));
}

#[test]
fn operations_on_non_lookup_names_are_refused() {
    let store = store();
    let err = store.schema("sqlite_master").expect_err("not lookup");
    assert!(matches!(err, RegistryError::NotALookupTable { .. }));
    let err = store.schema("lookup_table_config").expect_err("bookkeeping");
    assert!(matches!(err, RegistryError::NotALookupTable { .. }));
    let err = store.schema("ghost_types").expect_err("missing");
    assert!(matches!(err, RegistryError::TableNotFound { .. }));
}

#[test]
fn config_update_does_not_clobber_other_flag() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, true)
        .expect("create");

    let config = store
        .update_config(
            "ship_types",
            ConfigUpdate {
                is_multi_select: None,
                use_for_image_processing: Some(true),
            },
        )
        .expect("update");
    assert!(config.is_multi_select);
    assert!(config.use_for_image_processing);

    let config = store
        .update_config(
            "ship_types",
            ConfigUpdate {
                is_multi_select: Some(false),
                use_for_image_processing: None,
            },
        )
        .expect("update");
    assert!(!config.is_multi_select);
    assert!(config.use_for_image_processing);
}

#[test]
fn empty_config_update_is_rejected() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .update_config("ship_types", ConfigUpdate::default())
        .expect_err("empty");
    assert!(matches!(err, RegistryError::NoFieldsProvided));
}

#[test]
fn artifact_types_replace_all() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");

    let codes = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    store
        .update_artifact_types("ship_types", &codes(&["SHIP", "FLEET"]))
        .expect("set");
    assert_eq!(
        store.schema("ship_types").expect("schema").artifact_types,
        vec!["FLEET", "SHIP"]
    );

    store
        .update_artifact_types("ship_types", &codes(&["STATION", "STATION", ""]))
        .expect("replace");
    assert_eq!(
        store.schema("ship_types").expect("schema").artifact_types,
        vec!["STATION"]
    );

    store
        .update_artifact_types("ship_types", &[])
        .expect("clear");
    assert!(store
        .schema("ship_types")
        .expect("schema")
        .artifact_types
        .is_empty());
}

#[test]
fn list_tables_filters_by_artifact_type() {
    let store = store();
    for name in ["ship_types", "Armor_codes", "crew_roles"] {
        store
            .create_table(name, Template::Basic, false)
            .expect("create");
    }
    store
        .update_artifact_types("crew_roles", &["SHIP".to_string()])
        .expect("assoc");
    store
        .update_artifact_types("ship_types", &["SHIP".to_string(), "FLEET".to_string()])
        .expect("assoc");

    let all = store.list_tables(&TableQuery::all()).expect("list");
    assert_eq!(all, vec!["Armor_codes", "crew_roles", "ship_types"]);

    let ship = store
        .list_tables(&TableQuery::all().for_artifact_type("SHIP"))
        .expect("list");
    assert_eq!(ship, vec!["crew_roles", "ship_types"]);

    let none = store
        .list_tables(&TableQuery::all().for_artifact_type("PLANET"))
        .expect("list");
    assert!(none.is_empty());
}

#[test]
fn display_names_merge_into_schema() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    store
        .set_display_name("ship_types", "full_name", "Ship Class")
        .expect("set");

    let schema = store.schema("ship_types").expect("schema");
    let by_name = |n: &str| {
        schema
            .columns
            .iter()
            .find(|c| c.name == n)
            .map(|c| c.display_name.clone())
            .expect("column")
    };
    assert_eq!(by_name("full_name"), "Ship Class");
    assert_eq!(by_name("code"), "code");

    store
        .set_display_name("ship_types", "full_name", "")
        .expect("reset");
    let schema = store.schema("ship_types").expect("schema");
    assert_eq!(schema.columns[1].display_name, "full_name");
}

#[test]
fn display_name_requires_existing_column() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    let err = store
        .set_display_name("ship_types", "ghost", "Ghost")
        .expect_err("missing");
    assert!(matches!(err, RegistryError::ColumnNotFound { .. }));
}

#[test]
fn delete_table_removes_bookkeeping() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, true)
        .expect("create");
    store
        .update_artifact_types("ship_types", &["SHIP".to_string()])
        .expect("assoc");
    store
        .set_display_name("ship_types", "full_name", "Class")
        .expect("display");

    store.delete_table("ship_types").expect("delete");
    assert!(store.list_tables(&TableQuery::all()).expect("list").is_empty());
    let err = store.schema("ship_types").expect_err("gone");
    assert!(matches!(err, RegistryError::TableNotFound { .. }));

    // Recreating starts from a clean slate.
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("recreate");
    let schema = store.schema("ship_types").expect("schema");
    assert!(schema.artifact_types.is_empty());
    assert!(!schema.is_multi_select);
    assert_eq!(schema.columns[1].display_name, "full_name");
}

#[test]
fn clear_table_keeps_schema() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    for code in ["A", "B", "C"] {
        store
            .create(
                "ship_types",
                Row::new().with("code", code).with("full_name", code),
            )
            .expect("row");
    }
    assert_eq!(store.clear_table("ship_types").expect("clear"), 3);
    assert!(store.list("ship_types").expect("list").is_empty());
    assert_eq!(column_names(&store, "ship_types").len(), 4);
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().expect("tmp");
    let path = dir.path().join("lexicon.db");
    {
        let store = SqliteLexiconStore::open(&path).expect("open");
        store
            .create_table("ship_types", Template::WithCategory, true)
            .expect("create");
        store
            .create(
                "ship_types",
                Row::new().with("code", "FRG").with("full_name", "Frigate"),
            )
            .expect("row");
    }
    let store = SqliteLexiconStore::open(&path).expect("reopen");
    let schema = store.schema("ship_types").expect("schema");
    assert!(schema.is_multi_select);
    assert_eq!(store.list("ship_types").expect("list").len(), 1);
}

#[test]
fn sequential_config_updates_accumulate() {
    let store = store();
    store
        .create_table("ship_types", Template::Basic, false)
        .expect("create");
    store
        .update_config(
            "ship_types",
            ConfigUpdate {
                is_multi_select: Some(true),
                use_for_image_processing: None,
            },
        )
        .expect("first");
    store
        .update_config(
            "ship_types",
            ConfigUpdate {
                is_multi_select: None,
                use_for_image_processing: Some(true),
            },
        )
        .expect("second");
    let schema = store.schema("ship_types").expect("schema");
    assert!(schema.is_multi_select);
    assert!(schema.use_for_image_processing);
}
