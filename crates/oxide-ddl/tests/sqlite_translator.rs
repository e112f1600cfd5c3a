//! Integration tests for SQLite translation.
//!
//! Each test drives a `Translator` over an `InMemorySchema` the way a
//! migration script would, checking both the exact DDL text and the schema
//! snapshot left behind.

use oxide_ddl::prelude::*;

fn translator() -> Translator<SqliteDialect> {
    Translator::new(SqliteDialect::new())
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn users_with_timestamps() -> Table {
    Table::new("users")
        .column(Column::new("id", "integer").primary())
        .timestamps()
}

// =============================================================================
// CREATE TABLE
// =============================================================================

#[test]
fn create_table_renders_every_type() {
    let mut schema = InMemorySchema::new();
    let table = Table::new("users")
        .column(Column::new("id", "integer").primary())
        .column(Column::new("first_name", "string"))
        .column(Column::new("last_name", "string"))
        .column(Column::new("email", "string").size(20))
        .column(Column::new("permissions", "text").null())
        .column(Column::new("age", "integer").null().default(40_i64))
        .column(Column::new("raw", "blob"))
        .column(Column::new("into", "int"))
        .column(Column::new("flotante", "float"))
        .column(Column::new("json", "json"))
        .column(Column::new("bytes", "[]byte"))
        .timestamps();

    let ddl = translator()
        .translate_all(&mut schema, &[Operation::create_table(table)])
        .unwrap();

    assert_eq!(
        ddl,
        r#"CREATE TABLE "users" (
"id" INTEGER PRIMARY KEY AUTOINCREMENT,
"first_name" TEXT NOT NULL,
"last_name" TEXT NOT NULL,
"email" TEXT NOT NULL,
"permissions" TEXT,
"age" INTEGER DEFAULT '40',
"raw" BLOB NOT NULL,
"into" INTEGER NOT NULL,
"flotante" REAL NOT NULL,
"json" TEXT NOT NULL,
"bytes" BLOB NOT NULL,
"created_at" DATETIME NOT NULL,
"updated_at" DATETIME NOT NULL
);"#
    );
}

#[test]
fn create_table_with_uuid_columns() {
    let mut schema = InMemorySchema::new();
    let table = Table::new("users")
        .column(Column::new("first_name", "string"))
        .column(Column::new("permissions", "text").null())
        .column(Column::new("company_id", "uuid").default_raw("lower(hex(randomblob(16)))"))
        .column(Column::new("uuid", "uuid").primary())
        .timestamps();

    let ddl = translator()
        .translate_all(&mut schema, &[Operation::create_table(table)])
        .unwrap();

    assert_eq!(
        ddl,
        r#"CREATE TABLE "users" (
"first_name" TEXT NOT NULL,
"permissions" TEXT,
"company_id" char(36) NOT NULL DEFAULT lower(hex(randomblob(16))),
"uuid" TEXT PRIMARY KEY,
"created_at" DATETIME NOT NULL,
"updated_at" DATETIME NOT NULL
);"#
    );
}

#[test]
fn create_table_minimal_users_scenario() {
    let mut schema = InMemorySchema::new();
    let table = Table::new("users")
        .column(Column::new("id", "integer").primary())
        .column(Column::new("first_name", "string"));

    let statements = translator()
        .translate(&mut schema, &Operation::create_table(table))
        .unwrap();

    assert_eq!(statements.len(), 1);
    assert!(statements[0].starts_with("CREATE TABLE \"users\" ("));
    assert!(statements[0].contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
    assert!(statements[0].contains("\"first_name\" TEXT NOT NULL"));

    let users = schema.table_info("users").unwrap();
    assert_eq!(users.column_names(), cols(&["id", "first_name"]));
    assert!(users.indexes.is_empty());
}

// =============================================================================
// Recreation sequences
// =============================================================================

#[test]
fn drop_column_recreates_table() {
    let mut schema = InMemorySchema::new().with_table(users_with_timestamps());

    let statements = translator()
        .translate(&mut schema, &Operation::drop_column("users", "created_at"))
        .unwrap();

    assert_eq!(statements.len(), 4);
    assert_eq!(
        statements.join("\n"),
        r#"ALTER TABLE "users" RENAME TO "_users_tmp";
CREATE TABLE "users" (
"id" INTEGER PRIMARY KEY AUTOINCREMENT,
"updated_at" DATETIME NOT NULL
);
INSERT INTO "users" (id, updated_at) SELECT id, updated_at FROM "_users_tmp";
DROP TABLE "_users_tmp";"#
    );
    assert_eq!(
        schema.table_info("users").unwrap().column_names(),
        cols(&["id", "updated_at"])
    );
}

#[test]
fn rename_column_maps_old_names_by_position() {
    let mut schema = InMemorySchema::new().with_table(users_with_timestamps());

    let ddl = translator()
        .translate_all(
            &mut schema,
            &[Operation::rename_column("users", "created_at", "created_when")],
        )
        .unwrap();

    assert_eq!(
        ddl,
        r#"ALTER TABLE "users" RENAME TO "_users_tmp";
CREATE TABLE "users" (
"id" INTEGER PRIMARY KEY AUTOINCREMENT,
"created_when" DATETIME NOT NULL,
"updated_at" DATETIME NOT NULL
);
INSERT INTO "users" (id, created_when, updated_at) SELECT id, created_at, updated_at FROM "_users_tmp";
DROP TABLE "_users_tmp";"#
    );
}

#[test]
fn change_column_replaces_type_and_options() {
    let mut schema = InMemorySchema::new().with_table(users_with_timestamps());

    let ddl = translator()
        .translate_all(
            &mut schema,
            &[Operation::change_column(
                "users",
                Column::new("created_at", "string").default("foo").size(50),
            )],
        )
        .unwrap();

    assert_eq!(
        ddl,
        r#"ALTER TABLE "users" RENAME TO "_users_tmp";
CREATE TABLE "users" (
"id" INTEGER PRIMARY KEY AUTOINCREMENT,
"created_at" TEXT NOT NULL DEFAULT 'foo',
"updated_at" DATETIME NOT NULL
);
INSERT INTO "users" (id, created_at, updated_at) SELECT id, created_at, updated_at FROM "_users_tmp";
DROP TABLE "_users_tmp";"#
    );
}

#[test]
fn change_unknown_column_fails_without_statements() {
    let mut schema = InMemorySchema::new().with_table(users_with_timestamps());

    let err = translator()
        .translate(
            &mut schema,
            &Operation::change_column("users", Column::new("deleted_at", "datetime")),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        TranslateError::NotFound {
            kind: EntityKind::Column,
            ..
        }
    ));
    assert_eq!(schema.table_info("users").unwrap(), users_with_timestamps());
}

// =============================================================================
// Foreign keys survive recreation
// =============================================================================

#[test]
fn foreign_keys_survive_drop_column() {
    let translator = Translator::new(SqliteDialect::new().with_uuid_default(None));
    let mut schema = InMemorySchema::new();

    let users = Table::new("users")
        .column(Column::new("uuid", "uuid").primary())
        .timestamps();
    let notes = Table::new("user_notes")
        .column(Column::new("uuid", "uuid").primary())
        .column(Column::new("user_id", "uuid"))
        .column(Column::new("notes", "string"))
        .timestamps()
        .foreign_key(ForeignKey::new("user_id", "users", "uuid").on_delete("cascade"));

    let ddl = translator
        .translate_all(
            &mut schema,
            &[Operation::create_table(users), Operation::create_table(notes)],
        )
        .unwrap();
    assert_eq!(
        ddl,
        r#"CREATE TABLE "users" (
"uuid" TEXT PRIMARY KEY,
"created_at" DATETIME NOT NULL,
"updated_at" DATETIME NOT NULL
);
CREATE TABLE "user_notes" (
"uuid" TEXT PRIMARY KEY,
"user_id" char(36) NOT NULL,
"notes" TEXT NOT NULL,
"created_at" DATETIME NOT NULL,
"updated_at" DATETIME NOT NULL,
FOREIGN KEY (user_id) REFERENCES users (uuid) ON DELETE cascade
);"#
    );

    let ddl = translator
        .translate_all(&mut schema, &[Operation::drop_column("user_notes", "notes")])
        .unwrap();
    assert_eq!(
        ddl,
        r#"ALTER TABLE "user_notes" RENAME TO "_user_notes_tmp";
CREATE TABLE "user_notes" (
"uuid" TEXT PRIMARY KEY,
"user_id" char(36) NOT NULL,
"created_at" DATETIME NOT NULL,
"updated_at" DATETIME NOT NULL,
FOREIGN KEY (user_id) REFERENCES users (uuid) ON DELETE cascade
);
INSERT INTO "user_notes" (uuid, user_id, created_at, updated_at) SELECT uuid, user_id, created_at, updated_at FROM "_user_notes_tmp";
DROP TABLE "_user_notes_tmp";"#
    );

    let ddl = translator
        .translate_all(&mut schema, &[Operation::rename_table("users", "user_accounts")])
        .unwrap();
    assert_eq!(ddl, r#"ALTER TABLE "users" RENAME TO "user_accounts";"#);

    let ddl = translator
        .translate_all(
            &mut schema,
            &[Operation::add_column("user_notes", Column::new("notes", "string"))],
        )
        .unwrap();
    assert_eq!(
        ddl,
        r#"ALTER TABLE "user_notes" ADD COLUMN "notes" TEXT NOT NULL;"#
    );

    let notes = schema.table_info("user_notes").unwrap();
    assert_eq!(
        notes.column_names(),
        cols(&["uuid", "user_id", "created_at", "updated_at", "notes"])
    );
    assert_eq!(notes.foreign_keys.len(), 1);
    assert!(schema.table_info("users").is_err());
    assert!(schema.table_info("user_accounts").is_ok());
}

#[test]
fn uuid_columns_get_implied_default() {
    let mut schema = InMemorySchema::new().with_table(Table::new("user_notes"));

    let ddl = translator()
        .translate_all(
            &mut schema,
            &[Operation::add_column("user_notes", Column::new("user_id", "uuid"))],
        )
        .unwrap();

    assert_eq!(
        ddl,
        r#"ALTER TABLE "user_notes" ADD COLUMN "user_id" char(36) NOT NULL DEFAULT lower(hex(randomblob(16)));"#
    );
}

// =============================================================================
// Indexes
// =============================================================================

#[test]
fn index_lifecycle() {
    let mut schema = InMemorySchema::new().with_table(
        Table::new("table_name").column(Column::new("column_name", "string")),
    );
    let t = translator();

    let ddl = t
        .translate_all(
            &mut schema,
            &[
                Operation::add_index("table_name", cols(&["column_name"]), false),
                Operation::add_index("table_name", cols(&["col1", "col2", "col3"]), true),
                Operation::add_named_index(
                    "custom_name",
                    "table_name",
                    cols(&["column_name"]),
                    false,
                ),
                Operation::rename_index("table_name", "custom_name", "renamed_name"),
                Operation::drop_index("table_name", "table_name_column_name_idx"),
            ],
        )
        .unwrap();

    assert_eq!(
        ddl,
        r#"CREATE INDEX "table_name_column_name_idx" ON "table_name" (column_name);
CREATE UNIQUE INDEX "table_name_col1_col2_col3_idx" ON "table_name" (col1, col2, col3);
CREATE INDEX "custom_name" ON "table_name" (column_name);
DROP INDEX IF EXISTS "custom_name";
CREATE INDEX "renamed_name" ON "table_name" (column_name);
DROP INDEX IF EXISTS "table_name_column_name_idx";"#
    );

    let names: Vec<String> = schema
        .table_info("table_name")
        .unwrap()
        .indexes
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(
        names,
        cols(&["table_name_col1_col2_col3_idx", "renamed_name"])
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn rename_table_requires_two_names() {
    let mut schema = InMemorySchema::new();

    let err = translator()
        .translate(&mut schema, &Operation::RenameTable { names: vec![] })
        .unwrap_err();
    assert!(matches!(
        err,
        TranslateError::Arity {
            expected: 2,
            actual: 0,
            ..
        }
    ));

    let err = translator()
        .translate(
            &mut schema,
            &Operation::RenameTable {
                names: cols(&["users", "people", "persons"]),
            },
        )
        .unwrap_err();
    assert!(matches!(err, TranslateError::Arity { actual: 3, .. }));
}

#[test]
fn unsupported_type_emits_nothing() {
    let mut schema = InMemorySchema::new().with_table(users_with_timestamps());

    let err = translator()
        .translate_all(
            &mut schema,
            &[Operation::add_column("users", Column::new("shape", "geometry"))],
        )
        .unwrap_err();

    assert!(matches!(err, TranslateError::UnsupportedType(ref t) if t == "geometry"));
    assert!(schema.column_info("users", "shape").is_err());
}

#[test]
fn script_from_json_translates() {
    let operations: Vec<Operation> = serde_json::from_str(
        r#"[
            {"op": "create_table", "table": {"name": "user_profiles", "columns": [
                {"name": "user_id", "type": "INT"},
                {"name": "profile_id", "type": "INT"}
            ], "primary_key": ["user_id", "profile_id"]}},
            {"op": "add_column", "table": "user_profiles",
             "column": {"name": "bio", "type": "text", "options": {"null": true}}}
        ]"#,
    )
    .unwrap();

    let mut schema = InMemorySchema::new();
    let ddl = translator().translate_all(&mut schema, &operations).unwrap();

    assert_eq!(
        ddl,
        r#"CREATE TABLE "user_profiles" (
"user_id" INTEGER NOT NULL,
"profile_id" INTEGER NOT NULL,
PRIMARY KEY("user_id", "profile_id")
);
ALTER TABLE "user_profiles" ADD COLUMN "bio" TEXT;"#
    );
}
