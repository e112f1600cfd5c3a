//! Example: Blog Application Migrations
//!
//! Translates the schema history of a small blog (users, posts, comments)
//! into SQLite DDL, including changes SQLite can only make by rebuilding
//! the table.
//!
//! Run with: cargo run --example blog_migrations -p oxide-ddl

use oxide_ddl::prelude::*;

// =============================================================================
// Migration Definitions
// =============================================================================

/// Initial migration: users and posts.
fn create_users_and_posts() -> Vec<Operation> {
    vec![
        Operation::create_table(
            Table::new("users")
                .column(Column::new("id", "integer").primary())
                .column(Column::new("username", "string").size(100))
                .column(Column::new("email", "string").size(255))
                .column(Column::new("is_active", "boolean").default(true))
                .timestamps()
                .index(
                    Index::new("users_username_idx", vec!["username".to_string()]).unique(),
                ),
        ),
        Operation::create_table(
            Table::new("posts")
                .column(Column::new("id", "integer").primary())
                .column(Column::new("author_id", "integer"))
                .column(Column::new("title", "string").size(200))
                .column(Column::new("content", "text"))
                .column(Column::new("published_at", "timestamp").null())
                .timestamps()
                .foreign_key(ForeignKey::new("author_id", "users", "id").on_delete("cascade")),
        ),
        Operation::add_index("posts", vec!["author_id".to_string()], false),
    ]
}

/// Second migration: comments keyed by uuid.
fn create_comments() -> Vec<Operation> {
    vec![
        Operation::create_table(
            Table::new("comments")
                .column(Column::new("uuid", "uuid").primary())
                .column(Column::new("post_id", "integer"))
                .column(Column::new("body", "text"))
                .column(Column::new("is_approved", "boolean").default(false))
                .timestamps(),
        ),
        Operation::add_foreign_key(
            "comments",
            ForeignKey::new("post_id", "posts", "id")
                .named("comments_post_fk")
                .on_delete("cascade"),
        ),
    ]
}

/// Third migration: reshape posts.
fn reshape_posts() -> Vec<Operation> {
    vec![
        Operation::rename_column("posts", "content", "body"),
        Operation::change_column("posts", Column::new("title", "string").null()),
        Operation::drop_column("posts", "published_at"),
        Operation::rename_index("posts", "posts_author_id_idx", "idx_posts_author"),
    ]
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    println!("{}", "=".repeat(70));
    println!(" oxide-ddl: Blog Migrations Example");
    println!("{}", "=".repeat(70));
    println!();

    let translator = Translator::new(SqliteDialect::new());
    let mut schema = InMemorySchema::new();

    let migrations = [
        ("0001_create_users_and_posts", create_users_and_posts()),
        ("0002_create_comments", create_comments()),
        ("0003_reshape_posts", reshape_posts()),
    ];

    for (name, operations) in &migrations {
        println!("-- Migration: {}", name);
        for operation in operations {
            println!("-- {}", operation.description());
            for sql in translator.translate(&mut schema, operation)? {
                println!("{}", sql);
            }
        }
        println!();
    }

    println!("{}", "-".repeat(70));
    println!("Final schema:");
    for name in schema.table_names() {
        let table = schema.table_info(name)?;
        println!(
            "    {} ({}), {} indexes, {} foreign keys",
            table.name,
            table.column_names().join(", "),
            table.indexes.len(),
            table.foreign_keys.len()
        );
    }

    // Unknown column types stop translation without touching the snapshot
    let bad = Operation::add_column("posts", Column::new("location", "geometry"));
    if let Err(e) = translator.translate(&mut schema, &bad) {
        println!();
        println!("Rejected '{}': {}", bad.description(), e);
    }

    Ok(())
}
