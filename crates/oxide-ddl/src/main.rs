//! oxide-ddl CLI
//!
//! Translates a JSON migration script into DDL for SQLite and prints it.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;
use oxide_ddl::script;

/// Translate abstract schema operations into SQLite DDL.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding the list of operations.
    #[arg(short, long)]
    operations: PathBuf,

    /// JSON schema snapshot to start from (empty if not specified).
    #[arg(short, long, env = "OXIDE_DDL_SCHEMA")]
    schema: Option<PathBuf>,

    /// Write the resulting schema snapshot to this file.
    #[arg(short, long)]
    write_schema: Option<PathBuf>,

    /// Default expression for non-primary uuid columns.
    #[arg(long, env = "OXIDE_DDL_UUID_DEFAULT", default_value = SQLITE_UUID_DEFAULT)]
    uuid_default: String,

    /// Render non-primary uuid columns without a default. Overrides
    /// `--uuid-default` and its environment variable.
    #[arg(long)]
    no_uuid_default: bool,

    /// Rewrite index and foreign key references during table recreation.
    #[arg(long, env = "OXIDE_DDL_REWRITE_DEPENDENTS")]
    rewrite_dependents: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn implied_uuid_default(&self) -> Option<String> {
        if self.no_uuid_default {
            None
        } else {
            Some(self.uuid_default.clone())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only DDL
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut schema = match &cli.schema {
        Some(path) => script::load_snapshot(path)?,
        None => InMemorySchema::new(),
    };
    let operations = script::load_operations(&cli.operations)?;

    let dialect = SqliteDialect::new().with_uuid_default(cli.implied_uuid_default());
    let config = TranslatorConfig {
        rewrite_dependents: cli.rewrite_dependents,
    };
    let translator = Translator::with_config(dialect, config);

    let ddl = translator.translate_all(&mut schema, &operations)?;
    println!("{}", ddl);
    info!("Translated {} operations.", operations.len());

    if let Some(path) = &cli.write_schema {
        script::save_snapshot(path, &schema)?;
        info!("Wrote schema snapshot to {}", path.display());
    }

    Ok(())
}
