//! modelgen: Generate Rust model structs from the tables of a live MySQL database
//!
//! This crate provides both a CLI tool and a library. It connects to a MySQL
//! schema, reads table definitions from `information_schema`, and writes one
//! model file per table plus a `mod.rs`:
//!
//! - Structs with `#[derive(Debug, Clone, PartialEq)]`, and serde derives
//!   with the column name as serialized name when `with_json_tag` is on
//! - A Rust enum per MySQL `ENUM` column
//! - `Option<T>` for nullable columns
//!
//! # Configuration
//!
//! ```yaml
//! database:
//!   host: localhost
//!   port: 3306
//!   user: root
//!   password: password
//!   dbname: shop
//!   charset: utf8mb4
//! generate:
//!   output_dir: ./src/models
//!   package: models
//!   tables: []          # empty = every table
//!   table_prefix: t_
//!   with_json_tag: true
//! ```
//!
//! # Library Usage
//!
//! ```rust,ignore
//! use modelgen::config::GenConfig;
//!
//! let config = GenConfig::load(Some("config.yaml".as_ref()))?;
//! modelgen::generate(&config, None, false).await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! modelgen --config config.yaml generate --output ./src/models
//! modelgen -t t_user g --prefix t_
//! ```

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod error;
pub mod orchestrator;

use tracing::info;

pub use catalog::{Catalog, MySqlCatalog};
pub use codegen::{normalize, DryRunEmitter, Emitter, FileEmitter, FlushReport, ModelBatch};
pub use config::GenConfig;
pub use error::{GenError, Result};
pub use orchestrator::{list_tables, Orchestrator};

/// Main entry point for code generation.
///
/// Connects with the configured database settings, then generates either
/// the single `table` or every configured table. With `dry_run` nothing is
/// written and the report lists the files that would be.
pub async fn generate(
    config: &GenConfig,
    table: Option<&str>,
    dry_run: bool,
) -> Result<FlushReport> {
    info!("Connecting to {}", config.database.display_url());
    let catalog = MySqlCatalog::connect(&config.database).await?;

    if dry_run {
        run(config, table, catalog, DryRunEmitter::new()).await
    } else {
        run(config, table, catalog, FileEmitter::new()).await
    }
}

async fn run<C: Catalog, E: Emitter>(
    config: &GenConfig,
    table: Option<&str>,
    catalog: C,
    emitter: E,
) -> Result<FlushReport> {
    let mut orchestrator = Orchestrator::new(config, catalog, emitter);
    match table {
        Some(table) => orchestrator.generate_one(table).await,
        None => orchestrator.generate_all().await,
    }
}
