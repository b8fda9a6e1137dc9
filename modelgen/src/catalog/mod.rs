//! Database catalog access
//!
//! The [`Catalog`] trait is the only way the rest of the crate reads
//! schema information. [`MySqlCatalog`] implements it over a single
//! `mysql_async` connection held for the whole run.

mod metadata;
mod mysql;

pub use metadata::*;
pub use mysql::MySqlCatalog;

use async_trait::async_trait;

use crate::error::Result;

/// Read access to the tables of the active schema.
///
/// Methods take `&mut self`: a run issues its catalog queries one after
/// another over one connection.
#[async_trait]
pub trait Catalog: Send {
    /// All table names in the active schema, in the order the catalog
    /// reports them.
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Number of tables in the active schema named exactly `table`.
    async fn count_tables_named(&mut self, table: &str) -> Result<u64>;

    /// Columns, keys and comments of one table.
    async fn describe_table(&mut self, table: &str) -> Result<TableMetadata>;

    /// Whether `table` exists in the active schema.
    async fn table_exists(&mut self, table: &str) -> Result<bool> {
        Ok(self.count_tables_named(table).await? > 0)
    }
}
