//! MySQL catalog over a single connection

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder};
use tracing::debug;

use super::metadata::{ColumnMetadata, IndexMetadata, PrimaryKey, TableMetadata};
use super::Catalog;
use crate::config::DatabaseConfig;
use crate::error::{GenError, Result};

const LIST_TABLES_SQL: &str = "SHOW TABLES";

const COUNT_TABLE_SQL: &str = "SELECT COUNT(*) FROM information_schema.tables \
     WHERE table_schema = DATABASE() AND table_name = ?";

const TABLE_COMMENT_SQL: &str = "SELECT TABLE_COMMENT, TABLE_TYPE FROM information_schema.tables \
     WHERE table_schema = DATABASE() AND table_name = ?";

const COLUMNS_SQL: &str = "SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_DEFAULT, EXTRA, COLUMN_COMMENT \
     FROM information_schema.columns \
     WHERE table_schema = DATABASE() AND table_name = ? \
     ORDER BY ORDINAL_POSITION";

const INDEXES_SQL: &str = "SELECT INDEX_NAME, COLUMN_NAME, NON_UNIQUE \
     FROM information_schema.statistics \
     WHERE table_schema = DATABASE() AND table_name = ? \
     ORDER BY INDEX_NAME, SEQ_IN_INDEX";

type ColumnRow = (
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
);

/// A MySQL catalog.
///
/// Wraps one `mysql_async::Conn`, opened by [`MySqlCatalog::connect`] and
/// reused for every query of the run.
///
/// # Example
///
/// ```ignore
/// use modelgen::catalog::{Catalog, MySqlCatalog};
///
/// let mut catalog = MySqlCatalog::connect(&config.database).await?;
/// let tables = catalog.list_tables().await?;
/// ```
pub struct MySqlCatalog {
    conn: Conn,
}

impl MySqlCatalog {
    /// Open the connection described by the database settings.
    ///
    /// The configured charset is applied with `SET NAMES` on connect.
    pub async fn connect(db: &DatabaseConfig) -> Result<Self> {
        let opts = OptsBuilder::default()
            .ip_or_hostname(db.host.clone())
            .tcp_port(db.port)
            .user(Some(db.user.clone()))
            .pass((!db.password.is_empty()).then(|| db.password.clone()))
            .db_name(Some(db.db_name.clone()))
            .init(vec![db.init_statement()]);

        debug!("Connecting to {}", db.display_url());
        let conn = Conn::new(opts)
            .await
            .map_err(|e| GenError::Connection(format!("{}: {}", db.display_url(), e)))?;

        Ok(Self { conn })
    }

    /// Wrap an already open connection.
    pub fn from_conn(conn: Conn) -> Self {
        Self { conn }
    }

    /// Close the connection.
    pub async fn disconnect(self) -> Result<()> {
        self.conn.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for MySqlCatalog {
    async fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = self.conn.query(LIST_TABLES_SQL).await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn count_tables_named(&mut self, table: &str) -> Result<u64> {
        let row: Option<(u64,)> = self.conn.exec_first(COUNT_TABLE_SQL, (table,)).await?;
        Ok(row.map(|(count,)| count).unwrap_or(0))
    }

    async fn describe_table(&mut self, table: &str) -> Result<TableMetadata> {
        let column_rows: Vec<ColumnRow> = self.conn.exec(COLUMNS_SQL, (table,)).await?;
        if column_rows.is_empty() {
            return Err(GenError::TableNotFound(table.to_string()));
        }

        let columns = column_rows
            .into_iter()
            .map(|(name, column_type, is_nullable, default, extra, comment)| {
                ColumnMetadata::from_catalog(
                    name,
                    column_type,
                    &is_nullable,
                    default,
                    &extra,
                    comment.unwrap_or_default(),
                )
            })
            .collect();

        let comment: Option<(Option<String>, String)> =
            self.conn.exec_first(TABLE_COMMENT_SQL, (table,)).await?;
        let comment =
            comment.and_then(|(comment, table_type)| table_comment(comment, &table_type));

        let index_rows: Vec<(String, Option<String>, i64)> =
            self.conn.exec(INDEXES_SQL, (table,)).await?;
        let (primary_key, indexes) = group_indexes(index_rows);

        debug!(
            "Described table {}: {} indexes, primary key {:?}",
            table,
            indexes.len(),
            primary_key.as_ref().map(|pk| &pk.columns)
        );

        Ok(TableMetadata {
            name: table.to_string(),
            comment,
            columns,
            indexes,
            primary_key,
        })
    }
}

/// Comment to document a table with. Views carry the placeholder `VIEW`
/// as their comment, which is dropped.
fn table_comment(comment: Option<String>, table_type: &str) -> Option<String> {
    if table_type.eq_ignore_ascii_case("VIEW") {
        return None;
    }
    comment.filter(|c| !c.is_empty())
}

/// Fold `information_schema.statistics` rows (ordered by index name, then
/// position) into the primary key and the remaining indexes.
///
/// Rows without a column name (functional index parts) are skipped.
fn group_indexes(
    rows: Vec<(String, Option<String>, i64)>,
) -> (Option<PrimaryKey>, Vec<IndexMetadata>) {
    let mut primary_key = None;
    let mut indexes: Vec<IndexMetadata> = Vec::new();

    for (index_name, column, non_unique) in rows {
        let Some(column) = column else {
            continue;
        };

        if index_name == "PRIMARY" {
            primary_key
                .get_or_insert_with(|| PrimaryKey { columns: vec![] })
                .columns
                .push(column);
            continue;
        }

        match indexes.last_mut() {
            Some(last) if last.name == index_name => last.columns.push(column),
            _ => indexes.push(IndexMetadata {
                name: index_name,
                columns: vec![column],
                unique: non_unique == 0,
            }),
        }
    }

    (primary_key, indexes)
}
