//! Integration tests for modelgen with a MySQL testcontainer
//!
//! These tests run the full pipeline against a real MySQL server:
//! catalog introspection, table enumeration, and model file generation.
//!
//! Each container test starts its own MySQL, so those need a Docker daemon and are
//! ignored by default. Run them with `cargo test -p modelgen-tests -- --ignored`.
//! The `watchdog` feature removes containers on CTRL+C or SIGTERM.

use std::path::Path;

use mysql_async::prelude::*;
use mysql_async::Conn;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

use modelgen::catalog::{Catalog, MySqlCatalog};
use modelgen::config::GenConfig;
use modelgen::GenError;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE t_users (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(64) NOT NULL COMMENT 'login name',
        email VARCHAR(255) NULL,
        status ENUM('active', 'inactive', 'banned') NOT NULL DEFAULT 'active',
        is_admin TINYINT(1) NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL,
        UNIQUE KEY uk_users_username (username)
    ) COMMENT 'registered users'"#,
    r#"CREATE TABLE t_order_items (
        order_id BIGINT NOT NULL,
        line_no INT NOT NULL,
        price DECIMAL(10, 2) NOT NULL,
        note TEXT NULL,
        PRIMARY KEY (order_id, line_no),
        KEY idx_items_price (price)
    )"#,
];

/// A running MySQL container and a config pointing at it
struct TestDb {
    _container: ContainerAsync<Mysql>,
    config: GenConfig,
}

impl TestDb {
    async fn start() -> anyhow::Result<Self> {
        let container = Mysql::default().start().await?;
        let port = container.get_host_port_ipv4(3306).await?;

        let mut config = GenConfig::default();
        config.database.host = "127.0.0.1".to_string();
        config.database.port = port;
        config.database.user = "root".to_string();
        config.database.password = String::new();
        config.database.db_name = "test".to_string();

        let mut conn = Conn::from_url(format!("mysql://root@127.0.0.1:{}/test", port)).await?;
        for stmt in SCHEMA {
            conn.query_drop(*stmt).await?;
        }
        conn.disconnect().await?;

        Ok(Self {
            _container: container,
            config,
        })
    }

    fn config_with_output(&self, output_dir: &Path) -> GenConfig {
        let mut config = self.config.clone();
        config.generate.output_dir = output_dir.to_path_buf();
        config.generate.table_prefix = "t_".to_string();
        config
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_catalog_introspection() -> anyhow::Result<()> {
    let db = TestDb::start().await?;
    let mut catalog = MySqlCatalog::connect(&db.config.database).await?;

    let mut tables = catalog.list_tables().await?;
    tables.sort();
    assert_eq!(tables, vec!["t_order_items", "t_users"]);

    assert!(catalog.table_exists("t_users").await?);
    assert!(!catalog.table_exists("t_missing").await?);

    let users = catalog.describe_table("t_users").await?;
    assert_eq!(users.comment.as_deref(), Some("registered users"));
    let names: Vec<_> = users.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "username", "email", "status", "is_admin", "created_at"]
    );

    let id = users.get_column("id").unwrap();
    assert!(id.is_auto_increment);
    assert!(!id.nullable);
    assert!(users.get_column("email").unwrap().nullable);
    assert_eq!(
        users.get_column("status").unwrap().enum_values,
        Some(vec![
            "active".to_string(),
            "inactive".to_string(),
            "banned".to_string()
        ])
    );
    assert_eq!(
        users.get_column("username").unwrap().comment.as_deref(),
        Some("login name")
    );
    assert_eq!(users.primary_key.as_ref().unwrap().columns, vec!["id"]);
    assert!(users
        .indexes
        .iter()
        .any(|i| i.name == "uk_users_username" && i.unique));

    let items = catalog.describe_table("t_order_items").await?;
    assert!(items.primary_key.as_ref().unwrap().is_composite());

    let err = catalog.describe_table("t_missing").await.unwrap_err();
    assert!(matches!(err, GenError::TableNotFound(_)));

    catalog.disconnect().await?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_generate_all_tables() -> anyhow::Result<()> {
    let db = TestDb::start().await?;
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("models");
    let config = db.config_with_output(&out);

    let report = modelgen::generate(&config, None, false).await?;
    assert_eq!(report.models, 2);

    let users = std::fs::read_to_string(out.join("t_users.rs"))?;
    assert!(users.contains("pub struct TUsers"));
    assert!(users.contains("pub email: Option<String>,"));
    assert!(users.contains("pub is_admin: bool,"));
    assert!(users.contains("Serialize"));
    assert!(users.contains("\"t_users\""));

    let items = std::fs::read_to_string(out.join("t_order_items.rs"))?;
    assert!(items.contains("pub struct TOrderItems"));

    let mod_rs = std::fs::read_to_string(out.join("mod.rs"))?;
    assert!(mod_rs.contains("mod t_users;"));
    assert!(mod_rs.contains("mod t_order_items;"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_generate_single_table() -> anyhow::Result<()> {
    let db = TestDb::start().await?;
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("models");
    let mut config = db.config_with_output(&out);
    config.generate.with_json_tag = false;

    let report = modelgen::generate(&config, Some("t_order_items"), false).await?;
    assert_eq!(report.models, 1);
    assert!(out.join("t_order_items.rs").exists());
    assert!(!out.join("t_users.rs").exists());

    let items = std::fs::read_to_string(out.join("t_order_items.rs"))?;
    assert!(!items.contains("serde"));
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_generate_missing_table_writes_nothing() -> anyhow::Result<()> {
    let db = TestDb::start().await?;
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("models");
    let config = db.config_with_output(&out);

    let err = modelgen::generate(&config, Some("t_missing"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, GenError::TableNotFound(ref t) if t == "t_missing"));
    assert!(!out.exists());
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_dry_run_writes_nothing() -> anyhow::Result<()> {
    let db = TestDb::start().await?;
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("models");
    let config = db.config_with_output(&out);

    let report = modelgen::generate(&config, None, true).await?;
    assert_eq!(report.files.len(), 3);
    assert!(!out.exists());
    Ok(())
}

#[tokio::test]
async fn test_connection_failure() -> anyhow::Result<()> {
    let mut config = GenConfig::default();
    config.database.host = "127.0.0.1".to_string();
    // Nothing listens on port 1
    config.database.port = 1;

    let err = modelgen::generate(&config, None, false).await.unwrap_err();
    assert!(err.is_connectivity());
    Ok(())
}
