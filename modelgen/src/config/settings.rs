//! Configuration settings for modelgen

use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::codegen::is_rust_keyword;
use crate::error::{GenError, Result};

/// Extensions probed, in order, when no config path is given
const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "toml", "json"];

/// Main configuration, assembled once at startup and passed by reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenConfig {
    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Code generation settings
    #[serde(default)]
    pub generate: GenerateConfig,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    #[serde(rename = "dbname", alias = "db_name")]
    pub db_name: String,
    pub charset: String,
}

/// Code generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Output directory for generated model files
    pub output_dir: PathBuf,

    /// Module name of the generated models
    pub package: String,

    /// Tables to generate; empty means every table in the schema
    pub tables: Vec<String>,

    /// Prefix stripped from table names when deriving identifiers
    pub table_prefix: String,

    /// Emit serde derives and a per-field rename to the column name
    pub with_json_tag: bool,

    /// Reserved; read from config but not acted on by generation
    pub with_query_functions: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: defaults::DB_HOST.to_string(),
            port: defaults::DB_PORT,
            user: defaults::DB_USER.to_string(),
            password: defaults::DB_PASSWORD.to_string(),
            db_name: defaults::DB_NAME.to_string(),
            charset: defaults::DB_CHARSET.to_string(),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            package: defaults::PACKAGE.to_string(),
            tables: Vec::new(),
            table_prefix: defaults::TABLE_PREFIX.to_string(),
            with_json_tag: defaults::WITH_JSON_TAG,
            with_query_functions: defaults::WITH_QUERY_FUNCTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Connection URL with the password masked, for logs and messages
    pub fn display_url(&self) -> String {
        format!(
            "mysql://{}:***@{}:{}/{}?charset={}",
            self.user, self.host, self.port, self.db_name, self.charset
        )
    }

    /// Statement run on connect to select the character set
    pub fn init_statement(&self) -> String {
        format!("SET NAMES {}", self.charset)
    }
}

/// Values supplied on the command line. `None` (or an empty string) leaves
/// the configured value alone.
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub output_dir: Option<PathBuf>,
    pub package: Option<String>,
    pub with_json_tag: Option<bool>,
    pub table_prefix: Option<String>,
    pub table: Option<String>,
}

impl GenConfig {
    /// Look for `config.{yaml,yml,toml,json}` in the working directory
    pub fn find_default_file() -> Option<PathBuf> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", defaults::CONFIG_BASENAME, ext)))
            .find(|p| p.is_file())
    }

    /// Load configuration using config-rs (file + environment variables).
    ///
    /// The file format is picked from the extension. Without a file only
    /// defaults and `MODELGEN_*` environment variables apply.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, Self::environment())
    }

    /// `MODELGEN_DATABASE__HOST`, `MODELGEN_GENERATE__PACKAGE`, ...
    ///
    /// Values are parsed as bools and numbers where they look like them.
    /// `MODELGEN_GENERATE__TABLES` takes a comma-separated list.
    fn environment() -> Environment {
        Environment::with_prefix(defaults::ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("generate.tables")
    }

    fn load_with_env(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(GenError::Config {
                    path: path.to_path_buf(),
                    message: "file not found".into(),
                });
            }
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(env);

        let to_config_error = |e: config::ConfigError| GenError::Config {
            path: config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("<environment>")),
            message: e.to_string(),
        };

        builder
            .build()
            .map_err(to_config_error)?
            .try_deserialize()
            .map_err(to_config_error)
    }

    /// Apply command-line overrides, consuming and returning the config
    pub fn with_overrides(mut self, overrides: GenerateOverrides) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        if let Some(dir) = overrides
            .output_dir
            .filter(|d| !d.as_os_str().is_empty())
        {
            self.generate.output_dir = dir;
        }
        if let Some(package) = non_empty(overrides.package) {
            self.generate.package = package;
        }
        if let Some(prefix) = non_empty(overrides.table_prefix) {
            self.generate.table_prefix = prefix;
        }
        if let Some(json) = overrides.with_json_tag {
            self.generate.with_json_tag = json;
        }
        if let Some(table) = non_empty(overrides.table) {
            self.generate.tables = vec![table];
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let package = &self.generate.package;
        if package.is_empty() {
            return Err(GenError::Validation("package is required".into()));
        }
        let valid_module = package
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && package.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_module || is_rust_keyword(package) {
            return Err(GenError::Validation(format!(
                "package `{}` is not a valid Rust module name",
                package
            )));
        }

        if self.generate.output_dir.as_os_str().is_empty() {
            return Err(GenError::Validation("output_dir is required".into()));
        }

        if self.database.port == 0 {
            return Err(GenError::Validation("database port must not be 0".into()));
        }

        if self.database.db_name.is_empty() {
            return Err(GenError::Validation("database dbname is required".into()));
        }

        let charset = &self.database.charset;
        if charset.is_empty() || !charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GenError::Validation(format!(
                "invalid database charset `{}`",
                charset
            )));
        }

        Ok(())
    }

    /// Write this configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| GenError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
