//! Default configuration values - single source of truth

/// Default database host
pub const DB_HOST: &str = "localhost";

/// Default MySQL port
pub const DB_PORT: u16 = 3306;

/// Default database user
pub const DB_USER: &str = "root";

/// Default database password
pub const DB_PASSWORD: &str = "password";

/// Default database (schema) name
pub const DB_NAME: &str = "test";

/// Default connection character set
pub const DB_CHARSET: &str = "utf8mb4";

/// Default output directory for generated models
pub const OUTPUT_DIR: &str = "./models";

/// Default module name for generated models
pub const PACKAGE: &str = "models";

/// Default table prefix (no stripping)
pub const TABLE_PREFIX: &str = "";

/// Whether to emit serde attributes per field by default
pub const WITH_JSON_TAG: bool = true;

/// Whether to emit query helper functions by default
pub const WITH_QUERY_FUNCTIONS: bool = false;

/// Base name of the config file looked up in the working directory
pub const CONFIG_BASENAME: &str = "config";

/// Prefix for environment variable overrides (`MODELGEN_GENERATE__PACKAGE=...`)
pub const ENV_PREFIX: &str = "MODELGEN";
