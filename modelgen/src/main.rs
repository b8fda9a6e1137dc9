//! CLI entry point for modelgen

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use modelgen::catalog::{Catalog, MySqlCatalog};
use modelgen::config::{GenConfig, GenerateOverrides};

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(about = "Generate Rust model structs from the tables of a MySQL database")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML or TOML, default: ./config.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Table to generate; every table when omitted
    #[arg(short, long, global = true)]
    table: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model structs
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),
    /// Show version information
    #[command(visible_alias = "v")]
    Version,
    /// Inspect tables (show introspected columns for debugging)
    Inspect,
    /// Write a default configuration file
    Init {
        /// Where to write the configuration
        #[arg(default_value = "config.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Output directory (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Module name of the generated models (overrides config)
    #[arg(short, long)]
    package: Option<String>,

    /// Emit serde derives with column names as serialized names
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    json: Option<bool>,

    /// Table name prefix to strip when deriving identifiers (overrides config)
    #[arg(long)]
    prefix: Option<String>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    exit_code(run(Cli::parse()))
}

/// Report a failure once on stderr and map it to exit status 1
fn exit_code(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that need neither config nor database
    match &cli.command {
        Commands::Version => {
            println!("modelgen version {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Init { path, force } => return init_config(path, *force),
        _ => {}
    }

    // Load configuration first (before logging, so we can use config.log_level)
    let config_path = cli.config.clone().or_else(GenConfig::find_default_file);
    let config = GenConfig::load(config_path.as_deref())?;

    init_logging(config.log_level.as_deref());
    match &config_path {
        Some(path) => info!("Using config file {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Generate(args) => {
            let config = config.with_overrides(GenerateOverrides {
                output_dir: args.output,
                package: args.package,
                with_json_tag: args.json,
                table_prefix: args.prefix,
                table: cli.table.clone(),
            });
            config.validate()?;

            let table = cli.table.as_deref().filter(|t| !t.is_empty());
            let report = runtime.block_on(modelgen::generate(&config, table, args.dry_run))?;

            if args.dry_run {
                println!("Dry run mode - would generate:");
                for file in &report.files {
                    println!("  {}", file.display());
                }
            }
            info!("Code generation completed successfully");
            Ok(())
        }
        Commands::Inspect => runtime.block_on(inspect_tables(&config, cli.table.as_deref())),
        Commands::Version | Commands::Init { .. } => Ok(()),
    }
}

/// Initialize logging.
/// Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
fn init_logging(config_level: Option<&str>) {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config_level.unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    GenConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

async fn inspect_tables(config: &GenConfig, table: Option<&str>) -> Result<()> {
    let mut catalog = MySqlCatalog::connect(&config.database).await?;

    let explicit: Vec<String> = match table {
        Some(t) => vec![t.to_string()],
        None => config.generate.tables.clone(),
    };
    let tables = modelgen::list_tables(&explicit, &mut catalog).await?;

    println!("Found {} tables:\n", tables.len());
    for name in &tables {
        let table = catalog.describe_table(name).await?;
        let identifier = modelgen::normalize(&table.name, &config.generate.table_prefix);

        println!("Table: {} ({})", table.name, identifier);
        if let Some(comment) = &table.comment {
            println!("  Comment: {}", comment);
        }
        println!("  Columns:");
        for col in &table.columns {
            let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
            let auto_inc = if col.is_auto_increment {
                " AUTO_INCREMENT"
            } else {
                ""
            };
            println!(
                "    - {} {} {}{}",
                col.name, col.data_type, nullable, auto_inc
            );
            if let Some(enum_values) = &col.enum_values {
                println!("      ENUM values: {:?}", enum_values);
            }
        }
        if let Some(pk) = &table.primary_key {
            println!("  Primary Key: {:?}", pk.columns);
        }
        if !table.indexes.is_empty() {
            println!("  Indexes:");
            for idx in &table.indexes {
                let unique = if idx.unique { "UNIQUE " } else { "" };
                println!("    - {}INDEX {} ({:?})", unique, idx.name, idx.columns);
            }
        }
        println!();
    }

    catalog.disconnect().await?;
    Ok(())
}
