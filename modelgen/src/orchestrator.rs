//! Run orchestration: enumerate tables, collect them, flush once

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::codegen::{
    is_valid_identifier, normalize, Emitter, FlushReport, GeneratorOptions, ModelBatch,
    ModelOptions,
};
use crate::config::GenConfig;
use crate::error::{GenError, Result};

/// Tables to generate.
///
/// A non-empty explicit list is returned as given. Otherwise every table of
/// the active schema is listed, in catalog order.
pub async fn list_tables<C>(explicit: &[String], catalog: &mut C) -> Result<Vec<String>>
where
    C: Catalog + ?Sized,
{
    if !explicit.is_empty() {
        debug!("Using {} configured tables", explicit.len());
        return Ok(explicit.to_vec());
    }
    let tables = catalog.list_tables().await?;
    debug!("Catalog reported {} tables", tables.len());
    Ok(tables)
}

/// Drives one generation run over a catalog and an emitter.
pub struct Orchestrator<'a, C, E> {
    config: &'a GenConfig,
    catalog: C,
    emitter: E,
}

impl<'a, C: Catalog, E: Emitter> Orchestrator<'a, C, E> {
    pub fn new(config: &'a GenConfig, catalog: C, emitter: E) -> Self {
        if config.generate.with_query_functions {
            warn!("with_query_functions is reserved and has no effect");
        }
        Self {
            config,
            catalog,
            emitter,
        }
    }

    /// Generate models for every configured table (or every table in the
    /// schema), then flush once.
    pub async fn generate_all(&mut self) -> Result<FlushReport> {
        let tables = list_tables(&self.config.generate.tables, &mut self.catalog).await?;
        info!("Generating {} tables", tables.len());

        let mut batch = self.new_batch();
        for table in &tables {
            batch = self.collect_table(batch, table).await?;
        }

        self.flush(batch)
    }

    /// Generate the model of a single table, then flush.
    ///
    /// Fails with [`GenError::TableNotFound`] before any generation work
    /// when the table is not in the active schema.
    pub async fn generate_one(&mut self, table: &str) -> Result<FlushReport> {
        if !self.catalog.table_exists(table).await? {
            return Err(GenError::TableNotFound(table.to_string()));
        }

        let batch = self.new_batch();
        let batch = self.collect_table(batch, table).await?;
        self.flush(batch)
    }

    /// Hand back the catalog and emitter
    pub fn into_parts(self) -> (C, E) {
        (self.catalog, self.emitter)
    }

    fn new_batch(&self) -> ModelBatch {
        ModelBatch::new(GeneratorOptions::from_config(&self.config.generate))
    }

    async fn collect_table(&mut self, batch: ModelBatch, table: &str) -> Result<ModelBatch> {
        let identifier = normalize(table, &self.config.generate.table_prefix);
        if !is_valid_identifier(&identifier) {
            warn!(
                "Table {} normalizes to `{}`, which is not a valid type name",
                table, identifier
            );
        }
        info!("Generating model for table {} ({})", table, identifier);

        let metadata = self.catalog.describe_table(table).await?;
        Ok(batch.collect(metadata, ModelOptions::default()))
    }

    fn flush(&mut self, batch: ModelBatch) -> Result<FlushReport> {
        let output_dir = batch.options().output_dir.clone();
        let report = self.emitter.flush(batch)?;
        info!(
            "Generated {} models into {}",
            report.models,
            output_dir.display()
        );
        Ok(report)
    }
}
