//! Model accumulator for the collect phase

use std::path::PathBuf;

use tracing::debug;

use super::naming::to_struct_name;
use crate::catalog::TableMetadata;
use crate::config::GenerateConfig;

/// Options shared by every model of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Directory the model files are written to
    pub output_dir: PathBuf,

    /// Module name of the generated models
    pub package: String,

    /// Emit serde derives with the column name as the serialized name
    pub with_json_tag: bool,
}

impl GeneratorOptions {
    pub fn from_config(generate: &GenerateConfig) -> Self {
        Self {
            output_dir: generate.output_dir.clone(),
            package: generate.package.clone(),
            with_json_tag: generate.with_json_tag,
        }
    }
}

/// Per-table generation options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOptions {
    /// Struct name to use instead of the PascalCase table name
    pub struct_name: Option<String>,
}

/// A table waiting to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct PendingModel {
    pub table: TableMetadata,
    pub struct_name: String,
}

/// Models collected so far in a run.
///
/// Collecting never touches the filesystem; nothing is written until the
/// batch is handed to an [`Emitter`](super::Emitter).
#[derive(Debug, Clone)]
pub struct ModelBatch {
    options: GeneratorOptions,
    models: Vec<PendingModel>,
}

impl ModelBatch {
    /// Create an empty batch
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            models: Vec::new(),
        }
    }

    /// Add a table to the batch, keeping collection order.
    ///
    /// Collecting the same table again replaces the earlier entry in place.
    pub fn collect(mut self, table: TableMetadata, opts: ModelOptions) -> Self {
        let struct_name = opts
            .struct_name
            .unwrap_or_else(|| to_struct_name(&table.name));
        let model = PendingModel { table, struct_name };

        match self
            .models
            .iter_mut()
            .find(|m| m.table.name == model.table.name)
        {
            Some(existing) => {
                debug!("Table {} collected twice, replacing", model.table.name);
                *existing = model;
            }
            None => self.models.push(model),
        }
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn models(&self) -> &[PendingModel] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
