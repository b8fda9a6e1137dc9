//! Flush phase: materialize a collected batch

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::batch::ModelBatch;
use super::struct_generator::render_batch;
use crate::error::{GenError, Result};

/// Outcome of a flush
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    /// Number of models in the flushed batch
    pub models: usize,

    /// Files written (or, for a dry run, that would be written)
    pub files: Vec<PathBuf>,
}

/// Materializes a [`ModelBatch`].
///
/// A run calls [`flush`](Emitter::flush) exactly once, after every table
/// has been collected.
pub trait Emitter {
    fn flush(&mut self, batch: ModelBatch) -> Result<FlushReport>;
}

/// Writes one file per model plus `mod.rs` into the batch's output
/// directory.
///
/// Everything is rendered before the first write, so a table that fails to
/// render leaves the directory untouched.
#[derive(Debug, Default)]
pub struct FileEmitter;

impl FileEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for FileEmitter {
    fn flush(&mut self, batch: ModelBatch) -> Result<FlushReport> {
        let files = render_batch(&batch)?;

        let output_dir = &batch.options().output_dir;
        fs::create_dir_all(output_dir).map_err(|source| GenError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            debug!("Writing {}", file.path.display());
            fs::write(&file.path, file.content).map_err(|source| GenError::WriteFile {
                table: file.table,
                path: file.path.clone(),
                source,
            })?;
            written.push(file.path);
        }

        debug!("Wrote {} files to {}", written.len(), output_dir.display());
        Ok(FlushReport {
            models: batch.len(),
            files: written,
        })
    }
}

/// Renders the batch to check it, but writes nothing.
#[derive(Debug, Default)]
pub struct DryRunEmitter;

impl DryRunEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for DryRunEmitter {
    fn flush(&mut self, batch: ModelBatch) -> Result<FlushReport> {
        let files = render_batch(&batch)?;
        info!("Dry run: {} files would be written", files.len());
        Ok(FlushReport {
            models: batch.len(),
            files: files.into_iter().map(|f| f.path).collect(),
        })
    }
}
