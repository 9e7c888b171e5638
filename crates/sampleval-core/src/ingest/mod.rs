//! CSV shard discovery and loading.
//!
//! Experiment runs write one `samples.csv`, `models.csv`, ... per output
//! directory. The loader collects every shard of one table below a root,
//! parses each against a fixed schema and concatenates them into a single
//! frame without exact duplicates.

pub mod schema;

use crate::errors::{PipelineError, Result};
use polars::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use schema::{ColumnType, TableSchema};

/// Recursively collects every file named `file_name` below `root`, sorted by path.
pub fn find_shards(root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_file() && entry.file_name() == file_name {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

fn walk_error(root: &Path, err: walkdir::Error) -> PipelineError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop while walking shards"));
    PipelineError::io(path, source)
}

/// Loads and concatenates all shards of one table, dropping exact duplicate rows.
pub fn load_table(root: &Path, schema: &TableSchema) -> Result<DataFrame> {
    let shards = find_shards(root, schema.file_name)?;
    load_shards(root, &shards, schema)
}

/// Like [`load_table`] but for an already discovered shard list.
pub fn load_shards(root: &Path, shards: &[PathBuf], schema: &TableSchema) -> Result<DataFrame> {
    if shards.is_empty() {
        return Err(PipelineError::MissingInput {
            file_name: schema.file_name.to_string(),
            root: root.to_path_buf(),
        });
    }
    tracing::debug!(event = "shards_found", table = schema.file_name, count = shards.len());

    let mut combined: Option<DataFrame> = None;
    for path in shards {
        let df = read_shard(path, schema)?;
        match combined.as_mut() {
            None => combined = Some(df),
            Some(acc) => {
                acc.vstack_mut(&df)
                    .map_err(|e| PipelineError::schema(path, e.to_string()))?;
            }
        }
    }

    let combined = combined.ok_or_else(|| PipelineError::MissingInput {
        file_name: schema.file_name.to_string(),
        root: root.to_path_buf(),
    })?;
    let before = combined.height();
    let deduped = combined
        .unique_stable(None, UniqueKeepStrategy::First, None)
        .map_err(|e| PipelineError::schema(schema.file_name, e.to_string()))?;

    tracing::info!(
        event = "table_loaded",
        table = schema.file_name,
        shards = shards.len(),
        rows = deduped.height(),
        duplicates = before - deduped.height()
    );
    Ok(deduped)
}

fn read_shard(path: &Path, schema: &TableSchema) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(schema.polars_schema())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| PipelineError::schema(path, e.to_string()))?;

    // Shards may order their columns differently; vstack needs one layout.
    df.select(schema.column_names())
        .map_err(|e| PipelineError::schema(path, e.to_string()))
}
