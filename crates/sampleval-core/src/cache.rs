//! On-disk snapshot of the prepared table.

use crate::errors::{PipelineError, Result};
use crate::model::PreparedTable;
use crate::prepare::PrepareOptions;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const CACHE_FILE: &str = "complete.json";
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTable {
    pub schema_version: u32,
    pub tool_version: String,
    pub created_at: String,
    pub input_fingerprint: String,
    /// Options the table was prepared with. A snapshot is only reusable
    /// under the same options.
    pub prepare_options: PrepareOptions,
    pub table: PreparedTable,
}

impl CachedTable {
    pub fn new(
        table: PreparedTable,
        input_fingerprint: String,
        prepare_options: PrepareOptions,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            input_fingerprint,
            prepare_options,
            table,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
        let cached: CachedTable = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            PipelineError::Cache(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if cached.schema_version != SCHEMA_VERSION {
            return Err(PipelineError::Cache(format!(
                "unsupported cache schema version {} in {} (supported: {})",
                cached.schema_version,
                path.display(),
                SCHEMA_VERSION
            )));
        }
        Ok(cached)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|e| PipelineError::Cache(format!("failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    pub fn matches_options(&self, options: &PrepareOptions) -> bool {
        self.prepare_options == *options
    }

    /// Warns when the snapshot was built from different inputs or another version.
    pub fn validate(&self, current_fingerprint: &str) {
        let current_ver = env!("CARGO_PKG_VERSION");
        if self.tool_version != current_ver {
            tracing::warn!(
                event = "cache_version_mismatch",
                cached = %self.tool_version,
                current = current_ver,
                "cached table was built by another version; rerun with --force to rebuild"
            );
        }
        if self.input_fingerprint != current_fingerprint {
            tracing::warn!(
                event = "cache_stale",
                created_at = %self.created_at,
                "input files changed since the cached table was built; rerun with --force to rebuild"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::tests_support::row;
    use crate::prepare::DuplicateFilter;

    #[test]
    fn rejects_unknown_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        let mut cached = CachedTable::new(PreparedTable::default(), "abc".into(), PrepareOptions::default());
        cached.schema_version = 99;
        cached.save(&path).unwrap();

        let err = CachedTable::load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported cache schema version 99"));
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot/nested").join(CACHE_FILE);
        let table = PreparedTable::new(vec![row("r_RandomSampleReducer_1", "f_1")]);
        CachedTable::new(table.clone(), "fp".into(), PrepareOptions::default())
            .save(&path)
            .unwrap();

        let loaded = CachedTable::load(&path).unwrap();
        assert_eq!(loaded.table, table);
        assert_eq!(loaded.input_fingerprint, "fp");
    }

    #[test]
    fn options_survive_reload_and_gate_reuse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        let strict = PrepareOptions {
            duplicate_filter: DuplicateFilter::Strict,
            duplicate_system_prefix: "busy".into(),
        };
        CachedTable::new(PreparedTable::default(), "fp".into(), strict.clone())
            .save(&path)
            .unwrap();

        let loaded = CachedTable::load(&path).unwrap();
        assert_eq!(loaded.prepare_options, strict);
        assert!(loaded.matches_options(&strict));
        assert!(!loaded.matches_options(&PrepareOptions::default()));
        assert!(!loaded.matches_options(&PrepareOptions {
            duplicate_system_prefix: "Automotive".into(),
            ..strict
        }));
    }
}
