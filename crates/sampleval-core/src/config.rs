use crate::errors::{PipelineError, Result};
use crate::prepare::{DuplicateFilter, PrepareOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "sampleval.yaml";
pub const DEFAULT_CHART_WIDTH: u32 = 1200;
pub const DEFAULT_CHART_HEIGHT: u32 = 700;

/// Marker file naming the current results directory below `results/`.
const CURRENT_MARKER: &str = "results/.current";

/// Optional settings from `sampleval.yaml`. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub root_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub chart_width: Option<u32>,
    pub chart_height: Option<u32>,
    pub duplicate_filter: Option<DuplicateFilter>,
    pub duplicate_system_prefix: Option<String>,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub show_results: bool,
    pub save_results: bool,
    pub force_read: bool,
    pub duplicate_filter: Option<DuplicateFilter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub root_dir: PathBuf,
    pub out_dir: PathBuf,
    pub show_results: bool,
    pub save_results: bool,
    pub force_read: bool,
    pub chart_width: u32,
    pub chart_height: u32,
    pub prepare: PrepareOptions,
}

impl RunConfig {
    /// Directory scanned for CSV shards.
    pub fn data_dir(&self) -> PathBuf {
        self.root_dir.join("data")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.out_dir.join(crate::cache::CACHE_FILE)
    }
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    let mut ignored_keys = Vec::new();
    let deserializer = serde_yaml::Deserializer::from_str(&raw);
    let cfg: FileConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.push(path.to_string());
    })
    .map_err(|e| PipelineError::Config(format!("failed to parse {}: {}", path.display(), e)))?;

    if !ignored_keys.is_empty() {
        tracing::warn!(
            event = "config_unknown_keys",
            file = %path.display(),
            keys = ?ignored_keys,
            "ignored unknown config fields"
        );
    }

    if cfg.chart_width == Some(0) || cfg.chart_height == Some(0) {
        return Err(PipelineError::Config(format!(
            "chart dimensions must be positive (file: {})",
            path.display()
        )));
    }
    Ok(cfg)
}

/// Root directory used when neither flag nor config names one:
/// `results/<name>/` if `results/.current` names a run, else `data/`.
pub fn default_root(workdir: &Path) -> PathBuf {
    let marker = workdir.join(CURRENT_MARKER);
    if let Ok(content) = std::fs::read_to_string(&marker) {
        if let Some(name) = content.lines().next().map(str::trim).filter(|l| !l.is_empty()) {
            return workdir.join("results").join(name);
        }
    }
    workdir.join("data")
}

pub fn resolve(file: FileConfig, overrides: Overrides, workdir: &Path) -> RunConfig {
    let root_dir = overrides
        .root_dir
        .or(file.root_dir)
        .unwrap_or_else(|| default_root(workdir));
    let out_dir = overrides
        .out_dir
        .or(file.out_dir)
        .unwrap_or_else(|| root_dir.join("plot"));

    let defaults = PrepareOptions::default();
    let prepare = PrepareOptions {
        duplicate_filter: overrides
            .duplicate_filter
            .or(file.duplicate_filter)
            .unwrap_or(defaults.duplicate_filter),
        duplicate_system_prefix: file
            .duplicate_system_prefix
            .unwrap_or(defaults.duplicate_system_prefix),
    };

    RunConfig {
        root_dir,
        out_dir,
        show_results: overrides.show_results,
        save_results: overrides.save_results,
        force_read: overrides.force_read,
        chart_width: file.chart_width.unwrap_or(DEFAULT_CHART_WIDTH),
        chart_height: file.chart_height.unwrap_or(DEFAULT_CHART_HEIGHT),
        prepare,
    }
}
