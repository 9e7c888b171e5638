//! Output sink: where charts and tables go once they are built.
//!
//! `show` prints to stdout, `save` writes into the output directory, which
//! is created on first use. Both may be set; with neither, emitting is a
//! no-op.

pub mod console;
pub mod frame;
pub mod latex;
pub mod summary;

use crate::charts::{render, ChartSpec};
use crate::config::RunConfig;
use crate::errors::{PipelineError, Result};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSink {
    pub show: bool,
    pub save: bool,
    pub out_dir: PathBuf,
    pub chart_size: (u32, u32),
}

impl OutputSink {
    pub fn new(show: bool, save: bool, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            show,
            save,
            out_dir: out_dir.into(),
            chart_size: (
                crate::config::DEFAULT_CHART_WIDTH,
                crate::config::DEFAULT_CHART_HEIGHT,
            ),
        }
    }

    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            show: cfg.show_results,
            save: cfg.save_results,
            out_dir: cfg.out_dir.clone(),
            chart_size: (cfg.chart_width, cfg.chart_height),
        }
    }

    pub fn ensure_out_dir(&self) -> Result<()> {
        if !self.out_dir.is_dir() {
            std::fs::create_dir_all(&self.out_dir)
                .map_err(|e| PipelineError::io(&self.out_dir, e))?;
            tracing::debug!(event = "out_dir_created", path = %self.out_dir.display());
        }
        Ok(())
    }

    fn target(&self, name: &str, extension: &str) -> Result<PathBuf> {
        self.ensure_out_dir()?;
        Ok(self.out_dir.join(format!("{name}.{extension}")))
    }

    /// Shows a per-series summary and/or writes `<name>.svg`. Returns the
    /// written path when saving.
    pub fn emit_chart(&self, spec: &ChartSpec) -> Result<Option<PathBuf>> {
        if self.show {
            print!("{}", console::chart_summary(spec));
        }
        if !self.save {
            return Ok(None);
        }
        let path = self.target(spec.name, "svg")?;
        render::render_svg(spec, &path, self.chart_size)?;
        written(&path);
        Ok(Some(path))
    }

    /// Shows and/or writes `<name>.csv` with `;` as separator.
    pub fn emit_csv(&self, name: &str, df: &mut DataFrame) -> Result<Option<PathBuf>> {
        if self.show {
            println!("{df}");
        }
        if !self.save {
            return Ok(None);
        }
        let path = self.target(name, "csv")?;
        frame::write_csv(name, df, &path)?;
        written(&path);
        Ok(Some(path))
    }

    /// Shows and/or writes `<name>.tex` holding a LaTeX tabular.
    pub fn emit_latex(&self, name: &str, df: &DataFrame) -> Result<Option<PathBuf>> {
        if !self.show && !self.save {
            return Ok(None);
        }
        let table = latex::to_latex(name, df)?;
        if self.show {
            println!("{table}");
        }
        if !self.save {
            return Ok(None);
        }
        let path = self.target(name, "tex")?;
        std::fs::write(&path, table).map_err(|e| PipelineError::io(&path, e))?;
        written(&path);
        Ok(Some(path))
    }
}

fn written(path: &Path) {
    tracing::info!(event = "file_written", path = %path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::catalog;
    use crate::model::PreparedTable;
    use crate::prepare::tests_support::row;

    #[test]
    fn nothing_is_written_without_save() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plot");
        let sink = OutputSink::new(false, false, &out);
        let table = PreparedTable::new(vec![row("r_RandomSampleReducer_1", "f_1")]);
        let spec = catalog::size_per_sample_type(&table);
        assert_eq!(sink.emit_chart(&spec).unwrap(), None);
        let mut df = frame::prepared_frame(&table).unwrap();
        assert_eq!(sink.emit_csv("complete", &mut df).unwrap(), None);
        assert!(!out.exists());
    }

    #[test]
    fn save_creates_out_dir_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/plot");
        let sink = OutputSink::new(false, true, &out);
        let table = PreparedTable::new(vec![row("r_RandomSampleReducer_1", "f_1")]);

        let chart = sink
            .emit_chart(&catalog::size_per_sample_type(&table))
            .unwrap()
            .unwrap();
        assert_eq!(chart, out.join("size_per_sample_type.svg"));
        assert!(chart.is_file());

        let mut df = frame::prepared_frame(&table).unwrap();
        let csv = sink.emit_csv("complete", &mut df).unwrap().unwrap();
        let text = std::fs::read_to_string(csv).unwrap();
        assert!(text.starts_with("SampleID;SystemID;ModelID;SystemName"));

        let tex = sink.emit_latex("complete", &df).unwrap().unwrap();
        assert!(std::fs::read_to_string(tex)
            .unwrap()
            .starts_with("\\begin{tabular}"));
    }

    #[test]
    fn out_dir_creation_failure_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let sink = OutputSink::new(false, true, blocker.join("plot"));
        let err = sink.ensure_out_dir().unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(err.to_string().contains("plot"));
    }
}
