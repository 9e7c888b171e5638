use clap::{Parser, Subcommand, ValueEnum};
use sampleval_core::config::{Overrides, DEFAULT_CONFIG_FILE};
use sampleval_core::prepare::DuplicateFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sampleval",
    version,
    about = "Joins sample-reduction experiment logs into one table and charts it"
)]
pub struct Cli {
    /// log filter, e.g. `info` or `sampleval_core=debug` (RUST_LOG wins when set)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the prepared table and refresh its cache
    Prepare(PrepareArgs),
    /// Draw the study charts
    Plot(PlotArgs),
    /// Write the prepared table and its summary as CSV and LaTeX
    Export(ExportArgs),
    Version,
}

/// Flags shared by every data command.
#[derive(clap::Args, Debug, Clone)]
pub struct RunFlags {
    /// experiment root holding `data/`; defaults to `results/<.current>/` or `data/`
    #[arg(long, env = "SAMPLEVAL_ROOT")]
    pub root: Option<PathBuf>,

    /// output directory; defaults to `<root>/plot`
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// print charts and tables to stdout
    #[arg(long)]
    pub show: bool,

    /// write charts and tables into the output directory
    #[arg(long)]
    pub save: bool,

    /// ignore the cached table and rebuild it from the CSV shards
    #[arg(long)]
    pub force: bool,

    #[arg(long, value_enum)]
    pub duplicate_filter: Option<DuplicateFilterArg>,
}

impl RunFlags {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root_dir: self.root.clone(),
            out_dir: self.out.clone(),
            show_results: self.show,
            save_results: self.save,
            force_read: self.force,
            duplicate_filter: self.duplicate_filter.map(Into::into),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateFilterArg {
    Off,
    Strict,
}

impl From<DuplicateFilterArg> for DuplicateFilter {
    fn from(arg: DuplicateFilterArg) -> Self {
        match arg {
            DuplicateFilterArg::Off => DuplicateFilter::Off,
            DuplicateFilterArg::Strict => DuplicateFilter::Strict,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub run: RunFlags,

    /// stats output: text|json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub run: RunFlags,

    /// only draw the named chart (repeatable)
    #[arg(long = "chart")]
    pub charts: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub run: RunFlags,
}
