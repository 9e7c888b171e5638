use super::args::*;
use anyhow::Context;
use sampleval_core::cache::CachedTable;
use sampleval_core::config::{self, FileConfig, RunConfig};
use sampleval_core::fingerprint::input_fingerprint;
use sampleval_core::prepare::prepare_from_dir;
use sampleval_core::PreparedTable;

pub mod export;
pub mod plot;
pub mod prepare;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Prepare(args) => prepare::run(args),
        Command::Plot(args) => plot::run(args),
        Command::Export(args) => export::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}

/// Merges the optional config file with the command-line flags.
pub(crate) fn load_run_config(flags: &RunFlags) -> anyhow::Result<RunConfig> {
    let file = if flags.config.is_file() {
        config::load_file_config(&flags.config)
            .with_context(|| format!("loading config {}", flags.config.display()))?
    } else {
        FileConfig::default()
    };
    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    let cfg = config::resolve(file, flags.overrides(), &workdir);
    tracing::info!(
        event = "run_config",
        root = %cfg.root_dir.display(),
        out = %cfg.out_dir.display(),
        show = cfg.show_results,
        save = cfg.save_results,
        force = cfg.force_read,
    );
    Ok(cfg)
}

/// Returns the cached prepared table, or rebuilds it from the CSV shards and
/// refreshes the cache when there is none, it was prepared under other
/// options, or `force_read` is set.
pub(crate) fn load_or_prepare(cfg: &RunConfig) -> anyhow::Result<PreparedTable> {
    let data_dir = cfg.data_dir();
    let cache_path = cfg.cache_path();
    let fingerprint = input_fingerprint(&data_dir)
        .with_context(|| format!("fingerprinting inputs below {}", data_dir.display()))?;

    if !cfg.force_read && cache_path.is_file() {
        let cached = CachedTable::load(&cache_path)
            .with_context(|| format!("reading cached table {}", cache_path.display()))?;
        if cached.matches_options(&cfg.prepare) {
            cached.validate(&fingerprint.hex);
            tracing::info!(
                event = "cache_hit",
                path = %cache_path.display(),
                rows = cached.table.len(),
            );
            return Ok(cached.table);
        }
        tracing::info!(
            event = "cache_options_changed",
            path = %cache_path.display(),
            cached = ?cached.prepare_options,
            current = ?cfg.prepare,
        );
    }

    tracing::info!(event = "cache_miss", path = %cache_path.display(), force = cfg.force_read);
    let table = prepare_from_dir(&data_dir, &cfg.prepare)
        .with_context(|| format!("preparing tables below {}", data_dir.display()))?;

    let cached = CachedTable::new(table, fingerprint.hex, cfg.prepare.clone());
    cached
        .save(&cache_path)
        .with_context(|| format!("writing cached table {}", cache_path.display()))?;
    tracing::info!(event = "cache_written", path = %cache_path.display(), rows = cached.table.len());
    Ok(cached.table)
}
