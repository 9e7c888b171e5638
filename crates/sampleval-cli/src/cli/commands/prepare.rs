use super::exit_codes;
use crate::cli::args::PrepareArgs;
use sampleval_core::report::{frame, OutputSink};
use serde_json::json;

const PREVIEW_ROWS: usize = 30;

pub fn run(args: PrepareArgs) -> anyhow::Result<i32> {
    if args.format != "text" && args.format != "json" {
        eprintln!("config error: --format must be text or json (got {})", args.format);
        return Ok(exit_codes::CONFIG_ERROR);
    }

    let mut cfg = super::load_run_config(&args.run)?;
    cfg.force_read = true;
    let table = super::load_or_prepare(&cfg)?;

    if cfg.show_results {
        let df = frame::prepared_frame(&table)?;
        println!("{}", df.head(Some(PREVIEW_ROWS)));
    }
    if cfg.save_results {
        OutputSink::from_config(&cfg).ensure_out_dir()?;
    }

    let clean = table.iter().filter(|r| r.is_clean()).count();
    let metrics: std::collections::BTreeSet<&str> =
        table.iter().map(|r| r.coverage_metric.as_str()).collect();
    if args.format == "json" {
        let stats = json!({
            "rows": table.len(),
            "clean_rows": clean,
            "metrics": metrics,
            "cache": cfg.cache_path(),
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        eprintln!(
            "prepared {} rows ({} clean) over metrics [{}] -> {}",
            table.len(),
            clean,
            metrics.into_iter().collect::<Vec<_>>().join(", "),
            cfg.cache_path().display()
        );
    }
    Ok(exit_codes::OK)
}
