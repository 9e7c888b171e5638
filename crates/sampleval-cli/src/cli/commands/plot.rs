use super::exit_codes;
use crate::cli::args::PlotArgs;
use sampleval_core::charts::catalog;
use sampleval_core::report::OutputSink;

pub fn run(args: PlotArgs) -> anyhow::Result<i32> {
    let cfg = super::load_run_config(&args.run)?;
    let table = super::load_or_prepare(&cfg)?;

    let mut charts = catalog::all_charts(&table);
    if !args.charts.is_empty() {
        let unknown: Vec<&String> = args
            .charts
            .iter()
            .filter(|name| !charts.iter().any(|c| c.name == name.as_str()))
            .collect();
        if !unknown.is_empty() {
            let known: Vec<&str> = charts.iter().map(|c| c.name).collect();
            eprintln!(
                "config error: unknown chart(s) {:?}; known: {}",
                unknown,
                known.join(", ")
            );
            return Ok(exit_codes::CONFIG_ERROR);
        }
        charts.retain(|c| args.charts.iter().any(|name| name == c.name));
    }

    if !cfg.show_results && !cfg.save_results {
        tracing::warn!(
            event = "nothing_to_emit",
            "neither --show nor --save given; charts are built but not emitted"
        );
    }

    let sink = OutputSink::from_config(&cfg);
    let mut written = 0;
    for spec in &charts {
        tracing::info!(event = "chart_built", chart = spec.name, points = spec.point_count());
        if sink.emit_chart(spec)?.is_some() {
            written += 1;
        }
    }
    if cfg.save_results {
        eprintln!("wrote {} charts to {}", written, cfg.out_dir.display());
    }
    Ok(exit_codes::OK)
}
