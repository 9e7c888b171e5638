use super::exit_codes;
use crate::cli::args::ExportArgs;
use sampleval_core::report::{frame, summary, OutputSink};

pub fn run(args: ExportArgs) -> anyhow::Result<i32> {
    let cfg = super::load_run_config(&args.run)?;
    let table = super::load_or_prepare(&cfg)?;
    let sink = OutputSink::from_config(&cfg);

    let mut complete = frame::prepared_frame(&table)?;
    sink.emit_csv("complete", &mut complete)?;

    let rows = summary::summarize(&table);
    tracing::info!(event = "summary_built", groups = rows.len());
    let mut summary = summary::summary_frame(&rows)?;
    sink.emit_latex("summary", &summary)?;
    sink.emit_csv("summary", &mut summary)?;

    Ok(exit_codes::OK)
}
