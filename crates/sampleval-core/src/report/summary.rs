//! Per sample type and metric medians of finished runs.

use super::frame::export_error;
use crate::errors::Result;
use crate::labels;
use crate::model::PreparedTable;
use crate::prepare::aggregate::median;
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub sample_type: String,
    pub metric: String,
    pub count: u32,
    pub size: Option<f64>,
    pub time: Option<f64>,
    pub coverage: Option<f64>,
    pub size_ratio: Option<f64>,
}

/// Groups clean rows with a known sample type by `SampleTypeDisplay2` and
/// metric, in legend order.
pub fn summarize(table: &PreparedTable) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(usize, String, String), Vec<_>> = BTreeMap::new();
    for r in table.iter().filter(|r| r.is_clean()) {
        let Some(rank) = labels::sample_type_rank(&r.complete_type) else {
            continue;
        };
        groups
            .entry((rank, r.sample_type_display2.clone(), r.coverage_metric.clone()))
            .or_default()
            .push(r);
    }

    groups
        .into_iter()
        .map(|((_, sample_type, metric), rows)| SummaryRow {
            sample_type,
            metric,
            count: rows.len() as u32,
            size: median(rows.iter().filter_map(|r| r.size)),
            time: median(rows.iter().filter_map(|r| r.time)),
            coverage: median(rows.iter().filter_map(|r| r.coverage)),
            size_ratio: median(rows.iter().filter_map(|r| r.size_ratio)),
        })
        .collect()
}

pub fn summary_frame(rows: &[SummaryRow]) -> Result<DataFrame> {
    df!(
        "SampleType" => rows.iter().map(|r| r.sample_type.clone()).collect::<Vec<_>>(),
        "Metric" => rows.iter().map(|r| r.metric.clone()).collect::<Vec<_>>(),
        "Count" => rows.iter().map(|r| r.count).collect::<Vec<_>>(),
        "Size" => rows.iter().map(|r| r.size).collect::<Vec<_>>(),
        "Time" => rows.iter().map(|r| r.time).collect::<Vec<_>>(),
        "Coverage" => rows.iter().map(|r| r.coverage).collect::<Vec<_>>(),
        "SizeRatio" => rows.iter().map(|r| r.size_ratio).collect::<Vec<_>>(),
    )
    .map_err(|e| export_error("summary", e))
}
