//! Builds the prepared table from the four raw experiment tables.
//!
//! Pipeline: normalize samples, cross-join with coverage metrics, collapse
//! repeated runs, attach system/model attributes, then self-join every row
//! with the row of its original sample to derive diff and ratio columns.

pub mod aggregate;
pub mod normalize;

use crate::errors::Result;
use crate::ingest;
use crate::labels;
use crate::model::{PreparedRow, PreparedTable, RawTables, NA};
use aggregate::AggregatedRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// Final row filter for one system family whose data collection produced
/// duplicate rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFilter {
    /// Keep every row. The historical filter condition is always true, so
    /// this reproduces its output.
    #[default]
    Off,
    /// Drop t-wise and field rows of the family, and reduced rows whose
    /// original is a combined sample.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareOptions {
    pub duplicate_filter: DuplicateFilter,
    pub duplicate_system_prefix: String,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            duplicate_filter: DuplicateFilter::Off,
            duplicate_system_prefix: "Automotive".to_string(),
        }
    }
}

/// Loads every table below `data_root` and prepares it.
pub fn prepare_from_dir(data_root: &Path, options: &PrepareOptions) -> Result<PreparedTable> {
    tracing::info!(event = "prepare_start", root = %data_root.display());
    let raw = ingest::schema::load_raw_tables(data_root)?;
    prepare(&raw, options)
}

pub fn prepare(raw: &RawTables, options: &PrepareOptions) -> Result<PreparedTable> {
    let samples = normalize::normalize_samples(&raw.samples)?;
    let metrics = aggregate::distinct_metrics(&raw.coverage);
    let joined = aggregate::cross_join_coverage(&samples, &metrics, &raw.coverage);
    tracing::debug!(
        event = "coverage_joined",
        samples = samples.len(),
        metrics = metrics.len(),
        rows = joined.len()
    );

    let aggregated = aggregate::aggregate(&joined);
    tracing::debug!(event = "aggregated", groups = aggregated.len());

    let systems: HashMap<i32, &str> = raw
        .systems
        .iter()
        .rev()
        .map(|s| (s.id, s.name.as_str()))
        .collect();
    let models: HashMap<i32, &crate::model::Model> =
        raw.models.iter().rev().map(|m| (m.id, m)).collect();

    let own: Vec<PreparedRow> = aggregated
        .iter()
        .map(|a| base_row(a, &systems, &models))
        .collect();

    let mut rows = attach_originals(own);
    sort_rows(&mut rows);
    let rows = apply_duplicate_filter(rows, options);

    tracing::info!(event = "prepare_done", rows = rows.len());
    Ok(PreparedTable::new(rows))
}

fn base_row(
    a: &AggregatedRow,
    systems: &HashMap<i32, &str>,
    models: &HashMap<i32, &crate::model::Model>,
) -> PreparedRow {
    let model = models.get(&a.key.model_id);
    let sample_type = format!("{}_{}_{}", a.key.kind, a.algorithm, a.key.t);
    PreparedRow {
        sample_id: a.id,
        system_id: a.key.system_id,
        model_id: a.key.model_id,
        system_name: systems.get(&a.key.system_id).map(|s| s.to_string()),
        version: model.map(|m| m.version.clone()),
        model_variable_count: model.and_then(|m| m.variable_count),
        clause_count: model.and_then(|m| m.clause_count),
        complete_type: String::new(),
        sample_type_display1: String::new(),
        sample_type_display2: String::new(),
        sample_type,
        sample_type_org: None,
        reduced: a.key.kind.contains('r'),
        kind: a.key.kind.clone(),
        kind_org: None,
        algorithm: a.algorithm.clone(),
        t: a.key.t,
        coverage_variable_count: a.coverage_variable_count,
        size: a.size,
        time: a.time,
        coverage_metric: a.key.metric.clone(),
        coverage_type: a.coverage_type.clone(),
        coverage_t: a.coverage_t,
        coverage: a.coverage,
        coverage_variable_count_org: None,
        size_org: None,
        time_org: None,
        coverage_org: None,
        size_diff: None,
        size_ratio: None,
        time_diff: None,
        time_ratio: None,
        coverage_diff: None,
        coverage_ratio: None,
        path: a.path.clone(),
        original_id: a.key.original_id,
        error: a.error,
        timeout: a.timeout,
    }
}

/// Left self-join on (original id, metric) = (sample id, metric), followed by
/// the derived diff/ratio and label columns.
fn attach_originals(own: Vec<PreparedRow>) -> Vec<PreparedRow> {
    let mut index: HashMap<(i32, &str), usize> = HashMap::new();
    for (i, row) in own.iter().enumerate() {
        index
            .entry((row.sample_id, row.coverage_metric.as_str()))
            .or_insert(i);
    }

    let mut out = Vec::with_capacity(own.len());
    for row in &own {
        let org = index
            .get(&(row.original_id, row.coverage_metric.as_str()))
            .map(|&i| &own[i]);
        let mut row = row.clone();
        if let Some(org) = org {
            row.sample_type_org = Some(org.sample_type.clone());
            row.kind_org = Some(org.kind.clone());
            row.coverage_variable_count_org = org.coverage_variable_count;
            row.size_org = org.size;
            row.time_org = org.time;
            row.coverage_org = org.coverage;
        }
        row.size_diff = diff(row.size, row.size_org);
        row.size_ratio = ratio(row.size, row.size_org);
        row.time_diff = diff(row.time, row.time_org);
        row.time_ratio = ratio(row.time, row.time_org);
        row.coverage_diff = diff(row.coverage, row.coverage_org);
        row.coverage_ratio = ratio(row.coverage, row.coverage_org);

        row.complete_type = format!(
            "{}__{}",
            row.sample_type,
            row.sample_type_org.as_deref().unwrap_or(NA)
        );
        row.sample_type_display1 = labels::sample_type_short(&row.complete_type);
        row.sample_type_display2 = labels::sample_type_long(&row.complete_type);
        out.push(row);
    }
    out
}

/// `original - current`.
pub fn diff(current: Option<f64>, original: Option<f64>) -> Option<f64> {
    Some(original? - current?)
}

/// `1 - current / original`; undefined for a zero original.
pub fn ratio(current: Option<f64>, original: Option<f64>) -> Option<f64> {
    let (current, original) = (current?, original?);
    if original == 0.0 {
        return None;
    }
    Some(1.0 - current / original)
}

fn sort_rows(rows: &mut [PreparedRow]) {
    rows.sort_by(|a, b| {
        a.system_id
            .cmp(&b.system_id)
            .then_with(|| a.model_id.cmp(&b.model_id))
            .then_with(|| nulls_last(a.version.as_deref(), b.version.as_deref()))
            .then_with(|| a.complete_type.cmp(&b.complete_type))
            .then_with(|| a.coverage_metric.cmp(&b.coverage_metric))
    });
}

fn nulls_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn apply_duplicate_filter(rows: Vec<PreparedRow>, options: &PrepareOptions) -> Vec<PreparedRow> {
    let prefix = options.duplicate_system_prefix.as_str();
    match options.duplicate_filter {
        DuplicateFilter::Off => {
            let affected = rows.iter().filter(|r| in_family(r, prefix)).count();
            if affected > 0 {
                tracing::warn!(
                    event = "duplicate_filter_off",
                    prefix,
                    rows = affected,
                    "rows of the '{}' family are kept; the historical filter never drops rows",
                    prefix
                );
            }
            rows
        }
        DuplicateFilter::Strict => {
            let before = rows.len();
            let kept: Vec<PreparedRow> = rows
                .into_iter()
                .filter(|r| !(in_family(r, prefix) && is_duplicate_kind(r)))
                .collect();
            tracing::info!(
                event = "duplicate_filter_strict",
                prefix,
                dropped = before - kept.len()
            );
            kept
        }
    }
}

fn in_family(row: &PreparedRow, prefix: &str) -> bool {
    row.system_name
        .as_deref()
        .is_some_and(|name| name.starts_with(prefix))
}

fn is_duplicate_kind(row: &PreparedRow) -> bool {
    match row.kind.as_str() {
        "t" | "f" => true,
        "r" => row.kind_org.as_deref() == Some("c"),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::model::PreparedRow;

    /// A fully populated row for tests that only care about a few columns.
    pub fn row(sample_type: &str, metric: &str) -> PreparedRow {
        PreparedRow {
            sample_id: 1,
            system_id: 1,
            model_id: 1,
            system_name: Some("busybox".into()),
            version: Some("1.0".into()),
            model_variable_count: Some(100),
            clause_count: Some(300),
            sample_type: sample_type.into(),
            complete_type: format!("{sample_type}__f_f_0"),
            sample_type_display1: "Field (Random)".into(),
            sample_type_display2: "Field (Random, $t=1$)".into(),
            sample_type_org: Some("f_f_0".into()),
            kind: "r".into(),
            kind_org: Some("f".into()),
            algorithm: "RandomSampleReducer".into(),
            t: 1,
            reduced: true,
            coverage_variable_count: Some(100),
            size: Some(10.0),
            time: Some(1.5),
            coverage_metric: metric.into(),
            coverage_type: Some("f".into()),
            coverage_t: Some(1),
            coverage: Some(0.9),
            coverage_variable_count_org: Some(100),
            size_org: Some(40.0),
            time_org: Some(0.0),
            coverage_org: Some(1.0),
            size_diff: Some(30.0),
            size_ratio: Some(0.75),
            time_diff: Some(-1.5),
            time_ratio: None,
            coverage_diff: Some(0.1),
            coverage_ratio: Some(0.09999999999999998),
            path: "1.0/f_r_RandomSampleReducer_i0_s0_t1".into(),
            original_id: 2,
            error: false,
            timeout: false,
        }
    }
}
