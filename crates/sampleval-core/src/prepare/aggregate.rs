use super::normalize::NormalizedSample;
use crate::model::CoverageRecord;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One sample paired with one metric and, if recorded, its coverage measurement.
#[derive(Debug, Clone)]
pub struct MetricRow<'a> {
    pub sample: &'a NormalizedSample,
    pub metric: &'a str,
    pub coverage: Option<&'a CoverageRecord>,
}

/// Distinct metric codes in first-appearance order. Records without a t-value
/// carry no metric and are skipped.
pub fn distinct_metrics(coverage: &[CoverageRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for metric in coverage.iter().filter_map(CoverageRecord::metric) {
        if seen.insert(metric.clone()) {
            out.push(metric);
        }
    }
    out
}

/// Cross-joins every sample with every metric, then left-joins the coverage
/// records on (sample id, metric).
///
/// A pair without a record yields one row with no coverage; a pair with
/// several records yields one row per record.
pub fn cross_join_coverage<'a>(
    samples: &'a [NormalizedSample],
    metrics: &'a [String],
    coverage: &'a [CoverageRecord],
) -> Vec<MetricRow<'a>> {
    let mut by_key: HashMap<(i32, String), Vec<&'a CoverageRecord>> = HashMap::new();
    for rec in coverage {
        if let Some(metric) = rec.metric() {
            by_key.entry((rec.sample_id, metric)).or_default().push(rec);
        }
    }

    let mut rows = Vec::with_capacity(samples.len() * metrics.len());
    for sample in samples {
        for metric in metrics {
            match by_key.get(&(sample.id, metric.clone())) {
                Some(records) => rows.extend(records.iter().map(|rec| MetricRow {
                    sample,
                    metric: metric.as_str(),
                    coverage: Some(*rec),
                })),
                None => rows.push(MetricRow {
                    sample,
                    metric: metric.as_str(),
                    coverage: None,
                }),
            }
        }
    }
    rows
}

/// Identifies one logical configuration; repeated runs share a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub system_id: i32,
    pub model_id: i32,
    pub kind: String,
    pub original_id: i32,
    pub algorithm_variant: String,
    pub t: i32,
    pub metric: String,
}

/// One row per [`GroupKey`]: medians for measurements, first row for the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub key: GroupKey,
    pub id: i32,
    pub path: String,
    pub algorithm: String,
    pub size: Option<f64>,
    pub time: Option<f64>,
    pub error: bool,
    pub timeout: bool,
    pub coverage_variable_count: Option<i64>,
    pub coverage_t: Option<i32>,
    pub coverage_type: Option<String>,
    pub coverage: Option<f64>,
}

/// Groups rows by [`GroupKey`], output sorted by key.
pub fn aggregate(rows: &[MetricRow<'_>]) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<GroupKey, Vec<&MetricRow<'_>>> = BTreeMap::new();
    for row in rows {
        let s = row.sample;
        let key = GroupKey {
            system_id: s.system_id,
            model_id: s.model_id,
            kind: s.kind.clone(),
            original_id: s.original_id,
            algorithm_variant: s.algorithm_variant.clone(),
            t: s.t,
            metric: row.metric.to_string(),
        };
        groups.entry(key).or_default().push(row);
    }

    groups
        .into_iter()
        .filter_map(|(key, members)| {
            let first = *members.first()?;
            let size = median(members.iter().filter_map(|r| r.sample.size));
            let time = median(members.iter().filter_map(|r| r.sample.time));
            let coverage = median(
                members
                    .iter()
                    .filter_map(|r| r.coverage.and_then(|c| c.coverage)),
            );
            Some(AggregatedRow {
                key,
                id: first.sample.id,
                path: first.sample.path.clone(),
                algorithm: first.sample.algorithm.clone(),
                size,
                time,
                error: first.sample.error,
                timeout: first.sample.timeout,
                coverage_variable_count: first.coverage.map(|c| c.variable_count),
                coverage_t: first.coverage.and_then(|c| c.t),
                coverage_type: first.coverage.map(|c| c.coverage_type.clone()),
                coverage,
            })
        })
        .collect()
}

/// Median of the present values, `None` when there are none.
pub fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut vs: Vec<f64> = values.filter(|v| !v.is_nan()).collect();
    if vs.is_empty() {
        return None;
    }
    vs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = vs.len() / 2;
    if vs.len() % 2 == 1 {
        Some(vs[mid])
    } else {
        Some((vs[mid - 1] + vs[mid]) / 2.0)
    }
}
