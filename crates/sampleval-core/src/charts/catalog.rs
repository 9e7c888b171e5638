//! The fixed set of comparison charts of the sample-reduction study.

use super::{categories_of, into_panels, ChartKind, ChartSpec, Observation, XValue};
use crate::labels::{self, MAIN_SAMPLE_TYPES, REDUCERS};
use crate::model::{PreparedRow, PreparedTable};

const T_LEGEND: &str = "t-value used for reduction/sampling";
const FIELD_T1: &str = "f_1";

type RowFn<T> = fn(&PreparedRow) -> T;

struct Recipe {
    keep: RowFn<bool>,
    x: RowFn<Option<XValue>>,
    y: RowFn<Option<f64>>,
    group: RowFn<String>,
    facet: Option<RowFn<String>>,
}

fn observe(table: &PreparedTable, recipe: &Recipe) -> Vec<Observation> {
    table
        .iter()
        .filter(|r| (recipe.keep)(r))
        .filter_map(|r| {
            Some(Observation {
                facet: recipe.facet.map(|f| f(r)),
                group: (recipe.group)(r),
                x: (recipe.x)(r)?,
                y: (recipe.y)(r)?,
            })
        })
        .collect()
}

fn in_main_types(r: &PreparedRow) -> bool {
    MAIN_SAMPLE_TYPES.contains(&r.sample_type_display1.as_str())
}

fn system_x(r: &PreparedRow) -> Option<XValue> {
    r.system_name.clone().map(XValue::Category)
}

fn t_group(r: &PreparedRow) -> String {
    labels::t_label(r.t)
}

fn metric_facet(r: &PreparedRow) -> String {
    labels::metric_label(&r.coverage_metric)
}

fn sample_type_group(r: &PreparedRow) -> String {
    r.sample_type_display1.clone()
}

fn reducer_order() -> Vec<&'static str> {
    REDUCERS.iter().map(|(_, short)| *short).collect()
}

/// Every study chart, in output order.
pub fn all_charts(table: &PreparedTable) -> Vec<ChartSpec> {
    vec![
        time_per_system_and_sample_type(table),
        size_per_system_and_sample_type(table),
        new_size_per_org_size_and_reduction_type(table),
        size_per_sample_type(table),
        size_per_t(table),
        coverage_per_sample_type_and_coverage_type(table),
    ]
}

/// Sampling time per system, one jittered point per sample. Timeouts are kept
/// and show up at the sentinel time.
pub fn time_per_system_and_sample_type(table: &PreparedTable) -> ChartSpec {
    let obs = observe(
        table,
        &Recipe {
            keep: |r| !r.error && r.coverage_metric.starts_with(FIELD_T1) && in_main_types(r),
            x: system_x,
            y: |r| r.time,
            group: sample_type_group,
            facet: Some(t_group),
        },
    );
    ChartSpec {
        name: "time_per_system_and_sample_type",
        kind: ChartKind::Scatter { jitter: 0.3 },
        x_label: "System Name".into(),
        y_label: "Sampling Time (in seconds)".into(),
        legend_title: String::new(),
        log_x: false,
        log_y: true,
        categories: categories_of(&obs, &[]),
        panels: into_panels(obs, &MAIN_SAMPLE_TYPES),
    }
}

pub fn size_per_system_and_sample_type(table: &PreparedTable) -> ChartSpec {
    let obs = observe(
        table,
        &Recipe {
            keep: |r| r.is_clean() && r.coverage_metric.starts_with(FIELD_T1) && in_main_types(r),
            x: system_x,
            y: |r| r.size,
            group: sample_type_group,
            facet: Some(t_group),
        },
    );
    ChartSpec {
        name: "size_per_system_and_sample_type",
        kind: ChartKind::Scatter { jitter: 0.3 },
        x_label: "System Name".into(),
        y_label: "Sample Size".into(),
        legend_title: String::new(),
        log_x: false,
        log_y: true,
        categories: categories_of(&obs, &[]),
        panels: into_panels(obs, &MAIN_SAMPLE_TYPES),
    }
}

/// Reduced size against original size for reductions of field samples.
pub fn new_size_per_org_size_and_reduction_type(table: &PreparedTable) -> ChartSpec {
    let obs = observe(
        table,
        &Recipe {
            keep: |r| {
                r.coverage_metric.starts_with(FIELD_T1)
                    && r.is_clean()
                    && r.kind_org.as_deref() == Some("f")
                    && labels::is_reducer(&r.algorithm)
            },
            x: |r| r.size_org.map(XValue::Value),
            y: |r| r.size,
            group: |r| labels::reducer_label(&r.algorithm),
            facet: Some(t_group),
        },
    );
    ChartSpec {
        name: "new_size_per_org_size_and_reduction_type",
        kind: ChartKind::Scatter { jitter: 0.0 },
        x_label: "Original Sample Size".into(),
        y_label: "Reduced Sample Size".into(),
        legend_title: "Reduce Algorithm".into(),
        log_x: true,
        log_y: true,
        categories: Vec::new(),
        panels: into_panels(obs, &reducer_order()),
    }
}

pub fn size_per_sample_type(table: &PreparedTable) -> ChartSpec {
    let obs = observe(
        table,
        &Recipe {
            keep: |r| r.is_clean() && in_main_types(r),
            x: |r| Some(XValue::Category(r.sample_type_display1.clone())),
            y: |r| r.size,
            group: t_group,
            facet: None,
        },
    );
    ChartSpec {
        name: "size_per_sample_type",
        kind: ChartKind::Boxplot,
        x_label: "Sample Type".into(),
        y_label: "Sample Size".into(),
        legend_title: T_LEGEND.into(),
        log_x: false,
        log_y: true,
        categories: categories_of(&obs, &MAIN_SAMPLE_TYPES),
        panels: into_panels(obs, &[]),
    }
}

pub fn size_per_t(table: &PreparedTable) -> ChartSpec {
    let obs = observe(
        table,
        &Recipe {
            keep: |r| r.is_clean() && in_main_types(r),
            x: |r| Some(XValue::Category(labels::t_label(r.t))),
            y: |r| r.size,
            group: sample_type_group,
            facet: None,
        },
    );
    ChartSpec {
        name: "size_per_t",
        kind: ChartKind::Boxplot,
        x_label: T_LEGEND.into(),
        y_label: "Sample Size".into(),
        legend_title: String::new(),
        log_x: false,
        log_y: true,
        categories: categories_of(&obs, &[]),
        panels: into_panels(obs, &MAIN_SAMPLE_TYPES),
    }
}

pub fn coverage_per_sample_type_and_coverage_type(table: &PreparedTable) -> ChartSpec {
    let obs = observe(
        table,
        &Recipe {
            keep: |r| r.is_clean() && in_main_types(r),
            x: |r| Some(XValue::Category(r.sample_type_display1.clone())),
            y: |r| r.coverage,
            group: t_group,
            facet: Some(metric_facet),
        },
    );
    ChartSpec {
        name: "coverage_per_sample_type_and_coverage_type",
        kind: ChartKind::Boxplot,
        x_label: "Sample Type".into(),
        y_label: "Coverage".into(),
        legend_title: T_LEGEND.into(),
        log_x: false,
        log_y: false,
        categories: categories_of(&obs, &MAIN_SAMPLE_TYPES),
        panels: into_panels(obs, &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prepare::tests_support::row;

    fn table() -> PreparedTable {
        let field_scoring = PreparedRow {
            sample_type_display1: "Field (Scoring)".into(),
            algorithm: "BitSetScoring1SampleReducer".into(),
            size: Some(12.0),
            ..row("r_BitSetScoring1SampleReducer_1", "f_1")
        };
        let timed_out = PreparedRow {
            timeout: true,
            size: None,
            time: Some(3600.0),
            ..row("r_RandomSampleReducer_1", "f_1")
        };
        let errored = PreparedRow {
            error: true,
            size: None,
            time: None,
            ..row("r_RandomSampleReducer_1", "f_1")
        };
        let yasa = PreparedRow {
            sample_type_display1: "YASA".into(),
            kind: "t".into(),
            kind_org: None,
            algorithm: "yasa".into(),
            t: 2,
            size_org: None,
            ..row("t_yasa_2", "f_1")
        };
        let field_t2_metric = row("r_RandomSampleReducer_1", "f_2");
        let unmapped = PreparedRow {
            sample_type_display1: "f_f_0__<NA>".into(),
            kind: "f".into(),
            kind_org: None,
            algorithm: "f".into(),
            t: 0,
            ..row("f_f_0", "f_1")
        };
        PreparedTable::new(vec![
            field_scoring,
            timed_out,
            errored,
            yasa,
            field_t2_metric,
            unmapped,
        ])
    }

    #[test]
    fn time_chart_keeps_timeouts_but_not_errors() {
        let spec = time_per_system_and_sample_type(&table());
        // scoring, timeout, yasa on the f_1 metric
        assert_eq!(spec.point_count(), 3);
        assert!(spec.log_y);
        assert_eq!(spec.panels.len(), 2);
        assert_eq!(spec.categories, vec!["busybox"]);
    }

    #[test]
    fn size_chart_drops_timeouts() {
        let spec = size_per_system_and_sample_type(&table());
        assert_eq!(spec.point_count(), 2);
        assert_eq!(spec.series_labels(), vec!["Field (Scoring)", "YASA"]);
    }

    #[test]
    fn reduction_scatter_only_covers_reducers_of_field_samples() {
        let spec = new_size_per_org_size_and_reduction_type(&table());
        assert_eq!(spec.point_count(), 1);
        assert_eq!(spec.series_labels(), vec!["Scoring"]);
        assert!(spec.log_x && spec.log_y);
        let p = &spec.panels[0].series[0].points[0];
        assert_eq!(p.x, XValue::Value(40.0));
        assert_eq!(p.y, 12.0);
    }

    #[test]
    fn boxplots_group_by_t_and_order_categories() {
        let spec = size_per_sample_type(&table());
        assert_eq!(spec.kind, ChartKind::Boxplot);
        assert_eq!(
            spec.categories,
            vec!["Field (Scoring)", "Field (Random)", "YASA"]
        );
        assert_eq!(spec.series_labels(), vec!["$t = 1$", "$t = 2$"]);

        let by_t = size_per_t(&table());
        assert_eq!(by_t.categories, vec!["$t = 1$", "$t = 2$"]);
    }

    #[test]
    fn coverage_chart_faceted_by_metric() {
        let spec = coverage_per_sample_type_and_coverage_type(&table());
        let titles: Vec<&str> = spec
            .panels
            .iter()
            .filter_map(|p| p.title.as_deref())
            .collect();
        assert_eq!(titles, vec!["$1$-Wise Fieldcoverage", "$2$-Wise Fieldcoverage"]);
        assert!(!spec.log_y);
    }

    #[test]
    fn catalog_has_six_charts() {
        let names: Vec<&str> = all_charts(&table()).iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"size_per_t"));
    }
}
