use crate::charts::ChartSpec;
use crate::labels::format_number;
use crate::prepare::aggregate::median;
use std::fmt::Write;

/// Text summary of a chart: points and median y per panel and series.
pub fn chart_summary(spec: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} points, y: {})",
        spec.name,
        spec.point_count(),
        spec.y_label
    );
    for panel in &spec.panels {
        if let Some(title) = &panel.title {
            let _ = writeln!(out, "  [{title}]");
        }
        for s in &panel.series {
            let med = median(s.points.iter().map(|p| p.y))
                .map(|m| format_number(m, 2))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "    {:<28} n={:<6} median={}", s.label, s.points.len(), med);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::catalog;
    use crate::model::PreparedTable;
    use crate::prepare::tests_support::row;

    #[test]
    fn summary_lists_series_with_medians() {
        let table = PreparedTable::new(vec![
            row("r_RandomSampleReducer_1", "f_1"),
            row("r_RandomSampleReducer_1", "f_2"),
        ]);
        let text = chart_summary(&catalog::size_per_sample_type(&table));
        assert!(text.starts_with("size_per_sample_type (2 points, y: Sample Size)"));
        assert!(text.contains("$t = 1$"));
        assert!(text.contains("median=10.00"));
    }
}
