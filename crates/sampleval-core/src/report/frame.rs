//! Prepared table to polars frame, and frame to CSV.

use crate::errors::{PipelineError, Result};
use crate::model::PreparedTable;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub(crate) fn export_error(table: &str, err: PolarsError) -> PipelineError {
    PipelineError::Export {
        table: table.to_string(),
        message: err.to_string(),
    }
}

macro_rules! column {
    ($table:expr, $name:literal, |$r:ident| $value:expr) => {
        Column::new(
            $name.into(),
            $table.iter().map(|$r| $value).collect::<Vec<_>>(),
        )
    };
}

/// The prepared table as a frame, columns in export order.
pub fn prepared_frame(table: &PreparedTable) -> Result<DataFrame> {
    let t = table;
    let columns = vec![
        column!(t, "SampleID", |r| r.sample_id),
        column!(t, "SystemID", |r| r.system_id),
        column!(t, "ModelID", |r| r.model_id),
        column!(t, "SystemName", |r| r.system_name.clone()),
        column!(t, "Version", |r| r.version.clone()),
        column!(t, "ModelVariableCount", |r| r.model_variable_count),
        column!(t, "ClauseCount", |r| r.clause_count),
        column!(t, "SampleType", |r| r.sample_type.clone()),
        column!(t, "CompleteType", |r| r.complete_type.clone()),
        column!(t, "SampleTypeDisplay1", |r| r.sample_type_display1.clone()),
        column!(t, "SampleTypeDisplay2", |r| r.sample_type_display2.clone()),
        column!(t, "SampleType_org", |r| r.sample_type_org.clone()),
        column!(t, "Type", |r| r.kind.clone()),
        column!(t, "Type_org", |r| r.kind_org.clone()),
        column!(t, "Algorithm", |r| r.algorithm.clone()),
        column!(t, "T", |r| r.t),
        column!(t, "Reduced", |r| r.reduced),
        column!(t, "CoverageVariableCount", |r| r.coverage_variable_count),
        column!(t, "Size", |r| r.size),
        column!(t, "Time", |r| r.time),
        column!(t, "CoverageMetric", |r| r.coverage_metric.clone()),
        column!(t, "CoverageType", |r| r.coverage_type.clone()),
        column!(t, "CoverageT", |r| r.coverage_t),
        column!(t, "Coverage", |r| r.coverage),
        column!(t, "CoverageVariableCount_org", |r| r.coverage_variable_count_org),
        column!(t, "Size_org", |r| r.size_org),
        column!(t, "Time_org", |r| r.time_org),
        column!(t, "Coverage_org", |r| r.coverage_org),
        column!(t, "SizeDiff", |r| r.size_diff),
        column!(t, "SizeRatio", |r| r.size_ratio),
        column!(t, "TimeDiff", |r| r.time_diff),
        column!(t, "TimeRatio", |r| r.time_ratio),
        column!(t, "CoverageDiff", |r| r.coverage_diff),
        column!(t, "CoverageRatio", |r| r.coverage_ratio),
        column!(t, "Path", |r| r.path.clone()),
        column!(t, "OriginalID", |r| r.original_id),
        column!(t, "Error", |r| r.error),
        column!(t, "Timeout", |r| r.timeout),
    ];
    DataFrame::new(columns).map_err(|e| export_error("complete", e))
}

/// Writes `df` with a header row and `;` separators; nulls become empty cells.
pub fn write_csv(name: &str, df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b';')
        .finish(df)
        .map_err(|e| export_error(name, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PREPARED_COLUMNS;
    use crate::prepare::tests_support::row;

    #[test]
    fn frame_follows_export_column_order() {
        let table = PreparedTable::new(vec![row("r_x_1", "f_1"), row("r_x_1", "f_2")]);
        let df = prepared_frame(&table).unwrap();
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, PREPARED_COLUMNS.to_vec());
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn csv_uses_semicolons_and_empty_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complete.csv");
        let table = PreparedTable::new(vec![row("r_x_1", "f_1")]);
        let mut df = prepared_frame(&table).unwrap();
        write_csv("complete", &mut df, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split(';').collect();
        assert_eq!(header, PREPARED_COLUMNS.to_vec());
        let cells: Vec<&str> = lines.next().unwrap().split(';').collect();
        assert_eq!(cells.len(), PREPARED_COLUMNS.len());
        // TimeRatio is null in the fixture row
        assert_eq!(cells[31], "");
        assert_eq!(cells[7], "r_x_1");
    }
}
