use serde::{Deserialize, Serialize};

/// Marker used for a missing original sample type in composite keys.
pub const NA: &str = "<NA>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i32,
    pub system_id: i32,
    pub version: String,
    pub variable_count: Option<i64>,
    pub clause_count: Option<i64>,
}

/// One line of `samples.csv`. `time` is still in raw nanoseconds here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: i32,
    pub system_id: i32,
    pub model_id: i32,
    pub path: String,
    /// `f` field, `c` combined, `t` t-wise, `r` reduced
    pub kind: String,
    pub algorithm: Option<String>,
    pub algorithm_it: i32,
    pub t: Option<i32>,
    pub size: Option<i64>,
    pub time: Option<f64>,
    pub original_id: i32,
    pub error: bool,
    pub timeout: bool,
    pub seed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub sample_id: i32,
    pub variable_count: i64,
    pub coverage_type: String,
    pub t: Option<i32>,
    pub coverage: Option<f64>,
}

impl CoverageRecord {
    /// Metric code such as `f_1` or `t_2`.
    pub fn metric(&self) -> Option<String> {
        self.t.map(|t| format!("{}_{}", self.coverage_type, t))
    }
}

/// The four raw tables a preparation run starts from.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub systems: Vec<System>,
    pub models: Vec<Model>,
    pub samples: Vec<Sample>,
    pub coverage: Vec<CoverageRecord>,
}

/// One denormalized row: a sample group joined with one coverage metric and,
/// where it exists, the original sample it was derived from (`*_org`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PreparedRow {
    #[serde(rename = "SampleID")]
    pub sample_id: i32,
    #[serde(rename = "SystemID")]
    pub system_id: i32,
    #[serde(rename = "ModelID")]
    pub model_id: i32,
    pub system_name: Option<String>,
    pub version: Option<String>,
    pub model_variable_count: Option<i64>,
    pub clause_count: Option<i64>,
    pub sample_type: String,
    pub complete_type: String,
    pub sample_type_display1: String,
    pub sample_type_display2: String,
    #[serde(rename = "SampleType_org")]
    pub sample_type_org: Option<String>,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Type_org")]
    pub kind_org: Option<String>,
    pub algorithm: String,
    pub t: i32,
    pub reduced: bool,
    pub coverage_variable_count: Option<i64>,
    pub size: Option<f64>,
    pub time: Option<f64>,
    pub coverage_metric: String,
    pub coverage_type: Option<String>,
    pub coverage_t: Option<i32>,
    pub coverage: Option<f64>,
    #[serde(rename = "CoverageVariableCount_org")]
    pub coverage_variable_count_org: Option<i64>,
    #[serde(rename = "Size_org")]
    pub size_org: Option<f64>,
    #[serde(rename = "Time_org")]
    pub time_org: Option<f64>,
    #[serde(rename = "Coverage_org")]
    pub coverage_org: Option<f64>,
    pub size_diff: Option<f64>,
    pub size_ratio: Option<f64>,
    pub time_diff: Option<f64>,
    pub time_ratio: Option<f64>,
    pub coverage_diff: Option<f64>,
    pub coverage_ratio: Option<f64>,
    pub path: String,
    #[serde(rename = "OriginalID")]
    pub original_id: i32,
    pub error: bool,
    pub timeout: bool,
}

impl PreparedRow {
    /// Rows that represent a successful, finished sampling run.
    pub fn is_clean(&self) -> bool {
        !self.error && !self.timeout
    }
}

/// Output column order of the prepared table.
pub const PREPARED_COLUMNS: [&str; 38] = [
    "SampleID",
    "SystemID",
    "ModelID",
    "SystemName",
    "Version",
    "ModelVariableCount",
    "ClauseCount",
    "SampleType",
    "CompleteType",
    "SampleTypeDisplay1",
    "SampleTypeDisplay2",
    "SampleType_org",
    "Type",
    "Type_org",
    "Algorithm",
    "T",
    "Reduced",
    "CoverageVariableCount",
    "Size",
    "Time",
    "CoverageMetric",
    "CoverageType",
    "CoverageT",
    "Coverage",
    "CoverageVariableCount_org",
    "Size_org",
    "Time_org",
    "Coverage_org",
    "SizeDiff",
    "SizeRatio",
    "TimeDiff",
    "TimeRatio",
    "CoverageDiff",
    "CoverageRatio",
    "Path",
    "OriginalID",
    "Error",
    "Timeout",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreparedTable {
    pub rows: Vec<PreparedRow>,
}

impl PreparedTable {
    pub fn new(rows: Vec<PreparedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedRow> {
        self.rows.iter()
    }
}
