use crate::errors::{PipelineError, Result};
use crate::model::Sample;

/// Seconds recorded for runs that hit the sampling timeout.
pub const TIMEOUT_SECONDS: f64 = 3600.0;

const SAMPLES_FILE: &str = "samples.csv";

/// A sample after unit conversion and error/timeout cleanup.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSample {
    pub id: i32,
    pub system_id: i32,
    pub model_id: i32,
    pub path: String,
    pub kind: String,
    /// Algorithm, or the path when the algorithm is missing. Grouping key only.
    pub algorithm_variant: String,
    /// Algorithm, or the sample type when the algorithm is missing.
    pub algorithm: String,
    pub t: i32,
    pub size: Option<f64>,
    /// Seconds.
    pub time: Option<f64>,
    pub original_id: i32,
    pub error: bool,
    pub timeout: bool,
}

pub fn normalize_samples(samples: &[Sample]) -> Result<Vec<NormalizedSample>> {
    samples.iter().map(normalize_sample).collect()
}

pub fn normalize_sample(s: &Sample) -> Result<NormalizedSample> {
    let algorithm = s.algorithm.as_deref().filter(|a| !a.is_empty());
    let algorithm_variant = algorithm.unwrap_or(&s.path).to_string();
    let algorithm_name = algorithm.unwrap_or(&s.kind).to_string();

    let mut time = s.time.map(|ns| (ns / 1_000_000.0) / 1000.0);
    if s.timeout {
        time = Some(TIMEOUT_SECONDS);
    }
    if s.error {
        time = None;
    }
    if !s.timeout && !s.error && time.is_some_and(|t| t < 0.0) {
        time = None;
    }

    let size = if s.timeout || s.error {
        None
    } else {
        s.size.map(|v| v as f64)
    };

    let t = if s.kind == "c" {
        t_from_path(&s.path)?
    } else {
        s.t.unwrap_or(0)
    };

    Ok(NormalizedSample {
        id: s.id,
        system_id: s.system_id,
        model_id: s.model_id,
        path: s.path.clone(),
        kind: s.kind.clone(),
        algorithm_variant,
        algorithm: algorithm_name,
        t,
        size,
        time,
        original_id: s.original_id,
        error: s.error,
        timeout: s.timeout,
    })
}

/// Combined samples encode their t-value as the last character of the path.
fn t_from_path(path: &str) -> Result<i32> {
    path.trim()
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as i32)
        .ok_or_else(|| {
            PipelineError::schema(
                SAMPLES_FILE,
                format!("combined sample path '{path}' does not end in a t-value"),
            )
        })
}
