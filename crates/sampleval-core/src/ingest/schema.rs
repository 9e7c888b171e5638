use crate::errors::{PipelineError, Result};
use crate::model::{CoverageRecord, Model, RawTables, Sample, System};
use polars::prelude::*;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int32,
    Int64,
    Float64,
    Str,
    Bool,
}

impl ColumnType {
    fn dtype(self) -> DataType {
        match self {
            ColumnType::Int32 => DataType::Int32,
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Str => DataType::String,
            ColumnType::Bool => DataType::Boolean,
        }
    }
}

/// Fixed file name plus column→type layout of one input table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub file_name: &'static str,
    pub columns: &'static [(&'static str, ColumnType)],
}

impl TableSchema {
    pub fn polars_schema(&self) -> Schema {
        let mut schema = Schema::with_capacity(self.columns.len());
        for (name, ty) in self.columns {
            schema.with_column((*name).into(), ty.dtype());
        }
        schema
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(name, _)| *name).collect()
    }
}

pub const SYSTEMS: TableSchema = TableSchema {
    file_name: "systems.csv",
    columns: &[("ID", ColumnType::Int32), ("Name", ColumnType::Str)],
};

pub const MODELS: TableSchema = TableSchema {
    file_name: "models.csv",
    columns: &[
        ("ID", ColumnType::Int32),
        ("SystemID", ColumnType::Int32),
        ("Version", ColumnType::Str),
        ("VariableCount", ColumnType::Int64),
        ("ClauseCount", ColumnType::Int64),
    ],
};

pub const SAMPLES: TableSchema = TableSchema {
    file_name: "samples.csv",
    columns: &[
        ("ID", ColumnType::Int32),
        ("SystemID", ColumnType::Int32),
        ("ModelID", ColumnType::Int32),
        ("Path", ColumnType::Str),
        ("Type", ColumnType::Str),
        ("Algorithm", ColumnType::Str),
        ("AlgorithmIt", ColumnType::Int32),
        ("T", ColumnType::Int32),
        ("Size", ColumnType::Int64),
        ("Time", ColumnType::Float64),
        ("OriginalID", ColumnType::Int32),
        ("Error", ColumnType::Bool),
        ("Timeout", ColumnType::Bool),
        ("Seed", ColumnType::Int64),
    ],
};

pub const COVERAGE: TableSchema = TableSchema {
    file_name: "coverage.csv",
    columns: &[
        ("SampleID", ColumnType::Int32),
        ("VariableCount", ColumnType::Int64),
        ("CoverageType", ColumnType::Str),
        ("T", ColumnType::Int32),
        ("Coverage", ColumnType::Float64),
    ],
};

/// Loads and decodes all four tables below `data_root`.
pub fn load_raw_tables(data_root: &Path) -> Result<RawTables> {
    let systems = decode_systems(&super::load_table(data_root, &SYSTEMS)?)?;
    let models = decode_models(&super::load_table(data_root, &MODELS)?)?;
    let coverage = decode_coverage(&super::load_table(data_root, &COVERAGE)?)?;
    let samples = decode_samples(&super::load_table(data_root, &SAMPLES)?)?;
    Ok(RawTables {
        systems,
        models,
        samples,
        coverage,
    })
}

fn series<'a>(df: &'a DataFrame, table: &TableSchema, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|e| PipelineError::schema(table.file_name, e.to_string()))
}

fn i32_col(df: &DataFrame, table: &TableSchema, name: &str) -> Result<Vec<Option<i32>>> {
    let s = series(df, table, name)?;
    let ca = s
        .i32()
        .map_err(|e| PipelineError::schema(table.file_name, e.to_string()))?;
    Ok(ca.into_iter().collect())
}

fn i64_col(df: &DataFrame, table: &TableSchema, name: &str) -> Result<Vec<Option<i64>>> {
    let s = series(df, table, name)?;
    let ca = s
        .i64()
        .map_err(|e| PipelineError::schema(table.file_name, e.to_string()))?;
    Ok(ca.into_iter().collect())
}

fn f64_col(df: &DataFrame, table: &TableSchema, name: &str) -> Result<Vec<Option<f64>>> {
    let s = series(df, table, name)?;
    let ca = s
        .f64()
        .map_err(|e| PipelineError::schema(table.file_name, e.to_string()))?;
    Ok(ca.into_iter().collect())
}

fn str_col(df: &DataFrame, table: &TableSchema, name: &str) -> Result<Vec<Option<String>>> {
    let s = series(df, table, name)?;
    let ca = s
        .str()
        .map_err(|e| PipelineError::schema(table.file_name, e.to_string()))?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn bool_col(df: &DataFrame, table: &TableSchema, name: &str) -> Result<Vec<Option<bool>>> {
    let s = series(df, table, name)?;
    let ca = s
        .bool()
        .map_err(|e| PipelineError::schema(table.file_name, e.to_string()))?;
    Ok(ca.into_iter().collect())
}

fn required<T>(value: Option<T>, table: &TableSchema, column: &str, row: usize) -> Result<T> {
    value.ok_or_else(|| {
        PipelineError::schema(
            table.file_name,
            format!("null in required column '{column}' (row {row})"),
        )
    })
}

pub fn decode_systems(df: &DataFrame) -> Result<Vec<System>> {
    let t = &SYSTEMS;
    let ids = i32_col(df, t, "ID")?;
    let names = str_col(df, t, "Name")?;
    ids.into_iter()
        .zip(names)
        .enumerate()
        .map(|(row, (id, name))| {
            Ok(System {
                id: required(id, t, "ID", row)?,
                name: required(name, t, "Name", row)?,
            })
        })
        .collect()
}

pub fn decode_models(df: &DataFrame) -> Result<Vec<Model>> {
    let t = &MODELS;
    let ids = i32_col(df, t, "ID")?;
    let system_ids = i32_col(df, t, "SystemID")?;
    let versions = str_col(df, t, "Version")?;
    let variables = i64_col(df, t, "VariableCount")?;
    let clauses = i64_col(df, t, "ClauseCount")?;

    let mut out = Vec::with_capacity(ids.len());
    for row in 0..ids.len() {
        out.push(Model {
            id: required(ids[row], t, "ID", row)?,
            system_id: required(system_ids[row], t, "SystemID", row)?,
            version: required(versions[row].clone(), t, "Version", row)?,
            variable_count: variables[row],
            clause_count: clauses[row],
        });
    }
    Ok(out)
}

pub fn decode_samples(df: &DataFrame) -> Result<Vec<Sample>> {
    let t = &SAMPLES;
    let ids = i32_col(df, t, "ID")?;
    let system_ids = i32_col(df, t, "SystemID")?;
    let model_ids = i32_col(df, t, "ModelID")?;
    let paths = str_col(df, t, "Path")?;
    let kinds = str_col(df, t, "Type")?;
    let algorithms = str_col(df, t, "Algorithm")?;
    let iterations = i32_col(df, t, "AlgorithmIt")?;
    let ts = i32_col(df, t, "T")?;
    let sizes = i64_col(df, t, "Size")?;
    let times = f64_col(df, t, "Time")?;
    let originals = i32_col(df, t, "OriginalID")?;
    let errors = bool_col(df, t, "Error")?;
    let timeouts = bool_col(df, t, "Timeout")?;
    let seeds = i64_col(df, t, "Seed")?;

    let mut out = Vec::with_capacity(ids.len());
    for row in 0..ids.len() {
        out.push(Sample {
            id: required(ids[row], t, "ID", row)?,
            system_id: required(system_ids[row], t, "SystemID", row)?,
            model_id: required(model_ids[row], t, "ModelID", row)?,
            path: required(paths[row].clone(), t, "Path", row)?,
            kind: required(kinds[row].clone(), t, "Type", row)?,
            algorithm: algorithms[row].clone(),
            algorithm_it: required(iterations[row], t, "AlgorithmIt", row)?,
            t: ts[row],
            size: sizes[row],
            time: times[row],
            original_id: required(originals[row], t, "OriginalID", row)?,
            error: required(errors[row], t, "Error", row)?,
            timeout: required(timeouts[row], t, "Timeout", row)?,
            seed: required(seeds[row], t, "Seed", row)?,
        });
    }
    Ok(out)
}

pub fn decode_coverage(df: &DataFrame) -> Result<Vec<CoverageRecord>> {
    let t = &COVERAGE;
    let sample_ids = i32_col(df, t, "SampleID")?;
    let variables = i64_col(df, t, "VariableCount")?;
    let types = str_col(df, t, "CoverageType")?;
    let ts = i32_col(df, t, "T")?;
    let values = f64_col(df, t, "Coverage")?;

    let mut out = Vec::with_capacity(sample_ids.len());
    for row in 0..sample_ids.len() {
        out.push(CoverageRecord {
            sample_id: required(sample_ids[row], t, "SampleID", row)?,
            variable_count: required(variables[row], t, "VariableCount", row)?,
            coverage_type: required(types[row].clone(), t, "CoverageType", row)?,
            t: ts[row],
            coverage: values[row],
        });
    }
    Ok(out)
}
