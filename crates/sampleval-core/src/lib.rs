pub mod cache;
pub mod charts;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod ingest;
pub mod labels;
pub mod model;
pub mod prepare;
pub mod report;

pub use errors::{PipelineError, Result};
pub use model::{PreparedRow, PreparedTable};
