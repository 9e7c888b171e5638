use std::path::PathBuf;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("missing input: no '{file_name}' found below {}", root.display())]
    MissingInput { file_name: String, root: PathBuf },

    #[error("schema mismatch in {}: {message}", path.display())]
    SchemaMismatch { path: PathBuf, message: String },

    #[error("i/o failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache error: {0}")]
    Cache(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("render error for chart '{chart}': {message}")]
    Render { chart: String, message: String },

    #[error("export error for table '{table}': {message}")]
    Export { table: String, message: String },
}

impl PipelineError {
    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PipelineError::SchemaMismatch {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
