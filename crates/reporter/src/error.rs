use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Failed to serialize the report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to create chart directory {path}: {source}")]
    ChartDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render chart '{chart}': {message}")]
    Chart { chart: String, message: String },
}
