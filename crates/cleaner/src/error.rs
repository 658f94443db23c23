use core_types::CoreError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Unsupported source format '.{extension}' for {}: expected a CSV export or a workbook", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to read the source table: {0}")]
    Read(#[from] PolarsError),

    #[error("Failed to read the source workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook {} has no worksheet", .0.display())]
    EmptyWorkbook(PathBuf),

    #[error("Required column '{0}' is missing from the source")]
    MissingColumn(String),

    #[error("Column '{0}' was expected to be numeric after coercion")]
    NotNumeric(String),

    #[error("Cleaned records are inconsistent: {0}")]
    Core(#[from] CoreError),
}
