use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("No participation column for shark(s): {}", .0.join(", "))]
    UnknownSharks(Vec<String>),
}
