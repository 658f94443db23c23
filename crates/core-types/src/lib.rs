pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{DealFlagSource, EpisodeKey};
pub use error::CoreError;
pub use structs::{Dataset, PitchRecord, SharkRoster, SHARK_COLUMN_SUFFIX, shark_name_from_column};
