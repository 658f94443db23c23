use std::path::Path;

use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, ChartSettings, Config, InputSettings, OutputFormat, OutputSettings,
};

/// Base name of the optional configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "pitch-eda";

/// Prefix for environment overrides, e.g. `PITCH_EDA__ANALYSIS__TOP_SHARKS=5`.
pub const ENV_PREFIX: &str = "PITCH_EDA";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file, then
/// `PITCH_EDA__*` environment variables. An explicit `path` must exist; the
/// default `pitch-eda.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file_source = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}
