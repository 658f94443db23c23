use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing key falls back to the defaults below,
/// which reproduce the fixed constants of the analysis.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputSettings,
    pub analysis: AnalysisSettings,
    pub charts: ChartSettings,
    pub output: OutputSettings,
}

/// Where the pitch sheet is read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Path to the pitch sheet: a CSV export or a workbook.
    pub path: PathBuf,
}

/// Thresholds and selections used by the metrics engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Ask amounts strictly above this are "high-ask" pitches (1 crore).
    pub high_ask_threshold: f64,
    /// Ask equity at or below this percentage falls in the low-equity group.
    pub equity_split_pct: f64,
    /// How many sharks the top-investor ranking reports.
    pub top_sharks: usize,
    /// Sharks whose total invested amount is reported individually.
    pub named_sharks: Vec<String>,
}

/// Chart rendering options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub enabled: bool,
    /// Directory the SVG files are written into. Created if missing.
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Console output options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Number of cleaned records echoed after the cleaning banner.
    pub preview_rows: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sections and tables.
    #[default]
    Text,
    /// The full report as pretty-printed JSON.
    Json,
}

// --- Default Implementations ---

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("EDA_Shark_Tank_India.xlsx"),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            high_ask_threshold: 10_000_000.0,
            equity_split_pct: 10.0,
            top_sharks: 3,
            named_sharks: vec!["ashneer".to_string(), "peyush".to_string()],
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: PathBuf::from("charts"),
            width: 800,
            height: 500,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            preview_rows: 5,
        }
    }
}

impl Config {
    /// Rejects settings that would make the analysis meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if !analysis.high_ask_threshold.is_finite() || analysis.high_ask_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "analysis.high_ask_threshold must be a non-negative number".to_string(),
            ));
        }
        if !analysis.equity_split_pct.is_finite() {
            return Err(ConfigError::ValidationError(
                "analysis.equity_split_pct must be a finite number".to_string(),
            ));
        }
        if analysis.top_sharks == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.top_sharks must be at least 1".to_string(),
            ));
        }
        if analysis.named_sharks.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "analysis.named_sharks must not contain blank names".to_string(),
            ));
        }
        if self.charts.width == 0 || self.charts.height == 0 {
            return Err(ConfigError::ValidationError(
                "charts.width and charts.height must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
