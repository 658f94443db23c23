use analytics::AnalyticsEngine;
use anyhow::{Context, Result};
use clap::Parser;
use configuration::{Config, OutputFormat, load_config};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Exploratory analysis of a startup-pitch investment show's deal sheet.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The pitch sheet, a CSV export or an .xlsx/.xls/.ods workbook. Overrides `[input] path`.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// A TOML configuration file. Defaults to `pitch-eda.toml` if present.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory the SVG charts are written into. Overrides `[charts] output_dir`.
    #[arg(long)]
    charts_dir: Option<PathBuf>,

    /// Skip chart rendering.
    #[arg(long)]
    no_charts: bool,

    /// Console output format. Overrides `[output] format`.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Cli {
    /// Command-line flags win over the file and the environment.
    fn apply_overrides(self, mut config: Config) -> Config {
        if let Some(input) = self.input {
            config.input.path = input;
        }
        if let Some(dir) = self.charts_dir {
            config.charts.output_dir = dir;
        }
        if self.no_charts {
            config.charts.enabled = false;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config
    }
}

fn main() -> Result<()> {
    // Reports go to stdout, logs to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = cli.apply_overrides(config);

    run(&config)
}

/// Cleans the sheet, computes every metric and renders the results.
fn run(config: &Config) -> Result<()> {
    let path = &config.input.path;
    tracing::info!(path = %path.display(), "Loading pitch sheet.");

    let (dataset, cleaning) = cleaner::load_and_clean(path)
        .with_context(|| format!("Failed to clean {}", path.display()))?;

    let report = AnalyticsEngine::new(config.analysis.clone()).calculate(&dataset);

    match config.output.format {
        OutputFormat::Text => {
            print!(
                "{}",
                reporter::render_cleaning(&dataset, &cleaning, config.output.preview_rows)
            );
            print!("{}", reporter::render_report(&report));
        }
        OutputFormat::Json => {
            println!("{}", reporter::render_json(&cleaning, &report)?);
        }
    }

    if config.charts.enabled {
        let written = reporter::render_charts(&report, &config.charts)
            .context("Failed to prepare the chart directory")?;
        if config.output.format == OutputFormat::Text {
            println!("\n{} chart(s) written to {}", written.len(), config.charts.output_dir.display());
        }
    }

    Ok(())
}
