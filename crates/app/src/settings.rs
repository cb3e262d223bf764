//! Handles settings for the report run.
//!
//! Sources, lowest priority first: built-in defaults, the TOML file
//! (`config/treasury.toml` unless `--config` says otherwise), `TREASURY_*`
//! environment variables (`__` separates sections, e.g.
//! `TREASURY_REPORT__ALERT_THRESHOLD`), command line flags.
use std::path::PathBuf;

use clap::Parser;
use ledger::{Money, ReportSettings};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/treasury.toml";
const ENV_PREFIX: &str = "TREASURY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the report and ledger crates.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Input {
    pub movements: PathBuf,
    pub products: PathBuf,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            movements: PathBuf::from("data/movimientos.csv"),
            products: PathBuf::from("data/productos.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Output {
    /// Parent directory; each run writes a dated subdirectory.
    pub dir: PathBuf,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub input: Input,
    pub output: Output,
    pub report: ReportSettings,
}

#[derive(Debug, Parser)]
#[command(name = "treasury_report")]
#[command(about = "Daily liquidity KPIs, alerts and rollups from the treasury ledger")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the movements CSV path.
    #[arg(long)]
    movements: Option<PathBuf>,
    /// Override the products CSV path.
    #[arg(long)]
    products: Option<PathBuf>,
    /// Override the output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Override the alert threshold (e.g. `-1000.00`).
    #[arg(long, allow_hyphen_values = true)]
    alert_threshold: Option<Money>,
    /// Override the number of counterparties in the top table.
    #[arg(long)]
    top: Option<usize>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(environment());
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(movements) = args.movements {
        settings.input.movements = movements;
    }
    if let Some(products) = args.products {
        settings.input.products = products;
    }
    if let Some(dir) = args.output_dir {
        settings.output.dir = dir;
    }
    if let Some(threshold) = args.alert_threshold {
        settings.report.alert_threshold = threshold;
    }
    if let Some(top) = args.top {
        settings.report.top_counterparties = top;
    }
    if let Some(level) = args.level {
        settings.app.level = level;
    }

    Ok(settings)
}

/// `TREASURY_<SECTION>__<KEY>` variables.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat, Map};
    use ledger::Currency;

    use super::*;

    #[test]
    fn empty_source_gives_defaults() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.input.movements, PathBuf::from("data/movimientos.csv"));
        assert_eq!(settings.report, ReportSettings::default());
    }

    #[test]
    fn toml_overrides_report_section() {
        let toml = r#"
            [report]
            alert_currency = "USD"
            alert_threshold = "-1500.50"
            top_counterparties = 5
        "#;
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.report.alert_currency, Currency::Usd);
        assert_eq!(settings.report.alert_threshold, Money::new(-150_050));
        assert_eq!(settings.report.top_counterparties, 5);
        assert_eq!(settings.report.counterparty_currency, None);
        assert_eq!(settings.output.dir, PathBuf::from("reports"));
    }

    #[test]
    fn environment_overrides_file() {
        let env = Map::from([
            ("TREASURY_REPORT__TOP_COUNTERPARTIES".to_string(), "3".to_string()),
            ("TREASURY_REPORT__ALERT_CURRENCY".to_string(), "USD".to_string()),
            ("TREASURY_OUTPUT__DIR".to_string(), "out".to_string()),
        ]);
        let settings: Settings = Config::builder()
            .add_source(File::from_str("[report]\ntop_counterparties = 5", FileFormat::Toml))
            .add_source(environment().source(Some(env)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.report.top_counterparties, 3);
        assert_eq!(settings.report.alert_currency, Currency::Usd);
        assert_eq!(settings.output.dir, PathBuf::from("out"));
    }
}
