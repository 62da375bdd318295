pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ColumnMapping, ConfigProvider, OutputFormat, RestaurantProfile};
#[cfg(feature = "cli")]
use crate::utils::error::{InsightError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "pos-insights")]
#[command(about = "Summarize a point-of-sale export into a sales digest and audit prompt")]
pub struct CliConfig {
    /// Sales ledger export (.csv, .tsv or .txt)
    #[arg(long)]
    pub ledger: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "item_name")]
    pub item_column: String,

    #[arg(long, default_value = "quantity_sold")]
    pub quantity_column: String,

    #[arg(long, default_value = "time_slot")]
    pub time_column: String,

    /// Derive hourly time slots from this column when the time column is absent
    #[arg(long)]
    pub timestamp_column: Option<String>,

    /// Override the delimiter inferred from the ledger extension
    #[arg(long)]
    pub delimiter: Option<String>,

    #[arg(long, value_delimiter = ',', default_value = "json,csv,prompt")]
    pub formats: Vec<OutputFormat>,

    /// Write loose files instead of a zip bundle
    #[arg(long)]
    pub no_compress: bool,

    /// TOML file holding a [profile] table (restaurant name, menu, ...)
    #[arg(long)]
    pub profile: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Print the digest as JSON on stdout")]
    pub print_digest: bool,

    #[arg(skip)]
    pub restaurant: RestaurantProfile,
}

#[cfg(feature = "cli")]
#[derive(serde::Deserialize)]
struct ProfileFile {
    profile: RestaurantProfile,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the `[profile]` table named by `--profile`, if any.
    pub fn load_profile(&mut self) -> Result<()> {
        let Some(path) = &self.profile else {
            return Ok(());
        };

        let content = std::fs::read_to_string(path)?;
        let file: ProfileFile =
            toml::from_str(&content).map_err(|e| InsightError::ConfigValidationError {
                field: "profile".to_string(),
                message: format!("TOML parsing error in {}: {}", path, e),
            })?;
        self.restaurant = file.profile;
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn ledger_path(&self) -> &str {
        &self.ledger
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn columns(&self) -> ColumnMapping {
        let optional = |name: &str| Some(name.trim().to_string()).filter(|n| !n.is_empty());
        ColumnMapping {
            item_name: self.item_column.clone(),
            quantity_sold: self.quantity_column.clone(),
            time_slot: optional(&self.time_column),
            timestamp: self.timestamp_column.as_deref().and_then(optional),
        }
    }

    fn profile(&self) -> &RestaurantProfile {
        &self.restaurant
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::unique(&self.formats)
    }

    fn bundle_name(&self) -> Option<&str> {
        (!self.no_compress).then_some(toml_config::DEFAULT_BUNDLE_NAME)
    }

    fn delimiter(&self) -> Option<u8> {
        self.delimiter
            .as_deref()
            .and_then(|d| toml_config::parse_delimiter("delimiter", d).ok())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_ledger_path("ledger", &self.ledger)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_columns(&self.columns())?;
        validation::validate_output_formats("formats", &self.formats)?;
        if let Some(delimiter) = &self.delimiter {
            toml_config::parse_delimiter("delimiter", delimiter)?;
        }
        Ok(())
    }
}
