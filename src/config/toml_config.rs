use crate::core::{ColumnMapping, ConfigProvider, OutputFormat, RestaurantProfile};
use crate::utils::error::{InsightError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BUNDLE_NAME: &str = "insights_bundle.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub profile: RestaurantProfile,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// May be left out and supplied on the command line instead.
    pub ledger_path: Option<String>,
    /// Single-character field delimiter, e.g. ";" for European exports.
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<OutputFormat>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_output_formats() -> Vec<OutputFormat> {
    OutputFormat::ALL.to_vec()
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InsightError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| InsightError::ProcessingError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        let ledger_path = validation::validate_required_field("source.ledger_path", &self.source.ledger_path)?;
        validation::validate_ledger_path("source.ledger_path", ledger_path)?;

        if let Some(delimiter) = &self.source.delimiter {
            parse_delimiter("source.delimiter", delimiter)?;
        }

        validation::validate_columns(&self.columns)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(filename) = self
            .load
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
        {
            validation::validate_file_extension("load.compression.filename", filename, &["zip"])?;
        }

        Ok(())
    }

    pub fn set_ledger_path(&mut self, path: impl Into<String>) {
        self.source.ledger_path = Some(path.into());
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

/// Accepts exactly one ASCII character, with `\t` and `tab` as spellings of a tab.
pub fn parse_delimiter(field: &str, raw: &str) -> Result<u8> {
    match raw {
        "\\t" | "tab" | "\t" => return Ok(b'\t'),
        _ => {}
    }

    match raw.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(InsightError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: "Delimiter must be a single ASCII character".to_string(),
        }),
    }
}

impl ConfigProvider for TomlConfig {
    fn ledger_path(&self) -> &str {
        self.source.ledger_path.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn columns(&self) -> ColumnMapping {
        self.columns.clone()
    }

    fn profile(&self) -> &RestaurantProfile {
        &self.profile
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        OutputFormat::unique(&self.load.output_formats)
    }

    fn bundle_name(&self) -> Option<&str> {
        match &self.load.compression {
            Some(c) if !c.enabled => None,
            Some(c) => Some(c.filename.as_deref().unwrap_or(DEFAULT_BUNDLE_NAME)),
            None => Some(DEFAULT_BUNDLE_NAME),
        }
    }

    fn delimiter(&self) -> Option<u8> {
        self.source
            .delimiter
            .as_deref()
            .and_then(|d| parse_delimiter("source.delimiter", d).ok())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
