pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    etl::{InsightEngine, RunSummary},
    pipeline::AuditPipeline,
    summarizer::{summarize, Summarizer},
};
pub use crate::domain::model::{
    ColumnMapping, ItemTotal, Ledger, LedgerAnalysis, PeakTimeSlot, RestaurantProfile, SalesDigest,
};
pub use crate::utils::error::{InsightError, Result};
