pub mod etl;
pub mod ledger;
pub mod pipeline;
pub mod prompt;
pub mod summarizer;

pub use crate::domain::model::{
    AuditReport, ColumnMapping, ItemTotal, Ledger, LedgerAnalysis, OutputFormat, PeakTimeSlot,
    RestaurantProfile, SalesDigest,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
