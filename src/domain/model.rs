use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel shown when a ledger carries no usable time-of-sale data.
pub const NOT_AVAILABLE: &str = "not available";

/// Raw uploaded sales rows: a header row plus string cells, exactly as read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Ledger {
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matching trimmed header names case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    /// Cell lookup that reads cells missing from short rows as blank.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Which ledger headers carry each role the summarizer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub item_name: String,
    pub quantity_sold: String,
    pub time_slot: Option<String>,
    /// Fallback source of time slots when no slot column exists: hour of this timestamp.
    pub timestamp: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            item_name: "item_name".to_string(),
            quantity_sold: "quantity_sold".to_string(),
            time_slot: Some("time_slot".to_string()),
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTotal {
    pub item_name: String,
    pub total_quantity: u64,
}

impl ItemTotal {
    pub fn new(item_name: impl Into<String>, total_quantity: u64) -> Self {
        Self {
            item_name: item_name.into(),
            total_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PeakTimeSlot {
    Slot(String),
    NotAvailable,
}

impl PeakTimeSlot {
    pub fn as_slot(&self) -> Option<&str> {
        match self {
            PeakTimeSlot::Slot(slot) => Some(slot),
            PeakTimeSlot::NotAvailable => None,
        }
    }
}

impl fmt::Display for PeakTimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeakTimeSlot::Slot(slot) => f.write_str(slot),
            PeakTimeSlot::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl From<PeakTimeSlot> for String {
    fn from(slot: PeakTimeSlot) -> Self {
        slot.to_string()
    }
}

impl From<String> for PeakTimeSlot {
    fn from(value: String) -> Self {
        if value == NOT_AVAILABLE {
            PeakTimeSlot::NotAvailable
        } else {
            PeakTimeSlot::Slot(value)
        }
    }
}

/// Fixed-shape digest of a ledger, used as grounding context for the audit prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesDigest {
    /// Highest total first, at most three entries.
    pub top_sellers: Vec<ItemTotal>,
    /// Lowest total first, at most three entries.
    pub bottom_sellers: Vec<ItemTotal>,
    pub total_units_sold: u64,
    pub peak_time_slot: PeakTimeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnalysis {
    pub digest: SalesDigest,
    /// Every distinct item, highest total first, ties in discovery order.
    pub ranking: Vec<ItemTotal>,
    pub rows_read: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantProfile {
    pub name: String,
    pub address: String,
    pub neighborhood: String,
    pub cuisine: String,
    pub price_range: String,
    pub rating: String,
    pub vibe: String,
    pub services: Vec<String>,
    pub menu_items: String,
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub analysis: LedgerAnalysis,
    pub prompt: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Prompt,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Csv, OutputFormat::Prompt];

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "sales_digest.json",
            OutputFormat::Csv => "item_totals.csv",
            OutputFormat::Prompt => "internal_audit_prompt.txt",
        }
    }

    /// Drops repeats, keeping the first occurrence of each format.
    pub fn unique(formats: &[OutputFormat]) -> Vec<OutputFormat> {
        let mut unique = Vec::with_capacity(formats.len());
        for format in formats {
            if !unique.contains(format) {
                unique.push(*format);
            }
        }
        unique
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "prompt" | "txt" => Ok(OutputFormat::Prompt),
            other => Err(format!(
                "unsupported output format '{}' (expected json, csv or prompt)",
                other
            )),
        }
    }
}
