//! Sales Summarizer: turns a [`Ledger`] into a fixed-shape [`SalesDigest`].
//!
//! The computation is pure. The same ledger always yields the same digest,
//! and nothing here touches storage or the network.

use crate::domain::model::{ColumnMapping, ItemTotal, Ledger, LedgerAnalysis, PeakTimeSlot, SalesDigest};
use crate::utils::error::{InsightError, Result};
use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Number of entries kept at each end of the ranking.
pub const EXTREMES: usize = 3;

const TIMESTAMP_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Summarizes a ledger using the default column names.
pub fn summarize(ledger: &Ledger) -> Result<SalesDigest> {
    Summarizer::default().summarize(ledger)
}

#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    columns: ColumnMapping,
}

enum SlotSource {
    Label(usize),
    Timestamp(usize),
    Absent,
}

impl Summarizer {
    pub fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    pub fn summarize(&self, ledger: &Ledger) -> Result<SalesDigest> {
        self.analyze(ledger).map(|analysis| analysis.digest)
    }

    /// Digest plus the full per-item ranking it was cut from.
    pub fn analyze(&self, ledger: &Ledger) -> Result<LedgerAnalysis> {
        let (item_col, qty_col) = self.required_columns(ledger)?;
        let slot_source = self.slot_source(ledger);

        let mut ranking: Vec<ItemTotal> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut total_units_sold: u64 = 0;
        let mut slot_counts: HashMap<String, usize> = HashMap::new();
        let mut slot_order: Vec<String> = Vec::new();

        for row in 0..ledger.len() {
            let quantity = parse_quantity(row, ledger.cell(row, qty_col))?;
            total_units_sold = total_units_sold.saturating_add(quantity);

            // Rows without an item name still count toward total units.
            let item = ledger.cell(row, item_col).trim();
            if !item.is_empty() {
                match positions.entry(item) {
                    Entry::Occupied(entry) => {
                        let total = &mut ranking[*entry.get()].total_quantity;
                        *total = total.saturating_add(quantity);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(ranking.len());
                        ranking.push(ItemTotal::new(item, quantity));
                    }
                }
            }

            if let Some(slot) = slot_source.slot(ledger, row) {
                let count = slot_counts.entry(slot.clone()).or_insert(0);
                if *count == 0 {
                    slot_order.push(slot);
                }
                *count += 1;
            }
        }

        // sort_by is stable, so equal totals keep discovery order.
        ranking.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));

        let top_sellers: Vec<ItemTotal> = ranking.iter().take(EXTREMES).cloned().collect();
        let bottom_sellers: Vec<ItemTotal> = ranking.iter().rev().take(EXTREMES).cloned().collect();
        let peak_time_slot = peak_slot(&slot_order, &slot_counts);

        tracing::debug!(
            "Summarized {} rows into {} distinct items ({} units, peak slot: {})",
            ledger.len(),
            ranking.len(),
            total_units_sold,
            peak_time_slot
        );

        Ok(LedgerAnalysis {
            digest: SalesDigest {
                top_sellers,
                bottom_sellers,
                total_units_sold,
                peak_time_slot,
            },
            ranking,
            rows_read: ledger.len(),
        })
    }

    fn required_columns(&self, ledger: &Ledger) -> Result<(usize, usize)> {
        let item = ledger.column_index(&self.columns.item_name);
        let quantity = ledger.column_index(&self.columns.quantity_sold);

        match (item, quantity) {
            (Some(item), Some(quantity)) => Ok((item, quantity)),
            _ => {
                let mut columns = Vec::new();
                if item.is_none() {
                    columns.push(self.columns.item_name.clone());
                }
                if quantity.is_none() {
                    columns.push(self.columns.quantity_sold.clone());
                }
                Err(InsightError::MissingColumnError { columns })
            }
        }
    }

    fn slot_source(&self, ledger: &Ledger) -> SlotSource {
        let lookup = |name: &Option<String>| name.as_deref().and_then(|n| ledger.column_index(n));

        if let Some(index) = lookup(&self.columns.time_slot) {
            SlotSource::Label(index)
        } else if let Some(index) = lookup(&self.columns.timestamp) {
            SlotSource::Timestamp(index)
        } else {
            SlotSource::Absent
        }
    }
}

impl SlotSource {
    fn slot(&self, ledger: &Ledger, row: usize) -> Option<String> {
        match *self {
            SlotSource::Label(col) => {
                let label = ledger.cell(row, col).trim();
                (!label.is_empty()).then(|| label.to_string())
            }
            SlotSource::Timestamp(col) => hour_label(ledger.cell(row, col)),
            SlotSource::Absent => None,
        }
    }
}

/// Hour bucket (`HH:00`) of a timestamp or bare time of day.
pub fn hour_label(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Offset timestamps keep the wall-clock hour of the till that recorded them.
    let hour = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.hour())
        .ok()
        .or_else(|| {
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.hour())
        })
        .or_else(|| {
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
                .map(|t| t.hour())
        })?;

    Some(format!("{:02}:00", hour))
}

fn parse_quantity(row: usize, raw: &str) -> Result<u64> {
    let raw = raw.trim();
    // Spreadsheet exports often write whole numbers as "10.0".
    let digits = match raw.split_once('.') {
        Some((whole, fraction)) if !whole.is_empty() && fraction.bytes().all(|b| b == b'0') => whole,
        _ => raw,
    };

    digits
        .parse::<u64>()
        .ok()
        .filter(|_| digits.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| InsightError::InvalidQuantityError {
            row: row + 1,
            value: raw.to_string(),
        })
}

/// Most frequent slot; ties go to the value seen first in input order.
fn peak_slot(order: &[String], counts: &HashMap<String, usize>) -> PeakTimeSlot {
    let mut best: Option<(&String, usize)> = None;
    for slot in order {
        let count = counts.get(slot).copied().unwrap_or(0);
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((slot, count));
        }
    }

    match best {
        Some((slot, _)) => PeakTimeSlot::Slot(slot.clone()),
        None => PeakTimeSlot::NotAvailable,
    }
}
