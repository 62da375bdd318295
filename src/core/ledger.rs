use crate::domain::model::Ledger;
use crate::utils::error::Result;
use std::path::Path;

/// Field delimiter for a ledger file: tab for `.tsv`, comma otherwise.
pub fn delimiter_for_path(path: &str) -> u8 {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("tsv") => b'\t',
        _ => b',',
    }
}

/// Parses a delimited export into a [`Ledger`]. The first record is the header row.
pub fn read_ledger(data: &[u8], delimiter: u8) -> Result<Ledger> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Trailing blank lines in spreadsheet exports come through as empty records.
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    tracing::debug!(
        "Parsed ledger with {} columns and {} rows",
        headers.len(),
        rows.len()
    );

    Ok(Ledger::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_for_path() {
        assert_eq!(delimiter_for_path("sales.csv"), b',');
        assert_eq!(delimiter_for_path("exports/Sales.TSV"), b'\t');
        assert_eq!(delimiter_for_path("no_extension"), b',');
    }

    #[test]
    fn test_read_ledger_trims_cells() {
        let data = b"item_name, quantity_sold ,time_slot\n Tacos ,10, 19:00\nNachos,3,20:00\n";
        let ledger = read_ledger(data, b',').unwrap();

        assert_eq!(ledger.headers(), &["item_name", "quantity_sold", "time_slot"]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.rows()[0], vec!["Tacos", "10", "19:00"]);
    }

    #[test]
    fn test_read_ledger_allows_ragged_rows_and_skips_blank_lines() {
        let data = b"item_name\tquantity_sold\ttime_slot\nTacos\t4\n\nNachos\t2\t13:00\n";
        let ledger = read_ledger(data, b'\t').unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.cell(0, 2), "");
        assert_eq!(ledger.cell(1, 2), "13:00");
    }

    #[test]
    fn test_read_ledger_strips_byte_order_mark() {
        let data = "\u{feff}item_name,quantity_sold\nTacos,1\n".as_bytes();
        let ledger = read_ledger(data, b',').unwrap();
        assert_eq!(ledger.column_index("item_name"), Some(0));
    }

    #[test]
    fn test_read_ledger_headers_only() {
        let ledger = read_ledger(b"item_name,quantity_sold\n", b',').unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.headers().len(), 2);
    }
}
