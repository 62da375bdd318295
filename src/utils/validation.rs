use crate::domain::model::{ColumnMapping, OutputFormat};
use crate::utils::error::{InsightError, Result};
use std::collections::HashSet;

/// Extensions accepted for ledger exports.
pub const LEDGER_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(InsightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(InsightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let extension = std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(InsightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(InsightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| InsightError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InsightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_ledger_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    validate_file_extension(field_name, path, &LEDGER_EXTENSIONS)
}

/// Every role needs a name, and no header may play two roles.
pub fn validate_columns(columns: &ColumnMapping) -> Result<()> {
    validate_non_empty_string("columns.item_name", &columns.item_name)?;
    validate_non_empty_string("columns.quantity_sold", &columns.quantity_sold)?;

    let mut seen = HashSet::new();
    let roles = [
        ("columns.item_name", Some(&columns.item_name)),
        ("columns.quantity_sold", Some(&columns.quantity_sold)),
        ("columns.time_slot", columns.time_slot.as_ref()),
        ("columns.timestamp", columns.timestamp.as_ref()),
    ];

    for (field, name) in roles {
        let Some(name) = name else { continue };
        let key = name.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key) {
            return Err(InsightError::InvalidConfigValueError {
                field: field.to_string(),
                value: name.clone(),
                reason: "Column is already mapped to another role".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[OutputFormat]) -> Result<()> {
    if formats.is_empty() {
        return Err(InsightError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "  ").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_ledger_path() {
        assert!(validate_ledger_path("ledger", "data/sales.csv").is_ok());
        assert!(validate_ledger_path("ledger", "data/Sales.TSV").is_ok());
        assert!(validate_ledger_path("ledger", "data/sales.xlsx").is_err());
        assert!(validate_ledger_path("ledger", "data/sales").is_err());
    }

    #[test]
    fn test_validate_columns_rejects_shared_header() {
        assert!(validate_columns(&ColumnMapping::default()).is_ok());

        let clash = ColumnMapping {
            time_slot: Some("Item_Name".to_string()),
            ..ColumnMapping::default()
        };
        let err = validate_columns(&clash).unwrap_err();
        assert!(err.to_string().contains("columns.time_slot"));

        let blank = ColumnMapping {
            quantity_sold: " ".to_string(),
            ..ColumnMapping::default()
        };
        assert!(validate_columns(&blank).is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        assert!(validate_output_formats("formats", &[OutputFormat::Json]).is_ok());
        assert!(validate_output_formats("formats", &[]).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        assert_eq!(*validate_required_field("x", &present).unwrap(), 3);
        let missing: Option<u8> = None;
        assert!(validate_required_field("x", &missing).is_err());
    }
}
