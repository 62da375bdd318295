use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumnError { columns: Vec<String> },

    #[error("Invalid quantity '{value}' in data row {row}")]
    InvalidQuantityError { row: usize, value: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The ledger file is unreadable or malformed.
    Input,
    /// The ledger parsed but lacks the columns the summarizer needs.
    Schema,
    Configuration,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl InsightError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InsightError::CsvError(_) | InsightError::InvalidQuantityError { .. } => {
                ErrorCategory::Input
            }
            InsightError::MissingColumnError { .. } => ErrorCategory::Schema,
            InsightError::ConfigValidationError { .. }
            | InsightError::MissingConfigError { .. }
            | InsightError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            InsightError::IoError(_) | InsightError::ZipError(_) => ErrorCategory::Storage,
            InsightError::SerializationError(_) | InsightError::ProcessingError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Schema | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            // A full disk or a locked output directory is usually transient.
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            InsightError::MissingColumnError { columns } => format!(
                "Add the column(s) {} to the export, or map your own header names (--item-column / --quantity-column flags, or the [columns] table of the TOML config)",
                columns.join(", ")
            ),
            InsightError::InvalidQuantityError { row, .. } => format!(
                "Fix data row {} so the quantity is a whole, non-negative number",
                row
            ),
            InsightError::CsvError(_) => {
                "Check that the file is a delimited text export with a header row".to_string()
            }
            InsightError::IoError(_) => {
                "Check that the ledger path exists and the output path is writable".to_string()
            }
            InsightError::ZipError(_) => {
                "Retry with compression disabled (--no-compress flag, or enabled = false under [load.compression])".to_string()
            }
            InsightError::ConfigValidationError { field, .. }
            | InsightError::MissingConfigError { field }
            | InsightError::InvalidConfigValueError { field, .. } => {
                format!("Review the '{}' setting", field)
            }
            InsightError::SerializationError(_) | InsightError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The sales file could not be read: {}", self),
            ErrorCategory::Schema => format!("The sales file is missing data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Internal => format!("Unexpected internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
