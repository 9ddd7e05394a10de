use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Required column '{column}' not found in input header")]
    MissingColumnError { column: String },

    #[error("Input is not valid UTF-8: {message}")]
    EncodingError { message: String },

    #[error("Malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRowError {
        line: u64,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::MissingColumnError { .. }
            | EtlError::EncodingError { .. }
            | EtlError::MalformedRowError { .. } => ErrorCategory::Input,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Output,
            EtlError::SerializationError(_) => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            // 輸出失敗通常是磁碟或權限問題
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MissingColumnError { column } => format!(
                "Add a '{}' column to the header row (required: dni, email, telefono)",
                column
            ),
            EtlError::EncodingError { .. } => {
                "Re-export the file as UTF-8 (with or without BOM)".to_string()
            }
            EtlError::MalformedRowError { .. } | EtlError::CsvError(_) => {
                "Check that the file uses ';' as delimiter and that quoted fields are closed"
                    .to_string()
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line arguments or the TOML configuration file".to_string()
            }
            EtlError::IoError(_) | EtlError::ZipError(_) => {
                "Check that the input exists and the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => {
                "Run again with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("The input file could not be processed: {}", self),
            ErrorCategory::Output => format!("Results could not be written: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
