use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum QuoteError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Invalid {list} record #{index}: {message}")]
    InvalidRecord { list: String, index: usize, message: String },

    #[error("Parse error at row {row}, column {col}: {message}")]
    Parse { row: usize, col: usize, message: String },

    #[error("Workbook error: {message}")]
    Workbook { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl QuoteError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// `index` is the zero-based position of the record in its list.
    pub fn invalid_record(list: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            list: list.into(),
            index,
            message: message.into(),
        }
    }

    /// `row` and `col` are zero-based grid coordinates.
    pub fn parse(row: usize, col: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            col,
            message: message.into(),
        }
    }

    pub fn workbook(message: impl Into<String>) -> Self {
        Self::Workbook {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Workbook { .. } => "WORKBOOK_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Process exit status for the command line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::InvalidRecord { .. } => 65,
            Self::Parse { .. } | Self::Workbook { .. } => 66,
            Self::Configuration { .. } => 78,
            Self::Io { .. } => 74,
            Self::Internal { .. } => 70,
        }
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<QuoteError> for ErrorResponse {
    fn from(error: QuoteError) -> Self {
        let details = match &error {
            QuoteError::InvalidRecord { list, index, .. } => {
                Some(serde_json::json!({ "list": list, "index": index }))
            }
            QuoteError::Parse { row, col, .. } => Some(serde_json::json!({ "row": row, "col": col })),
            _ => None,
        };

        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

// Conversion from common error types
impl From<calamine::Error> for QuoteError {
    fn from(error: calamine::Error) -> Self {
        Self::workbook(error.to_string())
    }
}

impl From<calamine::XlsxError> for QuoteError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::workbook(error.to_string())
    }
}

impl From<csv::Error> for QuoteError {
    fn from(error: csv::Error) -> Self {
        match error.position() {
            Some(position) => Self::parse(
                position.line().saturating_sub(1) as usize,
                0,
                error.to_string(),
            ),
            None => Self::validation("CSV", error.to_string()),
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<std::io::Error> for QuoteError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

impl From<config::ConfigError> for QuoteError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
