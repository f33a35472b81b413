use thiserror::Error;

#[derive(Debug, Error)]
pub enum McaError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl McaError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        McaError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for McaError {
    fn from(e: serde_json::Error) -> Self {
        McaError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for McaError {
    fn from(e: std::io::Error) -> Self {
        McaError::Io(e.to_string())
    }
}

impl From<csv::Error> for McaError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            McaError::Io(e.to_string())
        } else {
            McaError::Parse(e.to_string())
        }
    }
}
