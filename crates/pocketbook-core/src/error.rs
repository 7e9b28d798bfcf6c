use thiserror::Error;

#[derive(Debug, Error)]
pub enum PocketbookError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PocketbookError {
    fn from(e: serde_json::Error) -> Self {
        PocketbookError::SerializationError(e.to_string())
    }
}
