use thiserror::Error;

/// Errors that can occur in type operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("Invalid member id format: {0}")]
    InvalidIdFormat(String),

    #[error("Invalid member id length: expected 20, got {0}")]
    InvalidIdLength(usize),

    #[error("Text too long: max {max} characters, got {actual}")]
    TextTooLong { max: usize, actual: usize },

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Bech32 error: {0}")]
    Bech32Error(String),
}

impl From<hex::FromHexError> for TypesError {
    fn from(e: hex::FromHexError) -> Self {
        TypesError::InvalidHex(e.to_string())
    }
}
