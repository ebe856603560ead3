//! Error types for prop generation

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PropError>;

/// Errors surfaced by parameter validation, die numbering and export
#[derive(Debug, Error)]
pub enum PropError {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Face pairing failed: {0}")]
    PairingFailure(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Export(#[from] anyhow::Error),
}

impl PropError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
