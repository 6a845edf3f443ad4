use thiserror::Error;

/// Common error types used across the reminder pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tracker returned HTTP {status}: {body}")]
    Tracker { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
