use thiserror::Error;

/// Failures raised by the allowance services.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}
