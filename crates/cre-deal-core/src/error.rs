use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CreDealError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("No benchmark for {metric} in {asset_class}/{tier}")]
    UnknownBenchmark {
        asset_class: String,
        tier: String,
        metric: String,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CreDealError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CreDealError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CreDealError {
    fn from(e: serde_json::Error) -> Self {
        CreDealError::SerializationError(e.to_string())
    }
}
