use std::fmt;

/// Errors surfaced by the matrix layer, the network engine and weight persistence.
#[derive(Debug)]
pub enum NetworkError {
    /// Constructor arguments were rejected (zero counts, non-positive learning rate).
    InvalidConfiguration(String),
    /// Two operands (or a caller vector and the network) have incompatible shapes.
    DimensionMismatch {
        operation: &'static str,
        expected: String,
        actual: String,
    },
    /// Saving or loading weights failed (missing file, truncated data, bad header).
    Persistence(String),
}

impl NetworkError {
    pub(crate) fn mismatch(
        operation: &'static str,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        NetworkError::DimensionMismatch {
            operation,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::InvalidConfiguration(msg) => write!(f, "invalid configuration: {}", msg),
            NetworkError::DimensionMismatch { operation, expected, actual } => write!(
                f,
                "dimension mismatch in {}: expected {}, got {}",
                operation, expected, actual
            ),
            NetworkError::Persistence(msg) => write!(f, "persistence error: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Persistence(e.to_string())
    }
}
