use thiserror::Error;

/// Contract violation on a numeric input: the caller passed a value outside
/// the declared precondition of a conversion or encoding function. These are
/// programming errors, not user input errors, and are never clamped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("value must be a positive integer, got {0}")]
    NonPositiveNumeral(i64),
    #[error("currency components must be non-negative, got {0}l {1}s {2}d")]
    NegativeComponent(i64, i64, i64),
    #[error("pence total must be non-negative, got {0}")]
    NegativePence(i64),
}

/// Malformed or unrecognized persisted data. Recoverable: callers report the
/// message and keep the in-memory calculation untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Not a valid JSON file")]
    NotJson,
    #[error("Not a Summa file")]
    NotSummaFile,
    #[error("Invalid file format: missing lines")]
    MissingLines,
    #[error("Unknown item type: {0}")]
    UnknownItemType(String),
    #[error("Invalid {kind} item: missing {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("Invalid {kind} item: malformed id `{id}`")]
    MalformedId { kind: &'static str, id: String },
}

/// Error type that captures storage-layer failures.
#[derive(Debug, Error)]
pub enum SummaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Format(#[from] FormatError),
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("Storage error: {0}")]
    Storage(String),
}
