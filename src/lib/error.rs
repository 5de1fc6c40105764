use thiserror::Error;

/// Main error type for the report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Aggregate arithmetic errors
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    /// Malformed resource quantities
    #[error("Quantity error: {0}")]
    Quantity(#[from] QuantityError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid input records
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unrecognized sort direction
    #[error("invalid sort order {0:?}: must be either \"asc\" or \"desc\"")]
    InvalidSortOrder(String),

    /// Invalid configuration value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Log file error
    #[error("File error: {0}")]
    FileError(String),
}

/// Errors raised while computing aggregates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero while computing {0}")]
    DivisionByZero(String),
}

/// Errors raised while parsing a resource quantity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("invalid number in quantity {0:?}")]
    InvalidNumber(String),

    #[error("unknown suffix in quantity {0:?}")]
    InvalidSuffix(String),
}

/// Helper type alias for Results
pub type Result<T> = std::result::Result<T, ReportError>;
