use thiserror::Error;

/// Main error type for the traderd control plane
#[derive(Debug, Error)]
pub enum TraderdError {
    // Process-related errors
    #[error("Failed to spawn trader process: {0}")]
    Spawn(String),

    #[error("Failed to stop trader process: {0}")]
    Termination(String),

    // Telemetry errors - degraded to empty results at the HTTP boundary
    #[error("Telemetry source unavailable: {0}")]
    Telemetry(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Missing required configuration field: {0}")]
    MissingConfigField(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for traderd operations
pub type Result<T> = std::result::Result<T, TraderdError>;
