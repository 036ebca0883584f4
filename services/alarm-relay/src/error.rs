//! Error types for the alarm relay

/// Errors that can occur while relaying alarms
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notifier error: {0}")]
    Notifier(String),
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// Reasons an inbound alarm payload is rejected before any outbound call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientInputError {
    #[error("No data provided")]
    NoData,

    #[error("Invalid JSON payload: {0}")]
    Malformed(String),

    #[error("No device data provided")]
    NoDeviceData,

    #[error("No recipients provided")]
    NoRecipients,
}
