//! # Client Error Types
//!
//! Error types for everything that touches the network, the disk or the
//! store state.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Status                 │ │
//! │  │  InvalidUrl     │  │  (reqwest)      │  │  Decode                 │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Storage      │  │     Domain      │                              │
//! │  │                 │  │                 │                              │
//! │  │  StorageError   │  │  Validation     │                              │
//! │  │                 │  │  EmptyCart      │                              │
//! │  │                 │  │  Core           │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use shopfront_core::{CoreError, ValidationError};

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Storage Error
// =============================================================================

/// Persistent key/value storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded.
    #[error("Storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// No platform data directory could be determined.
    #[error("No storage location available")]
    NoLocation,

    /// The in-memory map lock was poisoned.
    #[error("Storage lock poisoned")]
    Poisoned,
}

// =============================================================================
// Client Error
// =============================================================================

/// Everything a store consumer can see fail.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Base URL or endpoint could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // HTTP Errors
    // =========================================================================
    /// The server answered with a non-success status. The body is not read.
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// Connection, DNS, TLS or timeout failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A caller supplied header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Persistent storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Input rejected before sending.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Domain rule violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// HTTP status of a rejected request, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for 401 responses (expired or invalid token).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ClientError::Status { status: 500 };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_categorization() {
        assert!(ClientError::Status { status: 401 }.is_unauthorized());
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
        assert!(!ClientError::EmptyCart.is_config_error());
        assert!(!ClientError::EmptyCart.is_transport());
        assert_eq!(ClientError::EmptyCart.status(), None);
    }

    #[test]
    fn test_storage_error_converts() {
        let err: ClientError = StorageError::NoLocation.into();
        assert!(matches!(err, ClientError::Storage(StorageError::NoLocation)));
        assert_eq!(err.to_string(), "No storage location available");
    }
}
