//! Shared error definitions for device primitives.

use thiserror::Error;

/// Result alias used throughout the device runtime.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating device primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// Environment identifier failed validation.
    #[error("invalid environment: {reason}")]
    InvalidEnvironment {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Transport name failed validation.
    #[error("invalid transport name `{name}`: {reason}")]
    InvalidTransportName {
        /// The offending name string.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Transport schema descriptor failed validation.
    #[error("invalid transport schema: {reason}")]
    InvalidSchema {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Connection info did not satisfy the transport schema.
    #[error("{message}")]
    InvalidConnectionInfo {
        /// Fully formatted message, including the caller's prefix.
        message: String,
    },
}
