//! Error definitions for transport registration and construction.

use device_primitives::Environment;
use thiserror::Error;

/// Result alias for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors surfaced by the transport registry.
///
/// Every variant is terminal for the calling operation; nothing here is
/// retried, and a failed registration leaves no partial state behind.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Schema descriptor or connection info failed validation.
    #[error(transparent)]
    Schema(#[from] device_primitives::Error),

    /// Transport name collided with an existing registration.
    #[error("transport `{name}` is already registered for environment `{environment}`")]
    DuplicateTransport {
        /// Name of the offending transport.
        name: String,
        /// Environment holding the existing registration.
        environment: Environment,
    },

    /// Factory name collided with an existing registration.
    #[error("transport factory `{name}` is already registered")]
    DuplicateFactory {
        /// Name of the offending factory.
        name: String,
    },

    /// Requested transport has no registered or loadable schema, or no
    /// factory to construct it.
    #[error("transport `{name}` is not registered for environment `{environment}`")]
    UnknownTransport {
        /// Name of the missing transport.
        name: String,
        /// Environment the lookup ran under.
        environment: Environment,
    },

    /// Transport construction or operation failed.
    #[error("transport failure: {reason}")]
    Failure {
        /// Human-readable context provided by the implementation.
        reason: String,
    },
}

impl TransportError {
    /// Convenience helper to construct implementation failures.
    #[must_use]
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }
}
