//! Core shared types for the device transport runtime.

#![warn(missing_docs, clippy::pedantic)]

mod environment;
mod error;
mod name;
mod schema;
mod sensitive;

/// Environment identifier scoping registry namespaces.
pub use environment::{DEFAULT_ENVIRONMENT, Environment};
/// Error type and result alias shared across the runtime.
pub use error::{Error, Result};
/// Validated transport name used as a registry key.
pub use name::TransportName;
/// Schema descriptors, validated definitions, and the attribute taxonomy.
pub use schema::{
    AttributeKind, AttributeSpec, ConnectionInfo, SchemaDescriptor, TransportSchema,
};
/// Redacting wrapper for sensitive connection attributes.
pub use sensitive::{ConnectionValue, SealedConnectionInfo, Sensitive};
