//! Per-connection context handed to transport factories and instances.

use std::fmt::{self, Display, Formatter};

use device_primitives::{Environment, TransportName, TransportSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single transport connection attempt.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generates a random connection identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::random()
    }
}

impl Display for ConnectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Context describing one transport construction: which transport, under
/// which environment, against which schema.
///
/// The registry creates one per [`connect`](crate::TransportRegistry::connect)
/// call and hands it to the factory; transports keep it for the lifetime of
/// the connection.
#[derive(Clone, Debug)]
pub struct TransportContext {
    connection_id: ConnectionId,
    name: TransportName,
    environment: Environment,
    schema: TransportSchema,
}

impl TransportContext {
    /// Creates a context with a fresh connection identifier.
    #[must_use]
    pub fn new(name: TransportName, environment: Environment, schema: TransportSchema) -> Self {
        Self {
            connection_id: ConnectionId::random(),
            name,
            environment,
            schema,
        }
    }

    /// Returns the connection identifier.
    #[must_use]
    pub const fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Returns the transport name.
    #[must_use]
    pub const fn name(&self) -> &TransportName {
        &self.name
    }

    /// Returns the environment the connection was made under.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the schema the connection info was validated against.
    #[must_use]
    pub const fn schema(&self) -> &TransportSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device_primitives::SchemaDescriptor;

    #[test]
    fn context_carries_identity_and_schema() {
        let schema = TransportSchema::from_descriptor(SchemaDescriptor::new("net_ssh", "SSH"))
            .expect("schema");
        let ctx = TransportContext::new(
            schema.name().clone(),
            Environment::default(),
            schema.clone(),
        );

        assert_eq!(ctx.name().as_str(), "net_ssh");
        assert_eq!(ctx.schema(), &schema);
        assert_ne!(
            TransportContext::new(schema.name().clone(), Environment::default(), schema)
                .connection_id(),
            ctx.connection_id()
        );
    }
}
