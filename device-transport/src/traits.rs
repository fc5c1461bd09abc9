//! Trait seams between the registry and transport implementations.

use std::sync::Arc;

use async_trait::async_trait;
use device_primitives::{ConnectionInfo, SchemaDescriptor, SealedConnectionInfo};
use serde_json::Value;

use crate::context::TransportContext;
use crate::error::TransportResult;

/// A live connection to a remote managed device.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Confirms the connection is usable, failing fast on bad credentials or
    /// unreachable targets.
    async fn verify(&self, context: &TransportContext) -> TransportResult<()>;

    /// Collects identifying facts from the remote device.
    async fn facts(&self, context: &TransportContext) -> TransportResult<Value>;

    /// Releases any resources held by the connection.
    async fn close(&self, context: &TransportContext) -> TransportResult<()>;
}

/// Constructs [`Transport`] instances for one registered transport name.
///
/// Factories form the explicit registration table: a transport is reachable
/// exactly when its factory has been registered, never through name-derived
/// symbol lookup.
pub trait TransportFactory: Send + Sync {
    /// Semantic validation hook, invoked after the structural schema check
    /// and before sealing. The default accepts everything; implementations
    /// with cross-attribute or value-range rules override it.
    ///
    /// # Errors
    ///
    /// Implementations return [`TransportError`](crate::TransportError)
    /// (typically [`Schema`](crate::TransportError::Schema)) describing the
    /// violated rule.
    fn validate(&self, connection_info: &ConnectionInfo) -> TransportResult<()> {
        let _ = connection_info;
        Ok(())
    }

    /// Builds a transport from validated, sealed connection info.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Failure`](crate::TransportError::Failure)
    /// when construction fails.
    fn build(
        &self,
        context: TransportContext,
        connection_info: SealedConnectionInfo,
    ) -> TransportResult<Arc<dyn Transport>>;
}

/// Supplies transport schemas on demand.
///
/// Sources replace conventional-path autoloading: the registry consults them
/// lazily when a lookup misses, and drains them wholesale for
/// [`list_all`](crate::TransportRegistry::list_all).
pub trait SchemaSource: Send + Sync {
    /// Returns the descriptor for a single transport name, if this source
    /// knows it.
    fn load(&self, name: &str) -> Option<SchemaDescriptor>;

    /// Returns every descriptor this source can supply.
    fn enumerate(&self) -> Vec<SchemaDescriptor>;
}
