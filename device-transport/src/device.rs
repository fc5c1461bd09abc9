//! Current-device handle for host tooling and tests.

use std::fmt;
use std::sync::Arc;

use device_primitives::TransportName;

use crate::traits::Transport;

/// Named wrapper around an injected transport, installed as the registry's
/// current device.
///
/// Host code that manages "the device under management" reads this handle
/// instead of constructing its own connection; tests inject mock transports
/// through it.
#[derive(Clone)]
pub struct DeviceHandle {
    name: TransportName,
    transport: Arc<dyn Transport>,
}

impl DeviceHandle {
    /// Wraps a transport under the supplied name.
    #[must_use]
    pub fn new(name: TransportName, transport: Arc<dyn Transport>) -> Self {
        Self { name, transport }
    }

    /// Returns the transport name the device was injected under.
    #[must_use]
    pub const fn name(&self) -> &TransportName {
        &self.name
    }

    /// Returns the wrapped transport.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("name", &self.name)
            .field("transport", &"dyn Transport")
            .finish()
    }
}
