//! Transport registry for remote managed devices.
//!
//! This crate provides the coordination layer between transport schemas and
//! transport implementations: an environment-scoped registry of validated
//! schemas, an explicit factory table for constructing transports, a
//! discovery seam for loading schemas on demand, and an injectable
//! current-device slot for host tooling and tests.

#![warn(missing_docs, clippy::pedantic)]

mod context;
mod device;
mod error;
mod registry;
mod traits;

pub use context::{ConnectionId, TransportContext};
pub use device::DeviceHandle;
pub use error::{TransportError, TransportResult};
pub use registry::{CONNECTION_INFO_PREFIX, TransportRegistry, seal_connection_info};
pub use traits::{SchemaSource, Transport, TransportFactory};
