//! Device transport registry and resource projection runtime facade.
//!
//! Depend on this crate via `cargo add tether-devices`. It bundles the member
//! crates behind feature flags so downstream users can enable or disable
//! components as needed.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use device_primitives as primitives;

/// Transport registry and construction seams (enabled by `transport`
/// feature).
#[cfg(feature = "transport")]
pub use device_transport as transport;

/// Resource shim and projections (enabled by `resource` feature).
#[cfg(feature = "resource")]
pub use device_resource as resource;
