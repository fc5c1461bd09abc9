//! Resource shim: projects a resource's attribute map into the textual
//! forms the host runtime serializes: manifest declarations, JSON, and
//! Hiera-style YAML fragments.

#![warn(missing_docs, clippy::pedantic)]

mod attributes;
mod display;
mod shim;

pub use attributes::{AttributeDef, Behavior};
pub use shim::{ResourceShim, ResourceValues};
