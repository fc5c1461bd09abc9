//! Resource attribute definitions.

use serde::{Deserialize, Serialize};

/// How an attribute participates in the resource lifecycle.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Part of the resource's identity; folded into the title when it is the
    /// only name variable.
    Namevar,
    /// Reported by the provider but never managed; rendered as a comment in
    /// manifests.
    ReadOnly,
    /// Settable at creation only.
    InitOnly,
    /// Influences how the resource is managed without being part of its
    /// state.
    Parameter,
    /// Ordinary managed state.
    Property,
}

/// Definition of a single resource attribute.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AttributeDef {
    #[serde(rename = "type")]
    value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    behavior: Option<Behavior>,
}

impl AttributeDef {
    /// Creates a definition with the supplied type expression.
    #[must_use]
    pub fn new(value_type: impl Into<String>) -> Self {
        Self {
            value_type: value_type.into(),
            description: None,
            behavior: None,
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the attribute behavior.
    #[must_use]
    pub const fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Returns the type expression.
    #[must_use]
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the attribute behavior, if declared.
    #[must_use]
    pub const fn behavior(&self) -> Option<Behavior> {
        self.behavior
    }
}
