//! Validated transport names.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 64;

/// Name under which a transport schema and its factory are registered.
///
/// Names are the registry keys themselves; there is no derived class or
/// module lookup behind them.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportName(String);

impl TransportName {
    /// Creates a new transport name after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransportName`] if the name is empty, too
    /// long, does not start with a lowercase letter, or contains unsupported
    /// characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidTransportName {
                name,
                reason: "name cannot be empty".into(),
            });
        }
        if name.len() > MAX_NAME_LEN {
            return Err(Error::InvalidTransportName {
                name,
                reason: format!("name length must be <= {MAX_NAME_LEN}"),
            });
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(Error::InvalidTransportName {
                name,
                reason: "name must start with a lowercase letter".into(),
            });
        }
        if !name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | '_'))
        {
            return Err(Error::InvalidTransportName {
                name,
                reason: "name must contain lowercase alphanumeric, dash, or underscore".into(),
            });
        }
        Ok(Self(name))
    }

    /// Returns the transport name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransportName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TransportName> for String {
    fn from(value: TransportName) -> Self {
        value.0
    }
}
