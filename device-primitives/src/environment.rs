//! Environment identifiers scoping the transport registry namespace.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel environment used when the caller has no environment model.
pub const DEFAULT_ENVIRONMENT: &str = "transports_default";

const MAX_ENVIRONMENT_LEN: usize = 96;

/// Identifier scoping a transport registry namespace.
///
/// Registrations under one environment are invisible to every other
/// environment. Callers without an environment model use
/// [`Environment::default`], which yields the [`DEFAULT_ENVIRONMENT`]
/// sentinel.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    /// Creates a new environment identifier after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnvironment`] if the identifier is empty, too
    /// long, or contains unsupported characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidEnvironment {
                reason: "identifier cannot be empty".into(),
            });
        }
        if name.len() > MAX_ENVIRONMENT_LEN {
            return Err(Error::InvalidEnvironment {
                reason: format!("identifier length must be <= {MAX_ENVIRONMENT_LEN}"),
            });
        }
        if !name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | '_' | '.'))
        {
            return Err(Error::InvalidEnvironment {
                reason: "identifier must contain lowercase alphanumeric, dash, underscore, or dot"
                    .into(),
            });
        }
        Ok(Self(name))
    }

    /// Returns the environment identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self(DEFAULT_ENVIRONMENT.to_owned())
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Environment> for String {
    fn from(value: Environment) -> Self {
        value.0
    }
}
