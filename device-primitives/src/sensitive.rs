//! Redacting wrapper for sensitive connection attributes.

use std::fmt::{self, Debug, Display, Formatter};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

const REDACTED: &str = "Sensitive [value redacted]";

/// Opaque wrapper preventing a value from leaking into logs or dumps.
///
/// `Debug`, `Display`, and `Serialize` all emit a fixed redaction marker;
/// [`expose`](Self::expose) is the only way to read the payload.
#[derive(Clone, PartialEq)]
pub struct Sensitive(Value);

impl Sensitive {
    /// Wraps the supplied value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the wrapped value. Call sites must opt in explicitly; there is
    /// no implicit conversion back to the payload.
    #[must_use]
    pub const fn expose(&self) -> &Value {
        &self.0
    }

    /// Consumes the wrapper and returns the payload.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Debug for Sensitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Display for Sensitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Sensitive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }
}

/// Connection attribute value after sensitive sealing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConnectionValue {
    /// Attribute not flagged sensitive; carried as-is.
    Plain(Value),
    /// Attribute flagged sensitive; redacted everywhere except
    /// [`expose`](Self::expose).
    Sensitive(Sensitive),
}

impl ConnectionValue {
    /// Returns whether the value is sealed.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        matches!(self, Self::Sensitive(_))
    }

    /// Returns the value if it is not sealed.
    #[must_use]
    pub const fn plain(&self) -> Option<&Value> {
        match self {
            Self::Plain(value) => Some(value),
            Self::Sensitive(_) => None,
        }
    }

    /// Returns the underlying value, sealed or not. The name mirrors
    /// [`Sensitive::expose`]: reading a sealed payload is an explicit act.
    #[must_use]
    pub const fn expose(&self) -> &Value {
        match self {
            Self::Plain(value) => value,
            Self::Sensitive(sensitive) => sensitive.expose(),
        }
    }
}

impl Display for ConnectionValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => Display::fmt(value, f),
            Self::Sensitive(sensitive) => Display::fmt(sensitive, f),
        }
    }
}

/// Connection attributes after sensitive sealing, ready for transport
/// construction.
pub type SealedConnectionInfo = IndexMap<String, ConnectionValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn debug_display_and_serde_redact() {
        let secret = Sensitive::new(json!("hunter2"));

        assert!(!format!("{secret:?}").contains("hunter2"));
        assert!(!secret.to_string().contains("hunter2"));

        let dumped = serde_json::to_string(&secret).expect("serialize");
        assert!(!dumped.contains("hunter2"));
        assert!(dumped.contains("redacted"));
    }

    #[test]
    fn expose_is_the_only_read_path() {
        let secret = Sensitive::new(json!("hunter2"));
        assert_eq!(secret.expose(), &json!("hunter2"));
        assert_eq!(secret.into_inner(), json!("hunter2"));
    }

    #[test]
    fn sealed_info_redacts_only_sensitive_entries() {
        let info: SealedConnectionInfo = [
            (
                "host".to_owned(),
                ConnectionValue::Plain(json!("switch.example.com")),
            ),
            (
                "password".to_owned(),
                ConnectionValue::Sensitive(Sensitive::new(json!("hunter2"))),
            ),
        ]
        .into_iter()
        .collect();

        let dumped = serde_json::to_string(&info).expect("serialize");
        assert!(dumped.contains("switch.example.com"));
        assert!(!dumped.contains("hunter2"));

        assert!(!info["host"].is_sensitive());
        assert!(info["password"].is_sensitive());
        assert_eq!(info["password"].expose(), &json!("hunter2"));
        assert_eq!(info["password"].plain(), None);
    }
}
