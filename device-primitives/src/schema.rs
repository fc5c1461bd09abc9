//! Transport schema descriptors, validated definitions, and the attribute
//! taxonomy.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::name::TransportName;

/// Raw connection attributes supplied by a caller, before validation and
/// sensitive sealing.
pub type ConnectionInfo = IndexMap<String, Value>;

/// Kind of value a connection attribute accepts.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// UTF-8 string.
    String,
    /// Signed or unsigned integer.
    Integer,
    /// Any numeric value, including fractions.
    Float,
    /// Boolean flag.
    Boolean,
    /// Ordered list of values.
    Array,
    /// String-keyed mapping.
    Map,
    /// No structural constraint.
    Any,
}

impl AttributeKind {
    /// Returns whether the supplied value structurally matches this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Map => value.is_object(),
            Self::Any => true,
        }
    }
}

impl Display for AttributeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Map => "map",
            Self::Any => "any",
        })
    }
}

/// Specification of a single connection attribute.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AttributeSpec {
    #[serde(rename = "type")]
    kind: AttributeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default = "default_required")]
    required: bool,
    #[serde(default)]
    sensitive: bool,
}

const fn default_required() -> bool {
    true
}

impl AttributeSpec {
    /// Creates a required, non-sensitive attribute of the supplied kind.
    #[must_use]
    pub const fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            description: None,
            required: true,
            sensitive: false,
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the attribute as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the attribute as sensitive; its value will be sealed before a
    /// transport is constructed.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Returns the attribute kind.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the attribute must be present in connection info.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns whether the attribute's value is sealed before use.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }
}

/// Registration input describing a transport schema.
///
/// All fields are optional at this stage; [`TransportSchema::from_descriptor`]
/// enforces presence and shape.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SchemaDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection_info: Option<IndexMap<String, AttributeSpec>>,
}

impl SchemaDescriptor {
    /// Creates a descriptor with the supplied name and description and an
    /// empty connection-info table.
    #[must_use]
    pub fn new(name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            desc: Some(desc.into()),
            connection_info: Some(IndexMap::new()),
        }
    }

    /// Adds a connection attribute specification.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, spec: AttributeSpec) -> Self {
        self.connection_info
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), spec);
        self
    }

    /// Returns the declared transport name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared description, if any.
    #[must_use]
    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    /// Returns the declared connection attributes, if any.
    #[must_use]
    pub const fn connection_info(&self) -> Option<&IndexMap<String, AttributeSpec>> {
        self.connection_info.as_ref()
    }
}

/// Validated, immutable transport schema definition.
///
/// Instances only exist once a descriptor has passed
/// [`from_descriptor`](Self::from_descriptor); re-registration rules and
/// copy-on-read are the registry's concern, value-type `Clone` is this
/// type's.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TransportSchema {
    name: TransportName,
    description: String,
    connection_info: IndexMap<String, AttributeSpec>,
}

impl TransportSchema {
    /// Validates a descriptor into a schema definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] naming the missing field when `name`,
    /// `desc`, or `connection_info` is absent, and
    /// [`Error::InvalidTransportName`] when the declared name is malformed.
    pub fn from_descriptor(descriptor: SchemaDescriptor) -> Result<Self> {
        let SchemaDescriptor {
            name,
            desc,
            connection_info,
        } = descriptor;

        let name = name.ok_or_else(|| Error::InvalidSchema {
            reason: "transport schema requires a `name`".into(),
        })?;
        let name = TransportName::new(name)?;

        let description = desc.ok_or_else(|| Error::InvalidSchema {
            reason: "transport schema requires a `desc`".into(),
        })?;

        let connection_info = connection_info.ok_or_else(|| Error::InvalidSchema {
            reason: "transport schema requires a `connection_info` mapping".into(),
        })?;

        Ok(Self {
            name,
            description,
            connection_info,
        })
    }

    /// Returns the transport name.
    #[must_use]
    pub const fn name(&self) -> &TransportName {
        &self.name
    }

    /// Returns the schema description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the connection attribute specifications.
    #[must_use]
    pub const fn connection_info(&self) -> &IndexMap<String, AttributeSpec> {
        &self.connection_info
    }

    /// Returns the specification for a single attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.connection_info.get(name)
    }

    /// Iterates over the names of attributes flagged sensitive.
    pub fn sensitive_attributes(&self) -> impl Iterator<Item = &str> {
        self.connection_info
            .iter()
            .filter(|(_, spec)| spec.is_sensitive())
            .map(|(name, _)| name.as_str())
    }

    /// Checks connection info structurally against this schema: every
    /// required attribute present, no unknown attributes, every supplied
    /// value matching its declared kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectionInfo`] with a message carrying the
    /// supplied prefix on the first violation found.
    pub fn check_connection_info(
        &self,
        connection_info: &ConnectionInfo,
        message_prefix: &str,
    ) -> Result<()> {
        for (attr, spec) in &self.connection_info {
            if spec.is_required() && !connection_info.contains_key(attr) {
                return Err(Error::InvalidConnectionInfo {
                    message: format!("{message_prefix}: required attribute `{attr}` is missing"),
                });
            }
        }

        for (attr, value) in connection_info {
            let Some(spec) = self.connection_info.get(attr) else {
                return Err(Error::InvalidConnectionInfo {
                    message: format!("{message_prefix}: unknown attribute `{attr}`"),
                });
            };
            if !spec.kind().matches(value) {
                return Err(Error::InvalidConnectionInfo {
                    message: format!(
                        "{message_prefix}: attribute `{attr}` expects {}, got `{value}`",
                        spec.kind()
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "connection info mismatch";

    fn descriptor() -> SchemaDescriptor {
        SchemaDescriptor::new("net_ssh", "Connects over SSH")
            .with_attribute(
                "host",
                AttributeSpec::new(AttributeKind::String).with_description("target host"),
            )
            .with_attribute(
                "port",
                AttributeSpec::new(AttributeKind::Integer).optional(),
            )
            .with_attribute(
                "password",
                AttributeSpec::new(AttributeKind::String).sensitive(),
            )
    }

    #[test]
    fn builds_schema_from_descriptor() {
        let schema = TransportSchema::from_descriptor(descriptor()).expect("schema");
        assert_eq!(schema.name().as_str(), "net_ssh");
        assert_eq!(schema.description(), "Connects over SSH");
        assert_eq!(schema.connection_info().len(), 3);
        assert_eq!(
            schema.sensitive_attributes().collect::<Vec<_>>(),
            ["password"]
        );
    }

    #[test]
    fn missing_fields_are_named() {
        let err = TransportSchema::from_descriptor(SchemaDescriptor::default())
            .expect_err("empty descriptor");
        assert!(matches!(err, Error::InvalidSchema { reason } if reason.contains("`name`")));

        let mut descriptor = SchemaDescriptor::default();
        descriptor.name = Some("net_ssh".into());
        let err = TransportSchema::from_descriptor(descriptor).expect_err("missing desc");
        assert!(matches!(err, Error::InvalidSchema { reason } if reason.contains("`desc`")));
    }

    #[test]
    fn malformed_name_is_rejected() {
        let descriptor = SchemaDescriptor::new("Net SSH", "desc");
        let err = TransportSchema::from_descriptor(descriptor).expect_err("bad name");
        assert!(matches!(err, Error::InvalidTransportName { .. }));
    }

    #[test]
    fn check_accepts_matching_info() {
        let schema = TransportSchema::from_descriptor(descriptor()).expect("schema");
        let info: ConnectionInfo = [
            ("host".to_owned(), json!("switch.example.com")),
            ("password".to_owned(), json!("hunter2")),
        ]
        .into_iter()
        .collect();

        schema.check_connection_info(&info, PREFIX).expect("valid");
    }

    #[test]
    fn check_flags_missing_required_attribute() {
        let schema = TransportSchema::from_descriptor(descriptor()).expect("schema");
        let info: ConnectionInfo = [("password".to_owned(), json!("hunter2"))]
            .into_iter()
            .collect();

        let err = schema
            .check_connection_info(&info, PREFIX)
            .expect_err("missing host");
        assert!(matches!(
            err,
            Error::InvalidConnectionInfo { message }
                if message.starts_with(PREFIX) && message.contains("`host`")
        ));
    }

    #[test]
    fn check_flags_unknown_attribute_and_kind_mismatch() {
        let schema = TransportSchema::from_descriptor(descriptor()).expect("schema");

        let info: ConnectionInfo = [
            ("host".to_owned(), json!("switch")),
            ("password".to_owned(), json!("hunter2")),
            ("color".to_owned(), json!("blue")),
        ]
        .into_iter()
        .collect();
        let err = schema
            .check_connection_info(&info, PREFIX)
            .expect_err("unknown attribute");
        assert!(
            matches!(err, Error::InvalidConnectionInfo { message } if message.contains("`color`"))
        );

        let info: ConnectionInfo = [
            ("host".to_owned(), json!("switch")),
            ("port".to_owned(), json!("twenty-two")),
            ("password".to_owned(), json!("hunter2")),
        ]
        .into_iter()
        .collect();
        let err = schema
            .check_connection_info(&info, PREFIX)
            .expect_err("kind mismatch");
        assert!(
            matches!(err, Error::InvalidConnectionInfo { message } if message.contains("integer"))
        );
    }

    #[test]
    fn descriptor_deserializes_from_json() {
        let descriptor: SchemaDescriptor = serde_json::from_value(json!({
            "name": "net_ssh",
            "desc": "Connects over SSH",
            "connection_info": {
                "host": { "type": "string" },
                "password": { "type": "string", "sensitive": true },
                "port": { "type": "integer", "required": false }
            }
        }))
        .expect("descriptor");

        let schema = TransportSchema::from_descriptor(descriptor).expect("schema");
        let password = schema.attribute("password").expect("password spec");
        assert!(password.is_sensitive());
        let port = schema.attribute("port").expect("port spec");
        assert!(!port.is_required());
    }
}
