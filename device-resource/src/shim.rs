//! Immutable resource view and its output projections.

use indexmap::IndexMap;
use serde_json::Value;

use crate::attributes::{AttributeDef, Behavior};
use crate::display::format_value;

/// Attribute values keyed by name, in insertion order.
pub type ResourceValues = IndexMap<String, Value>;

/// Read-only view over one resource instance, as returned by a provider,
/// with enough metadata to project it into the host's textual forms.
///
/// The value map is fixed at construction; the shim exposes no mutation.
/// Attributes without a definition, and `null`-valued attributes, are
/// silently filtered from every projection. That is policy, not error
/// suppression.
#[derive(Clone, Debug)]
pub struct ResourceShim {
    values: ResourceValues,
    type_name: String,
    namevars: Vec<String>,
    attr_defs: IndexMap<String, AttributeDef>,
    catalog: Option<String>,
}

impl ResourceShim {
    /// Creates a shim over the supplied values.
    #[must_use]
    pub fn new(
        values: ResourceValues,
        type_name: impl Into<String>,
        namevars: Vec<String>,
        attr_defs: IndexMap<String, AttributeDef>,
    ) -> Self {
        Self {
            values,
            type_name: type_name.into(),
            namevars,
            attr_defs,
            catalog: None,
        }
    }

    /// Labels the shim with the enclosing catalog. Informational only; no
    /// projection consumes it.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Returns the attribute values.
    #[must_use]
    pub const fn values(&self) -> &ResourceValues {
        &self.values
    }

    /// Returns the resource type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the name-variable attribute names.
    #[must_use]
    pub fn namevars(&self) -> &[String] {
        &self.namevars
    }

    /// Returns the attribute definitions.
    #[must_use]
    pub const fn attr_defs(&self) -> &IndexMap<String, AttributeDef> {
        &self.attr_defs
    }

    /// Returns the catalog label, if set.
    #[must_use]
    pub fn catalog(&self) -> Option<&str> {
        self.catalog.as_deref()
    }

    /// Returns the resource title: the `title` value when present, otherwise
    /// the value of the first name variable. `None` when neither is present;
    /// supplying one is the caller's responsibility.
    #[must_use]
    pub fn title(&self) -> Option<&Value> {
        self.values
            .get("title")
            .filter(|value| !value.is_null())
            .or_else(|| {
                self.namevars
                    .first()
                    .and_then(|namevar| self.values.get(namevar))
                    .filter(|value| !value.is_null())
            })
    }

    /// Returns the attribute names that participate in projections, in
    /// insertion order: everything except `title`, keys with no definition,
    /// and the name variable itself when it is the only one (its value
    /// becomes the title instead).
    #[must_use]
    pub fn filtered_keys(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| self.is_projected(key))
            .collect()
    }

    /// Renders the resource as a manifest declaration. Read-only attributes
    /// become commented lines; `null`-valued attributes are dropped
    /// entirely.
    #[must_use]
    pub fn to_manifest(&self) -> String {
        let title = self.title().map(format_value).unwrap_or_default();
        let mut lines = vec![format!("{} {{ {title}: ", self.type_name)];

        for key in self.filtered_keys() {
            let Some(value) = self.values.get(key) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let rendered = format_value(value);
            if self.is_read_only(key) {
                lines.push(format!("# {key} => {rendered}, # Read Only"));
            } else {
                lines.push(format!("  {key} => {rendered},"));
            }
        }

        lines.push("}".to_owned());
        lines.join("\n")
    }

    /// Renders the resource as a JSON object keyed by title. Read-only
    /// attributes are included; `null`-valued attributes are dropped.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        let mut attributes = serde_json::Map::new();
        for key in self.filtered_keys() {
            if let Some(value) = self.values.get(key) {
                if !value.is_null() {
                    attributes.insert(key.to_owned(), value.clone());
                }
            }
        }

        let mut resource = serde_json::Map::new();
        resource.insert(self.title_string(), Value::Object(attributes));
        Value::Object(resource)
    }

    /// Renders [`to_json_value`](Self::to_json_value) as a compact JSON
    /// string.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_json_value().to_string()
    }

    /// Renders the resource as a YAML mapping fragment nested under the
    /// title key, for inclusion in a Hiera data file. `null`-valued
    /// attributes are dropped; titles containing YAML-reserved characters
    /// are escaped by the emitter.
    #[must_use]
    pub fn to_hiera_yaml(&self) -> String {
        let mut attributes = serde_yaml::Mapping::new();
        for key in self.filtered_keys() {
            if let Some(value) = self.values.get(key) {
                if !value.is_null() {
                    attributes.insert(serde_yaml::Value::String(key.to_owned()), yaml_value(value));
                }
            }
        }

        let title = match self.title() {
            Some(Value::String(s)) => serde_yaml::Value::String(s.clone()),
            Some(value) => yaml_value(value),
            None => serde_yaml::Value::String(String::new()),
        };

        let mut root = serde_yaml::Mapping::new();
        root.insert(title, serde_yaml::Value::Mapping(attributes));
        serde_yaml::to_string(&serde_yaml::Value::Mapping(root)).unwrap_or_default()
    }

    /// Present for host resource-protocol compatibility; the projections
    /// already filter, so there is nothing to prune.
    #[must_use]
    pub fn prune_parameters(&self) -> &Self {
        self
    }

    fn title_string(&self) -> String {
        match self.title() {
            Some(Value::String(s)) => s.clone(),
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }

    fn is_projected(&self, key: &str) -> bool {
        if key == "title" {
            return false;
        }
        let Some(def) = self.attr_defs.get(key) else {
            return false;
        };
        !(self.namevars.len() == 1 && def.behavior() == Some(Behavior::Namevar))
    }

    fn is_read_only(&self, key: &str) -> bool {
        self.attr_defs
            .get(key)
            .is_some_and(|def| def.behavior() == Some(Behavior::ReadOnly))
    }
}

fn yaml_value(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_yaml::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_yaml::Value::Number(u.into())
            } else {
                serde_yaml::Value::Number(serde_yaml::Number::from(n.as_f64().unwrap_or_default()))
            }
        }
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(items) => serde_yaml::Value::Sequence(items.iter().map(yaml_value).collect()),
        Value::Object(entries) => {
            let mut mapping = serde_yaml::Mapping::new();
            for (key, value) in entries {
                mapping.insert(serde_yaml::Value::String(key.clone()), yaml_value(value));
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}
