//! Manifest value formatting.

use serde_json::Value;

/// Formats a value the way the host renders parameter values in resource
/// declarations: strings single-quoted, arrays bracketed, maps braced with
/// `=>` pairs, scalars bare.
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        Value::Array(items) => {
            let formatted: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", formatted.join(", "))
        }
        Value::Object(entries) => {
            let formatted: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("'{key}' => {}", format_value(value)))
                .collect();
            format!("{{{}}}", formatted.join(", "))
        }
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
    }
}
