//! Diagnostic rendering for keys that resolve to nothing

use crate::params::Params;

/// Placeholder text for a key with no translation.
///
/// With no parameters this is the key itself. Otherwise the parameters are
/// appended as `key: { "name": "value", ... }`, with names and values quoted
/// as JSON string literals so embedded quotes stay readable.
pub fn diagnostic(key: &str, params: &Params) -> String {
    if params.is_empty() {
        return key.to_string();
    }

    let fields: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{}: {}", quote(name), quote(value)))
        .collect();
    format!("{key}: {{ {} }}", fields.join(", "))
}

fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
