//! The tribute settings record and its raw administrative input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tribute::sanitize::sanitize_text_field;

/// Tribute text used when none has been configured.
pub const DEFAULT_MESSAGE: &str = "Ozzy \"The Prince of Darkness\" Osbourne";

/// Key under which the record is persisted in the option backend.
pub const OPTION_KEY: &str = "xclacks_overhead_options";

/// The single settings record driving header emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TributeSettings {
    /// Master switch. When false no headers are written.
    pub enabled: bool,

    /// Sanitized tribute text, never empty.
    pub message: String,

    /// Also send the hex-encoded header.
    pub send_hex: bool,
}

impl Default for TributeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            message: DEFAULT_MESSAGE.to_string(),
            send_hex: false,
        }
    }
}

impl TributeSettings {
    /// Merge a stored value over the defaults.
    ///
    /// Anything that is not an object is treated as absent. Fields with an
    /// unexpected type fall back to their default individually.
    pub fn from_stored(value: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(Value::Object(map)) = value else {
            return defaults;
        };

        Self {
            enabled: stored_flag(map, "enabled").unwrap_or(defaults.enabled),
            message: map
                .get("message")
                .and_then(Value::as_str)
                .map(sanitize_text_field)
                .filter(|m| !m.is_empty())
                .unwrap_or(defaults.message),
            send_hex: stored_flag(map, "send_hex").unwrap_or(defaults.send_hex),
        }
    }

    /// Serialized form written to the option backend.
    pub fn to_stored(&self) -> Value {
        serde_json::json!({
            "enabled": self.enabled,
            "message": self.message,
            "send_hex": self.send_hex,
        })
    }
}

// Stored flags may be booleans or the 0/1 integers older records used.
fn stored_flag(map: &Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// Unvalidated settings as submitted by an administrator.
///
/// Checkbox semantics: a flag is on only when the field is present with a
/// truthy value. Values arrive as strings from HTML forms and as JSON scalars
/// from the API, so each field keeps its raw JSON shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawInput {
    #[serde(default)]
    pub enabled: Option<Value>,

    #[serde(default)]
    pub message: Option<Value>,

    #[serde(default)]
    pub send_hex: Option<Value>,
}

impl RawInput {
    /// Sanitize into a complete record. Never rejects input.
    pub fn sanitize(&self) -> TributeSettings {
        let message = self
            .message
            .as_ref()
            .and_then(raw_text)
            .map(|m| sanitize_text_field(&m))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        TributeSettings {
            enabled: self.enabled.as_ref().is_some_and(is_truthy),
            message,
            send_hex: self.send_hex.as_ref().is_some_and(is_truthy),
        }
    }
}

fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "off" | "no"
        ),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
