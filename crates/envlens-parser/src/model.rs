use std::collections::BTreeMap;
use std::fmt;

/// Field that carries the reading's timestamp in the reference exports.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "time_stamp";

/// A single field value as it arrived from the data source.
///
/// Exports mix quoted and unquoted numbers, so nothing is coerced at decode time.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub(crate) fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(flag) => RawValue::Bool(flag),
            serde_json::Value::Number(number) => {
                number.as_f64().map(RawValue::Number).unwrap_or(RawValue::Null)
            }
            serde_json::Value::String(text) => RawValue::Text(text),
            // nested structures never hold a sensor value
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => RawValue::Null,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("null"),
            RawValue::Bool(flag) => write!(f, "{flag}"),
            RawValue::Number(number) => write!(f, "{number}"),
            RawValue::Text(text) => f.write_str(text),
        }
    }
}

/// One record of a location's batch: a textual timestamp plus named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReading {
    /// Empty when the source record had no textual timestamp.
    pub timestamp: String,
    pub fields: BTreeMap<String, RawValue>,
}

impl RawReading {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }
}
