use serde_json::Value;

use crate::errors::DecodeError;
use crate::model::{RawReading, RawValue};
use crate::registry::BatchDecoder;

const DECODER_NAME: &str = "json_array";

/// Decodes the dashboard exports: a top-level JSON array of flat objects.
pub struct JsonArrayDecoder;

impl BatchDecoder for JsonArrayDecoder {
    fn name(&self) -> &'static str {
        DECODER_NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn decode(&self, content: &str, timestamp_field: &str) -> Result<Vec<RawReading>, DecodeError> {
        let document: Value =
            serde_json::from_str(content).map_err(|err| DecodeError::FormatMismatch {
                decoder: DECODER_NAME,
                reason: err.to_string(),
            })?;

        let Value::Array(items) = document else {
            return Err(DecodeError::FormatMismatch {
                decoder: DECODER_NAME,
                reason: "expected a top-level array of records".to_string(),
            });
        };

        let mut readings = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(mut object) = item else {
                return Err(DecodeError::Record {
                    decoder: DECODER_NAME,
                    index,
                    message: "expected a JSON object".to_string(),
                });
            };

            let timestamp = match object.remove(timestamp_field) {
                Some(Value::String(text)) => text,
                _ => String::new(),
            };

            let fields = object
                .into_iter()
                .map(|(name, value)| (name, RawValue::from_json(value)))
                .collect();

            readings.push(RawReading { timestamp, fields });
        }

        Ok(readings)
    }
}
