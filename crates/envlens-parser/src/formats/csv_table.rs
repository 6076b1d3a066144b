use csv::ReaderBuilder;

use crate::errors::DecodeError;
use crate::model::{RawReading, RawValue};
use crate::registry::BatchDecoder;

const DECODER_NAME: &str = "csv_table";

/// Decodes a comma-separated table whose header row names the fields.
///
/// Every cell is kept as text; an empty cell becomes [`RawValue::Null`].
pub struct CsvTableDecoder;

impl BatchDecoder for CsvTableDecoder {
    fn name(&self) -> &'static str {
        DECODER_NAME
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn decode(&self, content: &str, timestamp_field: &str) -> Result<Vec<RawReading>, DecodeError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|source| DecodeError::Csv {
                decoder: DECODER_NAME,
                source,
            })?
            .clone();

        let Some(timestamp_idx) = headers.iter().position(|name| name == timestamp_field) else {
            return Err(DecodeError::FormatMismatch {
                decoder: DECODER_NAME,
                reason: format!("header has no '{timestamp_field}' column"),
            });
        };

        let mut readings = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|source| DecodeError::Csv {
                decoder: DECODER_NAME,
                source,
            })?;

            if record.len() != headers.len() {
                return Err(DecodeError::Record {
                    decoder: DECODER_NAME,
                    index,
                    message: format!(
                        "expected {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }

            let mut reading = RawReading::new(record.get(timestamp_idx).unwrap_or_default());
            for (col_idx, (name, cell)) in headers.iter().zip(record.iter()).enumerate() {
                if col_idx == timestamp_idx {
                    continue;
                }
                let value = if cell.trim().is_empty() {
                    RawValue::Null
                } else {
                    RawValue::Text(cell.to_string())
                };
                reading.fields.insert(name.to_string(), value);
            }
            readings.push(reading);
        }

        Ok(readings)
    }
}
