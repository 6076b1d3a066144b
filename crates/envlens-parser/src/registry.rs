use std::path::Path;

use crate::errors::{DecodeError, DecoderAttempt};
use crate::formats::{CsvTableDecoder, JsonArrayDecoder};
use crate::model::RawReading;

pub trait BatchDecoder: Sync {
    fn name(&self) -> &'static str;
    fn extensions(&self) -> &'static [&'static str];
    fn decode(&self, content: &str, timestamp_field: &str) -> Result<Vec<RawReading>, DecodeError>;
}

static JSON_ARRAY: JsonArrayDecoder = JsonArrayDecoder;
static CSV_TABLE: CsvTableDecoder = CsvTableDecoder;
static DECODERS: [&dyn BatchDecoder; 2] = [&JSON_ARRAY, &CSV_TABLE];

/// Picks the decoder registered for the file extension of `path`.
pub fn decoder_for_path(path: &Path) -> Option<&'static dyn BatchDecoder> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    DECODERS
        .iter()
        .copied()
        .find(|decoder| decoder.extensions().contains(&ext.as_str()))
}

/// Decodes a batch, preferring the decoder for the locator's extension and otherwise
/// trying every registered decoder in order.
pub fn decode_batch(
    locator: &str,
    content: &str,
    timestamp_field: &str,
) -> Result<Vec<RawReading>, DecodeError> {
    match decoder_for_path(Path::new(locator)) {
        Some(decoder) => decoder.decode(content, timestamp_field),
        None => decode_with_decoders(content, timestamp_field, &DECODERS),
    }
}

pub fn decode_with_decoders(
    content: &str,
    timestamp_field: &str,
    decoders: &[&dyn BatchDecoder],
) -> Result<Vec<RawReading>, DecodeError> {
    let mut attempts = Vec::new();

    for decoder in decoders {
        match decoder.decode(content, timestamp_field) {
            Ok(readings) => return Ok(readings),
            Err(DecodeError::FormatMismatch { reason, .. }) => {
                attempts.push(DecoderAttempt::new(decoder.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(DecodeError::NoMatchingDecoder { attempts })
}
