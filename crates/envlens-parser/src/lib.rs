pub mod errors;
pub mod formats;
pub mod model;
mod registry;
pub mod timestamp;

pub use errors::{DecodeError, DecoderAttempt, FormatAttempt, TimestampError};
pub use model::{RawReading, RawValue, DEFAULT_TIMESTAMP_FIELD};
pub use registry::{decode_batch, decode_with_decoders, decoder_for_path, BatchDecoder};
pub use timestamp::{TimestampParser, DEFAULT_TIMESTAMP_FORMATS};
