use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct DecoderAttempt {
    pub decoder: &'static str,
    pub message: String,
}

impl DecoderAttempt {
    pub fn new(decoder: &'static str, message: impl Into<String>) -> Self {
        Self {
            decoder,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecoderAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.decoder, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatAttempt {
    pub format: String,
    pub message: String,
}

impl fmt::Display for FormatAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.format, self.message)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("no timestamp format matched '{value}'; attempts: {attempts:?}")]
    NoMatchingFormat {
        value: String,
        attempts: Vec<FormatAttempt>,
    },
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{decoder} format mismatch: {reason}")]
    FormatMismatch {
        decoder: &'static str,
        reason: String,
    },

    #[error("{decoder} CSV error: {source}")]
    Csv {
        decoder: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{decoder} record {index} invalid: {message}")]
    Record {
        decoder: &'static str,
        index: usize,
        message: String,
    },

    #[error("no decoder recognized this batch; attempts: {attempts:?}")]
    NoMatchingDecoder { attempts: Vec<DecoderAttempt> },
}
