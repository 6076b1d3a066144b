use chrono::NaiveDateTime;

use crate::errors::{FormatAttempt, TimestampError};

/// Formats seen in the reference exports, in the order they are tried.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%d/%m/%y %H:%M"];

/// Tries an ordered list of `chrono` format strings against a textual timestamp.
///
/// The first format that parses wins, so a string matching several formats always
/// resolves the same way. Parsed instants are timezone-naive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParser {
    formats: Vec<String>,
}

impl TimestampParser {
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Returns `None` when no format matches.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    }

    /// Like [`TimestampParser::parse`], but reports why each format was rejected.
    pub fn parse_with_attempts(&self, value: &str) -> Result<NaiveDateTime, TimestampError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TimestampError::Empty);
        }

        let mut attempts = Vec::with_capacity(self.formats.len());
        for fmt in &self.formats {
            match NaiveDateTime::parse_from_str(trimmed, fmt) {
                Ok(parsed) => return Ok(parsed),
                Err(err) => attempts.push(FormatAttempt {
                    format: fmt.clone(),
                    message: err.to_string(),
                }),
            }
        }

        Err(TimestampError::NoMatchingFormat {
            value: trimmed.to_string(),
            attempts,
        })
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMATS.iter().copied())
    }
}
