use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use envlens_parser::{RawReading, RawValue, TimestampParser};
use serde::Serialize;

/// Calendar attributes derived from a parsed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarFields {
    /// 0..=23
    pub hour: u32,
    /// 0..=6, Monday = 0
    pub weekday: u32,
    /// 1..=12
    pub month: u32,
    /// 1..=31
    pub day: u32,
    pub year: i32,
    pub date: NaiveDate,
}

impl CalendarFields {
    pub fn from_instant(instant: NaiveDateTime) -> Self {
        // chrono counts from Sunday = 0; shift so the week starts on Monday
        let weekday = (instant.weekday().num_days_from_sunday() + 6) % 7;
        Self {
            hour: instant.hour(),
            weekday,
            month: instant.month(),
            day: instant.day(),
            year: instant.year(),
            date: instant.date(),
        }
    }

    /// `YYYY-MM-DD`
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A raw reading with its parsed instant, calendar fields and coerced variables.
///
/// `instant` and `calendar` are both `None` when the timestamp matched no format.
/// A tracked variable whose raw value is not numeric is stored as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedReading {
    pub raw: RawReading,
    pub instant: Option<NaiveDateTime>,
    pub calendar: Option<CalendarFields>,
    values: BTreeMap<String, Option<f64>>,
}

impl EnrichedReading {
    pub fn enrich(raw: &RawReading, variables: &[String], parser: &TimestampParser) -> Self {
        let instant = parser.parse(&raw.timestamp);
        let calendar = instant.map(CalendarFields::from_instant);
        let values = variables
            .iter()
            .map(|name| (name.clone(), raw.field(name).and_then(coerce_numeric)))
            .collect();

        Self {
            raw: raw.clone(),
            instant,
            calendar,
            values,
        }
    }

    /// Numeric value of a tracked variable; `None` for not-a-number or untracked names.
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied().flatten()
    }

    pub fn year(&self) -> Option<i32> {
        self.calendar.map(|fields| fields.year)
    }

    pub fn is_parseable(&self) -> bool {
        self.instant.is_some()
    }
}

/// Enriches a whole batch. Output has the same length and order as the input and
/// never fails; per-record problems stay embedded in the records.
pub fn enrich_readings(
    raw: &[RawReading],
    variables: &[String],
    parser: &TimestampParser,
) -> Vec<EnrichedReading> {
    raw.iter()
        .map(|reading| EnrichedReading::enrich(reading, variables, parser))
        .collect()
}

/// Numeric coercion of a raw field. Text is trimmed before parsing; blanks, booleans,
/// nulls and non-finite numbers are not-a-number.
pub fn coerce_numeric(value: &RawValue) -> Option<f64> {
    let parsed = match value {
        RawValue::Number(number) => Some(*number),
        RawValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        RawValue::Null | RawValue::Bool(_) => None,
    };
    parsed.filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_accepts_numbers_and_numeric_text() {
        assert_eq!(coerce_numeric(&RawValue::Number(21.5)), Some(21.5));
        assert_eq!(coerce_numeric(&RawValue::Text(" 410 ".into())), Some(410.0));
        assert_eq!(coerce_numeric(&RawValue::Text("1e3".into())), Some(1000.0));
        assert_eq!(coerce_numeric(&RawValue::Text("-3.25".into())), Some(-3.25));
    }

    #[test]
    fn coercion_rejects_everything_else() {
        assert_eq!(coerce_numeric(&RawValue::Text("bad".into())), None);
        assert_eq!(coerce_numeric(&RawValue::Text("".into())), None);
        assert_eq!(coerce_numeric(&RawValue::Text("NaN".into())), None);
        assert_eq!(coerce_numeric(&RawValue::Text("inf".into())), None);
        assert_eq!(coerce_numeric(&RawValue::Null), None);
        assert_eq!(coerce_numeric(&RawValue::Bool(true)), None);
    }

    #[test]
    fn weekday_starts_on_monday() {
        let monday = NaiveDate::from_ymd_opt(2021, 1, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let sunday = NaiveDate::from_ymd_opt(2021, 1, 10)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();

        assert_eq!(CalendarFields::from_instant(monday).weekday, 0);
        assert_eq!(CalendarFields::from_instant(sunday).weekday, 6);
    }

    #[test]
    fn date_key_is_zero_padded() {
        let instant = NaiveDate::from_ymd_opt(2022, 3, 7)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();
        assert_eq!(CalendarFields::from_instant(instant).date_key(), "2022-03-07");
    }
}
