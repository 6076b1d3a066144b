use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::aggregate::bucket_values;
use crate::enrich::EnrichedReading;
use crate::stats::mean;

/// Width of a resampling bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Minute,
    Hour,
    Day,
    Month,
}

impl Resolution {
    /// Start of the bucket containing `instant`.
    pub fn truncate(&self, instant: NaiveDateTime) -> NaiveDateTime {
        let date = instant.date();
        match self {
            Resolution::Minute => date
                .and_hms_opt(instant.hour(), instant.minute(), 0)
                .unwrap_or(instant),
            Resolution::Hour => date.and_hms_opt(instant.hour(), 0, 0).unwrap_or(instant),
            Resolution::Day => date.and_time(NaiveTime::MIN),
            Resolution::Month => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Minute => "minute",
            Resolution::Hour => "hour",
            Resolution::Day => "day",
            Resolution::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket_start: NaiveDateTime,
    pub mean: f64,
}

/// Mean of `variable` per populated bucket, in chronological order.
pub fn resample_means<'a, I>(records: I, variable: &str, resolution: Resolution) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    bucket_values(records, variable, |record| {
        record.instant.map(|instant| resolution.truncate(instant))
    })
    .into_iter()
    .map(|(bucket_start, values)| TrendPoint {
        bucket_start,
        mean: mean(&values),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn truncation_drops_finer_fields() {
        let instant = NaiveDate::from_ymd_opt(2022, 5, 17)
            .unwrap()
            .and_hms_opt(13, 42, 59)
            .unwrap();
        let at = |h, m, s| NaiveDate::from_ymd_opt(2022, 5, 17).unwrap().and_hms_opt(h, m, s).unwrap();

        assert_eq!(Resolution::Minute.truncate(instant), at(13, 42, 0));
        assert_eq!(Resolution::Hour.truncate(instant), at(13, 0, 0));
        assert_eq!(Resolution::Day.truncate(instant), at(0, 0, 0));
        assert_eq!(
            Resolution::Month.truncate(instant),
            NaiveDate::from_ymd_opt(2022, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }
}
