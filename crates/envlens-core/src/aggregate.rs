use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enrich::{CalendarFields, EnrichedReading};
use crate::stats::{mean, median};

/// Calendar attribute used to bucket readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalKey {
    Hour,
    Weekday,
    Month,
}

impl TemporalKey {
    pub const ALL: [TemporalKey; 3] = [TemporalKey::Hour, TemporalKey::Weekday, TemporalKey::Month];

    pub fn extract(&self, fields: &CalendarFields) -> u32 {
        match self {
            TemporalKey::Hour => fields.hour,
            TemporalKey::Weekday => fields.weekday,
            TemporalKey::Month => fields.month,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalKey::Hour => "hour",
            TemporalKey::Weekday => "weekday",
            TemporalKey::Month => "month",
        }
    }
}

/// One bucket of an aggregation. `mean` and `median` are NaN when every value
/// in the bucket was not-a-number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateTuple {
    pub key: u32,
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarCell {
    pub month: u32,
    pub day: u32,
    pub mean: f64,
}

/// Groups the numeric values of `variable` by `key_fn`.
///
/// A bucket exists for every key produced by at least one record, even if none
/// of that key's records carried a numeric value. Records for which `key_fn`
/// returns `None` are skipped entirely.
pub(crate) fn bucket_values<'a, I, K, F>(records: I, variable: &str, key_fn: F) -> BTreeMap<K, Vec<f64>>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
    K: Ord,
    F: Fn(&EnrichedReading) -> Option<K>,
{
    let mut buckets: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for record in records {
        let Some(key) = key_fn(record) else {
            continue;
        };
        let bucket = buckets.entry(key).or_default();
        if let Some(value) = record.value(variable) {
            bucket.push(value);
        }
    }
    buckets
}

/// Mean and median of `variable` per `key` value, ascending by key.
pub fn aggregate<'a, I>(records: I, variable: &str, key: TemporalKey) -> Vec<AggregateTuple>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    bucket_values(records, variable, |record| {
        record.calendar.as_ref().map(|fields| key.extract(fields))
    })
    .into_iter()
    .map(|(key, values)| AggregateTuple {
        key,
        mean: mean(&values),
        median: median(&values),
    })
    .collect()
}

/// Mean of `variable` per (month, day), ordered by month then day.
pub fn calendar_means<'a, I>(records: I, variable: &str) -> Vec<CalendarCell>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    bucket_values(records, variable, |record| {
        record.calendar.as_ref().map(|fields| (fields.month, fields.day))
    })
    .into_iter()
    .map(|((month, day), values)| CalendarCell {
        month,
        day,
        mean: mean(&values),
    })
    .collect()
}
