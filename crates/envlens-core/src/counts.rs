use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::enrich::EnrichedReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Number of numeric values of `variable` per calendar date, ascending.
///
/// Dates where the variable was never numeric are omitted, so the counts sum to
/// the number of dated records with a numeric value.
pub fn daily_counts<'a, I>(records: I, variable: &str) -> Vec<DailyCount>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in records {
        let Some(fields) = record.calendar.as_ref() else {
            continue;
        };
        if record.value(variable).is_some() {
            *per_day.entry(fields.date).or_default() += 1;
        }
    }

    per_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}
