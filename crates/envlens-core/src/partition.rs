use std::collections::{BTreeMap, BTreeSet};

use crate::enrich::EnrichedReading;

/// Records of one calendar year, in input order.
#[derive(Debug, Clone)]
pub struct YearPartition<'a> {
    pub year: i32,
    pub records: Vec<&'a EnrichedReading>,
}

#[derive(Debug, Clone, Default)]
pub struct Partitioned<'a> {
    /// Ascending by year.
    pub years: Vec<YearPartition<'a>>,
    /// Records whose timestamp matched no format; they belong to no year.
    pub unparseable: usize,
}

impl<'a> Partitioned<'a> {
    pub fn year_list(&self) -> Vec<i32> {
        self.years.iter().map(|partition| partition.year).collect()
    }

    pub fn get(&self, year: i32) -> Option<&YearPartition<'a>> {
        self.years.iter().find(|partition| partition.year == year)
    }
}

/// Distinct years present in the batch, ascending.
pub fn years_of<'a, I>(records: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a EnrichedReading>,
{
    records
        .into_iter()
        .filter_map(EnrichedReading::year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn by_year(records: &[EnrichedReading], year: i32) -> Vec<&EnrichedReading> {
    records
        .iter()
        .filter(|record| record.year() == Some(year))
        .collect()
}

/// Splits a batch by year in one pass.
pub fn partition_by_year(records: &[EnrichedReading]) -> Partitioned<'_> {
    let mut grouped: BTreeMap<i32, Vec<&EnrichedReading>> = BTreeMap::new();
    let mut unparseable = 0;

    for record in records {
        match record.year() {
            Some(year) => grouped.entry(year).or_default().push(record),
            None => unparseable += 1,
        }
    }

    Partitioned {
        years: grouped
            .into_iter()
            .map(|(year, records)| YearPartition { year, records })
            .collect(),
        unparseable,
    }
}
