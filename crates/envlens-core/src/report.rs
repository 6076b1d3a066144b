use serde::Serialize;

use crate::aggregate::{aggregate, calendar_means, AggregateTuple, CalendarCell, TemporalKey};
use crate::correlation::{correlation_matrix, CorrelationCell};
use crate::counts::{daily_counts, DailyCount};
use crate::enrich::EnrichedReading;
use crate::partition::partition_by_year;
use crate::profiles::LocationProfile;
use crate::trend::{resample_means, Resolution, TrendPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub resolution: Resolution,
    pub points: Vec<TrendPoint>,
}

/// Everything derived for one (year, variable) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableYearReport {
    pub year: i32,
    pub variable: String,
    pub hourly: Vec<AggregateTuple>,
    pub weekly: Vec<AggregateTuple>,
    pub monthly: Vec<AggregateTuple>,
    pub daily_counts: Vec<DailyCount>,
    pub calendar: Vec<CalendarCell>,
    pub trends: Vec<TrendSeries>,
}

impl VariableYearReport {
    pub fn aggregates(&self, key: TemporalKey) -> &[AggregateTuple] {
        match key {
            TemporalKey::Hour => &self.hourly,
            TemporalKey::Weekday => &self.weekly,
            TemporalKey::Month => &self.monthly,
        }
    }

    pub fn trend(&self, resolution: Resolution) -> Option<&TrendSeries> {
        self.trends.iter().find(|series| series.resolution == resolution)
    }
}

/// Derived tuples for a whole location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationReport {
    pub location: String,
    pub variables: Vec<String>,
    pub total_records: usize,
    /// Records whose timestamp matched no format; excluded from every year.
    pub unparseable_records: usize,
    pub years: Vec<i32>,
    /// Year-major, then in the profile's variable order.
    pub series: Vec<VariableYearReport>,
    /// All years, all variables.
    pub correlation: Vec<CorrelationCell>,
}

impl LocationReport {
    pub fn series_for(&self, year: i32, variable: &str) -> Option<&VariableYearReport> {
        self.series
            .iter()
            .find(|series| series.year == year && series.variable == variable)
    }
}

/// Runs every aggregation for a location over an already enriched batch.
pub fn build_report(
    profile: &LocationProfile,
    enriched: &[EnrichedReading],
    resolutions: &[Resolution],
) -> LocationReport {
    let partitions = partition_by_year(enriched);

    let mut series = Vec::with_capacity(partitions.years.len() * profile.variables.len());
    for partition in &partitions.years {
        let records = partition.records.as_slice();
        for variable in &profile.variables {
            let trends = resolutions
                .iter()
                .map(|&resolution| TrendSeries {
                    resolution,
                    points: resample_means(records.iter().copied(), variable, resolution),
                })
                .collect();

            series.push(VariableYearReport {
                year: partition.year,
                variable: variable.clone(),
                hourly: aggregate(records.iter().copied(), variable, TemporalKey::Hour),
                weekly: aggregate(records.iter().copied(), variable, TemporalKey::Weekday),
                monthly: aggregate(records.iter().copied(), variable, TemporalKey::Month),
                daily_counts: daily_counts(records.iter().copied(), variable),
                calendar: calendar_means(records.iter().copied(), variable),
                trends,
            });
        }
    }

    LocationReport {
        location: profile.id.clone(),
        variables: profile.variables.clone(),
        total_records: enriched.len(),
        unparseable_records: partitions.unparseable,
        years: partitions.year_list(),
        series,
        correlation: correlation_matrix(enriched, &profile.variables),
    }
}
