use envlens_core::aggregate::{aggregate, calendar_means, TemporalKey};
use envlens_core::counts::daily_counts;
use envlens_core::enrich::{enrich_readings, EnrichedReading};
use envlens_core::stats::median;
use envlens_core::trend::{resample_means, Resolution};
use envlens_parser::{RawReading, RawValue, TimestampParser};

fn enrich(rows: &[(&str, Option<f64>)]) -> Vec<EnrichedReading> {
    let raw: Vec<RawReading> = rows
        .iter()
        .map(|(ts, value)| {
            let value = value.map(RawValue::Number).unwrap_or(RawValue::Null);
            RawReading::new(*ts).with_field("temperature", value)
        })
        .collect();
    enrich_readings(&raw, &["temperature".to_string()], &TimestampParser::default())
}

fn week_of_readings() -> Vec<EnrichedReading> {
    enrich(&[
        ("2022-03-07 23:10:00", Some(4.0)),
        ("2022-03-07 01:00:00", Some(2.0)),
        ("2022-03-06 01:30:00", Some(6.0)),
        ("2022-03-08 01:45:00", None),
        ("2022-04-01 12:00:00", Some(10.0)),
        ("2022-03-09 23:59:00", Some(-1.0)),
    ])
}

#[test]
fn keys_are_strictly_ascending_and_in_domain() {
    let records = week_of_readings();

    for key in TemporalKey::ALL {
        let tuples = aggregate(&records, "temperature", key);
        assert!(tuples.windows(2).all(|pair| pair[0].key < pair[1].key));

        let domain = match key {
            TemporalKey::Hour => 0..=23,
            TemporalKey::Weekday => 0..=6,
            TemporalKey::Month => 1..=12,
        };
        assert!(tuples.iter().all(|tuple| domain.contains(&tuple.key)));
    }
}

#[test]
fn hourly_buckets_average_numeric_values() {
    let hourly = aggregate(&week_of_readings(), "temperature", TemporalKey::Hour);
    let keys: Vec<u32> = hourly.iter().map(|t| t.key).collect();
    assert_eq!(keys, vec![1, 12, 23]);

    // hour 1: 2.0, 6.0 and one missing value
    assert_eq!(hourly[0].mean, 4.0);
    assert_eq!(hourly[0].median, 4.0);
    // hour 23: 4.0, -1.0
    assert_eq!(hourly[2].mean, 1.5);
}

#[test]
fn all_missing_bucket_is_nan_not_absent() {
    let records = enrich(&[
        ("2022-03-07 05:00:00", None),
        ("2022-03-07 06:00:00", Some(3.0)),
    ]);
    let hourly = aggregate(&records, "temperature", TemporalKey::Hour);

    assert_eq!(hourly.len(), 2);
    assert_eq!(hourly[0].key, 5);
    assert!(hourly[0].mean.is_nan());
    assert!(hourly[0].median.is_nan());
    assert_eq!(hourly[1].mean, 3.0);
}

#[test]
fn weekday_and_month_grouping() {
    let records = week_of_readings();

    let weekly = aggregate(&records, "temperature", TemporalKey::Weekday);
    // Monday 2022-03-07 holds 4.0 and 2.0; Sunday 2022-03-06 holds 6.0
    let monday = weekly.iter().find(|t| t.key == 0).unwrap();
    let sunday = weekly.iter().find(|t| t.key == 6).unwrap();
    assert_eq!(monday.mean, 3.0);
    assert_eq!(sunday.mean, 6.0);

    let monthly = aggregate(&records, "temperature", TemporalKey::Month);
    let keys: Vec<u32> = monthly.iter().map(|t| t.key).collect();
    assert_eq!(keys, vec![3, 4]);
    assert_eq!(monthly[1].median, 10.0);
}

#[test]
fn median_stays_within_range() {
    let samples = [[5.0, 1.0, 9.0, 3.0], [2.0, 2.0, 2.0, 8.0], [-4.0, 0.5, 7.25, 1.0]];
    for sample in samples {
        let m = median(&sample);
        let min = sample.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = sample.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(m >= min && m <= max);
    }
    assert_eq!(median(&[42.0]), 42.0);
}

#[test]
fn unparseable_records_join_no_bucket() {
    let records = enrich(&[("garbage", Some(100.0)), ("2022-03-07 05:00:00", Some(1.0))]);
    let hourly = aggregate(&records, "temperature", TemporalKey::Hour);
    assert_eq!(hourly.len(), 1);
    assert_eq!(hourly[0].mean, 1.0);
}

#[test]
fn daily_counts_sum_to_numeric_records() {
    let records = week_of_readings();
    let counts = daily_counts(&records, "temperature");

    let numeric = records.iter().filter(|r| r.value("temperature").is_some()).count();
    assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), numeric);
    assert!(counts.iter().all(|c| c.count >= 1));
    assert!(counts.windows(2).all(|pair| pair[0].date < pair[1].date));
    // 2022-03-08 only had a missing value
    assert!(counts.iter().all(|c| c.date.to_string() != "2022-03-08"));
}

#[test]
fn calendar_means_are_keyed_by_month_and_day() {
    let cells = calendar_means(&week_of_readings(), "temperature");
    let keys: Vec<(u32, u32)> = cells.iter().map(|c| (c.month, c.day)).collect();
    assert_eq!(keys, vec![(3, 6), (3, 7), (3, 8), (3, 9), (4, 1)]);

    assert_eq!(cells[1].mean, 3.0);
    assert!(cells[2].mean.is_nan());
}

#[test]
fn resampled_trend_emits_only_populated_buckets() {
    let records = week_of_readings();

    let daily = resample_means(&records, "temperature", Resolution::Day);
    let days: Vec<String> = daily
        .iter()
        .map(|p| p.bucket_start.format("%Y-%m-%d %H:%M").to_string())
        .collect();
    assert_eq!(
        days,
        vec![
            "2022-03-06 00:00",
            "2022-03-07 00:00",
            "2022-03-08 00:00",
            "2022-03-09 00:00",
            "2022-04-01 00:00",
        ]
    );
    assert_eq!(daily[1].mean, 3.0);

    let monthly = resample_means(&records, "temperature", Resolution::Month);
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].mean, 11.0 / 4.0);
}
