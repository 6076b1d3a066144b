use envlens_core::enrich::enrich_readings;
use envlens_core::partition::{by_year, partition_by_year, years_of};
use envlens_parser::{RawReading, RawValue, TimestampParser};

fn readings() -> Vec<RawReading> {
    [
        ("2022-06-01 10:00:00", 1.0),
        ("2021-12-31 23:00:00", 2.0),
        ("broken", 3.0),
        ("01/01/22 00:30", 4.0),
        ("2021-01-01 00:00:00", 5.0),
    ]
    .into_iter()
    .map(|(ts, n2)| RawReading::new(ts).with_field("n2", RawValue::Number(n2)))
    .collect()
}

#[test]
fn years_are_distinct_and_ascending() {
    let enriched = enrich_readings(&readings(), &["n2".to_string()], &TimestampParser::default());
    assert_eq!(years_of(&enriched), vec![2021, 2022]);
}

#[test]
fn by_year_preserves_relative_order() {
    let enriched = enrich_readings(&readings(), &["n2".to_string()], &TimestampParser::default());

    let values = |year| -> Vec<f64> {
        by_year(&enriched, year)
            .iter()
            .filter_map(|r| r.value("n2"))
            .collect()
    };
    assert_eq!(values(2021), vec![2.0, 5.0]);
    assert_eq!(values(2022), vec![1.0, 4.0]);
    assert!(values(2020).is_empty());
}

#[test]
fn unparseable_records_are_counted_not_partitioned() {
    let enriched = enrich_readings(&readings(), &["n2".to_string()], &TimestampParser::default());
    let partitions = partition_by_year(&enriched);

    assert_eq!(partitions.year_list(), vec![2021, 2022]);
    assert_eq!(partitions.unparseable, 1);

    let in_years: usize = partitions.years.iter().map(|p| p.records.len()).sum();
    assert_eq!(in_years + partitions.unparseable, enriched.len());
    assert_eq!(partitions.get(2022).unwrap().records[1].value("n2"), Some(4.0));
}
