use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use tracing::info;

use crate::aggregate::TemporalKey;
use crate::error::{PipelineError, Result};
use crate::pipeline::RenderSink;
use crate::report::LocationReport;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Writes each chart family of a report as a Parquet file under `<out_dir>/<location>/`,
/// plus a `summary.json` with the whole report.
#[derive(Debug, Clone)]
pub struct ParquetSink {
    out_dir: PathBuf,
}

impl ParquetSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn location_dir(&self, location: &str) -> PathBuf {
        self.out_dir.join(location)
    }
}

impl RenderSink for ParquetSink {
    fn render(&self, report: &LocationReport) -> Result<()> {
        let dir = self.location_dir(&report.location);
        std::fs::create_dir_all(&dir)?;

        let frames = [
            ("hourly", aggregate_frame(report, TemporalKey::Hour)?),
            ("weekly", aggregate_frame(report, TemporalKey::Weekday)?),
            ("monthly", aggregate_frame(report, TemporalKey::Month)?),
            ("correlation", correlation_frame(report)?),
            ("daily_counts", daily_count_frame(report)?),
            ("calendar", calendar_frame(report)?),
            ("trend", trend_frame(report)?),
        ];
        for (name, mut frame) in frames {
            write_parquet(&dir.join(format!("{name}.parquet")), &mut frame)?;
        }

        let summary = serde_json::to_vec_pretty(report)
            .map_err(|err| PipelineError::Render(format!("failed to serialize summary: {err}")))?;
        std::fs::write(dir.join("summary.json"), summary)?;

        info!(location = %report.location, dir = %dir.display(), "wrote report outputs");
        Ok(())
    }
}

fn write_parquet(path: &Path, frame: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path)?;
    ParquetWriter::new(&mut file)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(frame)?;
    Ok(())
}

/// Columns: `year`, `variable`, the key name (`hour`, `weekday` or `month`), `mean`, `median`.
pub fn aggregate_frame(report: &LocationReport, key: TemporalKey) -> PolarsResult<DataFrame> {
    let mut years = Vec::new();
    let mut variables = Vec::new();
    let mut keys = Vec::new();
    let mut means = Vec::new();
    let mut medians = Vec::new();

    for series in &report.series {
        for tuple in series.aggregates(key) {
            years.push(series.year);
            variables.push(series.variable.as_str());
            keys.push(tuple.key);
            means.push(tuple.mean);
            medians.push(tuple.median);
        }
    }

    DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("variable".into(), variables).into(),
        Series::new(key.as_str().into(), keys).into(),
        Series::new("mean".into(), means).into(),
        Series::new("median".into(), medians).into(),
    ])
}

/// Columns: `var_a`, `var_b`, `coefficient`, row-major over the variable list.
pub fn correlation_frame(report: &LocationReport) -> PolarsResult<DataFrame> {
    let var_a: Vec<&str> = report.correlation.iter().map(|cell| cell.var_a.as_str()).collect();
    let var_b: Vec<&str> = report.correlation.iter().map(|cell| cell.var_b.as_str()).collect();
    let coefficients: Vec<f64> = report.correlation.iter().map(|cell| cell.coefficient).collect();

    DataFrame::new(vec![
        Series::new("var_a".into(), var_a).into(),
        Series::new("var_b".into(), var_b).into(),
        Series::new("coefficient".into(), coefficients).into(),
    ])
}

/// Columns: `year`, `variable`, `date`, `count`.
pub fn daily_count_frame(report: &LocationReport) -> PolarsResult<DataFrame> {
    let mut years = Vec::new();
    let mut variables = Vec::new();
    let mut days = Vec::new();
    let mut counts = Vec::new();

    for series in &report.series {
        for entry in &series.daily_counts {
            years.push(series.year);
            variables.push(series.variable.as_str());
            days.push(entry.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE);
            counts.push(entry.count as u64);
        }
    }

    DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("variable".into(), variables).into(),
        Series::new("date".into(), days).cast(&DataType::Date)?.into(),
        Series::new("count".into(), counts).into(),
    ])
}

/// Columns: `year`, `variable`, `month`, `day`, `mean`.
pub fn calendar_frame(report: &LocationReport) -> PolarsResult<DataFrame> {
    let mut years = Vec::new();
    let mut variables = Vec::new();
    let mut months = Vec::new();
    let mut days = Vec::new();
    let mut means = Vec::new();

    for series in &report.series {
        for cell in &series.calendar {
            years.push(series.year);
            variables.push(series.variable.as_str());
            months.push(cell.month);
            days.push(cell.day);
            means.push(cell.mean);
        }
    }

    DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("variable".into(), variables).into(),
        Series::new("month".into(), months).into(),
        Series::new("day".into(), days).into(),
        Series::new("mean".into(), means).into(),
    ])
}

/// Columns: `year`, `variable`, `resolution`, `bucket_start`, `mean`.
pub fn trend_frame(report: &LocationReport) -> PolarsResult<DataFrame> {
    let mut years = Vec::new();
    let mut variables = Vec::new();
    let mut resolutions = Vec::new();
    let mut starts = Vec::new();
    let mut means = Vec::new();

    for series in &report.series {
        for trend in &series.trends {
            for point in &trend.points {
                years.push(series.year);
                variables.push(series.variable.as_str());
                resolutions.push(trend.resolution.as_str());
                starts.push(point.bucket_start.and_utc().timestamp_micros());
                means.push(point.mean);
            }
        }
    }

    DataFrame::new(vec![
        Series::new("year".into(), years).into(),
        Series::new("variable".into(), variables).into(),
        Series::new("resolution".into(), resolutions).into(),
        Series::new("bucket_start".into(), starts)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
            .into(),
        Series::new("mean".into(), means).into(),
    ])
}
