//! Hourly weather to daily training features
//!
//! Input CSV columns: `time, temperature_2m, relativehumidity_2m, precipitation`
//! (one row per hour). Output is one `DailyRecord` per calendar day with:
//!
//! - Rainfall: sum of hourly precipitation
//! - Temperature / Humidity: mean of hourly values
//! - Soil Moisture: 7-day trailing mean of rainfall, min-max scaled to 0-100
//! - Flood Risk (%): proxy label from rainfall, soil moisture and humidity

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

/// Trailing window for the soil moisture proxy
pub const SOIL_WINDOW_DAYS: usize = 7;

const EPS: f64 = 1e-9;

/// One aggregated day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub rainfall: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub flood_risk_pct: f64,
}

/// Load the hourly CSV with Polars
pub fn read_hourly_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Failed to read hourly weather CSV: {:?}", path))
}

/// Calendar day from the leading `YYYY-MM-DD` of a timestamp; null if unparseable
fn day_expr() -> Expr {
    col("time")
        .cast(DataType::String)
        .str()
        .slice(lit(0), lit(10))
        .str()
        .to_date(StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            strict: false,
            ..Default::default()
        })
        .alias("date")
}

/// Append `Soil Moisture` and `Flood Risk (%)` to a date-sorted daily frame
///
/// Soil moisture is the trailing mean of rainfall (min 1 period) min-max
/// scaled to 0-100; the label weights relative rainfall 60%, soil moisture
/// 30% and humidity 10%.
pub fn with_proxy_columns(daily: LazyFrame) -> LazyFrame {
    let trailing = col("Rainfall").rolling_mean(RollingOptionsFixedWindow {
        window_size: SOIL_WINDOW_DAYS,
        min_periods: 1,
        ..Default::default()
    });

    daily
        .with_column(trailing.alias("Soil Moisture"))
        .with_column(
            ((col("Soil Moisture") - col("Soil Moisture").min())
                / (col("Soil Moisture").max() - col("Soil Moisture").min() + lit(EPS))
                * lit(100.0))
            .alias("Soil Moisture"),
        )
        .with_column(
            ((lit(0.6) * col("Rainfall") / (col("Rainfall").max() + lit(EPS))
                + lit(0.3) * col("Soil Moisture") / lit(100.0)
                + lit(0.1) * col("Humidity") / lit(100.0))
                * lit(100.0))
            .alias("Flood Risk (%)"),
        )
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .with_context(|| format!("Missing column '{}'", name))?
        .cast(&DataType::Float64)?;
    // Null means (no samples that day) become NaN and are filtered at training
    Ok(column.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Aggregate hourly rows into daily records (sorted by date)
///
/// Rainfall is the daily precipitation sum; temperature and humidity are
/// daily means. Nulls are skipped by the aggregations.
pub fn aggregate_daily(hourly: &DataFrame) -> Result<Vec<DailyRecord>> {
    let dated = hourly
        .clone()
        .lazy()
        .with_column(day_expr())
        .filter(col("date").is_not_null())
        .collect()
        .context("Failed to parse hourly timestamps")?;

    let skipped = hourly.height() - dated.height();
    if skipped > 0 {
        tracing::warn!("Skipped {} hourly rows with unparseable timestamps", skipped);
    }

    let daily = dated
        .lazy()
        .group_by([col("date")])
        .agg([
            col("precipitation").cast(DataType::Float64).sum().alias("Rainfall"),
            col("temperature_2m").cast(DataType::Float64).mean().alias("Temperature"),
            col("relativehumidity_2m").cast(DataType::Float64).mean().alias("Humidity"),
        ])
        .sort(["date"], SortMultipleOptions::default());

    let df = with_proxy_columns(daily)
        .collect()
        .context("Failed to aggregate daily features")?;

    let dates: Vec<Option<NaiveDate>> = df.column("date")?.date()?.as_date_iter().collect();
    let rainfall = f64_values(&df, "Rainfall")?;
    let temperature = f64_values(&df, "Temperature")?;
    let humidity = f64_values(&df, "Humidity")?;
    let soil = f64_values(&df, "Soil Moisture")?;
    let label = f64_values(&df, "Flood Risk (%)")?;

    let records = dates
        .into_iter()
        .enumerate()
        .filter_map(|(i, date)| {
            Some(DailyRecord {
                date: date?,
                rainfall: rainfall[i],
                temperature: temperature[i],
                humidity: humidity[i],
                soil_moisture: soil[i],
                flood_risk_pct: label[i],
            })
        })
        .collect();
    Ok(records)
}

/// Daily records as a DataFrame (column names match the trainer's CSV output)
pub fn to_dataframe(records: &[DailyRecord]) -> Result<DataFrame> {
    let dates: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
    let df = df!(
        "date" => dates,
        "Rainfall" => records.iter().map(|r| r.rainfall).collect::<Vec<_>>(),
        "Temperature" => records.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        "Humidity" => records.iter().map(|r| r.humidity).collect::<Vec<_>>(),
        "Soil Moisture" => records.iter().map(|r| r.soil_moisture).collect::<Vec<_>>(),
        "Flood Risk (%)" => records.iter().map(|r| r.flood_risk_pct).collect::<Vec<_>>(),
    )?;
    Ok(df)
}

pub fn write_daily_csv(records: &[DailyRecord], path: &Path) -> Result<()> {
    let mut df = to_dataframe(records)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}
