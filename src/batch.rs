//! CSV batch input for the `predict` CLI
//!
//! Columns: `rainfall, humidity, temperature, soil_moisture`. Extra columns
//! are ignored; rows with any missing reading are dropped.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use crate::readings::RawReadings;

pub const READING_COLUMNS: [&str; 4] = ["rainfall", "humidity", "temperature", "soil_moisture"];

/// Read batch readings with Polars
pub fn read_readings_csv(path: &Path) -> Result<Vec<RawReadings>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Failed to read readings CSV: {:?}", path))?;
    readings_from_frame(&df)
}

/// Rows of a frame as readings, skipping rows with nulls
pub fn readings_from_frame(df: &DataFrame) -> Result<Vec<RawReadings>> {
    let complete = df
        .clone()
        .lazy()
        .select(
            READING_COLUMNS
                .iter()
                .map(|name| col(*name).cast(DataType::Float64))
                .collect::<Vec<_>>(),
        )
        .drop_nulls(None)
        .collect()
        .context("Readings CSV needs columns rainfall, humidity, temperature, soil_moisture")?;

    let dropped = df.height() - complete.height();
    if dropped > 0 {
        tracing::warn!("Dropped {} rows with missing values", dropped);
    }

    let column = |name: &str| -> Result<Vec<f64>> {
        Ok(complete.column(name)?.f64()?.into_no_null_iter().collect())
    };
    let rainfall = column("rainfall")?;
    let humidity = column("humidity")?;
    let temperature = column("temperature")?;
    let soil = column("soil_moisture")?;

    Ok((0..complete.height())
        .map(|i| RawReadings::new(rainfall[i], humidity[i], temperature[i], soil[i]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_csv_and_drops_incomplete_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        std::fs::write(
            &path,
            "station,rainfall,humidity,temperature,soil_moisture\n\
             colaba,215,82,29,55\n\
             santacruz,,80,28,40\n\
             thane,120.5,75.5,-2,30\n\
             vashi,300,90,31,\n",
        )
        .unwrap();

        let readings = read_readings_csv(&path).unwrap();
        assert_eq!(
            readings,
            vec![
                RawReadings::mumbai_sample(),
                RawReadings::new(120.5, 75.5, -2.0, 30.0),
            ]
        );
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let df = df!(
            "rainfall" => [100.0],
            "humidity" => [80.0],
            "temperature" => [25.0],
        )
        .unwrap();
        assert!(readings_from_frame(&df).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_readings_csv(&dir.path().join("absent.csv")).is_err());
    }
}
