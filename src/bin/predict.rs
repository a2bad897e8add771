//! Score flood risk from the command line
//!
//! Usage:
//!   cargo run --bin predict -- --rainfall 215 --humidity 82 --temperature 29 --soil-moisture 55
//!   cargo run --bin predict -- --csv readings.csv
//!
//! With no readings given, scores the Mumbai sample (215mm, 82%, 29°C, 55%).
//! The scorer comes from FLOOD_SCORER / FLOOD_MODEL_PATH unless overridden.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flood_risk_rust::batch::read_readings_csv;
use flood_risk_rust::{AppConfig, JsonFormatter, MarkdownFormatter, RawReadings, ScorerKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Estimate flood risk and show safety guidance")]
struct Args {
    /// Rainfall in mm (0-600)
    #[arg(long)]
    rainfall: Option<f64>,

    /// Relative humidity in % (0-100)
    #[arg(long)]
    humidity: Option<f64>,

    /// Temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Soil moisture in % (0-100)
    #[arg(long)]
    soil_moisture: Option<f64>,

    /// CSV with columns rainfall, humidity, temperature, soil_moisture
    #[arg(long, conflicts_with_all = ["rainfall", "humidity", "temperature", "soil_moisture"])]
    csv: Option<PathBuf>,

    /// Scorer override: formula, weighted or model
    #[arg(long)]
    scorer: Option<String>,

    /// Model artifact override
    #[arg(long)]
    model: Option<PathBuf>,

    /// Include the mapped feature table (markdown output)
    #[arg(long)]
    features: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flood_risk_rust=warn,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(scorer) = &args.scorer {
        config.scorer = scorer.parse::<ScorerKind>()?;
    }
    if let Some(model) = &args.model {
        config.model_path = model.clone();
    }
    let predictor = config
        .build_predictor()
        .context("Failed to initialize scorer")?;

    if let Some(csv_path) = &args.csv {
        let readings = read_readings_csv(csv_path)?;
        let start = Instant::now();
        let results = predictor.predict_batch(&readings);
        tracing::info!("Scored {} rows in {:?}", results.len(), start.elapsed());

        println!("rainfall,humidity,temperature,soil_moisture,risk_percent,tier");
        for (r, result) in readings.iter().zip(results) {
            match result {
                Ok(p) => println!(
                    "{},{},{},{},{},{}",
                    r.rainfall_mm,
                    r.humidity_pct,
                    r.temperature_c,
                    r.soil_moisture_pct,
                    p.risk_percent,
                    p.tier.map(|t| t.label()).unwrap_or_default()
                ),
                Err(e) => eprintln!("skipping {:?}: {}", r, e),
            }
        }
        return Ok(());
    }

    let sample = RawReadings::mumbai_sample();
    let readings = RawReadings::new(
        args.rainfall.unwrap_or(sample.rainfall_mm),
        args.humidity.unwrap_or(sample.humidity_pct),
        args.temperature.unwrap_or(sample.temperature_c),
        args.soil_moisture.unwrap_or(sample.soil_moisture_pct),
    );

    let prediction = predictor.predict(&readings)?;
    let output = match args.format {
        OutputFormat::Markdown if args.features => MarkdownFormatter::format_with_features(&prediction),
        OutputFormat::Markdown => MarkdownFormatter::format(&prediction),
        OutputFormat::Json => JsonFormatter::format(&prediction)?,
    };
    println!("{}", output);

    Ok(())
}
