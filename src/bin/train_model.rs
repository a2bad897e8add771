//! Train the flood risk regressor from hourly weather data
//!
//! Reads hourly observations (time, temperature_2m, relativehumidity_2m,
//! precipitation), aggregates them to daily features, builds the proxy risk
//! label, fits a random forest (or OLS with `--estimator linear`) and writes
//! a model artifact for the `model` scorer.
//!
//! Usage:
//!   cargo run --release --bin train_model -- --hourly data/mumbai_hourly_weather.csv
//!   cargo run --bin train_model -- --estimator linear

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flood_risk_rust::training::{self, ForestParams, Trainer, TRAINING_FEATURES};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EstimatorArg {
    Forest,
    Linear,
}

#[derive(Parser, Debug)]
#[command(name = "train_model", about = "Fit the flood risk regressor and save a model artifact")]
struct Args {
    /// Hourly weather CSV
    #[arg(long, default_value = "data/mumbai_hourly_weather.csv")]
    hourly: PathBuf,

    /// Output model artifact
    #[arg(long, default_value = "data/flood_model.json")]
    output: PathBuf,

    /// Output daily feature CSV
    #[arg(long, default_value = "data/mumbai_daily_features.csv")]
    daily: PathBuf,

    /// Model name stored in the artifact
    #[arg(long, default_value = "mumbai-daily-forest")]
    name: String,

    #[arg(long, value_enum, default_value_t = EstimatorArg::Forest)]
    estimator: EstimatorArg,

    /// Trees in the forest
    #[arg(long, default_value_t = 200)]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value_t = 12)]
    max_depth: usize,

    /// Train/test split seed
    #[arg(long, default_value_t = training::DEFAULT_SEED)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flood_risk_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let total_start = Instant::now();

    println!("\n{}", "=".repeat(70));
    println!("FLOOD RISK MODEL TRAINER");
    println!("{}", "=".repeat(70));

    // ========================================================================
    // Step 1: Load hourly weather
    // ========================================================================
    println!("\nStep 1: Loading hourly weather from {:?}...", args.hourly);
    let hourly = training::read_hourly_csv(&args.hourly)?;
    println!("  Hourly rows: {}", hourly.height());

    // ========================================================================
    // Step 2: Aggregate to daily features + proxy label
    // ========================================================================
    println!("\nStep 2: Aggregating to daily features...");
    let records = training::aggregate_daily(&hourly)?;
    println!("  Days: {}", records.len());
    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        println!("  Range: {} → {}", first.date, last.date);
    }

    // ========================================================================
    // Step 3: Fit and evaluate
    // ========================================================================
    let trainer = match args.estimator {
        EstimatorArg::Forest => Trainer::Forest(ForestParams {
            n_estimators: args.trees,
            max_depth: args.max_depth,
            ..ForestParams::default()
        }),
        EstimatorArg::Linear => Trainer::Linear,
    };
    println!("\nStep 3: Fitting {:?} (seed {})...", trainer, args.seed);
    let fit_start = Instant::now();
    let outcome = training::train_with(&records, &args.name, args.seed, trainer)?;
    println!("  Fitted in {:.2}s", fit_start.elapsed().as_secs_f64());

    println!("\nModel Evaluation ({} train / {} test days):", outcome.n_train, outcome.n_test);
    println!("  R² Score: {:.3}", outcome.evaluation.r2);
    println!("  RMSE: {:.3}", outcome.evaluation.rmse);

    println!("\nFeature Importance:");
    for (feature, importance) in TRAINING_FEATURES.iter().zip(&outcome.importance) {
        println!("  {:<14} {:.3}", format!("{:?}", feature), importance);
    }

    // ========================================================================
    // Step 4: Save artifact and daily dataset
    // ========================================================================
    for path in [&args.output, &args.daily] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }

    outcome
        .artifact
        .save(&args.output)
        .with_context(|| format!("Failed to write model artifact {:?}", args.output))?;
    training::write_daily_csv(&records, &args.daily)?;

    println!("\nModel saved as {:?}", args.output);
    println!("Daily dataset saved to {:?}", args.daily);
    println!("Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
