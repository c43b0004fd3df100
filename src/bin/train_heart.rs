use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use symptrack::condition::Condition;
use symptrack::training;

/// Train the heart disease logistic regression.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Training dataset (.csv, .json or .parquet).
    #[arg(short, long, default_value = "heart.csv")]
    data: PathBuf,

    /// Directory receiving heart_model.json and heart_columns.json.
    #[arg(short, long, env = symptrack::MODELS_DIR_ENV, default_value = symptrack::DEFAULT_MODELS_DIR)]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    symptrack::init_logging();
    let args = Args::parse();

    let trained = training::train_file(Condition::Heart, &args.data, &args.out_dir)?;
    if let Some(metrics) = trained.metrics() {
        println!("{metrics}");
    }
    println!("Model and feature columns saved to {}", args.out_dir.display());
    Ok(())
}
