use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use symptrack::data::{loader, synth};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Parquet,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Parquet => "parquet",
        }
    }
}

/// Write synthetic heart, diabetes and hypertension datasets for the trainers.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output directory.
    #[arg(short, long, default_value = "data")]
    out_dir: PathBuf,

    /// Rows per dataset.
    #[arg(short, long, default_value_t = 600)]
    rows: usize,

    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    symptrack::init_logging();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let ext = args.format.extension();
    let datasets = [
        ("heart", synth::heart(args.rows, args.seed)),
        ("diabetes", synth::diabetes(args.rows, args.seed.wrapping_add(1))),
        ("hypertension_dataset", synth::hypertension(args.rows, args.seed.wrapping_add(2))),
    ];

    for (stem, table) in &datasets {
        let path = args.out_dir.join(format!("{stem}.{ext}"));
        loader::write_file(table, &path)?;
        println!(
            "Wrote {} ({} rows x {} columns)",
            path.display(),
            table.len(),
            table.columns.len()
        );
    }

    Ok(())
}
