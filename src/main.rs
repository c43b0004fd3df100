mod app;
mod state;
mod ui;

use std::path::PathBuf;

use app::SympTrackApp;
use clap::Parser;
use eframe::egui;

/// Risk-similarity dashboard for heart disease, diabetes and hypertension.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding `<condition>_model.json` and `<condition>_columns.json`.
    #[arg(short, long, env = symptrack::MODELS_DIR_ENV, default_value = symptrack::DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SympTrack",
        options,
        Box::new(move |_cc| Ok(Box::new(SympTrackApp::new(&args.models_dir)))),
    )
}
