//! SympTrack: risk-similarity checks for heart disease, diabetes and
//! hypertension.
//!
//! The dashboard binary and the headless `score` tool share the same
//! pipeline; the trainers write the model files both of them read.

pub mod color;
pub mod condition;
pub mod data;
pub mod model;
pub mod pipeline;
pub mod training;

/// Directory searched for model files when none is given.
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Environment variable overriding [`DEFAULT_MODELS_DIR`].
pub const MODELS_DIR_ENV: &str = "SYMPTRACK_MODELS_DIR";

/// Start `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
