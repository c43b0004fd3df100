//! Trained classifiers and the files they live in.
//!
//! Each condition has two files in the models directory:
//! `<stem>_model.json` ([`ModelArtifact`]) and `<stem>_columns.json`
//! ([`FeatureSchema`]). The [`ModelRegistry`] loads every pair once at
//! start-up and hands out read-only references.

pub mod artifact;
pub mod forest;
pub mod linear;
pub mod metrics;
pub mod registry;
pub mod schema;

use std::path::PathBuf;

use thiserror::Error;

pub use artifact::{Classifier, ModelArtifact, TrainingMetrics};
pub use forest::{DecisionTree, ForestParams, Node, RandomForest};
pub use linear::LogisticModel;
pub use registry::{ModelEntry, ModelRegistry};
pub use schema::FeatureSchema;

/// Errors raised while loading, validating or evaluating a model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decoding {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature `{0}` appears more than once in the schema")]
    DuplicateFeature(String),

    #[error("model expects {expected} features but received {found}")]
    Dimension { expected: usize, found: usize },

    #[error("input contains a non-finite value at position {0}")]
    NonFiniteInput(usize),

    #[error("corrupt model: {0}")]
    Corrupt(String),

    #[error("training failed: {0}")]
    Fit(String),
}
