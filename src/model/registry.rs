use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{FeatureSchema, ModelArtifact, ModelError};
use crate::condition::Condition;

/// A classifier paired with the schema it was trained on.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub artifact: ModelArtifact,
    pub schema: FeatureSchema,
}

impl ModelEntry {
    /// Pair an artifact with its schema; parameter and slot counts must agree.
    pub fn new(artifact: ModelArtifact, schema: FeatureSchema) -> Result<Self, ModelError> {
        let expected = schema.len();
        let found = artifact.classifier.n_features();
        if expected != found {
            return Err(ModelError::Dimension { expected, found });
        }
        Ok(ModelEntry { artifact, schema })
    }
}

pub fn model_path(dir: &Path, condition: Condition) -> PathBuf {
    dir.join(format!("{}_model.json", condition.file_stem()))
}

pub fn schema_path(dir: &Path, condition: Condition) -> PathBuf {
    dir.join(format!("{}_columns.json", condition.file_stem()))
}

/// Immutable set of loaded models, one slot per condition.
///
/// Conditions whose files are missing or invalid keep the error text so the
/// UI can say why they are unavailable.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    dir: PathBuf,
    entries: BTreeMap<Condition, ModelEntry>,
    failures: BTreeMap<Condition, String>,
}

impl ModelRegistry {
    /// Load every condition's model from `dir`.
    pub fn load(dir: &Path) -> Self {
        let mut registry = ModelRegistry {
            dir: dir.to_path_buf(),
            ..Default::default()
        };
        for condition in Condition::ALL {
            match Self::load_entry(dir, condition) {
                Ok(entry) => {
                    log::info!(
                        "Loaded {} model ({}, {} features)",
                        condition,
                        entry.artifact.classifier.family(),
                        entry.schema.len()
                    );
                    registry.entries.insert(condition, entry);
                }
                Err(e) => {
                    log::warn!("{condition} model unavailable: {e}");
                    registry.failures.insert(condition, e.to_string());
                }
            }
        }
        registry
    }

    pub fn load_entry(dir: &Path, condition: Condition) -> Result<ModelEntry, ModelError> {
        let artifact = ModelArtifact::load(&model_path(dir, condition))?;
        let schema = FeatureSchema::load(&schema_path(dir, condition))?;
        ModelEntry::new(artifact, schema)
    }

    /// Registry built from already-constructed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (Condition, ModelEntry)>) -> Self {
        ModelRegistry {
            entries: entries.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn get(&self, condition: Condition) -> Option<&ModelEntry> {
        self.entries.get(&condition)
    }

    pub fn failure(&self, condition: Condition) -> Option<&str> {
        self.failures.get(&condition).map(String::as_str)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, LogisticModel};

    fn entry(n: usize) -> (ModelArtifact, FeatureSchema) {
        let artifact = ModelArtifact::new(Classifier::Logistic(LogisticModel {
            coefficients: vec![0.1; n],
            intercept: 0.0,
        }));
        let schema = FeatureSchema::new((0..3).map(|i| format!("f{i}"))).unwrap();
        (artifact, schema)
    }

    #[test]
    fn entry_requires_matching_width() {
        let (artifact, schema) = entry(2);
        assert!(matches!(
            ModelEntry::new(artifact, schema),
            Err(ModelError::Dimension { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn missing_files_are_reported_per_condition() {
        let dir = tempfile::tempdir().unwrap();
        let (artifact, schema) = entry(3);
        artifact.save(&model_path(dir.path(), Condition::Heart)).unwrap();
        schema.save(&schema_path(dir.path(), Condition::Heart)).unwrap();

        let registry = ModelRegistry::load(dir.path());
        assert_eq!(registry.len(), 1);
        assert!(registry.get(Condition::Heart).is_some());
        assert!(registry.get(Condition::Diabetes).is_none());
        assert!(registry.failure(Condition::Diabetes).is_some());
        assert!(registry.failure(Condition::Heart).is_none());
    }
}
