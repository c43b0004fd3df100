//! Offline trainers: one per condition, each turning a raw dataset into a
//! model artifact plus its feature schema.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::condition::Condition;
use crate::data::loader;
use crate::data::model::Table;
use crate::data::prep::{self, Features};
use crate::model::registry::{model_path, schema_path};
use crate::model::{
    metrics, Classifier, FeatureSchema, ForestParams, LogisticModel, ModelArtifact, RandomForest,
    TrainingMetrics,
};

pub const TEST_FRACTION: f64 = 0.2;
pub const SEED: u64 = 42;
pub const MAX_ITERATIONS: u64 = 1000;
pub const CV_FOLDS: usize = 5;

/// Columns the hypertension model is trained on.
pub const HYPERTENSION_COLUMNS: [&str; 19] = [
    "Age",
    "BMI",
    "Cholesterol",
    "Systolic_BP",
    "Diastolic_BP",
    "Glucose",
    "Heart_Rate",
    "Sleep_Duration",
    "Gender",
    "Diabetes",
    "Alcohol_Intake",
    "Smoking_Status",
    "Stress_Level",
    "Salt_Intake",
    "Physical_Activity_Level",
    "Family_History",
    "HDL",
    "LDL",
    "Triglycerides",
];

/// A fitted artifact ready to be written next to its schema.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub condition: Condition,
    pub artifact: ModelArtifact,
    pub schema: FeatureSchema,
}

impl TrainedModel {
    pub fn metrics(&self) -> Option<&TrainingMetrics> {
        self.artifact.metrics.as_ref()
    }

    /// Write `<stem>_model.json` and `<stem>_columns.json` into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        self.artifact.save(&model_path(dir, self.condition))?;
        self.schema.save(&schema_path(dir, self.condition))?;
        log::info!("Saved {} model to {}", self.condition, dir.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trainers
// ---------------------------------------------------------------------------

/// Logistic regression on the numeric Cleveland columns.
///
/// `?` marks missing cells; incomplete rows are dropped and any `target`
/// above zero counts as disease.
pub fn train_heart(mut table: Table) -> Result<TrainedModel> {
    prep::mark_missing(&mut table, "?");
    let dropped = prep::drop_incomplete(&mut table);
    log::info!("Heart: {} rows usable, {dropped} dropped", table.len());

    let targets = prep::binary_target(&mut table, "target", |cell| {
        cell.as_f64().map(|v| usize::from(v > 0.0))
    })?;
    let features = prep::numeric_features(&table)?;
    fit_logistic(Condition::Heart, features, targets)
}

/// Random forest on the Pima columns with median imputation and
/// stratified cross-validation.
pub fn train_diabetes(mut table: Table) -> Result<TrainedModel> {
    let targets = prep::binary_target(&mut table, "Outcome", |cell| match cell.as_f64() {
        Some(v) if v == 0.0 => Some(0),
        Some(v) if v == 1.0 => Some(1),
        _ => None,
    })?;
    prep::impute_median(&mut table);
    let features = prep::numeric_features(&table)?;
    require_both_classes(&targets)?;

    let params = ForestParams::default();
    let split = prep::train_test_split(targets.len(), TEST_FRACTION, SEED);
    let forest = RandomForest::fit(
        &prep::take(&features.records, &split.train),
        &prep::take(&targets, &split.train),
        &params,
    )?;
    let classifier = Classifier::Forest(forest);
    let (accuracy, f1) = evaluate(&classifier, &features.records, &targets, &split.test)?;

    let mut cv_acc = Vec::with_capacity(CV_FOLDS);
    let mut cv_f1 = Vec::with_capacity(CV_FOLDS);
    for (i, fold) in prep::stratified_folds(&targets, CV_FOLDS).iter().enumerate() {
        let fold_model = Classifier::Forest(RandomForest::fit(
            &prep::take(&features.records, &fold.train),
            &prep::take(&targets, &fold.train),
            &params,
        )?);
        let (a, f) = evaluate(&fold_model, &features.records, &targets, &fold.test)?;
        log::debug!("Diabetes fold {i}: accuracy {a:.3}, F1 {f:.3}");
        cv_acc.push(a);
        cv_f1.push(f);
    }

    let metrics = TrainingMetrics {
        accuracy,
        f1,
        cv_accuracy: Some(mean(&cv_acc)),
        cv_f1: Some(mean(&cv_f1)),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    };
    finish(Condition::Diabetes, classifier, features.names, metrics)
}

/// Logistic regression on the lifestyle/clinical columns with text columns
/// dummy-encoded. Only `Low`/`High` targets are used.
pub fn train_hypertension(table: Table) -> Result<TrainedModel> {
    let mut wanted: Vec<&str> = vec!["Hypertension"];
    wanted.extend(HYPERTENSION_COLUMNS);
    let mut table = table
        .select(&wanted)
        .context("dataset lacks one of the hypertension training columns")?;

    let dropped = prep::drop_incomplete(&mut table);
    log::info!("Hypertension: {} rows usable, {dropped} dropped", table.len());

    let targets = prep::binary_target(&mut table, "Hypertension", |cell| match cell.as_text() {
        Some("Low") => Some(0),
        Some("High") => Some(1),
        _ => None,
    })?;
    let features = prep::one_hot(&table)?;
    fit_logistic(Condition::Hypertension, features, targets)
}

/// Dispatch to the trainer for `condition`.
pub fn train(condition: Condition, table: Table) -> Result<TrainedModel> {
    match condition {
        Condition::Heart => train_heart(table),
        Condition::Diabetes => train_diabetes(table),
        Condition::Hypertension => train_hypertension(table),
    }
}

/// Load `data`, train the `condition` model and write it into `out_dir`.
pub fn train_file(condition: Condition, data: &Path, out_dir: &Path) -> Result<TrainedModel> {
    let table = loader::load_file(data)
        .with_context(|| format!("Failed to load {}", data.display()))?;
    let trained = train(condition, table)?;
    trained.save(out_dir)?;
    Ok(trained)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fit_logistic(condition: Condition, features: Features, targets: Vec<usize>) -> Result<TrainedModel> {
    require_both_classes(&targets)?;
    let split = prep::train_test_split(targets.len(), TEST_FRACTION, SEED);
    let model = LogisticModel::fit(
        &prep::take(&features.records, &split.train),
        &prep::take(&targets, &split.train),
        MAX_ITERATIONS,
    )?;
    let classifier = Classifier::Logistic(model);
    let (accuracy, f1) = evaluate(&classifier, &features.records, &targets, &split.test)?;

    let metrics = TrainingMetrics {
        accuracy,
        f1,
        cv_accuracy: None,
        cv_f1: None,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    };
    finish(condition, classifier, features.names, metrics)
}

fn finish(
    condition: Condition,
    classifier: Classifier,
    names: Vec<String>,
    metrics: TrainingMetrics,
) -> Result<TrainedModel> {
    log::info!(
        "{condition}: {} trained on {} rows, accuracy {:.3}, F1 {:.3}",
        classifier.family(),
        metrics.train_rows,
        metrics.accuracy,
        metrics.f1
    );
    Ok(TrainedModel {
        condition,
        artifact: ModelArtifact::new(classifier).with_metrics(metrics),
        schema: FeatureSchema::new(names)?,
    })
}

/// Accuracy and F1 of `classifier` on the rows at `indices`.
fn evaluate(
    classifier: &Classifier,
    records: &[Vec<f64>],
    targets: &[usize],
    indices: &[usize],
) -> Result<(f64, f64)> {
    let truth = prep::take(targets, indices);
    let predicted = indices
        .iter()
        .map(|&i| {
            classifier
                .predict_proba(&records[i])
                .map(|p| usize::from(p >= crate::pipeline::DECISION_THRESHOLD))
        })
        .collect::<Result<Vec<usize>, _>>()?;
    Ok((
        metrics::accuracy(&truth, &predicted),
        metrics::f1(&truth, &predicted),
    ))
}

fn require_both_classes(targets: &[usize]) -> Result<()> {
    let positives = targets.iter().filter(|&&t| t == 1).count();
    if positives == 0 || positives == targets.len() {
        bail!("training data must contain both classes ({positives} of {} positive)", targets.len());
    }
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
