use symptrack::condition::Condition;
use symptrack::data::{loader, synth};
use symptrack::model::{Classifier, ModelRegistry};
use symptrack::pipeline::{self, RawInput, Strategy, Verdict};
use symptrack::training;

/// Generate every dataset on disk, train from the files and load the result.
fn trained_registry(dir: &std::path::Path) -> ModelRegistry {
    let data_dir = dir.join("data");
    let models_dir = dir.join("models");
    std::fs::create_dir_all(&data_dir).unwrap();

    let heart = data_dir.join("heart.csv");
    let diabetes = data_dir.join("diabetes.parquet");
    let hypertension = data_dir.join("hypertension_dataset.csv");
    loader::write_file(&synth::heart(400, 42), &heart).unwrap();
    loader::write_file(&synth::diabetes(300, 43), &diabetes).unwrap();
    loader::write_file(&synth::hypertension(400, 44), &hypertension).unwrap();

    training::train_file(Condition::Heart, &heart, &models_dir).unwrap();
    training::train_file(Condition::Diabetes, &diabetes, &models_dir).unwrap();
    training::train_file(Condition::Hypertension, &hypertension, &models_dir).unwrap();

    ModelRegistry::load(&models_dir)
}

#[test]
fn every_condition_scores_after_training() {
    let dir = tempfile::tempdir().unwrap();
    let registry = trained_registry(dir.path());
    assert_eq!(registry.len(), 3);

    for condition in Condition::ALL {
        let entry = registry.get(condition).unwrap();
        let profile = condition.profile();
        let report = pipeline::assess(profile, entry, &RawInput::new()).unwrap();

        let p = report.prediction.probability;
        assert!((0.0..=1.0).contains(&p), "{condition}: {p}");
        assert_eq!(report.prediction.verdict == Verdict::Positive, p >= 0.5);
        assert_eq!(report.input.len(), entry.schema.len());

        let magnitudes: Vec<f64> = report.explanation.ranked.iter().map(|c| c.magnitude()).collect();
        assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]), "{condition} not ranked");

        let shown = pipeline::present(profile, &report);
        assert_eq!(shown.chart.bars.len(), report.explanation.ranked.len());
        let text = shown.to_string();
        assert!(text.contains("Risk Similarity Score:"));
        assert!(text.contains(shown.advisory.message));
    }
}

#[test]
fn diabetes_explanation_covers_the_whole_schema() {
    let dir = tempfile::tempdir().unwrap();
    let registry = trained_registry(dir.path());
    let entry = registry.get(Condition::Diabetes).unwrap();
    assert!(matches!(entry.artifact.classifier, Classifier::Forest(_)));

    let profile = Condition::Diabetes.profile();
    let low = RawInput::new().number("Glucose", 80.0).number("BMI", 21.0);
    let high = RawInput::new().number("Glucose", 190.0).number("BMI", 45.0);
    let a = pipeline::assess(profile, entry, &low).unwrap();
    let b = pipeline::assess(profile, entry, &high).unwrap();

    assert_eq!(a.explanation.strategy, Strategy::Ensemble);
    assert_eq!(a.explanation.ranked.len(), entry.schema.len());
    assert_eq!(a.explanation, b.explanation);
    assert!(a.explanation.ranked.iter().all(|c| c.direction.is_none()));
}

#[test]
fn heart_scenario_matches_the_form_layout() {
    let dir = tempfile::tempdir().unwrap();
    let registry = trained_registry(dir.path());
    let entry = registry.get(Condition::Heart).unwrap();

    let raw = RawInput::new()
        .number("age", 50.0)
        .label("sex", "Male")
        .label("cp", "Typical Angina (0)")
        .number("trestbps", 120.0)
        .number("chol", 200.0)
        .label("fbs", "No (0)")
        .label("restecg", "Normal (0)")
        .number("thalach", 150.0)
        .label("exang", "No (0)")
        .number("oldpeak", 1.0)
        .label("slope", "Upsloping (0)")
        .number("ca", 0.0)
        .label("thal", "Normal (3)");
    let report = pipeline::assess(Condition::Heart.profile(), entry, &raw).unwrap();
    assert_eq!(
        report.input.values(),
        &[50.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 3.0]
    );
    let shown = pipeline::present(Condition::Heart.profile(), &report);
    assert_eq!(shown.factors.unwrap().lines.len(), 3);
}
