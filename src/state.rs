use std::collections::BTreeMap;
use std::path::Path;

use symptrack::condition::{Condition, ConditionProfile, FieldKind, RunMode};
use symptrack::model::ModelRegistry;
use symptrack::pipeline::{self, Presentation, RawInput, RawValue};

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Current widget value of one form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    /// Index into the field's options.
    Choice(usize),
}

/// Widget values of one condition's form, keyed by field key.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub values: BTreeMap<&'static str, FieldValue>,
}

impl FormState {
    /// Every field at its default: slider default or first option.
    pub fn new(profile: &ConditionProfile) -> Self {
        let values = profile
            .fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::Slider(slider) => FieldValue::Number(slider.default),
                    FieldKind::Coded { .. } | FieldKind::OneHot(_) => FieldValue::Choice(0),
                };
                (field.key, value)
            })
            .collect();
        FormState { values }
    }

    pub fn raw_input(&self) -> RawInput {
        let mut raw = RawInput::new();
        for (key, value) in &self.values {
            let value = match *value {
                FieldValue::Number(v) => RawValue::Number(v),
                FieldValue::Choice(i) => RawValue::Choice(i),
            };
            raw.set(*key, value);
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Per-condition page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ConditionPage {
    pub form: FormState,
    /// Result of the last successful run; cleared when a run fails.
    pub presentation: Option<Presentation>,
    pub error: Option<String>,
}

impl ConditionPage {
    fn new(profile: &ConditionProfile) -> Self {
        ConditionPage {
            form: FormState::new(profile),
            presentation: None,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Models loaded at start-up (or via File → Load models…).
    pub registry: ModelRegistry,

    /// Condition shown in the central panel.
    pub selected: Condition,

    pub pages: BTreeMap<Condition, ConditionPage>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(models_dir: &Path) -> Self {
        Self::with_registry(ModelRegistry::load(models_dir))
    }

    pub fn with_registry(registry: ModelRegistry) -> Self {
        let pages = Condition::ALL
            .into_iter()
            .map(|c| (c, ConditionPage::new(c.profile())))
            .collect();
        let mut state = AppState {
            registry,
            selected: Condition::Heart,
            pages,
            status_message: None,
        };
        state.update_status();
        state.refresh_live();
        state
    }

    /// Replace the registry with the models found in `dir`.
    pub fn load_models(&mut self, dir: &Path) {
        self.registry = ModelRegistry::load(dir);
        for page in self.pages.values_mut() {
            page.presentation = None;
            page.error = None;
        }
        self.update_status();
        self.refresh_live();
    }

    pub fn page(&self, condition: Condition) -> Option<&ConditionPage> {
        self.pages.get(&condition)
    }

    pub fn page_mut(&mut self, condition: Condition) -> Option<&mut ConditionPage> {
        self.pages.get_mut(&condition)
    }

    /// Run the pipeline on the condition's current form.
    pub fn run(&mut self, condition: Condition) {
        let Some(entry) = self.registry.get(condition) else {
            return;
        };
        let Some(page) = self.pages.get_mut(&condition) else {
            return;
        };

        let profile = condition.profile();
        match pipeline::assess(profile, entry, &page.form.raw_input()) {
            Ok(report) => {
                page.presentation = Some(pipeline::present(profile, &report));
                page.error = None;
            }
            Err(e) => {
                log::warn!("{condition} assessment failed: {e}");
                page.presentation = None;
                page.error = Some(e.to_string());
            }
        }
    }

    /// Called when the form changed. Live conditions re-run; on-demand ones
    /// drop the result of the previous inputs until the next run.
    pub fn form_edited(&mut self, condition: Condition) {
        match condition.profile().run_mode {
            RunMode::Live => self.run(condition),
            RunMode::OnDemand(_) => {
                if let Some(page) = self.pages.get_mut(&condition) {
                    page.presentation = None;
                    page.error = None;
                }
            }
        }
    }

    fn refresh_live(&mut self) {
        for condition in Condition::ALL {
            if condition.profile().run_mode == RunMode::Live {
                self.run(condition);
            }
        }
    }

    fn update_status(&mut self) {
        let missing: Vec<&str> = Condition::ALL
            .into_iter()
            .filter(|c| self.registry.get(*c).is_none())
            .map(Condition::title)
            .collect();
        self.status_message = if missing.is_empty() {
            None
        } else {
            Some(format!(
                "No model for {} in {}",
                missing.join(", "),
                self.registry.dir().display()
            ))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symptrack::model::{Classifier, FeatureSchema, LogisticModel, ModelArtifact, ModelEntry};

    /// Logistic entry over the condition's field keys, one slot per field.
    fn logistic_entry(condition: Condition, coefficient: f64, intercept: f64) -> ModelEntry {
        let schema =
            FeatureSchema::new(condition.profile().fields.iter().map(|f| f.key)).unwrap();
        let artifact = ModelArtifact::new(Classifier::Logistic(LogisticModel {
            coefficients: vec![coefficient; schema.len()],
            intercept,
        }));
        ModelEntry::new(artifact, schema).unwrap()
    }

    fn diabetes_entry() -> ModelEntry {
        logistic_entry(Condition::Diabetes, 0.01, -2.0)
    }

    #[test]
    fn default_form_encodes_for_every_condition() {
        for condition in Condition::ALL {
            let profile = condition.profile();
            let form = FormState::new(profile);
            assert_eq!(form.values.len(), profile.fields.len());
            let slots =
                pipeline::encoder::encode_fields(profile.fields, &form.raw_input()).unwrap();
            assert!(!slots.is_empty());
        }
    }

    #[test]
    fn live_condition_is_scored_on_start() {
        let registry = ModelRegistry::from_entries([(Condition::Diabetes, diabetes_entry())]);
        let state = AppState::with_registry(registry);
        assert!(state.page(Condition::Diabetes).unwrap().presentation.is_some());
        assert!(state.page(Condition::Heart).unwrap().presentation.is_none());
        assert!(state.status_message.as_deref().unwrap().contains("Heart Disease"));
    }

    #[test]
    fn on_demand_condition_waits_for_run() {
        let registry = ModelRegistry::from_entries([(Condition::Diabetes, diabetes_entry())]);
        let mut state = AppState::with_registry(registry);
        state.form_edited(Condition::Heart);
        assert!(state.page(Condition::Heart).unwrap().presentation.is_none());
    }

    #[test]
    fn editing_an_on_demand_form_clears_the_old_result() {
        let heart = logistic_entry(Condition::Heart, 0.02, 0.0);
        let registry = ModelRegistry::from_entries([(Condition::Heart, heart)]);
        let mut state = AppState::with_registry(registry);

        state.run(Condition::Heart);
        assert!(state.page(Condition::Heart).unwrap().presentation.is_some());

        let page = state.page_mut(Condition::Heart).unwrap();
        page.form.values.insert("age", FieldValue::Number(80.0));
        page.form.values.insert("chol", FieldValue::Number(400.0));
        state.form_edited(Condition::Heart);
        assert!(state.page(Condition::Heart).unwrap().presentation.is_none());

        state.run(Condition::Heart);
        assert!(state.page(Condition::Heart).unwrap().presentation.is_some());
    }
}
