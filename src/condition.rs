//! Per-condition configuration: form fields, explanation rules and the fixed
//! wording shown for each of the three risk checks.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Heart,
    Diabetes,
    Hypertension,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Heart, Condition::Diabetes, Condition::Hypertension];

    /// File name prefix of the model and schema files.
    pub fn file_stem(self) -> &'static str {
        match self {
            Condition::Heart => "heart",
            Condition::Diabetes => "diabetes",
            Condition::Hypertension => "hypertension",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Condition::Heart => "Heart Disease",
            Condition::Diabetes => "Diabetes",
            Condition::Hypertension => "Hypertension",
        }
    }

    pub fn profile(self) -> &'static ConditionProfile {
        match self {
            Condition::Heart => &HEART,
            Condition::Diabetes => &DIABETES,
            Condition::Hypertension => &HYPERTENSION,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// A numeric slider writing one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub integer: bool,
}

impl Slider {
    const fn int(min: f64, max: f64, default: f64) -> Self {
        Slider {
            min,
            max,
            default,
            step: 1.0,
            integer: true,
        }
    }

    const fn real(min: f64, max: f64, default: f64, step: f64) -> Self {
        Slider {
            min,
            max,
            default,
            step,
            integer: false,
        }
    }
}

/// A selectable option carrying its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodedOption {
    pub name: &'static str,
    pub code: i64,
}

impl CodedOption {
    const fn new(name: &'static str, code: i64) -> Self {
        CodedOption { name, code }
    }

    /// Display form with the code appended, e.g. `Asymptomatic (3)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

/// One choice of a one-hot group; `slot == None` is the dropped base level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyOption {
    pub name: &'static str,
    pub slot: Option<&'static str>,
}

impl DummyOption {
    const fn base(name: &'static str) -> Self {
        DummyOption { name, slot: None }
    }

    const fn slot(name: &'static str, slot: &'static str) -> Self {
        DummyOption {
            name,
            slot: Some(slot),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Slider(Slider),
    /// Single slot holding the chosen option's code. With `show_codes` the
    /// option is displayed (and may be typed) as `Name (code)`.
    Coded {
        options: &'static [CodedOption],
        show_codes: bool,
    },
    /// One indicator slot per non-base option.
    OneHot(&'static [DummyOption]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Field key; also the slot name for sliders and coded fields.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn slider(key: &'static str, label: &'static str, slider: Slider) -> Self {
        FieldSpec {
            key,
            label,
            kind: FieldKind::Slider(slider),
        }
    }

    const fn coded(key: &'static str, label: &'static str, options: &'static [CodedOption]) -> Self {
        FieldSpec {
            key,
            label,
            kind: FieldKind::Coded {
                options,
                show_codes: true,
            },
        }
    }

    const fn binary(key: &'static str, label: &'static str, options: &'static [CodedOption]) -> Self {
        FieldSpec {
            key,
            label,
            kind: FieldKind::Coded {
                options,
                show_codes: false,
            },
        }
    }

    const fn one_hot(key: &'static str, label: &'static str, options: &'static [DummyOption]) -> Self {
        FieldSpec {
            key,
            label,
            kind: FieldKind::OneHot(options),
        }
    }

    /// Display labels of a selector's options, in order.
    pub fn option_labels(&self) -> Vec<String> {
        match self.kind {
            FieldKind::Slider(_) => Vec::new(),
            FieldKind::Coded { options, show_codes } => options
                .iter()
                .map(|o| if show_codes { o.label() } else { o.name.to_string() })
                .collect(),
            FieldKind::OneHot(options) => options.iter().map(|o| o.name.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Explanation & wording rules
// ---------------------------------------------------------------------------

/// Number of factors listed in a narrative summary.
pub const TOP_FACTORS: usize = 3;

/// When the pipeline is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Only when the named button is pressed.
    OnDemand(&'static str),
    /// On every form change.
    Live,
}

/// Narrative list of top factors under the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub heading: &'static str,
    pub impact_label: &'static str,
    /// Only factors that push the risk up are listed.
    pub increasing_only: bool,
    /// Append each factor's plain-language description.
    pub describe: bool,
    pub empty_message: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub title: &'static str,
    pub axis_label: &'static str,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advisories {
    pub positive: &'static str,
    pub negative: &'static str,
}

/// Everything that distinguishes one condition's pipeline from another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionProfile {
    pub condition: Condition,
    pub heading: &'static str,
    pub dataset: &'static str,
    pub fields: &'static [FieldSpec],
    pub run_mode: RunMode,
    /// Drop contributions whose input value is zero.
    pub zero_filter: bool,
    /// Decimal places for displayed scores.
    pub precision: usize,
    pub capitalize_labels: bool,
    pub summary: Option<Summary>,
    pub glossary: &'static [(&'static str, &'static str)],
    pub chart: ChartStyle,
    pub advisories: Advisories,
    pub how_it_works: Option<&'static str>,
}

pub const NO_DESCRIPTION: &str = "No description available.";

impl ConditionProfile {
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn describe(&self, feature: &str) -> &'static str {
        self.glossary
            .iter()
            .find(|(name, _)| *name == feature)
            .map(|(_, text)| *text)
            .unwrap_or(NO_DESCRIPTION)
    }
}

// ---------------------------------------------------------------------------
// Heart disease
// ---------------------------------------------------------------------------

const YES_NO: &[CodedOption] = &[CodedOption::new("No", 0), CodedOption::new("Yes", 1)];

static HEART: ConditionProfile = ConditionProfile {
    condition: Condition::Heart,
    heading: "Heart Disease Risk",
    dataset: "UCI Heart Disease (Cleveland subset)",
    fields: &[
        FieldSpec::slider("age", "Age", Slider::int(20.0, 80.0, 50.0)),
        FieldSpec::binary(
            "sex",
            "Sex",
            &[CodedOption::new("Male", 1), CodedOption::new("Female", 0)],
        ),
        FieldSpec::coded(
            "cp",
            "Chest Pain Type",
            &[
                CodedOption::new("Typical Angina", 0),
                CodedOption::new("Atypical Angina", 1),
                CodedOption::new("Non-anginal Pain", 2),
                CodedOption::new("Asymptomatic", 3),
            ],
        ),
        FieldSpec::slider(
            "trestbps",
            "Resting Blood Pressure (mm Hg)",
            Slider::int(90.0, 200.0, 120.0),
        ),
        FieldSpec::slider("chol", "Cholesterol (mg/dl)", Slider::int(100.0, 400.0, 200.0)),
        FieldSpec::coded("fbs", "Fasting Blood Sugar > 120 mg/dl (fbs)", YES_NO),
        FieldSpec::coded(
            "restecg",
            "Resting ECG Result (restecg)",
            &[
                CodedOption::new("Normal", 0),
                CodedOption::new("ST-T Abnormality", 1),
                CodedOption::new("Left Ventricular Hypertrophy", 2),
            ],
        ),
        FieldSpec::slider(
            "thalach",
            "Max Heart Rate Achieved (thalach)",
            Slider::int(70.0, 210.0, 150.0),
        ),
        FieldSpec::coded("exang", "Exercise-Induced Angina (exang)", YES_NO),
        FieldSpec::slider(
            "oldpeak",
            "ST Depression (oldpeak)",
            Slider::real(0.0, 6.0, 1.0, 0.1),
        ),
        FieldSpec::coded(
            "slope",
            "Slope of Peak Exercise ST Segment (slope)",
            &[
                CodedOption::new("Upsloping", 0),
                CodedOption::new("Flat", 1),
                CodedOption::new("Downsloping", 2),
            ],
        ),
        FieldSpec::slider(
            "ca",
            "Number of Major Vessels Colored (ca)",
            Slider::int(0.0, 3.0, 0.0),
        ),
        FieldSpec::coded(
            "thal",
            "Thalassemia Type (thal)",
            &[
                CodedOption::new("Normal", 3),
                CodedOption::new("Fixed Defect", 6),
                CodedOption::new("Reversible Defect", 7),
            ],
        ),
    ],
    run_mode: RunMode::OnDemand("Run Heart Prediction"),
    zero_filter: false,
    precision: 2,
    capitalize_labels: true,
    summary: Some(Summary {
        heading: "Top Factors Influencing This Result:",
        impact_label: "Impact Score",
        increasing_only: false,
        describe: true,
        empty_message: None,
    }),
    glossary: &[
        ("cp", "Chest Pain Type: pain experienced in the chest, often related to heart stress."),
        ("thalach", "Maximum Heart Rate Achieved during physical activity."),
        ("oldpeak", "ST depression during exercise compared to rest (indicator of ischemia)."),
        ("trestbps", "Resting Blood Pressure: the blood pressure when you're at rest."),
        ("chol", "Serum Cholesterol: amount of cholesterol in mg/dl."),
        ("thal", "Thalassemia: a blood disorder affecting oxygen transport."),
        ("slope", "Slope of the ST segment in an ECG (Upsloping, Flat, or Downsloping)."),
        ("fbs", "Fasting Blood Sugar > 120 mg/dl (1 = yes)."),
        ("exang", "Exercise-induced angina (chest pain)."),
        ("ca", "Number of major vessels colored by fluoroscopy (0-3)."),
    ],
    chart: ChartStyle {
        title: "Feature Contributions to Current Prediction",
        axis_label: "Impact Score",
        color: [0x2e, 0x86, 0xde],
    },
    advisories: Advisories {
        positive: "Your health profile is similar to individuals with heart conditions in the \
                   dataset. Consider speaking to a healthcare provider.",
        negative: "Your inputs do not strongly match patterns seen in heart disease cases in \
                   the dataset.",
    },
    how_it_works: Some(
        "We use a machine learning model trained on real-world heart disease data. Your inputs \
         are analyzed to estimate how similar they are to profiles of individuals with heart \
         disease in the dataset. This result is not a diagnosis, but a data-driven insight into \
         risk pattern similarity.\n\n\
         Common terms:\n\
         • Thalach: max heart rate during exercise\n\
         • Oldpeak: ST depression from ECG\n\
         • Cp: chest pain type",
    ),
};

// ---------------------------------------------------------------------------
// Diabetes
// ---------------------------------------------------------------------------

static DIABETES: ConditionProfile = ConditionProfile {
    condition: Condition::Diabetes,
    heading: "Diabetes Risk",
    dataset: "Pima Indians Diabetes Dataset",
    fields: &[
        FieldSpec::slider("Pregnancies", "Pregnancies", Slider::int(0.0, 20.0, 1.0)),
        FieldSpec::slider("Glucose", "Glucose", Slider::int(50.0, 200.0, 100.0)),
        FieldSpec::slider("BloodPressure", "Blood Pressure", Slider::int(40.0, 120.0, 70.0)),
        FieldSpec::slider("SkinThickness", "Skin Thickness", Slider::int(0.0, 100.0, 20.0)),
        FieldSpec::slider("Insulin", "Insulin", Slider::int(0.0, 850.0, 80.0)),
        FieldSpec::slider("BMI", "BMI", Slider::real(10.0, 60.0, 30.0, 0.1)),
        FieldSpec::slider(
            "DiabetesPedigreeFunction",
            "Diabetes Pedigree Function",
            Slider::real(0.0, 2.5, 0.5, 0.01),
        ),
        FieldSpec::slider("Age", "Age", Slider::int(10.0, 100.0, 35.0)),
    ],
    run_mode: RunMode::Live,
    zero_filter: false,
    precision: 2,
    capitalize_labels: false,
    summary: None,
    glossary: &[],
    chart: ChartStyle {
        title: "Feature Contributions to Diabetes Prediction",
        axis_label: "Importance Score",
        color: [0xf3, 0x9c, 0x12],
    },
    advisories: Advisories {
        positive: "Your profile closely matches diabetic cases in the dataset. Please consult \
                   a professional.",
        negative: "Your profile does not strongly match diabetes patterns in the dataset.",
    },
    how_it_works: None,
};

// ---------------------------------------------------------------------------
// Hypertension
// ---------------------------------------------------------------------------

static HYPERTENSION: ConditionProfile = ConditionProfile {
    condition: Condition::Hypertension,
    heading: "Hypertension Risk",
    dataset: "Repurposed Stroke Dataset for Hypertension Risk",
    fields: &[
        FieldSpec::slider("Age", "Age", Slider::int(10.0, 100.0, 40.0)),
        FieldSpec::slider("BMI", "BMI", Slider::real(10.0, 60.0, 25.0, 0.1)),
        FieldSpec::slider("Cholesterol", "Cholesterol", Slider::int(100.0, 400.0, 200.0)),
        FieldSpec::slider("Systolic_BP", "Systolic BP", Slider::int(80.0, 200.0, 120.0)),
        FieldSpec::slider("Diastolic_BP", "Diastolic BP", Slider::int(40.0, 120.0, 80.0)),
        FieldSpec::slider("Glucose", "Glucose", Slider::int(50.0, 200.0, 100.0)),
        FieldSpec::slider("Heart_Rate", "Heart Rate", Slider::int(40.0, 150.0, 75.0)),
        FieldSpec::one_hot(
            "salt",
            "Salt Intake",
            &[
                DummyOption::base("Low"),
                DummyOption::slot("Medium", "Salt_Medium"),
                DummyOption::slot("High", "Salt_High"),
            ],
        ),
        FieldSpec::one_hot(
            "stress",
            "Stress Level",
            &[
                DummyOption::base("Low"),
                DummyOption::slot("Medium", "Stress_Medium"),
                DummyOption::slot("High", "Stress_High"),
            ],
        ),
        FieldSpec::one_hot(
            "activity",
            "Physical Activity",
            &[
                DummyOption::base("Low"),
                DummyOption::slot("Moderate", "Physical_Moderate"),
                DummyOption::slot("High", "Physical_High"),
            ],
        ),
    ],
    run_mode: RunMode::OnDemand("Run Hypertension Prediction"),
    zero_filter: true,
    precision: 4,
    capitalize_labels: false,
    summary: Some(Summary {
        heading: "Top Influencing Factors:",
        impact_label: "Impact",
        increasing_only: true,
        describe: false,
        empty_message: Some("No major risk-increasing factors detected for this input."),
    }),
    glossary: &[],
    chart: ChartStyle {
        title: "Feature Contributions to Prediction",
        axis_label: "Impact Score",
        color: [0xc0, 0x39, 0x2b],
    },
    advisories: Advisories {
        positive: "Your profile matches hypertension patterns in the dataset. Consider \
                   professional advice.",
        negative: "Your inputs don't strongly match known hypertension profiles.",
    },
    how_it_works: Some(
        "This logistic regression model estimates hypertension risk using cardiovascular, \
         metabolic, and lifestyle inputs.\n\n\
         Common features:\n\
         • BP: blood pressure\n\
         • BMI & Cholesterol: metabolic indicators\n\
         • Salt, Stress, Activity: lifestyle contributions",
    ),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_are_unique_per_profile() {
        for condition in Condition::ALL {
            let fields = condition.profile().fields;
            for (i, f) in fields.iter().enumerate() {
                assert!(
                    fields[i + 1..].iter().all(|g| g.key != f.key),
                    "{condition}: duplicate key {}",
                    f.key
                );
            }
        }
    }

    #[test]
    fn slider_defaults_lie_in_range() {
        for condition in Condition::ALL {
            for field in condition.profile().fields {
                if let FieldKind::Slider(s) = field.kind {
                    assert!(s.min <= s.default && s.default <= s.max, "{}", field.key);
                }
            }
        }
    }

    #[test]
    fn coded_labels_show_codes_only_when_asked() {
        let heart = Condition::Heart.profile();
        assert_eq!(heart.field("sex").unwrap().option_labels(), vec!["Male", "Female"]);
        assert_eq!(
            heart.field("thal").unwrap().option_labels(),
            vec!["Normal (3)", "Fixed Defect (6)", "Reversible Defect (7)"]
        );
    }

    #[test]
    fn glossary_falls_back() {
        let heart = Condition::Heart.profile();
        assert!(heart.describe("cp").starts_with("Chest Pain Type"));
        assert_eq!(heart.describe("age"), NO_DESCRIPTION);
    }
}
