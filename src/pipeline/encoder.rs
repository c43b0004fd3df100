use std::collections::BTreeMap;

use super::error::ParseError;
use crate::condition::{CodedOption, ConditionProfile, DummyOption, FieldKind, FieldSpec};
use crate::model::FeatureSchema;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// One raw form value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(f64),
    /// Index into the field's options, as produced by a selector widget.
    Choice(usize),
    /// Free text: a number for sliders, an option name or `Name (code)`
    /// label for selectors.
    Label(String),
}

/// Raw values keyed by field key. Absent fields take their default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    values: BTreeMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: RawValue) -> &mut Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn number(mut self, key: &str, value: f64) -> Self {
        self.set(key, RawValue::Number(value));
        self
    }

    pub fn label(mut self, key: &str, label: &str) -> Self {
        self.set(key, RawValue::Label(label.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Encoded input
// ---------------------------------------------------------------------------

/// Numeric feature row aligned to a schema, slot names carried along.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedInput {
    slots: Vec<String>,
    values: Vec<f64>,
}

impl EncodedInput {
    /// Pair slot names with values. Lengths are checked against the schema
    /// at prediction time.
    pub fn new(slots: Vec<String>, values: Vec<f64>) -> Self {
        EncodedInput { slots, values }
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Extract the numeric code from a `Name (code)` label.
pub fn parse_embedded_code(label: &str) -> Option<i64> {
    let (_, tail) = label.rsplit_once('(')?;
    let (code, _) = tail.split_once(')')?;
    code.trim().parse().ok()
}

/// Resolve every field of a form to named slot values, in field order.
pub fn encode_fields(
    fields: &[FieldSpec],
    raw: &RawInput,
) -> Result<Vec<(&'static str, f64)>, ParseError> {
    if let Some(unknown) = raw.keys().find(|k| !fields.iter().any(|f| f.key == *k)) {
        return Err(ParseError::UnknownField(unknown.to_string()));
    }

    let mut slots = Vec::with_capacity(fields.len());
    for field in fields {
        let value = raw.get(field.key);
        match field.kind {
            FieldKind::Slider(slider) => {
                let v = match value {
                    None => slider.default,
                    Some(v) => slider_value(field, v)?,
                };
                slots.push((field.key, v));
            }
            FieldKind::Coded {
                options,
                show_codes,
            } => {
                let code = match value {
                    None => options.first().map(|o| o.code).unwrap_or(0),
                    Some(v) => coded_value(field, options, show_codes, v)?,
                };
                slots.push((field.key, code as f64));
            }
            FieldKind::OneHot(options) => {
                let chosen = match value {
                    None => 0,
                    Some(v) => dummy_choice(field, options, v)?,
                };
                for (i, option) in options.iter().enumerate() {
                    if let Some(slot) = option.slot {
                        slots.push((slot, if i == chosen { 1.0 } else { 0.0 }));
                    }
                }
            }
        }
    }
    Ok(slots)
}

/// Lay named slot values out in schema order. Schema slots without a value
/// are zero; values without a schema slot are dropped.
pub fn align(slots: &[(&str, f64)], schema: &FeatureSchema) -> EncodedInput {
    let by_name: BTreeMap<&str, f64> = slots.iter().copied().collect();

    let values: Vec<f64> = schema
        .names()
        .iter()
        .map(|name| match by_name.get(name.as_str()) {
            Some(v) => *v,
            None => {
                log::debug!("Schema slot `{name}` not populated by the form, using 0");
                0.0
            }
        })
        .collect();

    for (name, _) in slots {
        if schema.position(name).is_none() {
            log::debug!("Form slot `{name}` is not part of the model schema, dropped");
        }
    }

    EncodedInput {
        slots: schema.names().to_vec(),
        values,
    }
}

/// Encode a raw submission for the given condition's model schema.
pub fn encode(
    profile: &ConditionProfile,
    schema: &FeatureSchema,
    raw: &RawInput,
) -> Result<EncodedInput, ParseError> {
    let slots = encode_fields(profile.fields, raw)?;
    Ok(align(&slots, schema))
}

fn slider_value(field: &FieldSpec, value: &RawValue) -> Result<f64, ParseError> {
    match value {
        RawValue::Number(v) => Ok(*v),
        RawValue::Label(text) => text.trim().parse().map_err(|_| ParseError::NotANumber {
            field: field.key.to_string(),
            value: text.clone(),
        }),
        RawValue::Choice(i) => Err(ParseError::NotANumber {
            field: field.key.to_string(),
            value: format!("option #{i}"),
        }),
    }
}

fn coded_value(
    field: &FieldSpec,
    options: &[CodedOption],
    show_codes: bool,
    value: &RawValue,
) -> Result<i64, ParseError> {
    let unknown = |label: String| ParseError::UnknownOption {
        field: field.key.to_string(),
        label,
    };

    match value {
        RawValue::Choice(i) => options.get(*i).map(|o| o.code).ok_or_else(|| unknown(i.to_string())),
        RawValue::Number(v) => options
            .iter()
            .find(|o| o.code as f64 == *v)
            .map(|o| o.code)
            .ok_or_else(|| unknown(v.to_string())),
        RawValue::Label(text) if show_codes => {
            let code = parse_embedded_code(text).ok_or_else(|| ParseError::MissingCode {
                field: field.key.to_string(),
                label: text.clone(),
            })?;
            options
                .iter()
                .find(|o| o.code == code)
                .map(|o| o.code)
                .ok_or_else(|| unknown(text.clone()))
        }
        RawValue::Label(text) => options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(text.trim()))
            .map(|o| o.code)
            .ok_or_else(|| unknown(text.clone())),
    }
}

fn dummy_choice(
    field: &FieldSpec,
    options: &[DummyOption],
    value: &RawValue,
) -> Result<usize, ParseError> {
    let found = match value {
        RawValue::Choice(i) => (*i < options.len()).then_some(*i),
        RawValue::Label(text) => options
            .iter()
            .position(|o| o.name.eq_ignore_ascii_case(text.trim())),
        RawValue::Number(_) => None,
    };
    found.ok_or_else(|| ParseError::UnknownOption {
        field: field.key.to_string(),
        label: match value {
            RawValue::Choice(i) => i.to_string(),
            RawValue::Label(text) => text.clone(),
            RawValue::Number(v) => v.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;

    fn heart_schema() -> FeatureSchema {
        FeatureSchema::new([
            "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
            "oldpeak", "slope", "ca", "thal",
        ])
        .unwrap()
    }

    #[test]
    fn heart_scenario_encodes_in_schema_order() {
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

        let encoded = encode(Condition::Heart.profile(), &heart_schema(), &raw).unwrap();
        assert_eq!(
            encoded.values(),
            &[50.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 3.0]
        );
        assert_eq!(encoded.slots(), heart_schema().names());
    }

    #[test]
    fn every_coded_label_parses_back_to_its_code() {
        for condition in Condition::ALL {
            for field in condition.profile().fields {
                if let FieldKind::Coded { options, show_codes: true } = field.kind {
                    for option in options {
                        assert_eq!(parse_embedded_code(&option.label()), Some(option.code));
                        let raw = RawInput::new().label(field.key, &option.label());
                        let slots = encode_fields(condition.profile().fields, &raw).unwrap();
                        let (_, v) = slots.iter().find(|(k, _)| *k == field.key).unwrap();
                        assert_eq!(*v, option.code as f64);
                    }
                }
            }
        }
    }

    #[test]
    fn label_without_code_is_a_parse_error() {
        let raw = RawInput::new().label("cp", "Asymptomatic");
        let err = encode_fields(Condition::Heart.profile().fields, &raw).unwrap_err();
        assert!(matches!(err, ParseError::MissingCode { ref field, .. } if field == "cp"));
    }

    #[test]
    fn embedded_code_must_be_an_option() {
        let raw = RawInput::new().label("thal", "Normal (4)");
        let err = encode_fields(Condition::Heart.profile().fields, &raw).unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption { .. }));
    }

    #[test]
    fn parse_embedded_code_edge_cases() {
        assert_eq!(parse_embedded_code("Reversible Defect (7)"), Some(7));
        assert_eq!(parse_embedded_code("Odd (name) (12)"), Some(12));
        assert_eq!(parse_embedded_code("No code"), None);
        assert_eq!(parse_embedded_code("Broken (x)"), None);
        assert_eq!(parse_embedded_code("Open (3"), None);
    }

    #[test]
    fn one_hot_drops_the_base_level() {
        let fields = Condition::Hypertension.profile().fields;
        let raw = RawInput::new().label("salt", "High").label("activity", "Moderate");
        let slots = encode_fields(fields, &raw).unwrap();
        let get = |k: &str| slots.iter().find(|(s, _)| *s == k).map(|(_, v)| *v);
        assert_eq!(get("Salt_Medium"), Some(0.0));
        assert_eq!(get("Salt_High"), Some(1.0));
        assert_eq!(get("Stress_Medium"), Some(0.0));
        assert_eq!(get("Stress_High"), Some(0.0));
        assert_eq!(get("Physical_Moderate"), Some(1.0));
        assert_eq!(slots.len(), 13);
    }

    #[test]
    fn align_zero_fills_and_drops_silently() {
        let schema = FeatureSchema::new(["Age", "Gender_Male", "BMI"]).unwrap();
        let encoded = align(&[("BMI", 25.0), ("Salt_High", 1.0), ("Age", 40.0)], &schema);
        assert_eq!(encoded.values(), &[40.0, 0.0, 25.0]);
    }

    #[test]
    fn missing_fields_take_defaults_and_unknown_keys_fail() {
        let fields = Condition::Diabetes.profile().fields;
        let slots = encode_fields(fields, &RawInput::new()).unwrap();
        assert_eq!(slots[1], ("Glucose", 100.0));
        assert_eq!(slots[5], ("BMI", 30.0));

        let raw = RawInput::new().number("Glucoze", 120.0);
        assert_eq!(
            encode_fields(fields, &raw).unwrap_err(),
            ParseError::UnknownField("Glucoze".into())
        );
    }

    #[test]
    fn slider_text_must_be_numeric() {
        let raw = RawInput::new().label("age", "fifty");
        assert!(matches!(
            encode_fields(Condition::Heart.profile().fields, &raw),
            Err(ParseError::NotANumber { .. })
        ));
    }
}
