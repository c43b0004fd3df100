use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::Value as JsonValue;
use symptrack::condition::Condition;
use symptrack::model::ModelRegistry;
use symptrack::pipeline::{self, RawInput, RawValue};

/// Score one profile from the command line and print the result.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(short, long, value_enum)]
    condition: Condition,

    #[arg(short, long, env = symptrack::MODELS_DIR_ENV, default_value = symptrack::DEFAULT_MODELS_DIR)]
    models_dir: PathBuf,

    /// JSON object of field values, e.g. `{"age": 50, "cp": "Asymptomatic (3)"}`.
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Field value as `key=value`; overrides the profile file. Repeatable.
    #[arg(short, long, value_name = "KEY=VALUE")]
    set: Vec<String>,
}

fn main() -> Result<()> {
    symptrack::init_logging();
    let args = Args::parse();

    let mut raw = RawInput::new();
    if let Some(path) = &args.profile {
        read_profile(path, &mut raw)?;
    }
    apply_sets(&args.set, &mut raw)?;

    let entry = ModelRegistry::load_entry(&args.models_dir, args.condition).with_context(|| {
        format!(
            "No {} model in {}",
            args.condition,
            args.models_dir.display()
        )
    })?;

    let profile = args.condition.profile();
    let report = pipeline::assess(profile, &entry, &raw)?;
    print!("{}", pipeline::present(profile, &report));
    Ok(())
}

/// Numbers stay numbers; anything else is treated as an option label.
fn parse_value(text: &str) -> RawValue {
    match text.trim().parse::<f64>() {
        Ok(v) => RawValue::Number(v),
        Err(_) => RawValue::Label(text.trim().to_string()),
    }
}

/// Apply `key=value` pairs in order; later pairs win.
fn apply_sets(pairs: &[String], raw: &mut RawInput) -> Result<()> {
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected KEY=VALUE, got '{pair}'"))?;
        raw.set(key.trim(), parse_value(value));
    }
    Ok(())
}

fn read_profile(path: &Path, raw: &mut RawInput) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: JsonValue = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let JsonValue::Object(map) = json else {
        bail!("{} must contain a JSON object", path.display());
    };

    for (key, value) in map {
        let value = match value {
            JsonValue::Number(n) => match n.as_f64() {
                Some(v) => RawValue::Number(v),
                None => bail!("'{key}': {n} is not representable"),
            },
            JsonValue::String(s) => RawValue::Label(s),
            other => bail!("'{key}': expected a number or a string, got {other}"),
        };
        raw.set(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_file(json: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), json).unwrap();
        file
    }

    #[test]
    fn numbers_parse_as_numbers_and_the_rest_as_labels() {
        assert_eq!(parse_value("50"), RawValue::Number(50.0));
        assert_eq!(parse_value(" 1.5 "), RawValue::Number(1.5));
        assert_eq!(
            parse_value(" Asymptomatic (3) "),
            RawValue::Label("Asymptomatic (3)".to_string())
        );
    }

    #[test]
    fn profile_must_be_an_object_of_numbers_and_strings() {
        let mut raw = RawInput::new();
        assert!(read_profile(profile_file("[1, 2]").path(), &mut raw).is_err());
        assert!(read_profile(profile_file(r#"{"age": true}"#).path(), &mut raw).is_err());
        assert!(read_profile(profile_file("not json").path(), &mut raw).is_err());

        let file = profile_file(r#"{"age": 50, "cp": "Asymptomatic (3)"}"#);
        read_profile(file.path(), &mut raw).unwrap();
        assert_eq!(raw.get("age"), Some(&RawValue::Number(50.0)));
        assert_eq!(
            raw.get("cp"),
            Some(&RawValue::Label("Asymptomatic (3)".to_string()))
        );
    }

    #[test]
    fn set_pairs_override_the_profile() {
        let mut raw = RawInput::new();
        let file = profile_file(r#"{"age": 50, "sex": "Male"}"#);
        read_profile(file.path(), &mut raw).unwrap();

        let pairs = vec!["age=70".to_string(), " sex = Female".to_string()];
        apply_sets(&pairs, &mut raw).unwrap();
        assert_eq!(raw.get("age"), Some(&RawValue::Number(70.0)));
        assert_eq!(raw.get("sex"), Some(&RawValue::Label("Female".to_string())));

        assert!(apply_sets(&["age".to_string()], &mut raw).is_err());
    }
}
