use std::fmt;

use eframe::egui::Color32;

use super::explainer::{Direction, FeatureContribution};
use super::predictor::Verdict;
use super::RiskReport;
use crate::color;
use crate::condition::ConditionProfile;

/// Decimals of the numeric labels drawn next to each bar.
pub const BAR_LABEL_DECIMALS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Error-styled; shown for a positive verdict.
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub tone: Tone,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Magnitude rounded to the profile precision.
    pub value: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub axis_label: &'static str,
    /// Top to bottom, largest first.
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorLine {
    pub label: String,
    pub impact: f64,
    pub direction: Option<Direction>,
    pub description: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorList {
    pub heading: &'static str,
    pub impact_label: &'static str,
    pub precision: usize,
    pub lines: Vec<FactorLine>,
    pub empty_message: Option<&'static str>,
}

/// One row of the contribution details table.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub feature: String,
    pub value: f64,
    pub score: f64,
    pub direction: Option<Direction>,
}

/// Everything shown for one assessment, ready for the UI or the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub heading: &'static str,
    pub risk_percent: u32,
    pub factors: Option<FactorList>,
    pub chart: Chart,
    pub details: Vec<DetailRow>,
    pub advisory: Advisory,
}

impl Presentation {
    pub fn score_line(&self) -> String {
        format!("Risk Similarity Score: {}%", self.risk_percent)
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn round_to(value: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

pub fn advisory(profile: &ConditionProfile, verdict: Verdict) -> Advisory {
    match verdict {
        Verdict::Positive => Advisory {
            tone: Tone::Warning,
            message: profile.advisories.positive,
        },
        Verdict::Negative => Advisory {
            tone: Tone::Success,
            message: profile.advisories.negative,
        },
    }
}

pub fn present(profile: &ConditionProfile, report: &RiskReport) -> Presentation {
    let label = |c: &FeatureContribution| {
        if profile.capitalize_labels {
            capitalize(&c.feature)
        } else {
            c.feature.clone()
        }
    };

    let factors = profile.summary.map(|summary| FactorList {
        heading: summary.heading,
        impact_label: summary.impact_label,
        precision: profile.precision,
        lines: report
            .explanation
            .top_factors(&summary)
            .into_iter()
            .map(|c| FactorLine {
                label: label(c),
                impact: round_to(c.magnitude(), profile.precision),
                direction: c.direction,
                description: summary.describe.then(|| profile.describe(&c.feature)),
            })
            .collect(),
        empty_message: summary.empty_message,
    });

    let chart = Chart {
        title: profile.chart.title,
        axis_label: profile.chart.axis_label,
        bars: report
            .explanation
            .ranked
            .iter()
            .map(|c| Bar {
                label: label(c),
                value: round_to(c.magnitude(), profile.precision),
                color: color::bar_color(profile.chart.color, c.direction),
            })
            .collect(),
    };

    let details = report
        .explanation
        .ranked
        .iter()
        .map(|c| DetailRow {
            feature: c.feature.clone(),
            value: c.value,
            score: c.score,
            direction: c.direction,
        })
        .collect();

    Presentation {
        heading: profile.heading,
        risk_percent: report.prediction.risk_percent(),
        factors,
        chart,
        details,
        advisory: advisory(profile, report.prediction.verdict),
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "{}", self.score_line())?;

        if let Some(factors) = &self.factors {
            writeln!(f)?;
            writeln!(f, "{}", factors.heading)?;
            if factors.lines.is_empty() {
                if let Some(msg) = factors.empty_message {
                    writeln!(f, "  {msg}")?;
                }
            }
            for line in &factors.lines {
                write!(
                    f,
                    "  - {} ({}: {:.*})",
                    line.label, factors.impact_label, factors.precision, line.impact
                )?;
                if let Some(direction) = line.direction {
                    write!(f, " {}", direction.arrow())?;
                }
                writeln!(f)?;
                if let Some(description) = line.description {
                    writeln!(f, "      {description}")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{} ({})", self.chart.title, self.chart.axis_label)?;
        let width = self.chart.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
        for bar in &self.chart.bars {
            writeln!(f, "  {:<width$}  {:.*}", bar.label, BAR_LABEL_DECIMALS, bar.value)?;
        }

        writeln!(f)?;
        let marker = match self.advisory.tone {
            Tone::Warning => "WARNING",
            Tone::Success => "OK",
        };
        writeln!(f, "[{marker}] {}", self.advisory.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::model::{Classifier, FeatureSchema, LogisticModel};
    use crate::pipeline::encoder::EncodedInput;
    use crate::pipeline::explainer::explain;
    use crate::pipeline::predictor::Prediction;

    fn report(condition: Condition, coefficients: Vec<f64>, names: &[&str], values: Vec<f64>, p: f64) -> RiskReport {
        let schema = FeatureSchema::new(names.iter().copied()).unwrap();
        let classifier = Classifier::Logistic(LogisticModel {
            coefficients,
            intercept: 0.0,
        });
        let input = EncodedInput::new(schema.names().to_vec(), values);
        RiskReport {
            condition,
            explanation: explain(condition.profile(), &classifier, &schema, &input),
            prediction: Prediction::new(p),
            input,
        }
    }

    #[test]
    fn capitalize_matches_sentence_case() {
        assert_eq!(capitalize("thalach"), "Thalach");
        assert_eq!(capitalize("Salt_High"), "Salt_high");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn advisory_follows_verdict() {
        let heart = Condition::Heart.profile();
        let warn = advisory(heart, Verdict::Positive);
        assert_eq!(warn.tone, Tone::Warning);
        assert_eq!(warn.message, heart.advisories.positive);
        assert_eq!(advisory(heart, Verdict::Negative).tone, Tone::Success);
    }

    #[test]
    fn heart_presentation_lists_described_top_three() {
        let r = report(
            Condition::Heart,
            vec![0.02, 0.8, -0.5, 0.01],
            &["age", "sex", "thalach", "chol"],
            vec![50.0, 1.0, 3.0, 200.0],
            0.62,
        );
        let p = present(Condition::Heart.profile(), &r);
        assert_eq!(p.score_line(), "Risk Similarity Score: 62%");

        let factors = p.factors.as_ref().unwrap();
        let labels: Vec<&str> = factors.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Chol", "Thalach", "Age"]);
        assert_eq!(factors.lines[1].impact, 1.5);
        assert_eq!(factors.lines[1].direction, Some(Direction::DecreasesRisk));
        assert_eq!(
            factors.lines[2].description,
            Some(crate::condition::NO_DESCRIPTION)
        );

        assert_eq!(p.chart.bars.len(), 4);
        assert_eq!(p.chart.bars[3].label, "Sex");
        assert_ne!(p.chart.bars[1].color, p.chart.bars[0].color);
        assert_eq!(p.advisory.tone, Tone::Warning);

        let text = p.to_string();
        assert!(text.contains("Risk Similarity Score: 62%"));
        assert!(text.contains("Thalach (Impact Score: 1.50) ↓ decreases risk"));
    }

    #[test]
    fn hypertension_reports_empty_increasing_list() {
        let r = report(
            Condition::Hypertension,
            vec![-0.1, -0.2],
            &["Age", "BMI"],
            vec![40.0, 25.0],
            0.2,
        );
        let p = present(Condition::Hypertension.profile(), &r);
        let factors = p.factors.as_ref().unwrap();
        assert!(factors.lines.is_empty());
        assert!(p.to_string().contains("No major risk-increasing factors"));
        assert_eq!(p.chart.bars[0].label, "BMI");
        assert_eq!(p.advisory.tone, Tone::Success);
    }
}
