//! Synthetic patient datasets shaped like the public datasets the trainers
//! expect. Targets follow a hidden logistic relation so trained models have
//! something real to find.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::model::{Cell, Table};

/// Seeded sampler with the few distributions the generators need.
struct Sampler {
    rng: StdRng,
}

impl Sampler {
    fn new(seed: u64) -> Self {
        Sampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Box-Muller transform for a normal distribution.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1: f64 = self.rng.gen::<f64>().max(1e-15);
        let u2: f64 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Normal sample clamped to `[lo, hi]`.
    fn clamped(&mut self, mean: f64, std_dev: f64, lo: f64, hi: f64) -> f64 {
        self.gauss(mean, std_dev).clamp(lo, hi)
    }

    fn int(&mut self, mean: f64, std_dev: f64, lo: f64, hi: f64) -> f64 {
        self.clamped(mean, std_dev, lo, hi).round()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.rng.gen_range(0..options.len())]
    }

    fn pick_code(&mut self, codes: &[f64]) -> f64 {
        codes[self.rng.gen_range(0..codes.len())]
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn table(columns: &[&str]) -> Table {
    Table::new(columns.iter().map(|c| c.to_string()).collect())
}

fn num(v: f64) -> Cell {
    Cell::Number(v)
}

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// Heart disease (Cleveland layout)
// ---------------------------------------------------------------------------

/// Cleveland-style heart data. `target` is 0..=4 and `?` marks a few unknown
/// `ca` / `thal` values, like the UCI file.
pub fn heart(n: usize, seed: u64) -> Table {
    let mut s = Sampler::new(seed);
    let mut t = table(&[
        "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
        "oldpeak", "slope", "ca", "thal", "target",
    ]);

    for _ in 0..n {
        let age = s.int(54.0, 9.0, 29.0, 77.0);
        let sex = if s.chance(0.68) { 1.0 } else { 0.0 };
        let cp = s.pick_code(&[0.0, 1.0, 2.0, 3.0]);
        let trestbps = s.int(131.0, 17.0, 94.0, 200.0);
        let chol = s.int(246.0, 51.0, 126.0, 564.0);
        let fbs = if s.chance(0.15) { 1.0 } else { 0.0 };
        let restecg = s.pick_code(&[0.0, 1.0, 2.0]);
        let thalach = s.int(150.0 - (age - 54.0) * 0.8, 20.0, 71.0, 202.0);
        let exang = if s.chance(0.33) { 1.0 } else { 0.0 };
        let oldpeak = (s.clamped(1.0, 1.1, 0.0, 6.2) * 10.0).round() / 10.0;
        let slope = s.pick_code(&[0.0, 1.0, 2.0]);
        let ca = s.pick_code(&[0.0, 0.0, 1.0, 2.0, 3.0]);
        let thal = s.pick_code(&[3.0, 3.0, 6.0, 7.0]);

        let z = -8.0 + 0.04 * age + 0.9 * sex + 0.55 * cp + 0.012 * trestbps
            + 0.003 * chol - 0.02 * (thalach - 150.0) + 0.9 * exang + 0.6 * oldpeak
            + 0.7 * ca + 0.25 * (thal - 3.0);
        let target = if s.chance(sigmoid(z)) {
            s.pick_code(&[1.0, 1.0, 2.0, 3.0, 4.0])
        } else {
            0.0
        };

        let ca_cell = if s.chance(0.015) { text("?") } else { num(ca) };
        let thal_cell = if s.chance(0.01) { text("?") } else { num(thal) };

        t.push_row(vec![
            num(age),
            num(sex),
            num(cp),
            num(trestbps),
            num(chol),
            num(fbs),
            num(restecg),
            num(thalach),
            num(exang),
            num(oldpeak),
            num(slope),
            ca_cell,
            thal_cell,
            num(target),
        ]);
    }
    t
}

// ---------------------------------------------------------------------------
// Diabetes (Pima layout)
// ---------------------------------------------------------------------------

/// Pima-style diabetes data with a handful of blank cells.
pub fn diabetes(n: usize, seed: u64) -> Table {
    let mut s = Sampler::new(seed);
    let mut t = table(&[
        "Pregnancies",
        "Glucose",
        "BloodPressure",
        "SkinThickness",
        "Insulin",
        "BMI",
        "DiabetesPedigreeFunction",
        "Age",
        "Outcome",
    ]);

    for _ in 0..n {
        let pregnancies = s.int(3.8, 3.3, 0.0, 17.0);
        let glucose = s.int(121.0, 32.0, 44.0, 199.0);
        let bp = s.int(72.0, 12.0, 24.0, 122.0);
        let skin = s.int(29.0, 10.0, 7.0, 99.0);
        let insulin = s.int(140.0, 110.0, 14.0, 846.0);
        let bmi = (s.clamped(32.0, 7.0, 18.2, 67.1) * 10.0).round() / 10.0;
        let pedigree = (s.clamped(0.47, 0.33, 0.078, 2.42) * 1000.0).round() / 1000.0;
        let age = s.int(33.0, 11.0, 21.0, 81.0);

        let z = -8.5 + 0.035 * glucose + 0.09 * bmi + 0.12 * pregnancies + 0.9 * pedigree
            + 0.015 * age;
        let outcome = if s.chance(sigmoid(z)) { 1.0 } else { 0.0 };

        let insulin_cell = if s.chance(0.02) { Cell::Missing } else { num(insulin) };
        let skin_cell = if s.chance(0.02) { Cell::Missing } else { num(skin) };

        t.push_row(vec![
            num(pregnancies),
            num(glucose),
            num(bp),
            skin_cell,
            insulin_cell,
            num(bmi),
            num(pedigree),
            num(age),
            num(outcome),
        ]);
    }
    t
}

// ---------------------------------------------------------------------------
// Hypertension
// ---------------------------------------------------------------------------

/// Mixed numeric / categorical hypertension data; `Hypertension` is
/// `Low` / `High`.
pub fn hypertension(n: usize, seed: u64) -> Table {
    let mut s = Sampler::new(seed);
    let mut t = table(&[
        "Country",
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
        "Hypertension",
    ]);

    for _ in 0..n {
        let age = s.int(50.0, 17.0, 18.0, 90.0);
        let bmi = (s.clamped(27.0, 5.0, 15.0, 50.0) * 10.0).round() / 10.0;
        let chol = s.int(200.0, 40.0, 120.0, 350.0);
        let sbp = s.int(125.0 + (age - 50.0) * 0.4, 16.0, 85.0, 200.0);
        let dbp = s.int(80.0, 10.0, 50.0, 120.0);
        let glucose = s.int(100.0, 22.0, 60.0, 200.0);
        let heart_rate = s.int(75.0, 11.0, 45.0, 140.0);
        let sleep = (s.clamped(6.8, 1.2, 3.0, 10.0) * 10.0).round() / 10.0;
        let gender = s.pick(&["Male", "Female"]);
        let diabetic = s.pick(&["No", "No", "No", "Yes"]);
        let alcohol = s.int(6.0, 5.0, 0.0, 30.0);
        let smoking = s.pick(&["Never", "Never", "Former", "Current"]);
        let stress = s.pick(&["Low", "Medium", "High"]);
        let salt = s.pick(&["Low", "Medium", "High"]);
        let activity = s.pick(&["Low", "Moderate", "High"]);
        let family = s.pick(&["No", "Yes"]);
        let hdl = s.int(50.0, 12.0, 20.0, 100.0);
        let ldl = s.int(120.0, 30.0, 50.0, 250.0);
        let tg = s.int(150.0, 50.0, 50.0, 400.0);

        let level = |v: &str| match v {
            "Medium" | "Moderate" => 1.0,
            "High" => 2.0,
            _ => 0.0,
        };
        let z = -4.0 + 0.03 * age + 0.05 * bmi + 0.045 * (sbp - 120.0) + 0.03 * (dbp - 80.0)
            + 0.005 * chol + 0.4 * level(salt) + 0.3 * level(stress) - 0.3 * level(activity)
            + if family == "Yes" { 0.5 } else { 0.0 }
            + if diabetic == "Yes" { 0.4 } else { 0.0 };
        let label = if s.chance(sigmoid(z)) { "High" } else { "Low" };

        let sleep_cell = if s.chance(0.01) { Cell::Missing } else { num(sleep) };

        t.push_row(vec![
            text(s.pick(&["India", "Brazil", "Kenya"])),
            num(age),
            num(bmi),
            num(chol),
            num(sbp),
            num(dbp),
            num(glucose),
            num(heart_rate),
            sleep_cell,
            text(gender),
            text(diabetic),
            num(alcohol),
            text(smoking),
            text(stress),
            text(salt),
            text(activity),
            text(family),
            num(hdl),
            num(ldl),
            num(tg),
            text(label),
        ]);
    }
    t
}
