//! The 13-field clinical record every component consumes.

use serde::{Deserialize, Serialize};

use crate::error::{CardioError, CardioResult};

/// Feature names in the canonical order the risk oracle is trained on.
pub const FEATURE_NAMES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Features an intervention can change. Everything else passes through.
pub const MODIFIABLE_FEATURES: [&str; 4] = ["trestbps", "chol", "thalach", "oldpeak"];

/// Accepted values for a single field at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    /// Categorical and count fields must be whole numbers.
    pub integer: bool,
    /// When set, only these values are accepted (overrides the range check).
    pub allowed: Option<&'static [f64]>,
    pub description: &'static str,
}

/// Boundary ranges, one per feature, in `FEATURE_NAMES` order.
pub const FIELD_SPECS: [FieldSpec; 13] = [
    field("age", 0.0, 120.0, true, "Age in years"),
    field("sex", 0.0, 1.0, true, "Sex (1 = male, 0 = female)"),
    field("cp", 1.0, 4.0, true, "Chest pain type (1-4)"),
    field("trestbps", 50.0, 250.0, false, "Resting blood pressure (mmHg)"),
    field("chol", 100.0, 600.0, false, "Serum cholesterol (mg/dL)"),
    field("fbs", 0.0, 1.0, true, "Fasting blood sugar > 120 mg/dL (1 = true)"),
    field("restecg", 0.0, 2.0, true, "Resting ECG result (0-2)"),
    field("thalach", 50.0, 250.0, false, "Maximum heart rate achieved (bpm)"),
    field("exang", 0.0, 1.0, true, "Exercise-induced angina (1 = yes)"),
    field("oldpeak", 0.0, 10.0, false, "ST depression induced by exercise"),
    field("slope", 1.0, 3.0, true, "Slope of peak exercise ST segment (1-3)"),
    field("ca", 0.0, 3.0, true, "Number of major vessels colored by fluoroscopy (0-3)"),
    FieldSpec {
        name: "thal",
        min: 3.0,
        max: 7.0,
        integer: true,
        allowed: Some(&[3.0, 6.0, 7.0]),
        description: "Thalassemia (3 = normal, 6 = fixed defect, 7 = reversible defect)",
    },
];

const fn field(
    name: &'static str,
    min: f64,
    max: f64,
    integer: bool,
    description: &'static str,
) -> FieldSpec {
    FieldSpec { name, min, max, integer, allowed: None, description }
}

/// Human-readable label for a feature, used in explanations.
pub fn display_name(feature: &str) -> &str {
    match feature {
        "age" => "age",
        "sex" => "sex",
        "cp" => "chest pain type",
        "trestbps" => "blood pressure",
        "chol" => "cholesterol",
        "fbs" => "fasting blood sugar",
        "restecg" => "resting ECG",
        "thalach" => "max heart rate",
        "exang" => "exercise-induced angina",
        "oldpeak" => "ST depression",
        "slope" => "ST slope",
        "ca" => "vessel disease",
        "thal" => "thalassemia status",
        other => other,
    }
}

pub fn is_modifiable(feature: &str) -> bool {
    MODIFIABLE_FEATURES.contains(&feature)
}

/// One patient's clinical features.
///
/// Values are stored as `f64` in raw clinical units. The record is `Copy`:
/// transformations always hand back a new value and never touch the caller's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl PatientFeatures {
    /// Values in `FEATURE_NAMES` order.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// Build a record from values in `FEATURE_NAMES` order.
    ///
    /// Returns `FeatureMismatch` if the slice does not hold exactly 13 values.
    pub fn from_vec(values: &[f64]) -> CardioResult<Self> {
        if values.len() != FEATURE_NAMES.len() {
            return Err(CardioError::FeatureMismatch {
                expected: format!("{} values", FEATURE_NAMES.len()),
                found: format!("{} values", values.len()),
            });
        }
        Ok(Self {
            age: values[0],
            sex: values[1],
            cp: values[2],
            trestbps: values[3],
            chol: values[4],
            fbs: values[5],
            restecg: values[6],
            thalach: values[7],
            exang: values[8],
            oldpeak: values[9],
            slope: values[10],
            ca: values[11],
            thal: values[12],
        })
    }

    /// Look up a feature by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.to_vec()[idx])
    }

    /// Check every field against `FIELD_SPECS`.
    ///
    /// Stops at the first bad field and names it. Boundary code that needs
    /// the complete failure list should validate raw JSON instead.
    pub fn validate(&self) -> CardioResult<()> {
        for (spec, value) in FIELD_SPECS.iter().zip(self.to_vec()) {
            if !value.is_finite() {
                return Err(CardioError::InvalidPatient {
                    field: spec.name.to_string(),
                    reason: format!("value {} is not a finite number", value),
                });
            }
            if spec.integer && value.fract() != 0.0 {
                return Err(CardioError::InvalidPatient {
                    field: spec.name.to_string(),
                    reason: format!("value {} must be a whole number", value),
                });
            }
            match spec.allowed {
                Some(allowed) => {
                    if !allowed.contains(&value) {
                        return Err(CardioError::InvalidPatient {
                            field: spec.name.to_string(),
                            reason: format!("value {} is not one of {:?}", value, allowed),
                        });
                    }
                }
                None => {
                    if value < spec.min || value > spec.max {
                        return Err(CardioError::InvalidPatient {
                            field: spec.name.to_string(),
                            reason: format!(
                                "value {} is outside the range {}..={}",
                                value, spec.min, spec.max
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Structural heart disease: a thalassemia defect or two or more diseased
    /// vessels. Neither responds to medication or lifestyle change.
    pub fn has_structural_disease(&self) -> bool {
        let thal = self.thal.trunc();
        thal == 6.0 || thal == 7.0 || self.ca.trunc() >= 2.0
    }
}

/// The four modifiable metrics, as shown before and after an intervention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifiableMetrics {
    pub trestbps: f64,
    pub chol: f64,
    pub thalach: f64,
    pub oldpeak: f64,
}

impl ModifiableMetrics {
    pub fn from_features(features: &PatientFeatures) -> Self {
        Self {
            trestbps: features.trestbps,
            chol: features.chol,
            thalach: features.thalach,
            oldpeak: features.oldpeak,
        }
    }

    /// `(feature name, value)` pairs in `MODIFIABLE_FEATURES` order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("trestbps", self.trestbps),
            ("chol", self.chol),
            ("thalach", self.thalach),
            ("oldpeak", self.oldpeak),
        ]
    }
}
