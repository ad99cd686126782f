//! `ModelOracle`: the production `RiskOracle`.
//!
//! Scores a patient with a standardized logistic regression:
//!
//! ```text
//! z = intercept + Σ coef[i] * (x[i] - mean[i]) / std[i]
//! p = 1 / (1 + e^-z)
//! ```
//!
//! Feature importance is the absolute coefficient normalized to sum to 1.
//! The oracle is immutable once loaded and safe to share across threads.

use std::path::Path;

use tracing::{debug, info, warn};

use cardio_contracts::{
    error::{CardioError, CardioResult},
    patient::PatientFeatures,
    risk::{FeatureWeight, RiskResult},
};
use cardio_core::traits::RiskOracle;

use crate::artifact::{sha256_hex, ModelArtifact};

/// Artifact text of the model compiled into this crate.
pub const BUNDLED_MODEL: &str = include_str!("../models/heart_logistic.json");

#[derive(Debug, Clone)]
struct LoadedModel {
    artifact: ModelArtifact,
    fingerprint: String,
    importance: Vec<FeatureWeight>,
}

/// Logistic-regression risk oracle. May be constructed unloaded.
#[derive(Debug, Clone, Default)]
pub struct ModelOracle {
    model: Option<LoadedModel>,
}

impl ModelOracle {
    /// An oracle with no model. Every prediction returns `OracleNotReady`.
    pub fn unloaded() -> Self {
        Self { model: None }
    }

    /// The model shipped with this crate.
    pub fn bundled() -> CardioResult<Self> {
        Self::from_json_str(BUNDLED_MODEL, None)
    }

    /// Load a model artifact from JSON text.
    ///
    /// When `expected_sha256` is given, the hex digest of `s` must match it
    /// (case-insensitive) or the load fails with `ConfigError`.
    pub fn from_json_str(s: &str, expected_sha256: Option<&str>) -> CardioResult<Self> {
        let fingerprint = sha256_hex(s.as_bytes());
        if let Some(expected) = expected_sha256 {
            if !fingerprint.eq_ignore_ascii_case(expected.trim()) {
                warn!(expected = %expected, actual = %fingerprint, "model digest mismatch");
                return Err(CardioError::ConfigError {
                    reason: format!(
                        "model artifact digest mismatch: expected {}, got {}",
                        expected, fingerprint
                    ),
                });
            }
        }

        let artifact = ModelArtifact::from_json_str(s)?;
        let importance = normalized_importance(&artifact);

        info!(
            model_type = %artifact.model_type,
            version = %artifact.version,
            fingerprint = %fingerprint,
            "risk model loaded"
        );
        Ok(Self { model: Some(LoadedModel { artifact, fingerprint, importance }) })
    }

    pub fn from_file(path: &Path, expected_sha256: Option<&str>) -> CardioResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to read model file '{}': {}", path.display(), e),
        })?;
        Self::from_json_str(&contents, expected_sha256)
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// SHA-256 of the loaded artifact text.
    pub fn fingerprint(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.fingerprint.as_str())
    }

    pub fn artifact(&self) -> Option<&ModelArtifact> {
        self.model.as_ref().map(|m| &m.artifact)
    }
}

fn normalized_importance(artifact: &ModelArtifact) -> Vec<FeatureWeight> {
    let total: f64 = artifact.coefficients.iter().map(|c| c.abs()).sum();
    artifact
        .feature_names
        .iter()
        .zip(&artifact.coefficients)
        .map(|(name, coef)| FeatureWeight {
            feature: name.clone(),
            weight: if total > 0.0 { coef.abs() / total } else { 0.0 },
        })
        .collect()
}

impl RiskOracle for ModelOracle {
    fn predict(&self, features: &PatientFeatures) -> CardioResult<RiskResult> {
        let model = self.model.as_ref().ok_or_else(|| CardioError::OracleNotReady {
            reason: "no risk model loaded".to_string(),
        })?;
        let a = &model.artifact;

        let x = features.to_vec();
        if x.len() != a.coefficients.len() {
            return Err(CardioError::FeatureMismatch {
                expected: a.feature_names.join(", "),
                found: format!("{} values", x.len()),
            });
        }

        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            warn!(feature = %a.feature_names[i], "non-finite feature value");
            return Err(CardioError::PredictionFailed {
                reason: format!("feature '{}' is not a finite number", a.feature_names[i]),
            });
        }

        let z = a.intercept
            + x.iter()
                .zip(&a.coefficients)
                .zip(a.scaler_mean.iter().zip(&a.scaler_std))
                .map(|((xi, coef), (mean, std))| coef * (xi - mean) / std)
                .sum::<f64>();
        let probability = 1.0 / (1.0 + (-z).exp());

        if !probability.is_finite() {
            warn!(logit = z, "risk model produced a non-finite probability");
            return Err(CardioError::PredictionFailed {
                reason: format!("non-finite probability (logit {})", z),
            });
        }

        debug!(logit = z, probability, "risk model scored patient");
        Ok(RiskResult::from_probability(probability, model.importance.clone()))
    }
}
