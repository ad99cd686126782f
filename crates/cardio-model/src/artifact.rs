//! Serialized logistic-regression model.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use cardio_contracts::{
    error::{CardioError, CardioResult},
    patient::FEATURE_NAMES,
};

/// A standardized logistic-regression model as stored on disk.
///
/// `scaler_mean` / `scaler_std` standardize each feature before the dot
/// product with `coefficients`. All four vectors are in `feature_names`
/// order, which must equal `FEATURE_NAMES`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub version: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub scaler_mean: Vec<f64>,
    pub scaler_std: Vec<f64>,
}

impl ModelArtifact {
    /// Parse an artifact from JSON and check it against the feature schema.
    pub fn from_json_str(s: &str) -> CardioResult<Self> {
        let artifact: ModelArtifact = serde_json::from_str(s).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to parse model artifact JSON: {}", e),
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check feature order, vector lengths and scaler sanity.
    pub fn validate(&self) -> CardioResult<()> {
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            return Err(CardioError::FeatureMismatch {
                expected: FEATURE_NAMES.join(", "),
                found: self.feature_names.join(", "),
            });
        }

        let n = FEATURE_NAMES.len();
        for (label, len) in [
            ("coefficients", self.coefficients.len()),
            ("scaler_mean", self.scaler_mean.len()),
            ("scaler_std", self.scaler_std.len()),
        ] {
            if len != n {
                return Err(CardioError::ConfigError {
                    reason: format!("model artifact '{}' has {} entries, expected {}", label, len, n),
                });
            }
        }

        let non_finite = self
            .coefficients
            .iter()
            .chain(&self.scaler_mean)
            .chain(&self.scaler_std)
            .chain(std::iter::once(&self.intercept))
            .any(|v| !v.is_finite());
        if non_finite {
            return Err(CardioError::ConfigError {
                reason: "model artifact contains non-finite parameters".to_string(),
            });
        }

        if let Some(i) = self.scaler_std.iter().position(|s| *s <= 0.0) {
            return Err(CardioError::ConfigError {
                reason: format!("scaler_std for '{}' must be positive", FEATURE_NAMES[i]),
            });
        }
        Ok(())
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
