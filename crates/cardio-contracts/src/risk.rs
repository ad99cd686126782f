//! Risk oracle output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse risk tier derived from the score with fixed cut points 30 / 70.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskClass {
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score < 30.0 {
            RiskClass::Low
        } else if risk_score < 70.0 {
            RiskClass::Medium
        } else {
            RiskClass::High
        }
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskClass::Low => "Low Risk",
            RiskClass::Medium => "Medium Risk",
            RiskClass::High => "High Risk",
        };
        f.write_str(label)
    }
}

/// Importance of one feature in the oracle's model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

/// One prediction from a `RiskOracle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Probability expressed as a percentage, 0..=100.
    pub risk_score: f64,
    pub has_disease: bool,
    pub classification: RiskClass,
    /// 0..=1
    pub probability: f64,
    /// One entry per feature, sorted by weight descending. Weights sum to ~1.
    pub feature_importance: Vec<FeatureWeight>,
}

impl RiskResult {
    /// Build a result from a disease probability.
    ///
    /// `has_disease` follows the usual 0.5 decision threshold. The importance
    /// list is sorted descending before it is stored.
    pub fn from_probability(probability: f64, mut feature_importance: Vec<FeatureWeight>) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        let risk_score = probability * 100.0;
        feature_importance.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Self {
            risk_score,
            has_disease: probability >= 0.5,
            classification: RiskClass::from_score(risk_score),
            probability,
            feature_importance,
        }
    }

    /// The `n` most important features, most important first.
    pub fn top_features(&self, n: usize) -> impl Iterator<Item = &FeatureWeight> {
        self.feature_importance.iter().take(n)
    }

    pub fn importance_of(&self, feature: &str) -> Option<f64> {
        self.feature_importance
            .iter()
            .find(|w| w.feature == feature)
            .map(|w| w.weight)
    }
}
