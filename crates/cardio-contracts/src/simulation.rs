use serde::{Deserialize, Serialize};

use crate::{action::Action, patient::ModifiableMetrics, risk::FeatureWeight};

/// What-if result for applying one action to one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub action: Action,
    pub current_metrics: ModifiableMetrics,
    /// Simulated metrics. Still shown when the risk estimate was capped.
    pub optimized_metrics: ModifiableMetrics,
    pub current_risk: f64,
    pub expected_risk: f64,
    pub risk_reduction: f64,
    pub explanation: String,
    /// Taken from the baseline prediction.
    pub feature_importance: Vec<FeatureWeight>,
    pub modifiable_features: Vec<String>,
    /// True when the oracle's raw estimate rose and was capped.
    pub risk_capped: bool,
}
