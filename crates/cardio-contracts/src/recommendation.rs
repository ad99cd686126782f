//! Results of the two recommendation strategies.
//!
//! `Recommendation` is produced by the guideline rule engine; `ComparisonResult`
//! by the cost-benefit comparator. Both are built fresh per call and never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Risk factors found in a patient's raw clinical values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorTally {
    pub severe_count: u32,
    pub moderate_count: u32,
    /// One human-readable entry per factor, in detection order.
    pub details: Vec<String>,
}

impl RiskFactorTally {
    pub fn is_empty(&self) -> bool {
        self.severe_count == 0 && self.moderate_count == 0
    }

    pub fn add_severe(&mut self, detail: String) {
        self.severe_count += 1;
        self.details.push(detail);
    }

    pub fn add_moderate(&mut self, detail: String) {
        self.moderate_count += 1;
        self.details.push(detail);
    }
}

/// Guideline-based recommendation for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub action_name: String,
    pub description: String,
    pub cost: String,
    pub intensity: String,
    /// Tier from the risk bands alone, before escalation.
    pub base_action: Action,
    pub current_risk: f64,
    /// Never above `current_risk`.
    pub expected_final_risk: f64,
    pub expected_risk_reduction: f64,
    pub rationale: String,
    pub risk_factors: RiskFactorTally,
    pub escalation_reasons: Vec<String>,
}

impl Recommendation {
    pub fn was_escalated(&self) -> bool {
        self.action != self.base_action
    }
}

/// Predicted effect of one action relative to the patient's baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterventionOutcome {
    pub new_risk: f64,
    pub risk_reduction: f64,
    /// Reduction as a percentage of the baseline; 0 when the baseline is 0.
    pub pct_reduction: f64,
}

impl InterventionOutcome {
    pub fn new(baseline_risk: f64, new_risk: f64) -> Self {
        let risk_reduction = baseline_risk - new_risk;
        let pct_reduction = if baseline_risk > 0.0 {
            risk_reduction / baseline_risk * 100.0
        } else {
            0.0
        };
        Self { new_risk, risk_reduction, pct_reduction }
    }
}

/// One row of the comparator's options table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionOption {
    pub action_id: Action,
    pub name: String,
    pub description: String,
    pub new_risk: f64,
    pub risk_reduction: f64,
    pub pct_reduction: f64,
    pub cost: String,
    pub side_effects: String,
    pub monitoring: String,
    pub is_recommended: bool,
    pub is_alternative: bool,
}

/// Cost-benefit comparison across all supplied interventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub recommended_action: Action,
    pub recommendation_name: String,
    pub recommendation_description: String,
    pub rationale: String,
    pub alternative_action: Action,
    pub alternative_name: String,
    /// Sorted by action id.
    pub all_options: Vec<InterventionOption>,
    pub baseline_risk: f64,
    pub risk_tier: String,
}

impl ComparisonResult {
    pub fn recommended_option(&self) -> Option<&InterventionOption> {
        self.all_options.iter().find(|o| o.is_recommended)
    }
}
