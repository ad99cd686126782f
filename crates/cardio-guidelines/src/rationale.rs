//! Clinical rationale text for a guideline recommendation.

use cardio_contracts::{
    action::Action, patient::PatientFeatures, recommendation::RiskFactorTally,
};

use crate::config::RiskThresholds;

const STRUCTURAL_DISEASE_NOTE: &str = "Note: This patient has structural heart disease \
    (vessel disease or thalassemia defects) which cannot be fully reversed by medication or \
    lifestyle changes. The recommended treatment focuses on managing modifiable risk factors \
    to slow disease progression.";

/// Inputs to `build_rationale`, gathered by the recommender.
#[derive(Debug, Clone, Copy)]
pub struct RationaleInput<'a> {
    pub risk: f64,
    pub action: Action,
    pub base_action: Action,
    pub tally: &'a RiskFactorTally,
    pub escalation_reasons: &'a [String],
    /// Raw values, used for the structural-disease check.
    pub raw: &'a PatientFeatures,
}

/// "very low" .. "very high", using the same bands as the base tier.
pub fn risk_phrase(thresholds: &RiskThresholds, risk: f64) -> &'static str {
    if risk < thresholds.very_low {
        "very low"
    } else if risk < thresholds.low {
        "low"
    } else if risk < thresholds.medium {
        "medium"
    } else if risk < thresholds.high {
        "high"
    } else {
        "very high"
    }
}

fn standard_explanation(action: Action) -> &'static str {
    match action {
        Action::MonitorOnly => {
            "Continue monitoring with regular checkups. \
             No active intervention needed for low-risk patients with optimal metrics."
        }
        Action::Lifestyle => {
            "Lifestyle modifications (diet, exercise, stress management) can effectively reduce modifiable risk factors. \
             Recommended as first-line intervention for low-to-moderate risk."
        }
        Action::SingleMedication => {
            "Single medication therapy (e.g., statin or ACE inhibitor) is guideline-recommended for this risk level. \
             Targets elevated blood pressure and cholesterol to reduce cardiovascular events."
        }
        Action::CombinationTherapy => {
            "Combination therapy (medication + supervised lifestyle program) is guideline-recommended for high risk. \
             Provides comprehensive risk reduction by addressing multiple modifiable factors simultaneously."
        }
        Action::IntensiveTreatment => {
            "Intensive treatment with multiple medications and lifestyle management is warranted for very high risk. \
             Maximal intervention to reduce modifiable risk factors and prevent cardiovascular events."
        }
    }
}

/// Assemble the rationale paragraph.
///
/// Order: risk phrase, factor summary, chosen intervention, then either the
/// escalation reasons or the tier's standard explanation, then the
/// structural-disease note for medication tiers.
pub fn build_rationale(thresholds: &RiskThresholds, input: &RationaleInput<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        "Patient has {} cardiovascular disease risk ({:.1}%).",
        risk_phrase(thresholds, input.risk),
        input.risk
    ));

    let tally = input.tally;
    if !tally.is_empty() {
        let mut counts = Vec::new();
        if tally.severe_count > 0 {
            counts.push(format!("{} severe", tally.severe_count));
        }
        if tally.moderate_count > 0 {
            counts.push(format!("{} moderate", tally.moderate_count));
        }
        parts.push(format!("Identified {} risk factor(s).", counts.join(" and ")));

        if !tally.details.is_empty() {
            parts.push(format!("Specific factors: {}.", tally.details.join(", ")));
        }
    }

    parts.push(format!("Recommended intervention: {}.", input.action.name()));

    if !input.escalation_reasons.is_empty() {
        parts.push(format!("Escalation applied: {}", input.escalation_reasons.join(" ")));
    } else if input.action == input.base_action {
        parts.push(standard_explanation(input.action).to_string());
    }

    if input.raw.has_structural_disease() && input.action >= Action::SingleMedication {
        parts.push(STRUCTURAL_DISEASE_NOTE.to_string());
    }

    parts.join(" ")
}
