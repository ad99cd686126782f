//! Risk-band lookup table for the cost-benefit comparator.
//!
//! The baseline risk alone picks a (primary, alternative) pair and a rationale
//! template. Unlike the guideline recommender, no risk-factor escalation is
//! applied. The supplied outcomes are only annotated and sorted.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use cardio_contracts::{
    action::Action,
    error::{CardioError, CardioResult},
    patient::PatientFeatures,
    recommendation::{ComparisonResult, InterventionOption, InterventionOutcome},
};
use cardio_core::{
    evaluate_outcomes, predict_risk,
    traits::{Recommender, RiskOracle},
};

/// Patient-facing description of an active intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterventionDetails {
    pub name: &'static str,
    pub description: &'static str,
    pub cost: &'static str,
    pub side_effects: &'static str,
    pub monitoring: &'static str,
}

/// Metadata for `action`. Monitor-only is not a comparable option.
pub fn intervention_details(action: Action) -> CardioResult<InterventionDetails> {
    let details = match action {
        Action::MonitorOnly => return Err(CardioError::InvalidAction { value: i64::from(action) }),
        Action::Lifestyle => InterventionDetails {
            name: "Lifestyle Modifications",
            description: "Diet, exercise, stress management",
            cost: "Low",
            side_effects: "Minimal",
            monitoring: "Self-monitoring",
        },
        Action::SingleMedication => InterventionDetails {
            name: "Single Medication",
            description: "BP medication OR statin therapy",
            cost: "Low-Moderate",
            side_effects: "Low",
            monitoring: "Quarterly check-ups",
        },
        Action::CombinationTherapy => InterventionDetails {
            name: "Combination Therapy",
            description: "BP medication AND statin therapy",
            cost: "Moderate",
            side_effects: "Moderate",
            monitoring: "Monthly check-ups initially",
        },
        Action::IntensiveTreatment => InterventionDetails {
            name: "Intensive Treatment",
            description: "Multi-drug therapy with close monitoring",
            cost: "High",
            side_effects: "Higher risk",
            monitoring: "Frequent monitoring required",
        },
    };
    Ok(details)
}

/// One row of the band table.
struct Band {
    primary: Action,
    alternative: Action,
    tier: &'static str,
}

fn band_for(baseline_risk: f64) -> Band {
    if baseline_risk >= 70.0 {
        Band {
            primary: Action::IntensiveTreatment,
            alternative: Action::CombinationTherapy,
            tier: "Very High Risk",
        }
    } else if baseline_risk >= 50.0 {
        Band {
            primary: Action::CombinationTherapy,
            alternative: Action::IntensiveTreatment,
            tier: "High Risk",
        }
    } else if baseline_risk >= 30.0 {
        Band {
            primary: Action::CombinationTherapy,
            alternative: Action::SingleMedication,
            tier: "Moderate Risk",
        }
    } else if baseline_risk >= 15.0 {
        Band {
            primary: Action::SingleMedication,
            alternative: Action::CombinationTherapy,
            tier: "Low-Moderate Risk",
        }
    } else {
        Band { primary: Action::Lifestyle, alternative: Action::SingleMedication, tier: "Low Risk" }
    }
}

/// Label of the comparator's risk band.
pub fn risk_tier(baseline_risk: f64) -> &'static str {
    band_for(baseline_risk).tier
}

fn band_rationale(baseline_risk: f64) -> String {
    let r = baseline_risk;
    if r >= 70.0 {
        format!(
            "Your cardiovascular risk is very high ({:.1}%). \
             Intensive treatment is recommended to achieve maximum risk reduction. \
             This typically involves multiple medications and close medical monitoring.",
            r
        )
    } else if r >= 50.0 {
        format!(
            "Your cardiovascular risk is elevated ({:.1}%). \
             Combination therapy (BP medication + statin) offers a good balance \
             of effectiveness and tolerability for your risk level.",
            r
        )
    } else if r >= 30.0 {
        format!(
            "Your cardiovascular risk is moderate ({:.1}%). \
             Combination therapy is recommended, though your doctor may start with \
             single medication depending on your BP and cholesterol levels.",
            r
        )
    } else if r >= 15.0 {
        format!(
            "Your cardiovascular risk is low-moderate ({:.1}%). \
             Single medication (either BP medication or statin) combined with \
             lifestyle changes is typically sufficient.",
            r
        )
    } else {
        format!(
            "Your cardiovascular risk is low ({:.1}%). \
             Focus on maintaining healthy lifestyle habits. Medication may not be \
             necessary unless you have other risk factors.",
            r
        )
    }
}

/// The cost-benefit comparator. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterventionRecommender;

impl InterventionRecommender {
    pub fn new() -> Self {
        Self
    }

    /// Pick primary and alternative actions for `baseline_risk` and annotate
    /// every supplied outcome.
    ///
    /// Returns `InvalidAction` if `outcomes` contains `MonitorOnly`, which has
    /// no cost-benefit metadata.
    pub fn compare(
        &self,
        baseline_risk: f64,
        outcomes: &BTreeMap<Action, InterventionOutcome>,
    ) -> CardioResult<ComparisonResult> {
        let band = band_for(baseline_risk);

        // BTreeMap iteration is already sorted by action id.
        let mut all_options = Vec::with_capacity(outcomes.len());
        for (&action, outcome) in outcomes {
            let details = intervention_details(action)?;
            all_options.push(InterventionOption {
                action_id: action,
                name: details.name.to_string(),
                description: details.description.to_string(),
                new_risk: outcome.new_risk,
                risk_reduction: outcome.risk_reduction,
                pct_reduction: outcome.pct_reduction,
                cost: details.cost.to_string(),
                side_effects: details.side_effects.to_string(),
                monitoring: details.monitoring.to_string(),
                is_recommended: action == band.primary,
                is_alternative: action == band.alternative,
            });
        }

        let primary = intervention_details(band.primary)?;
        let alternative = intervention_details(band.alternative)?;

        info!(
            recommended = %band.primary,
            baseline_risk,
            tier = band.tier,
            "comparator recommendation"
        );

        Ok(ComparisonResult {
            recommended_action: band.primary,
            recommendation_name: primary.name.to_string(),
            recommendation_description: primary.description.to_string(),
            rationale: band_rationale(baseline_risk),
            alternative_action: band.alternative,
            alternative_name: alternative.name.to_string(),
            all_options,
            baseline_risk,
            risk_tier: band.tier.to_string(),
        })
    }
}

impl Recommender for InterventionRecommender {
    type Output = ComparisonResult;

    /// Score the patient, evaluate all four active interventions, compare.
    fn recommend(
        &self,
        patient: &PatientFeatures,
        oracle: &dyn RiskOracle,
    ) -> CardioResult<ComparisonResult> {
        let baseline_risk = predict_risk(oracle, patient)?.risk_score;
        let outcomes = evaluate_outcomes(oracle, patient, baseline_risk, &Action::ACTIVE)?;
        debug!(baseline_risk, options = outcomes.len(), "outcomes ready for comparison");
        self.compare(baseline_risk, &outcomes)
    }
}
