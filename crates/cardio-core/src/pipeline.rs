//! The simulation pipeline exposed to boundary layers.
//!
//!   patient → oracle (baseline) → effects → oracle (simulated) → safeguard → explanation
//!
//! Every function takes the oracle as an argument. There is no shared state
//! between calls; outcomes for different actions do not depend on each other.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use cardio_contracts::{
    action::Action,
    error::CardioResult,
    patient::{ModifiableMetrics, PatientFeatures, MODIFIABLE_FEATURES},
    recommendation::InterventionOutcome,
    risk::RiskResult,
    simulation::SimulationResult,
};

use crate::{effects::apply_effects, explain::explain, safeguard::reconcile, traits::RiskOracle};

/// Score a patient. A direct pass-through to the oracle.
pub fn predict_risk(oracle: &dyn RiskOracle, patient: &PatientFeatures) -> CardioResult<RiskResult> {
    let result = oracle.predict(patient).map_err(|e| {
        warn!(error = %e, "risk oracle call failed");
        e
    })?;
    debug!(
        risk_score = result.risk_score,
        classification = %result.classification,
        "risk predicted"
    );
    Ok(result)
}

/// What-if simulation of one action.
///
/// # Pipeline
///
/// 1. Baseline prediction
/// 2. `apply_effects` for the action
/// 3. Prediction on the modified record
/// 4. `reconcile`: the expected risk never exceeds the baseline
/// 5. Explanation built from the reconciled numbers
pub fn simulate(
    oracle: &dyn RiskOracle,
    patient: &PatientFeatures,
    action: Action,
) -> CardioResult<SimulationResult> {
    // ── Step 1: Baseline ─────────────────────────────────────────────────────
    let baseline = predict_risk(oracle, patient)?;
    let current_risk = baseline.risk_score;

    // ── Steps 2 & 3: Apply the intervention and rescore ──────────────────────
    let modified = apply_effects(patient, action);
    let simulated = predict_risk(oracle, &modified)?;

    // ── Step 4: Monotonicity safeguard ───────────────────────────────────────
    let current_metrics = ModifiableMetrics::from_features(patient);
    let reconciled = reconcile(
        current_risk,
        simulated.risk_score,
        current_metrics,
        ModifiableMetrics::from_features(&modified),
        action,
    );
    let risk_reduction = current_risk - reconciled.risk;

    // ── Step 5: Explanation ──────────────────────────────────────────────────
    let explanation = explain(
        &current_metrics,
        &reconciled.metrics,
        risk_reduction,
        &baseline.feature_importance,
        action,
    );

    info!(
        action = %action,
        current_risk,
        expected_risk = reconciled.risk,
        capped = reconciled.corrected,
        "simulation complete"
    );

    Ok(SimulationResult {
        action,
        current_metrics,
        optimized_metrics: reconciled.metrics,
        current_risk,
        expected_risk: reconciled.risk,
        risk_reduction,
        explanation,
        feature_importance: baseline.feature_importance,
        modifiable_features: MODIFIABLE_FEATURES.iter().map(|f| f.to_string()).collect(),
        risk_capped: reconciled.corrected,
    })
}

/// Reconciled outcome of each action in `actions`, relative to `baseline_risk`.
///
/// Actions are evaluated independently, in order. The safeguard is applied
/// per action, so no outcome ever reports a negative reduction.
pub fn evaluate_outcomes(
    oracle: &dyn RiskOracle,
    patient: &PatientFeatures,
    baseline_risk: f64,
    actions: &[Action],
) -> CardioResult<BTreeMap<Action, InterventionOutcome>> {
    let current_metrics = ModifiableMetrics::from_features(patient);
    let mut outcomes = BTreeMap::new();

    for &action in actions {
        let modified = apply_effects(patient, action);
        let simulated = predict_risk(oracle, &modified)?;
        let reconciled = reconcile(
            baseline_risk,
            simulated.risk_score,
            current_metrics,
            ModifiableMetrics::from_features(&modified),
            action,
        );
        debug!(
            action = %action,
            new_risk = reconciled.risk,
            capped = reconciled.corrected,
            "intervention outcome evaluated"
        );
        outcomes.insert(action, InterventionOutcome::new(baseline_risk, reconciled.risk));
    }

    Ok(outcomes)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use cardio_contracts::{
        action::Action,
        error::{CardioError, CardioResult},
        patient::PatientFeatures,
        risk::{FeatureWeight, RiskResult},
    };

    use crate::traits::RiskOracle;

    use super::{evaluate_outcomes, predict_risk, simulate};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn importance() -> Vec<FeatureWeight> {
        [("thal", 0.3), ("ca", 0.25), ("cp", 0.15), ("trestbps", 0.1), ("chol", 0.1), ("age", 0.1)]
            .iter()
            .map(|(f, w)| FeatureWeight { feature: f.to_string(), weight: *w })
            .collect()
    }

    fn end_to_end_patient() -> PatientFeatures {
        PatientFeatures {
            age: 63.0,
            sex: 1.0,
            cp: 3.0,
            trestbps: 145.0,
            chol: 233.0,
            fbs: 1.0,
            restecg: 0.0,
            thalach: 150.0,
            exang: 0.0,
            oldpeak: 2.3,
            slope: 2.0,
            ca: 0.0,
            thal: 6.0,
        }
    }

    fn severe_patient() -> PatientFeatures {
        PatientFeatures {
            trestbps: 172.0,
            chol: 295.0,
            thalach: 108.0,
            oldpeak: 3.1,
            ca: 2.0,
            ..end_to_end_patient()
        }
    }

    /// Scores rise with BP, cholesterol, and ST depression and fall with
    /// heart rate, so interventions genuinely help.
    struct ClinicalOracle;

    impl RiskOracle for ClinicalOracle {
        fn predict(&self, f: &PatientFeatures) -> CardioResult<RiskResult> {
            let z = -9.0 + 0.03 * f.trestbps + 0.01 * f.chol - 0.02 * f.thalach
                + 0.6 * f.oldpeak
                + 0.5 * f.ca
                + 0.2 * (f.thal - 3.0);
            let p = 1.0 / (1.0 + (-z).exp());
            Ok(RiskResult::from_probability(p, importance()))
        }
    }

    /// Learned the opposite correlation: lower BP looks riskier.
    struct ParadoxicalOracle;

    impl RiskOracle for ParadoxicalOracle {
        fn predict(&self, f: &PatientFeatures) -> CardioResult<RiskResult> {
            let p = (1.0 - f.trestbps / 250.0 + 0.05 * f.oldpeak).clamp(0.0, 1.0);
            Ok(RiskResult::from_probability(p, importance()))
        }
    }

    /// Returns pre-scripted scores in order and counts calls.
    struct ScriptedOracle {
        scores: Mutex<VecDeque<f64>>,
        calls: Arc<Mutex<u32>>,
    }

    impl ScriptedOracle {
        fn new(scores: &[f64]) -> Self {
            Self {
                scores: Mutex::new(scores.iter().copied().collect()),
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl RiskOracle for ScriptedOracle {
        fn predict(&self, _f: &PatientFeatures) -> CardioResult<RiskResult> {
            *self.calls.lock().unwrap() += 1;
            let score = self.scores.lock().unwrap().pop_front().unwrap_or(50.0);
            Ok(RiskResult::from_probability(score / 100.0, importance()))
        }
    }

    /// An oracle with no model loaded.
    struct UnloadedOracle;

    impl RiskOracle for UnloadedOracle {
        fn predict(&self, _f: &PatientFeatures) -> CardioResult<RiskResult> {
            Err(CardioError::OracleNotReady { reason: "model not loaded".to_string() })
        }
    }

    // ── predict_risk ─────────────────────────────────────────────────────────

    #[test]
    fn predict_risk_is_a_pass_through() {
        let p = end_to_end_patient();
        let direct = ClinicalOracle.predict(&p).unwrap();
        let via_pipeline = predict_risk(&ClinicalOracle, &p).unwrap();
        assert_eq!(direct, via_pipeline);
    }

    #[test]
    fn oracle_not_ready_propagates_without_fallback() {
        let err = simulate(&UnloadedOracle, &end_to_end_patient(), Action::Lifestyle).unwrap_err();
        assert!(err.is_service_unavailable());
    }

    // ── simulate ─────────────────────────────────────────────────────────────

    #[test]
    fn end_to_end_single_medication() {
        let p = end_to_end_patient();
        let baseline = predict_risk(&ClinicalOracle, &p).unwrap();
        let result = simulate(&ClinicalOracle, &p, Action::SingleMedication).unwrap();

        assert!((result.current_risk - baseline.risk_score).abs() < 1e-9);
        assert!(result.expected_risk <= result.current_risk);
        assert!((result.risk_reduction - (result.current_risk - result.expected_risk)).abs() < 1e-9);
        assert_eq!(result.modifiable_features, vec!["trestbps", "chol", "thalach", "oldpeak"]);
        assert_eq!(result.feature_importance, baseline.feature_importance);
        assert!(!result.explanation.is_empty());
    }

    #[test]
    fn risk_never_increases_for_any_active_action() {
        let patients = [end_to_end_patient(), severe_patient()];
        let oracles: [&dyn RiskOracle; 2] = [&ClinicalOracle, &ParadoxicalOracle];
        for oracle in oracles {
            for p in &patients {
                for action in Action::ACTIVE {
                    let r = simulate(oracle, p, action).unwrap();
                    assert!(
                        r.expected_risk <= r.current_risk,
                        "action {} raised risk {} -> {}",
                        action,
                        r.current_risk,
                        r.expected_risk
                    );
                }
            }
        }
    }

    #[test]
    fn capped_simulation_still_shows_improved_metrics() {
        let p = severe_patient();
        let r = simulate(&ParadoxicalOracle, &p, Action::CombinationTherapy).unwrap();

        assert!(r.risk_capped);
        assert_eq!(r.expected_risk, r.current_risk);
        assert_ne!(r.optimized_metrics, r.current_metrics);
        assert!(r.optimized_metrics.trestbps < r.current_metrics.trestbps);
        assert!(r.explanation.contains("primary risk drivers"));
    }

    #[test]
    fn scripted_increase_is_capped() {
        let oracle = ScriptedOracle::new(&[35.0, 41.0]);
        let r = simulate(&oracle, &severe_patient(), Action::Lifestyle).unwrap();
        assert!((r.current_risk - 35.0).abs() < 1e-9);
        assert!((r.expected_risk - 35.0).abs() < 1e-9);
        assert!(r.risk_capped);
        assert_eq!(*oracle.calls.lock().unwrap(), 2);
    }

    #[test]
    fn monitor_only_simulation_is_a_no_op() {
        let p = severe_patient();
        let r = simulate(&ClinicalOracle, &p, Action::MonitorOnly).unwrap();
        assert_eq!(r.expected_risk, r.current_risk);
        assert_eq!(r.risk_reduction, 0.0);
        assert_eq!(r.optimized_metrics, r.current_metrics);
    }

    // ── evaluate_outcomes ────────────────────────────────────────────────────

    #[test]
    fn outcomes_cover_requested_actions_in_order() {
        let p = severe_patient();
        let baseline = predict_risk(&ClinicalOracle, &p).unwrap().risk_score;
        let outcomes = evaluate_outcomes(&ClinicalOracle, &p, baseline, &Action::ACTIVE).unwrap();

        let keys: Vec<Action> = outcomes.keys().copied().collect();
        assert_eq!(keys, Action::ACTIVE.to_vec());

        let mut previous = 0.0;
        for outcome in outcomes.values() {
            assert!(outcome.new_risk <= baseline);
            assert!(outcome.risk_reduction >= previous - 1e-9, "stronger tiers help at least as much");
            previous = outcome.risk_reduction;
        }
    }

    #[test]
    fn outcomes_are_capped_for_paradoxical_oracle() {
        let p = severe_patient();
        let baseline = predict_risk(&ParadoxicalOracle, &p).unwrap().risk_score;
        let outcomes = evaluate_outcomes(&ParadoxicalOracle, &p, baseline, &Action::ACTIVE).unwrap();
        for outcome in outcomes.values() {
            assert_eq!(outcome.new_risk, baseline);
            assert_eq!(outcome.risk_reduction, 0.0);
            assert_eq!(outcome.pct_reduction, 0.0);
        }
    }
}
