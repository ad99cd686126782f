//! # cardio-contracts
//!
//! Shared types for the cardio risk engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions, static metadata, and error types.

pub mod action;
pub mod error;
pub mod patient;
pub mod recommendation;
pub mod risk;
pub mod simulation;

#[cfg(test)]
mod tests {
    use super::*;
    use action::Action;
    use error::CardioError;
    use patient::{PatientFeatures, FEATURE_NAMES};
    use recommendation::InterventionOutcome;
    use risk::{FeatureWeight, RiskClass, RiskResult};

    fn sample_patient() -> PatientFeatures {
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

    // ── PatientFeatures ──────────────────────────────────────────────────────

    #[test]
    fn feature_vector_follows_canonical_order() {
        let p = sample_patient();
        let values = p.to_vec();
        assert_eq!(values.len(), FEATURE_NAMES.len());
        assert_eq!(values[3], 145.0);
        assert_eq!(values[12], 6.0);
        assert_eq!(PatientFeatures::from_vec(&values).unwrap(), p);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = PatientFeatures::from_vec(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CardioError::FeatureMismatch { .. }));
    }

    #[test]
    fn get_by_name() {
        let p = sample_patient();
        assert_eq!(p.get("oldpeak"), Some(2.3));
        assert_eq!(p.get("bmi"), None);
    }

    #[test]
    fn validate_accepts_in_range_patient() {
        assert!(sample_patient().validate().is_ok());
    }

    #[test]
    fn validate_names_out_of_range_field() {
        let mut p = sample_patient();
        p.trestbps = 300.0;
        match p.validate().unwrap_err() {
            CardioError::InvalidPatient { field, .. } => assert_eq!(field, "trestbps"),
            other => panic!("expected InvalidPatient, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_unknown_thal_category() {
        let mut p = sample_patient();
        p.thal = 5.0;
        match p.validate().unwrap_err() {
            CardioError::InvalidPatient { field, .. } => assert_eq!(field, "thal"),
            other => panic!("expected InvalidPatient, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_fractional_category_and_nan() {
        let mut p = sample_patient();
        p.cp = 2.5;
        assert!(p.validate().is_err());

        let mut p = sample_patient();
        p.chol = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn structural_disease_detection() {
        let mut p = sample_patient();
        assert!(p.has_structural_disease(), "thal 6 is a fixed defect");

        p.thal = 3.0;
        p.ca = 1.0;
        assert!(!p.has_structural_disease());

        p.ca = 2.0;
        assert!(p.has_structural_disease());
    }

    // ── Action ───────────────────────────────────────────────────────────────

    #[test]
    fn action_try_from_accepts_closed_range() {
        for id in 0..=4i64 {
            let action = Action::try_from(id).unwrap();
            assert_eq!(i64::from(action), id);
        }
    }

    #[test]
    fn action_try_from_rejects_out_of_range() {
        for id in [-1i64, 5, 255, 256] {
            match Action::try_from(id).unwrap_err() {
                CardioError::InvalidAction { value } => assert_eq!(value, id),
                other => panic!("expected InvalidAction, got {:?}", other),
            }
        }
    }

    #[test]
    fn action_serializes_as_integer() {
        let json = serde_json::to_string(&Action::CombinationTherapy).unwrap();
        assert_eq!(json, "3");
        let decoded: Action = serde_json::from_str("2").unwrap();
        assert_eq!(decoded, Action::SingleMedication);
        assert!(serde_json::from_str::<Action>("7").is_err());
    }

    #[test]
    fn action_metadata_names() {
        assert_eq!(Action::MonitorOnly.name(), "Monitor Only");
        assert_eq!(Action::IntensiveTreatment.info().cost, "Very High ($$$$$)");
        assert!(Action::ACTIVE.iter().all(|a| a.is_active()));
    }

    // ── RiskResult ───────────────────────────────────────────────────────────

    #[test]
    fn risk_class_cut_points() {
        assert_eq!(RiskClass::from_score(29.99), RiskClass::Low);
        assert_eq!(RiskClass::from_score(30.0), RiskClass::Medium);
        assert_eq!(RiskClass::from_score(69.99), RiskClass::Medium);
        assert_eq!(RiskClass::from_score(70.0), RiskClass::High);
        assert_eq!(RiskClass::High.to_string(), "High Risk");
    }

    #[test]
    fn risk_result_sorts_importance_descending() {
        let result = RiskResult::from_probability(
            0.42,
            vec![
                FeatureWeight { feature: "age".into(), weight: 0.1 },
                FeatureWeight { feature: "ca".into(), weight: 0.6 },
                FeatureWeight { feature: "chol".into(), weight: 0.3 },
            ],
        );
        assert!((result.risk_score - 42.0).abs() < 1e-9);
        assert!(!result.has_disease);
        assert_eq!(result.classification, RiskClass::Medium);
        let order: Vec<&str> = result.top_features(3).map(|w| w.feature.as_str()).collect();
        assert_eq!(order, vec!["ca", "chol", "age"]);
        assert_eq!(result.importance_of("chol"), Some(0.3));
    }

    #[test]
    fn risk_class_serializes_with_label() {
        let json = serde_json::to_string(&RiskClass::Low).unwrap();
        assert_eq!(json, "\"Low Risk\"");
    }

    // ── InterventionOutcome ──────────────────────────────────────────────────

    #[test]
    fn outcome_percentage_reduction() {
        let o = InterventionOutcome::new(40.0, 30.0);
        assert_eq!(o.risk_reduction, 10.0);
        assert_eq!(o.pct_reduction, 25.0);
    }

    #[test]
    fn outcome_zero_baseline_has_zero_percentage() {
        let o = InterventionOutcome::new(0.0, 0.0);
        assert_eq!(o.pct_reduction, 0.0);
    }

    // ── CardioError ──────────────────────────────────────────────────────────

    #[test]
    fn error_classification_helpers() {
        let not_ready = CardioError::OracleNotReady { reason: "no model".into() };
        assert!(not_ready.is_service_unavailable());
        assert!(!not_ready.is_input_error());

        let bad = CardioError::SchemaValidation {
            failures: vec!["/age: too large".into(), "/sex: missing".into()],
        };
        assert!(bad.is_input_error());
        assert_eq!(
            bad.to_string(),
            "schema validation failed: /age: too large; /sex: missing"
        );
    }
}
