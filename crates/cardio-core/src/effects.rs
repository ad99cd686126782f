//! Intervention effect engine.
//!
//! Maps `(patient, action)` to the patient's expected metrics after the
//! intervention. Only the four modifiable features move; all others are
//! copied through.
//!
//! The change is state-dependent, not a flat percentage:
//!
//! 1. Each action tier has a base fractional change per feature
//!    (`tier_effect`). Magnitudes never decrease from tier 1 to tier 4.
//! 2. The base change is scaled by a severity multiplier
//!    (`ClinicalBand::severity_multiplier`): 0.05 at or better than the
//!    clinical optimum, rising linearly to 1.0 at the moderate threshold,
//!    1.0 up to the severe threshold, 1.25 beyond it.
//! 3. A value that starts worse than optimal is never pushed past optimal.
//! 4. The result is clamped to a hard physiological range, and never moves
//!    in the wrong direction.
//!
//! Input that already looks z-score normalized bypasses steps 2-4 and gets
//! the plain per-tier multiplier. See `is_normalized`.

use tracing::debug;

use cardio_contracts::{action::Action, patient::PatientFeatures};

/// Which way an intervention moves a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decrease,
    Increase,
}

/// Clinical reference points for one modifiable feature.
///
/// For `Increase` features the thresholds run downwards:
/// `optimal > moderate > severe`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalBand {
    pub feature: &'static str,
    pub direction: Direction,
    pub optimal: f64,
    pub moderate: f64,
    pub severe: f64,
    pub floor: f64,
    pub ceiling: f64,
}

pub const BLOOD_PRESSURE: ClinicalBand = ClinicalBand {
    feature: "trestbps",
    direction: Direction::Decrease,
    optimal: 120.0,
    moderate: 140.0,
    severe: 160.0,
    floor: 90.0,
    ceiling: 200.0,
};

pub const CHOLESTEROL: ClinicalBand = ClinicalBand {
    feature: "chol",
    direction: Direction::Decrease,
    optimal: 200.0,
    moderate: 240.0,
    severe: 280.0,
    floor: 120.0,
    ceiling: 400.0,
};

pub const MAX_HEART_RATE: ClinicalBand = ClinicalBand {
    feature: "thalach",
    direction: Direction::Increase,
    optimal: 150.0,
    moderate: 130.0,
    severe: 110.0,
    floor: 60.0,
    ceiling: 220.0,
};

pub const ST_DEPRESSION: ClinicalBand = ClinicalBand {
    feature: "oldpeak",
    direction: Direction::Decrease,
    optimal: 0.5,
    moderate: 1.0,
    severe: 2.0,
    floor: 0.0,
    ceiling: 6.0,
};

/// Multiplier for values at or better than the optimum.
const OPTIMAL_DAMPING: f64 = 0.05;
/// Multiplier for values at or beyond the severe threshold.
const SEVERE_BOOST: f64 = 1.25;

/// Above this magnitude at least one of BP, cholesterol, or heart rate is in
/// raw clinical units.
const NORMALIZED_LIMIT: f64 = 10.0;

/// Base fractional change per modifiable feature for one action tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierEffect {
    pub trestbps: f64,
    pub chol: f64,
    pub thalach: f64,
    pub oldpeak: f64,
}

pub fn tier_effect(action: Action) -> TierEffect {
    match action {
        Action::MonitorOnly => TierEffect { trestbps: 0.0, chol: 0.0, thalach: 0.0, oldpeak: 0.0 },
        Action::Lifestyle => TierEffect { trestbps: 0.05, chol: 0.10, thalach: 0.05, oldpeak: 0.10 },
        Action::SingleMedication => {
            TierEffect { trestbps: 0.10, chol: 0.15, thalach: 0.05, oldpeak: 0.15 }
        }
        Action::CombinationTherapy => {
            TierEffect { trestbps: 0.15, chol: 0.20, thalach: 0.08, oldpeak: 0.25 }
        }
        Action::IntensiveTreatment => {
            TierEffect { trestbps: 0.20, chol: 0.25, thalach: 0.10, oldpeak: 0.40 }
        }
    }
}

impl ClinicalBand {
    /// Scale applied to the tier's base change for a patient at `value`.
    pub fn severity_multiplier(&self, value: f64) -> f64 {
        // Orient every band so that larger means worse.
        let (v, optimal, moderate, severe) = match self.direction {
            Direction::Decrease => (value, self.optimal, self.moderate, self.severe),
            Direction::Increase => (-value, -self.optimal, -self.moderate, -self.severe),
        };

        if v <= optimal {
            OPTIMAL_DAMPING
        } else if v < moderate {
            let progress = (v - optimal) / (moderate - optimal);
            OPTIMAL_DAMPING + (1.0 - OPTIMAL_DAMPING) * progress
        } else if v < severe {
            1.0
        } else {
            SEVERE_BOOST
        }
    }

    /// Apply a base fractional change of `pct` to `value`.
    pub fn adjust(&self, value: f64, pct: f64) -> f64 {
        let change = value * pct * self.severity_multiplier(value);
        match self.direction {
            Direction::Decrease => {
                let mut next = value - change;
                if value > self.optimal {
                    next = next.max(self.optimal);
                }
                next.clamp(self.floor, self.ceiling).min(value)
            }
            Direction::Increase => {
                let mut next = value + change;
                if value < self.optimal {
                    next = next.min(self.optimal);
                }
                next.clamp(self.floor, self.ceiling).max(value)
            }
        }
    }
}

/// True when BP, cholesterol, and heart rate all look like z-scores.
///
/// Raw values for these three are always far above 10, so the check is
/// unambiguous for validated input.
pub fn is_normalized(features: &PatientFeatures) -> bool {
    [features.trestbps, features.chol, features.thalach]
        .iter()
        .all(|v| v.abs() <= NORMALIZED_LIMIT)
}

/// Expected patient features after `action`.
///
/// `MonitorOnly` returns an exact copy. The caller's record is never touched.
pub fn apply_effects(features: &PatientFeatures, action: Action) -> PatientFeatures {
    let mut next = *features;
    if !action.is_active() {
        return next;
    }

    let effect = tier_effect(action);

    // Legacy path: clinical thresholds mean nothing on standardized values,
    // so apply the bare multipliers with no severity scaling or bounds.
    if is_normalized(features) {
        debug!(action = %action, "normalized input detected, applying fixed multipliers");
        next.trestbps = features.trestbps * (1.0 - effect.trestbps);
        next.chol = features.chol * (1.0 - effect.chol);
        next.thalach = features.thalach * (1.0 + effect.thalach);
        next.oldpeak = features.oldpeak * (1.0 - effect.oldpeak);
        return next;
    }

    next.trestbps = BLOOD_PRESSURE.adjust(features.trestbps, effect.trestbps);
    next.chol = CHOLESTEROL.adjust(features.chol, effect.chol);
    next.thalach = MAX_HEART_RATE.adjust(features.thalach, effect.thalach);
    next.oldpeak = ST_DEPRESSION.adjust(features.oldpeak, effect.oldpeak);

    debug!(
        action = %action,
        trestbps = next.trestbps,
        chol = next.chol,
        thalach = next.thalach,
        oldpeak = next.oldpeak,
        "intervention effects applied"
    );

    next
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use cardio_contracts::{action::Action, patient::PatientFeatures};

    use super::*;

    fn patient(trestbps: f64, chol: f64, thalach: f64, oldpeak: f64) -> PatientFeatures {
        PatientFeatures {
            age: 58.0,
            sex: 1.0,
            cp: 4.0,
            trestbps,
            chol,
            fbs: 0.0,
            restecg: 1.0,
            thalach,
            exang: 1.0,
            oldpeak,
            slope: 2.0,
            ca: 1.0,
            thal: 7.0,
        }
    }

    fn healthy() -> PatientFeatures {
        patient(110.0, 180.0, 160.0, 0.0)
    }

    fn deltas(before: &PatientFeatures, after: &PatientFeatures) -> [f64; 4] {
        [
            (after.trestbps - before.trestbps).abs(),
            (after.chol - before.chol).abs(),
            (after.thalach - before.thalach).abs(),
            (after.oldpeak - before.oldpeak).abs(),
        ]
    }

    // ── Identity ─────────────────────────────────────────────────────────────

    #[test]
    fn monitor_only_is_exact_identity() {
        for p in [healthy(), patient(175.0, 310.0, 98.0, 3.4), patient(0.3, -1.1, 0.9, 0.2)] {
            assert_eq!(apply_effects(&p, Action::MonitorOnly), p);
        }
    }

    #[test]
    fn non_modifiable_features_pass_through() {
        let p = patient(165.0, 290.0, 120.0, 2.5);
        for action in Action::ACTIVE {
            let next = apply_effects(&p, action);
            assert_eq!(next.age, p.age);
            assert_eq!(next.sex, p.sex);
            assert_eq!(next.cp, p.cp);
            assert_eq!(next.fbs, p.fbs);
            assert_eq!(next.restecg, p.restecg);
            assert_eq!(next.exang, p.exang);
            assert_eq!(next.slope, p.slope);
            assert_eq!(next.ca, p.ca);
            assert_eq!(next.thal, p.thal);
        }
    }

    #[test]
    fn caller_record_is_not_mutated() {
        let p = patient(165.0, 290.0, 120.0, 2.5);
        let copy = p;
        let _ = apply_effects(&p, Action::IntensiveTreatment);
        assert_eq!(p, copy);
    }

    // ── Tier ordering ────────────────────────────────────────────────────────

    #[test]
    fn higher_tiers_never_change_less() {
        let patients = [
            healthy(),
            patient(130.0, 220.0, 140.0, 0.8),
            patient(145.0, 233.0, 150.0, 2.3),
            patient(170.0, 290.0, 105.0, 3.0),
            patient(198.0, 395.0, 62.0, 5.9),
            patient(240.0, 560.0, 55.0, 8.0),
            patient(0.4, -0.2, -1.3, 1.1),
        ];
        for p in &patients {
            let mut previous = [0.0; 4];
            for action in Action::ACTIVE {
                let current = deltas(p, &apply_effects(p, action));
                for i in 0..4 {
                    assert!(
                        current[i] + 1e-12 >= previous[i],
                        "feature {} shrank at action {} for {:?}",
                        i,
                        action,
                        p
                    );
                }
                previous = current;
            }
        }
    }

    #[test]
    fn tier_constants_are_non_decreasing() {
        let mut prev = tier_effect(Action::MonitorOnly);
        for action in Action::ACTIVE {
            let e = tier_effect(action);
            assert!(e.trestbps >= prev.trestbps);
            assert!(e.chol >= prev.chol);
            assert!(e.thalach >= prev.thalach);
            assert!(e.oldpeak >= prev.oldpeak);
            prev = e;
        }
    }

    // ── Severity scaling ─────────────────────────────────────────────────────

    #[test]
    fn optimal_patient_sees_near_zero_change_under_intensive_treatment() {
        let p = healthy();
        let next = apply_effects(&p, Action::IntensiveTreatment);
        let d = deltas(&p, &next);
        assert!(d[0] < 5.0, "BP changed by {}", d[0]);
        assert!(d[1] < 10.0, "chol changed by {}", d[1]);
        assert!(d[0] > 0.0 && d[1] > 0.0, "dampened, not frozen");
    }

    #[test]
    fn optimal_patient_lifestyle_change_within_one_unit() {
        let p = healthy();
        let d = deltas(&p, &apply_effects(&p, Action::Lifestyle));
        assert!(d.iter().all(|x| *x <= 1.0), "{:?}", d);
    }

    #[test]
    fn severe_patient_sees_real_change_under_lifestyle() {
        let p = patient(170.0, 300.0, 100.0, 3.0);
        let next = apply_effects(&p, Action::Lifestyle);
        assert!(p.trestbps - next.trestbps >= 5.0);
        assert!(p.chol - next.chol >= 8.0);
        assert!(next.thalach > p.thalach);
        assert!(next.oldpeak < p.oldpeak);
    }

    #[test]
    fn severity_multiplier_shape() {
        assert_eq!(BLOOD_PRESSURE.severity_multiplier(110.0), 0.05);
        assert_eq!(BLOOD_PRESSURE.severity_multiplier(120.0), 0.05);
        let mid = BLOOD_PRESSURE.severity_multiplier(130.0);
        assert!((mid - 0.525).abs() < 1e-9);
        assert_eq!(BLOOD_PRESSURE.severity_multiplier(140.0), 1.0);
        assert_eq!(BLOOD_PRESSURE.severity_multiplier(159.9), 1.0);
        assert_eq!(BLOOD_PRESSURE.severity_multiplier(160.0), 1.25);

        // Heart rate improves upwards, so its band is mirrored.
        assert_eq!(MAX_HEART_RATE.severity_multiplier(170.0), 0.05);
        assert_eq!(MAX_HEART_RATE.severity_multiplier(120.0), 1.0);
        assert_eq!(MAX_HEART_RATE.severity_multiplier(100.0), 1.25);
    }

    // ── Bounds ───────────────────────────────────────────────────────────────

    #[test]
    fn correction_never_overshoots_optimum() {
        let p = patient(125.0, 205.0, 145.0, 0.6);
        let next = apply_effects(&p, Action::IntensiveTreatment);
        assert!(next.trestbps >= 120.0);
        assert!(next.chol >= 200.0);
        assert!(next.thalach <= 150.0);
        assert!(next.oldpeak >= 0.5);
    }

    #[test]
    fn results_stay_inside_clinical_bounds() {
        let p = patient(245.0, 590.0, 52.0, 9.5);
        for action in Action::ACTIVE {
            let next = apply_effects(&p, action);
            assert!(next.trestbps <= 200.0 && next.trestbps >= 90.0);
            assert!(next.chol <= 400.0 && next.chol >= 120.0);
            assert!(next.oldpeak <= 6.0);
            // Below the heart-rate floor: may not reach it, but never drops.
            assert!(next.thalach >= p.thalach);
        }
    }

    #[test]
    fn values_never_move_the_wrong_way() {
        let p = patient(95.0, 110.0, 215.0, 0.0);
        for action in Action::ACTIVE {
            let next = apply_effects(&p, action);
            assert!(next.trestbps <= p.trestbps);
            assert!(next.chol <= p.chol);
            assert!(next.thalach >= p.thalach);
            assert!(next.oldpeak <= p.oldpeak);
        }
    }

    // ── Normalized input ─────────────────────────────────────────────────────

    #[test]
    fn normalized_input_uses_fixed_multipliers() {
        let p = patient(0.5, 1.2, -0.4, 0.8);
        assert!(is_normalized(&p));
        let next = apply_effects(&p, Action::Lifestyle);
        assert!((next.trestbps - 0.5 * 0.95).abs() < 1e-12);
        assert!((next.chol - 1.2 * 0.90).abs() < 1e-12);
        assert!((next.thalach - -0.4 * 1.05).abs() < 1e-12);
        assert!((next.oldpeak - 0.8 * 0.90).abs() < 1e-12);
    }

    #[test]
    fn raw_input_is_not_detected_as_normalized() {
        assert!(!is_normalized(&healthy()));
    }
}
