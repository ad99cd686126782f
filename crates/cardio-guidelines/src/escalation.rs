//! Base tier lookup and risk-factor escalation.
//!
//! Escalation rules run in a fixed priority order. Each rule may raise the
//! tier and never lowers it. A reason is recorded only when a rule actually
//! changes the tier.

use cardio_contracts::{action::Action, recommendation::RiskFactorTally};

use crate::config::RiskThresholds;

/// Minimum risk for the severe-plus-moderates rule.
const SEVERE_WITH_MODERATES_MIN_RISK: f64 = 20.0;
/// Never monitor-only at or above this risk.
const ACTIVE_INTERVENTION_RISK: f64 = 50.0;
/// At or above this risk, anything below combination therapy becomes intensive.
const INTENSIVE_RISK: f64 = 70.0;
/// Borderline window around the low/medium boundary, half-open.
const BORDERLINE_LOW: f64 = 25.0;
const BORDERLINE_HIGH: f64 = 35.0;

/// Guideline tier from the risk score alone.
///
/// Half-open bands: a score exactly on a cut point gets the higher tier.
pub fn base_tier(thresholds: &RiskThresholds, risk: f64) -> Action {
    if risk < thresholds.very_low {
        Action::MonitorOnly
    } else if risk < thresholds.low {
        Action::Lifestyle
    } else if risk < thresholds.medium {
        Action::SingleMedication
    } else if risk < thresholds.high {
        Action::CombinationTherapy
    } else {
        Action::IntensiveTreatment
    }
}

/// Tier after escalation, with one reason per change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    pub action: Action,
    pub reasons: Vec<String>,
}

impl Escalation {
    fn raise_to(&mut self, target: Action, reason: impl FnOnce() -> String) {
        if target > self.action {
            self.action = target;
            self.reasons.push(reason());
        }
    }
}

/// Apply the escalation rules to `base`.
pub fn escalate(base: Action, risk: f64, tally: &RiskFactorTally) -> Escalation {
    let mut esc = Escalation { action: base, reasons: Vec::new() };
    let severe = tally.severe_count;
    let moderate = tally.moderate_count;

    // ── a / b: risk-factor combinations ──────────────────────────────────────
    if severe >= 2 {
        esc.raise_to(Action::CombinationTherapy, || {
            format!("Multiple severe risk factors ({}) warrant combination therapy", severe)
        });
    } else if severe >= 1
        && moderate >= 2
        && risk >= SEVERE_WITH_MODERATES_MIN_RISK
        && esc.action < Action::SingleMedication
    {
        esc.raise_to(Action::SingleMedication, || {
            "Severe risk factor combined with multiple moderate factors warrants medication"
                .to_string()
        });
    }

    // ── c: never monitor-only at high risk ───────────────────────────────────
    if risk >= ACTIVE_INTERVENTION_RISK && esc.action == Action::MonitorOnly {
        esc.raise_to(Action::CombinationTherapy, || {
            format!("High risk ({:.1}%) requires active intervention", risk)
        });
    }

    // ── d: very high risk ────────────────────────────────────────────────────
    if risk >= INTENSIVE_RISK && esc.action < Action::CombinationTherapy {
        esc.raise_to(Action::IntensiveTreatment, || {
            format!("Very high risk ({:.1}%) requires intensive treatment", risk)
        });
    }

    // ── e: borderline low/medium with significant factors ────────────────────
    if (BORDERLINE_LOW..BORDERLINE_HIGH).contains(&risk)
        && esc.action == Action::Lifestyle
        && (severe >= 1 || moderate >= 3)
    {
        esc.raise_to(Action::SingleMedication, || {
            "Borderline risk with significant risk factors warrants medication".to_string()
        });
    }

    esc
}
