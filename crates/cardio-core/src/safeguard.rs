//! Risk monotonicity safeguard.
//!
//! The oracle may have learned non-causal correlations, so an intervention
//! that improves every metric can still come back with a higher score. An
//! active intervention must never be shown as raising risk: the score is
//! capped at the baseline, while the simulated metrics are still reported.

use tracing::info;

use cardio_contracts::{action::Action, patient::ModifiableMetrics};

/// Output of `reconcile`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciled {
    pub risk: f64,
    pub metrics: ModifiableMetrics,
    /// True when the simulated risk was above the baseline and got capped.
    pub corrected: bool,
}

/// Cap `simulated_risk` at `current_risk` for active interventions.
///
/// `MonitorOnly` always yields `current_risk`. Corrections are logged at
/// info level; they are expected behaviour, not failures.
pub fn cap_risk(current_risk: f64, simulated_risk: f64, action: Action) -> (f64, bool) {
    if !action.is_active() {
        return (current_risk, false);
    }
    if simulated_risk <= current_risk {
        return (simulated_risk, false);
    }

    info!(
        action = %action,
        current_risk,
        simulated_risk,
        capped_risk = current_risk,
        "monotonicity correction applied: intervention predicted a risk increase"
    );
    (current_risk, true)
}

/// Reconcile a simulated outcome against the baseline.
///
/// - `MonitorOnly`: baseline risk and baseline metrics, unconditionally.
/// - Simulated risk at or below baseline: passed through unchanged.
/// - Simulated risk above baseline: risk capped at baseline, simulated
///   metrics kept.
pub fn reconcile(
    current_risk: f64,
    simulated_risk: f64,
    current_metrics: ModifiableMetrics,
    simulated_metrics: ModifiableMetrics,
    action: Action,
) -> Reconciled {
    if !action.is_active() {
        return Reconciled { risk: current_risk, metrics: current_metrics, corrected: false };
    }

    let (risk, corrected) = cap_risk(current_risk, simulated_risk, action);
    Reconciled { risk, metrics: simulated_metrics, corrected }
}

// ── Tests ────────────────────────────────────────────────────────────────────
