//! Risk-factor counting against raw clinical values.
//!
//! Severe supersedes moderate for each factor: a blood pressure of 170 is one
//! severe factor, not one severe plus one moderate.

use cardio_contracts::{patient::PatientFeatures, recommendation::RiskFactorTally};

use crate::config::GuidelineConfig;

/// Count severe and moderate risk factors in `raw`.
///
/// `raw` must hold un-normalized values; the thresholds are in clinical units.
pub fn tally_risk_factors(config: &GuidelineConfig, raw: &PatientFeatures) -> RiskFactorTally {
    let mut tally = RiskFactorTally::default();
    let severe = &config.severe;
    let moderate = &config.moderate;

    let bp = raw.trestbps;
    if bp >= severe.trestbps {
        tally.add_severe(format!("severe hypertension (BP: {:.0} mmHg)", bp));
    } else if bp >= moderate.trestbps {
        tally.add_moderate(format!("moderate hypertension (BP: {:.0} mmHg)", bp));
    }

    let chol = raw.chol;
    if chol >= severe.chol {
        tally.add_severe(format!("very high cholesterol ({:.0} mg/dL)", chol));
    } else if chol >= moderate.chol {
        tally.add_moderate(format!("high cholesterol ({:.0} mg/dL)", chol));
    }

    let oldpeak = raw.oldpeak;
    if oldpeak >= severe.oldpeak {
        tally.add_severe(format!("significant ST depression ({:.1})", oldpeak));
    } else if oldpeak >= moderate.oldpeak {
        tally.add_moderate(format!("moderate ST depression ({:.1})", oldpeak));
    }

    if raw.exang == 1.0 {
        tally.add_moderate("exercise-induced angina".to_string());
    }

    // Vessel count is categorical; compare on the whole number.
    let ca = raw.ca.trunc() as i64;
    if ca >= i64::from(config.vessels.severe) {
        tally.add_severe(format!("multiple vessel disease ({} vessels)", ca));
    } else if ca >= i64::from(config.vessels.moderate) {
        let plural = if ca > 1 { "s" } else { "" };
        tally.add_moderate(format!("vessel disease ({} vessel{})", ca, plural));
    }

    tally
}
