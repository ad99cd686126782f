//! Trait seams for the cardio pipeline.
//!
//! - `RiskOracle`  : black-box classifier (consumed, never trusted to be monotonic)
//! - `Recommender` : a recommendation strategy (guideline rules or cost-benefit table)
//!
//! Both are injected explicitly. Nothing in the core reaches for a global
//! model instance.

use cardio_contracts::{error::CardioResult, patient::PatientFeatures, risk::RiskResult};

/// A trained binary classifier that scores cardiovascular risk.
///
/// Implementations must be deterministic for identical input and reentrant:
/// the pipeline may call `predict` from several threads at once.
pub trait RiskOracle: Send + Sync {
    /// Score one patient.
    ///
    /// # Errors
    ///
    /// - `OracleNotReady` if no model is loaded
    /// - `FeatureMismatch` if the record does not match the trained schema
    /// - `PredictionFailed` for numerical or internal failures
    fn predict(&self, features: &PatientFeatures) -> CardioResult<RiskResult>;
}

/// A recommendation strategy.
///
/// Two strategies exist and are deliberately kept separate: the guideline
/// rule engine and the cost-benefit comparator. The boundary layer picks one.
pub trait Recommender: Send + Sync {
    type Output;

    fn recommend(&self, patient: &PatientFeatures, oracle: &dyn RiskOracle)
        -> CardioResult<Self::Output>;
}
