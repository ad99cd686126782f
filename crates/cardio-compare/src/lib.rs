//! # cardio-compare
//!
//! Cost-benefit comparison of the four active interventions.
//!
//! [`InterventionRecommender`] maps the baseline risk to a primary and an
//! alternative action through a fixed band table, and lays out every
//! evaluated option side by side with cost, side-effect, and monitoring
//! metadata. It is independent of the guideline rule engine.

pub mod comparator;

pub use comparator::{intervention_details, risk_tier, InterventionDetails, InterventionRecommender};

// ── Tests ─────────────────────────────────────────────────────────────────────
