//! # cardio-core
//!
//! The deterministic simulation core of the cardio risk engine.
//!
//! This crate provides:
//! - The `RiskOracle` and `Recommender` traits
//! - The intervention effect engine (`effects`)
//! - The risk monotonicity safeguard (`safeguard`)
//! - The explanation generator (`explain`)
//! - The `predict_risk` / `simulate` / `evaluate_outcomes` pipeline
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cardio_core::{simulate, traits::RiskOracle};
//!
//! let result = simulate(&oracle, &patient, Action::SingleMedication)?;
//! assert!(result.expected_risk <= result.current_risk);
//! ```

pub mod effects;
pub mod explain;
pub mod pipeline;
pub mod safeguard;
pub mod traits;

pub use effects::apply_effects;
pub use pipeline::{evaluate_outcomes, predict_risk, simulate};
pub use safeguard::reconcile;
