//! # cardio-guidelines
//!
//! A rule-based intervention recommender following clinical
//! risk-stratification guidelines.
//!
//! ## Overview
//!
//! [`GuidelineRecommender`] implements the
//! [`Recommender`](cardio_core::traits::Recommender) trait. The risk score
//! picks a base tier from five half-open bands; escalation rules then raise
//! the tier when risk factors combine. Thresholds are configurable in TOML.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use cardio_guidelines::GuidelineRecommender;
//!
//! let recommender = GuidelineRecommender::from_file(Path::new("guidelines.toml"))?;
//! let recommendation = recommender.recommend(&patient, &oracle)?;
//! ```

pub mod config;
pub mod escalation;
pub mod factors;
pub mod rationale;
pub mod recommender;

pub use config::{FactorThresholds, GuidelineConfig, RiskThresholds, VesselThresholds};
pub use recommender::GuidelineRecommender;

// ── Tests ─────────────────────────────────────────────────────────────────────
