//! # cardio-verify
//!
//! Input validation for the cardio risk engine.
//!
//! This crate provides [`engine::PatientValidator`], which checks raw patient
//! JSON in two phases:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate,
//!    with every failing field reported at once.
//! 2. **Typed**: deserialization into `PatientFeatures` followed by the
//!    clinical range check.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use cardio_verify::PatientValidator;
//!
//! let validator = PatientValidator::new();
//! let patient = validator.validate_str(&std::fs::read_to_string("patient.json")?)?;
//! let action = validator.validate_action(2)?;
//! ```

pub mod engine;

pub use engine::{patient_schema, PatientValidator};
