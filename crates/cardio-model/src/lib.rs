//! # cardio-model
//!
//! The production [`RiskOracle`](cardio_core::traits::RiskOracle): a
//! standardized logistic regression loaded from a JSON artifact.
//!
//! Artifacts can be pinned by SHA-256 at load time. A model with the wrong
//! feature order is rejected with `FeatureMismatch` rather than silently
//! scoring shuffled inputs.
//!
//! ```rust,ignore
//! use cardio_model::ModelOracle;
//!
//! let oracle = ModelOracle::from_file(Path::new("model.json"), Some(DIGEST))?;
//! let risk = cardio_core::predict_risk(&oracle, &patient)?;
//! ```

pub mod artifact;
pub mod oracle;

pub use artifact::{sha256_hex, ModelArtifact};
pub use oracle::{ModelOracle, BUNDLED_MODEL};
