//! The guideline-based recommender.
//!
//! `GuidelineRecommender` holds a `GuidelineConfig` and implements the
//! `Recommender` trait from cardio-core.
//!
//! Recommendation algorithm:
//!
//! 1. Score the patient with the oracle.
//! 2. Tally risk factors on the raw values.
//! 3. Look up the base tier from the risk bands.
//! 4. Apply the escalation rules.
//! 5. Simulate the chosen tier and cap the expected risk at the current risk.
//! 6. Build the rationale text.
//!
//! The recommender has no learned state. `save` / `load` only persist the
//! risk thresholds as a JSON marker file.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use cardio_contracts::{
    error::{CardioError, CardioResult},
    patient::PatientFeatures,
    recommendation::Recommendation,
};
use cardio_core::{
    apply_effects, predict_risk,
    safeguard::cap_risk,
    traits::{Recommender, RiskOracle},
};

use crate::{
    config::{GuidelineConfig, RiskThresholds},
    escalation::{base_tier, escalate},
    factors::tally_risk_factors,
    rationale::{build_rationale, RationaleInput},
};

const MARKER_TYPE: &str = "guideline_recommender";
const MARKER_VERSION: &str = "1.0";
const MARKER_NOTE: &str = "No training required - purely rule-based";

/// On-disk marker written by `save`.
#[derive(Debug, Serialize, Deserialize)]
struct MarkerFile {
    #[serde(rename = "type")]
    kind: String,
    version: String,
    risk_thresholds: RiskThresholds,
    note: String,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// Rule-based recommender following clinical risk-stratification guidelines.
#[derive(Debug, Clone, Default)]
pub struct GuidelineRecommender {
    config: GuidelineConfig,
}

impl GuidelineRecommender {
    pub fn new(config: GuidelineConfig) -> Self {
        Self { config }
    }

    /// Build a recommender from a TOML guideline document.
    pub fn from_toml_str(s: &str) -> CardioResult<Self> {
        Ok(Self::new(GuidelineConfig::from_toml_str(s)?))
    }

    pub fn from_file(path: &Path) -> CardioResult<Self> {
        Ok(Self::new(GuidelineConfig::from_file(path)?))
    }

    pub fn config(&self) -> &GuidelineConfig {
        &self.config
    }

    /// Recommend an intervention, checking thresholds against `raw`.
    ///
    /// `features` is what the oracle and effect engine see. `raw` holds the
    /// un-normalized clinical values for the threshold checks and defaults to
    /// `features` when `None`.
    pub fn recommend_with_raw(
        &self,
        features: &PatientFeatures,
        oracle: &dyn RiskOracle,
        raw: Option<&PatientFeatures>,
    ) -> CardioResult<Recommendation> {
        let raw = raw.unwrap_or(features);

        // ── Step 1: Current risk ─────────────────────────────────────────────
        let current_risk = predict_risk(oracle, features)?.risk_score;

        // ── Steps 2-4: Tally, base tier, escalation ──────────────────────────
        let tally = tally_risk_factors(&self.config, raw);
        let base_action = base_tier(&self.config.risk_thresholds, current_risk);
        let escalation = escalate(base_action, current_risk, &tally);
        let action = escalation.action;

        debug!(
            current_risk,
            base_action = %base_action,
            action = %action,
            severe = tally.severe_count,
            moderate = tally.moderate_count,
            "guideline tier selected"
        );

        // ── Step 5: Expected outcome of the chosen tier ──────────────────────
        let modified = apply_effects(features, action);
        let simulated = predict_risk(oracle, &modified)?;
        let (expected_final_risk, _) = cap_risk(current_risk, simulated.risk_score, action);

        // ── Step 6: Rationale ────────────────────────────────────────────────
        let rationale = build_rationale(
            &self.config.risk_thresholds,
            &RationaleInput {
                risk: current_risk,
                action,
                base_action,
                tally: &tally,
                escalation_reasons: &escalation.reasons,
                raw,
            },
        );

        let meta = action.info();
        info!(
            action = %action,
            action_name = meta.name,
            current_risk,
            expected_final_risk,
            escalated = !escalation.reasons.is_empty(),
            "guideline recommendation complete"
        );

        Ok(Recommendation {
            action,
            action_name: meta.name.to_string(),
            description: meta.description.to_string(),
            cost: meta.cost.to_string(),
            intensity: meta.intensity.to_string(),
            base_action,
            current_risk,
            expected_final_risk,
            expected_risk_reduction: current_risk - expected_final_risk,
            rationale,
            risk_factors: tally,
            escalation_reasons: escalation.reasons,
        })
    }

    /// Write the marker file recording the current risk thresholds.
    pub fn save(&self, path: &Path) -> CardioResult<()> {
        let marker = MarkerFile {
            kind: MARKER_TYPE.to_string(),
            version: MARKER_VERSION.to_string(),
            risk_thresholds: self.config.risk_thresholds,
            note: MARKER_NOTE.to_string(),
            saved_at: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&marker).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to serialize guideline marker: {}", e),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CardioError::Io {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        std::fs::write(path, json).map_err(|e| CardioError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(path = %path.display(), "guideline recommender configuration saved");
        Ok(())
    }

    /// Restore risk thresholds from a marker file.
    ///
    /// A missing file, a file in another format (e.g. a legacy binary model),
    /// or a marker with invalid thresholds all leave the current configuration
    /// in place. Only an unreadable existing file is an error.
    pub fn load(&mut self, path: &Path) -> CardioResult<()> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "recommender file not found, keeping current configuration");
                return Ok(());
            }
            Err(e) => {
                return Err(CardioError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let marker: MarkerFile = match serde_json::from_slice(&bytes) {
            Ok(marker) => marker,
            Err(e) => {
                info!(
                    path = %path.display(),
                    error = %e,
                    "file is not a guideline recommender configuration, keeping current configuration"
                );
                return Ok(());
            }
        };

        if marker.kind != MARKER_TYPE {
            info!(path = %path.display(), kind = %marker.kind, "unexpected marker type, keeping current configuration");
            return Ok(());
        }
        if let Err(e) = marker.risk_thresholds.validate() {
            warn!(path = %path.display(), error = %e, "marker thresholds rejected, keeping current configuration");
            return Ok(());
        }

        self.config.risk_thresholds = marker.risk_thresholds;
        info!(
            path = %path.display(),
            kind = %marker.kind,
            version = %marker.version,
            "guideline recommender configuration loaded"
        );
        Ok(())
    }
}

impl Recommender for GuidelineRecommender {
    type Output = Recommendation;

    fn recommend(
        &self,
        patient: &PatientFeatures,
        oracle: &dyn RiskOracle,
    ) -> CardioResult<Recommendation> {
        self.recommend_with_raw(patient, oracle, None)
    }
}
