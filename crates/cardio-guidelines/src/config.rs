//! Guideline thresholds and their TOML schema.
//!
//! Every section is optional and falls back to the standard guideline
//! tables. The `[severe]` and `[moderate]` tables must list all three keys
//! when present. An empty document yields:
//!
//! ```toml
//! [risk_thresholds]
//! very_low = 15.0
//! low = 30.0
//! medium = 50.0
//! high = 70.0
//!
//! [severe]
//! trestbps = 160.0
//! chol = 280.0
//! oldpeak = 2.0
//!
//! [moderate]
//! trestbps = 140.0
//! chol = 240.0
//! oldpeak = 1.0
//!
//! [vessels]
//! severe = 3
//! moderate = 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use cardio_contracts::error::{CardioError, CardioResult};

/// Risk-score cut points for the five guideline bands.
///
/// Bands are half-open: a score equal to a cut point belongs to the band above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub very_low: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self { very_low: 15.0, low: 30.0, medium: 50.0, high: 70.0 }
    }
}

/// Thresholds for the three continuous risk factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorThresholds {
    pub trestbps: f64,
    pub chol: f64,
    pub oldpeak: f64,
}

impl FactorThresholds {
    pub const SEVERE: FactorThresholds = FactorThresholds { trestbps: 160.0, chol: 280.0, oldpeak: 2.0 };
    pub const MODERATE: FactorThresholds =
        FactorThresholds { trestbps: 140.0, chol: 240.0, oldpeak: 1.0 };
}

/// Diseased-vessel counts that count as severe / moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselThresholds {
    pub severe: u8,
    pub moderate: u8,
}

impl Default for VesselThresholds {
    fn default() -> Self {
        Self { severe: 3, moderate: 1 }
    }
}

/// The complete guideline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineConfig {
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,
    #[serde(default = "severe_defaults")]
    pub severe: FactorThresholds,
    #[serde(default = "moderate_defaults")]
    pub moderate: FactorThresholds,
    #[serde(default)]
    pub vessels: VesselThresholds,
}

fn severe_defaults() -> FactorThresholds {
    FactorThresholds::SEVERE
}

fn moderate_defaults() -> FactorThresholds {
    FactorThresholds::MODERATE
}

impl Default for GuidelineConfig {
    fn default() -> Self {
        Self {
            risk_thresholds: RiskThresholds::default(),
            severe: FactorThresholds::SEVERE,
            moderate: FactorThresholds::MODERATE,
            vessels: VesselThresholds::default(),
        }
    }
}

impl GuidelineConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `CardioError::ConfigError` if the TOML is malformed or the
    /// thresholds are inconsistent.
    pub fn from_toml_str(s: &str) -> CardioResult<Self> {
        let config: GuidelineConfig = toml::from_str(s).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to parse guideline TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as guideline TOML.
    pub fn from_file(path: &Path) -> CardioResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CardioError::ConfigError {
            reason: format!("failed to read guideline file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Cut points must be strictly ascending inside 0..=100, and each severe
    /// threshold must be at least its moderate counterpart.
    pub fn validate(&self) -> CardioResult<()> {
        self.risk_thresholds.validate()?;

        let pairs = [
            ("trestbps", self.severe.trestbps, self.moderate.trestbps),
            ("chol", self.severe.chol, self.moderate.chol),
            ("oldpeak", self.severe.oldpeak, self.moderate.oldpeak),
            ("vessels", f64::from(self.vessels.severe), f64::from(self.vessels.moderate)),
        ];
        for (name, severe, moderate) in pairs {
            if severe < moderate {
                return Err(CardioError::ConfigError {
                    reason: format!(
                        "severe threshold for '{}' ({}) is below the moderate threshold ({})",
                        name, severe, moderate
                    ),
                });
            }
        }
        Ok(())
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> CardioResult<()> {
        let cuts = [self.very_low, self.low, self.medium, self.high];
        let ascending = cuts.windows(2).all(|w| w[0] < w[1]);
        let in_range = cuts.iter().all(|c| (0.0..=100.0).contains(c));
        if !ascending || !in_range {
            return Err(CardioError::ConfigError {
                reason: format!(
                    "risk thresholds must be strictly ascending within 0..=100, got {:?}",
                    cuts
                ),
            });
        }
        Ok(())
    }
}
