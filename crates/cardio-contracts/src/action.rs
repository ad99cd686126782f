//! The closed set of intervention tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CardioError;

/// An intervention tier, ordered by intensity.
///
/// Serialized as its integer id (0..=4). Converting from an out-of-range
/// integer fails with `CardioError::InvalidAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Action {
    MonitorOnly = 0,
    Lifestyle = 1,
    SingleMedication = 2,
    CombinationTherapy = 3,
    IntensiveTreatment = 4,
}

/// Static description of an action, as presented with a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub cost: &'static str,
    pub intensity: &'static str,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MonitorOnly,
        Action::Lifestyle,
        Action::SingleMedication,
        Action::CombinationTherapy,
        Action::IntensiveTreatment,
    ];

    /// Every action that changes the patient's metrics.
    pub const ACTIVE: [Action; 4] = [
        Action::Lifestyle,
        Action::SingleMedication,
        Action::CombinationTherapy,
        Action::IntensiveTreatment,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn is_active(self) -> bool {
        self != Action::MonitorOnly
    }

    /// The tier with the given id, if one exists.
    pub fn from_tier(tier: u8) -> Option<Action> {
        Action::ALL.get(usize::from(tier)).copied()
    }

    pub fn info(self) -> ActionInfo {
        match self {
            Action::MonitorOnly => ActionInfo {
                name: "Monitor Only",
                description: "Quarterly checkups with no active intervention",
                cost: "Low ($)",
                intensity: "Minimal",
            },
            Action::Lifestyle => ActionInfo {
                name: "Lifestyle Intervention",
                description: "Diet and exercise program with regular monitoring",
                cost: "Low ($$)",
                intensity: "Moderate",
            },
            Action::SingleMedication => ActionInfo {
                name: "Single Medication",
                description: "Single medication (e.g., statin or beta-blocker)",
                cost: "Medium ($$$)",
                intensity: "Moderate",
            },
            Action::CombinationTherapy => ActionInfo {
                name: "Combination Therapy",
                description: "Medication plus supervised lifestyle program",
                cost: "High ($$$$)",
                intensity: "High",
            },
            Action::IntensiveTreatment => ActionInfo {
                name: "Intensive Treatment",
                description: "Multiple medications with intensive lifestyle management",
                cost: "Very High ($$$$$)",
                intensity: "Very High",
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }
}

impl TryFrom<i64> for Action {
    type Error = CardioError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Action::from_tier)
            .ok_or(CardioError::InvalidAction { value })
    }
}

impl From<Action> for i64 {
    fn from(action: Action) -> i64 {
        i64::from(action.id())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
