//! Behavioural recency classification.
//!
//! Maps the number of days since a patient's last non-cancelled visit onto
//! a discrete status. The thresholds form the published state model the
//! rest of the engine segments on, so they live in [`crate::constants`]
//! rather than in the tunable configuration.

use crate::constants::{ACTIVE_MAX_DAYS, AT_RISK_MAX_DAYS, DORMANT_MAX_DAYS, INACTIVE_MAX_DAYS};
use crate::error::{EngageError, EngageResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete recency-based classification of a patient.
///
/// Variants are declared from most to least recently engaged; the derived
/// ordering follows declaration order, so `a < b` means `b` is the more
/// disengaged status.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Active,
    AtRisk,
    Inactive,
    Dormant,
    Lost,
}

impl ActivityStatus {
    /// Every status, in engagement order.
    pub const ALL: [ActivityStatus; 5] = [
        ActivityStatus::Active,
        ActivityStatus::AtRisk,
        ActivityStatus::Inactive,
        ActivityStatus::Dormant,
        ActivityStatus::Lost,
    ];

    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Active => "active",
            ActivityStatus::AtRisk => "at_risk",
            ActivityStatus::Inactive => "inactive",
            ActivityStatus::Dormant => "dormant",
            ActivityStatus::Lost => "lost",
        }
    }

    /// Parses the wire representation.
    ///
    /// Boundary layers (and repository implementations that push status
    /// filters down) use this to turn request strings into typed statuses.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "active" => Some(ActivityStatus::Active),
            "at_risk" => Some(ActivityStatus::AtRisk),
            "inactive" => Some(ActivityStatus::Inactive),
            "dormant" => Some(ActivityStatus::Dormant),
            "lost" => Some(ActivityStatus::Lost),
            _ => None,
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps days since the last non-cancelled visit to a status.
///
/// Thresholds are exclusive upper bounds evaluated in order: below 90 days
/// is `active`, below 180 `at_risk`, below 365 `inactive`, below 730
/// `dormant`, and anything at or above 730 `lost`.
///
/// # Errors
///
/// Returns `EngageError::InvalidInput` if `days_since_last_visit` is
/// negative. Bad input is rejected here, never clamped.
pub fn classify(days_since_last_visit: i64) -> EngageResult<ActivityStatus> {
    if days_since_last_visit < 0 {
        return Err(EngageError::InvalidInput(format!(
            "days_since_last_visit cannot be negative, got {days_since_last_visit}"
        )));
    }
    Ok(match days_since_last_visit {
        d if d < ACTIVE_MAX_DAYS => ActivityStatus::Active,
        d if d < AT_RISK_MAX_DAYS => ActivityStatus::AtRisk,
        d if d < INACTIVE_MAX_DAYS => ActivityStatus::Inactive,
        d if d < DORMANT_MAX_DAYS => ActivityStatus::Dormant,
        _ => ActivityStatus::Lost,
    })
}
