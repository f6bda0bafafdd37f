//! Constants used throughout the re-engagement engine.
//!
//! The classification thresholds are the published recency state model and
//! are therefore fixed here rather than in the tunable configuration
//! tables; downstream reporting and segment definitions depend on them.

/// Exclusive upper bound in days for the `active` status.
pub const ACTIVE_MAX_DAYS: i64 = 90;

/// Exclusive upper bound in days for the `at_risk` status.
pub const AT_RISK_MAX_DAYS: i64 = 180;

/// Exclusive upper bound in days for the `inactive` status.
pub const INACTIVE_MAX_DAYS: i64 = 365;

/// Exclusive upper bound in days for the `dormant` status; `lost` above.
pub const DORMANT_MAX_DAYS: i64 = 730;

/// Recency window in days over which the recency sub-score decays to zero.
pub const RECENCY_WINDOW_DAYS: f64 = 365.0;

/// Sub-score points granted per lifetime visit; saturates at 100.
pub const FREQUENCY_POINTS_PER_VISIT: f64 = 10.0;

/// Billed amount that earns one block of value sub-score points.
pub const VALUE_UNIT_AMOUNT: f64 = 1000.0;

/// Sub-score points granted per [`VALUE_UNIT_AMOUNT`] billed; saturates at 100.
pub const VALUE_POINTS_PER_UNIT: f64 = 20.0;

/// Balance sub-score applied while the patient has any unpaid invoice.
pub const PENALISED_BALANCE_SCORE: f64 = 50.0;

/// Propensity score above which an at-risk patient is flagged for priority contact.
pub const AT_RISK_PRIORITY_SCORE: u8 = 70;

/// Default minimum propensity score for reactivation-campaign eligibility.
pub const DEFAULT_ELIGIBILITY_THRESHOLD: u8 = 50;

/// Default lower bound of the high propensity band.
pub const DEFAULT_HIGH_BAND_MIN: u8 = 70;

/// Default lower bound of the medium propensity band.
pub const DEFAULT_MEDIUM_BAND_MIN: u8 = 40;

/// Tolerance when checking that scoring weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;
