//! Propensity-to-return scoring.
//!
//! The score is a fixed deterministic formula over four behavioural
//! signals, not a trained model: it starts from a ceiling of 100 and
//! deducts a weighted penalty per signal shortfall.

use crate::config::ScoringWeights;
use crate::constants::{
    FREQUENCY_POINTS_PER_VISIT, PENALISED_BALANCE_SCORE, RECENCY_WINDOW_DAYS, VALUE_POINTS_PER_UNIT,
    VALUE_UNIT_AMOUNT,
};
use crate::error::{EngageError, EngageResult};

/// Computes the propensity-to-return score for one patient.
///
/// Sub-scores per signal, each on a 0 to 100 scale:
/// - recency decays linearly to zero across a 365-day window;
/// - frequency grants 10 points per lifetime visit, saturating at 100;
/// - value grants 20 points per 1000 billed, saturating at 100;
/// - balance is 100, halved to 50 while any invoice is unpaid.
///
/// Each sub-score's shortfall from 100 is deducted from the ceiling at its
/// configured weight; the result is rounded and clamped to `[0, 100]`.
/// Pure and deterministic: equal inputs always produce equal scores.
///
/// # Errors
///
/// Returns `EngageError::InvalidInput` if `days_since_last_visit` is
/// negative or `lifetime_value` is negative or not finite. Inputs are
/// rejected, never clamped; only intermediate sub-scores are clamped.
pub fn score(
    weights: &ScoringWeights,
    days_since_last_visit: i64,
    visit_count: u32,
    lifetime_value: f64,
    open_invoices_count: u32,
) -> EngageResult<u8> {
    if days_since_last_visit < 0 {
        return Err(EngageError::InvalidInput(format!(
            "days_since_last_visit cannot be negative, got {days_since_last_visit}"
        )));
    }
    if !lifetime_value.is_finite() || lifetime_value < 0.0 {
        return Err(EngageError::InvalidInput(format!(
            "lifetime_value must be a non-negative amount, got {lifetime_value}"
        )));
    }

    let recency = (100.0 - (days_since_last_visit as f64 / RECENCY_WINDOW_DAYS) * 100.0).max(0.0);
    let frequency = (f64::from(visit_count) * FREQUENCY_POINTS_PER_VISIT).min(100.0);
    let value = ((lifetime_value / VALUE_UNIT_AMOUNT) * VALUE_POINTS_PER_UNIT).min(100.0);
    let balance = if open_invoices_count > 0 {
        PENALISED_BALANCE_SCORE
    } else {
        100.0
    };

    let deductions = (100.0 - recency) * weights.recency
        + (100.0 - frequency) * weights.frequency
        + (100.0 - value) * weights.value
        + (100.0 - balance) * weights.balance;

    let final_score = (100.0 - deductions).clamp(0.0, 100.0).round();
    Ok(final_score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WEIGHT_SUM_TOLERANCE;

    fn default_score(
        days: i64,
        visits: u32,
        lifetime_value: f64,
        open_invoices: u32,
    ) -> u8 {
        score(
            &ScoringWeights::default(),
            days,
            visits,
            lifetime_value,
            open_invoices,
        )
        .unwrap()
    }

    #[test]
    fn test_ideal_patient_scores_full_marks() {
        assert_eq!(default_score(0, 10, 5000.0, 0), 100);
    }

    #[test]
    fn test_zero_history_approaches_zero_but_not_negative() {
        // Recency, frequency and value shortfalls deduct 90 points in total.
        assert_eq!(default_score(2000, 0, 0.0, 0), 10);
        // An outstanding balance deducts another 5.
        assert_eq!(default_score(2000, 0, 0.0, 3), 5);
        assert_eq!(default_score(100_000, 0, 0.0, 99), 5);
    }

    #[test]
    fn test_score_stays_within_bounds() {
        for days in [0, 30, 89, 180, 365, 729, 1000, 5000] {
            for visits in [0, 1, 5, 10, 50] {
                for value in [0.0, 250.0, 1000.0, 5000.0, 100_000.0] {
                    for invoices in [0, 1, 5] {
                        let s = default_score(days, visits, value, invoices);
                        assert!(s <= 100, "score {s} out of bounds");
                    }
                }
            }
        }
    }

    #[test]
    fn test_score_never_increases_with_staleness() {
        let mut previous = default_score(0, 5, 1500.0, 1);
        for days in 1..800 {
            let current = default_score(days, 5, 1500.0, 1);
            assert!(
                current <= previous,
                "score rose from {previous} to {current} at {days} days"
            );
            previous = current;
        }
    }

    #[test]
    fn test_open_invoices_deduct_five_points() {
        assert_eq!(default_score(0, 10, 5000.0, 0), 100);
        assert_eq!(default_score(0, 10, 5000.0, 1), 95);
        // The penalty does not scale with the invoice count.
        assert_eq!(default_score(0, 10, 5000.0, 7), 95);
    }

    #[test]
    fn test_frequency_and_value_saturate() {
        assert_eq!(
            default_score(0, 10, 5000.0, 0),
            default_score(0, 200, 90_000.0, 0)
        );
    }

    #[test]
    fn test_mid_range_example() {
        // recency 45.2 deducts 21.9, value 50 deducts 10, frequency saturates.
        assert_eq!(default_score(200, 12, 2500.0, 0), 68);
    }

    #[test]
    fn test_rejects_negative_days() {
        let result = score(&ScoringWeights::default(), -10, 5, 1000.0, 0);
        assert!(matches!(result, Err(EngageError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_bad_lifetime_value() {
        let weights = ScoringWeights::default();
        assert!(score(&weights, 10, 5, -0.01, 0).is_err());
        assert!(score(&weights, 10, 5, f64::NAN, 0).is_err());
        assert!(score(&weights, 10, 5, f64::INFINITY, 0).is_err());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn test_custom_weights_are_honoured() {
        let recency_only = ScoringWeights {
            recency: 1.0,
            frequency: 0.0,
            value: 0.0,
            balance: 0.0,
        };
        assert_eq!(score(&recency_only, 0, 0, 0.0, 9).unwrap(), 100);
        assert_eq!(score(&recency_only, 365, 50, 9000.0, 0).unwrap(), 0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let weights = ScoringWeights::default();
        let first = score(&weights, 123, 4, 1234.56, 2).unwrap();
        let second = score(&weights, 123, 4, 1234.56, 2).unwrap();
        assert_eq!(first, second);
    }
}
