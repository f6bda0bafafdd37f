//! Action recommendations derived from a patient's engagement picture.

use crate::activity::ActivityStatus;
use crate::constants::AT_RISK_PRIORITY_SCORE;

/// Produces the recommended next actions for a patient.
///
/// Returns a semicolon-joined list of action phrases; there is always at
/// least one. The base action follows the status, with extra actions for
/// high-propensity at-risk patients and for inactive patients carrying an
/// outstanding balance.
pub fn recommend(
    status: ActivityStatus,
    propensity_score: u8,
    _visit_count: u32,
    open_invoices_count: u32,
) -> String {
    let mut actions: Vec<&str> = Vec::new();

    match status {
        ActivityStatus::Active => {
            actions.push("Maintain engagement with preventive reminders");
        }
        ActivityStatus::AtRisk => {
            actions.push("Send preventive check-up reminder");
            if propensity_score > AT_RISK_PRIORITY_SCORE {
                actions.push("Prioritise contact");
            }
        }
        ActivityStatus::Inactive => {
            actions.push("Start reactivation sequence");
            if open_invoices_count > 0 {
                actions.push("Offer payment facilities");
            }
        }
        ActivityStatus::Dormant => {
            actions.push("Recovery campaign with special offer");
            actions.push("Personal phone contact");
        }
        ActivityStatus::Lost => {
            actions.push("Last recovery attempt");
            actions.push("Consider removing from active list");
        }
    }

    actions.join("; ")
}
